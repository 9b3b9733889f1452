//! Client-side session lifecycle for the Fintrack API.
//!
//! A [`SessionManager`] remembers the bearer token issued by
//! `POST /api/v1/auth/login`, persists it with its expiry through a
//! [`SessionStore`] and logs out by itself once the session lapses.
//!
//! # Overview
//!
//! - [`SessionManager::initialize`] restores a persisted session on start.
//! - [`SessionManager::login`] and [`SessionManager::login_with_ttl`] start
//!   a session and schedule its expiry.
//! - [`SessionManager::logout`] clears everything and cancels the timer.
//! - [`SessionManager::subscribe`] observes the authenticated flag.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use client_session::{MemoryStore, SessionConfig, SessionManager};
//! use mockable::DefaultClock;
//!
//! # let runtime = tokio::runtime::Builder::new_current_thread()
//! #     .enable_time()
//! #     .build()
//! #     .expect("runtime");
//! # runtime.block_on(async {
//! let manager = SessionManager::new(
//!     Arc::new(DefaultClock),
//!     Arc::new(MemoryStore::new()),
//!     SessionConfig::default(),
//! );
//! manager.initialize().expect("restore");
//! assert!(!manager.is_authenticated());
//!
//! manager
//!     .login_with_ttl("token-from-login", Duration::from_secs(3600))
//!     .expect("login");
//! assert_eq!(manager.token().as_deref(), Some("token-from-login"));
//!
//! manager.logout().expect("logout");
//! assert!(!manager.is_authenticated());
//! # });
//! ```

mod atomic_io;
mod error;
mod manager;
mod store;

pub use error::{SessionError, StoreError};
pub use manager::{EXPIRY_KEY, SessionConfig, SessionManager, TOKEN_KEY};
pub use store::{FileStore, MemoryStore, SessionStore};
