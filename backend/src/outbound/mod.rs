//! Outbound adapters implementing domain ports.
//!
//! - **memory**: process-local repositories guarded by `std::sync::Mutex`.
//! - **security**: Argon2 password hashing and reset code delivery.
//!
//! Adapters are thin translators between domain types and their storage or
//! transport. They contain no business logic.

pub mod memory;
pub mod security;
