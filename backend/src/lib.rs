//! Fintrack backend: a personal finance API built on hexagonal boundaries.
//!
//! - [`domain`] holds the entities, services and driven ports.
//! - [`inbound::http`] adapts the services to actix-web handlers, with
//!   sanitisation and declarative validation ahead of every handler.
//! - [`outbound`] provides in-memory storage, Argon2 hashing and a logging
//!   reset-code notifier.
//! - [`server`] wires the adapters together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

#[cfg(test)]
mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::{RequestLog, Trace};
