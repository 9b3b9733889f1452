//! Credential adapters: Argon2 password hashing and reset code delivery.

mod argon2_hasher;
mod logging_notifier;

pub use argon2_hasher::Argon2PasswordHasher;
pub use logging_notifier::LoggingResetCodeNotifier;
