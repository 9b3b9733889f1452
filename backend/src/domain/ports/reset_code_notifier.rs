//! Driven port delivering password reset codes to users (email, SMS, ...).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{EmailAddress, ResetCode};

use super::define_port_error;

define_port_error! {
    /// Errors raised by reset code delivery adapters.
    pub enum ResetCodeDeliveryError {
        /// The transport rejected or failed the delivery.
        Delivery { message: String } => "reset code delivery failed: {message}",
    }
}

/// Out-of-band delivery of one-time reset codes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResetCodeNotifier: Send + Sync {
    /// Deliver `code` to the owner of `email`.
    async fn deliver(
        &self,
        email: &EmailAddress,
        code: &ResetCode,
        expires_at: DateTime<Utc>,
    ) -> Result<(), ResetCodeDeliveryError>;
}
