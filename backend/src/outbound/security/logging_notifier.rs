//! Reset code notifier that writes codes to the service log.
//!
//! Stands in for an email or SMS transport in development deployments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::ports::{ResetCodeDeliveryError, ResetCodeNotifier};
use crate::domain::{EmailAddress, ResetCode};

/// Emits each reset code as an `info` event on the `reset_codes` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingResetCodeNotifier;

#[async_trait]
impl ResetCodeNotifier for LoggingResetCodeNotifier {
    async fn deliver(
        &self,
        email: &EmailAddress,
        code: &ResetCode,
        expires_at: DateTime<Utc>,
    ) -> Result<(), ResetCodeDeliveryError> {
        info!(
            target: "reset_codes",
            %email,
            code = code.expose(),
            %expires_at,
            "password reset code issued"
        );
        Ok(())
    }
}
