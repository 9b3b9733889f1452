//! Account lifecycle: registration, bearer sessions, password reset and
//! profile maintenance.
//!
//! The service owns every rule about credentials. Inbound adapters hand it
//! validated domain values and forward the resulting [`Error`] unchanged.

use std::sync::Arc;

use chrono::TimeDelta;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    PasswordHasher, PasswordHasherError, ResetCodeDeliveryError, ResetCodeNotifier,
    SessionPersistenceError, SessionRepository, UserPersistenceError, UserRepository,
};
use crate::domain::{
    EmailAddress, Error, IssuedSession, LoginCredentials, PasswordReset, PasswordResetSubmission,
    ProfileUpdate, Registration, ResetCode, SessionRecord, SessionToken, User, UserId,
    UserProfile,
};

/// Message returned for any failed login so callers cannot enumerate accounts.
const INVALID_CREDENTIALS: &str = "invalid email or password";
/// Message returned for any rejected reset code.
const INVALID_RESET_CODE: &str = "invalid or expired reset code";

/// Lifetimes applied by [`AccountService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSettings {
    /// How long an issued bearer token stays valid.
    pub session_ttl: TimeDelta,
    /// How long a password reset code stays valid.
    pub reset_code_ttl: TimeDelta,
}

impl Default for AccountSettings {
    fn default() -> Self {
        Self {
            session_ttl: TimeDelta::hours(1),
            reset_code_ttl: TimeDelta::minutes(15),
        }
    }
}

/// Driven ports required by [`AccountService`].
#[derive(Clone)]
pub struct AccountPorts {
    /// User storage.
    pub users: Arc<dyn UserRepository>,
    /// Bearer session storage.
    pub sessions: Arc<dyn SessionRepository>,
    /// Password hashing.
    pub hasher: Arc<dyn PasswordHasher>,
    /// Reset code delivery.
    pub notifier: Arc<dyn ResetCodeNotifier>,
}

/// Account service backing the auth and profile endpoints.
#[derive(Clone)]
pub struct AccountService {
    ports: AccountPorts,
    clock: Arc<dyn Clock>,
    settings: AccountSettings,
}

impl AccountService {
    /// Create a service over the given ports.
    pub fn new(ports: AccountPorts, clock: Arc<dyn Clock>, settings: AccountSettings) -> Self {
        Self {
            ports,
            clock,
            settings,
        }
    }

    /// Create an account; the email must not already be registered.
    pub async fn register(&self, registration: Registration) -> Result<UserProfile, Error> {
        let Registration {
            full_name,
            email,
            password,
        } = registration;

        if self
            .ports
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(Error::conflict("email already registered"));
        }

        let password_hash = self
            .ports
            .hasher
            .hash(password.expose())
            .map_err(map_hasher_error)?;
        let now = self.clock.utc();
        let user = User {
            id: UserId::random(),
            full_name,
            email,
            password_hash,
            profile_photo: None,
            password_reset: None,
            created_at: now,
            updated_at: now,
        };
        self.ports.users.insert(&user).await.map_err(map_user_error)?;
        info!(user_id = %user.id, "registered account");
        Ok(user.profile())
    }

    /// Check credentials and issue a bearer token.
    pub async fn login(&self, credentials: LoginCredentials) -> Result<IssuedSession, Error> {
        let Some(user) = self
            .ports
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            debug!("login for unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .ports
            .hasher
            .verify(credentials.password(), &user.password_hash)
            .map_err(map_hasher_error)?;
        if !matches {
            debug!(user_id = %user.id, "login with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let now = self.clock.utc();
        let purged = self
            .ports
            .sessions
            .remove_expired(now)
            .await
            .map_err(map_session_error)?;
        if purged > 0 {
            debug!(purged, "dropped expired sessions");
        }

        let token = SessionToken::generate();
        let expires_at = now + self.settings.session_ttl;
        self.ports
            .sessions
            .insert(
                &token.digest(),
                SessionRecord {
                    user_id: user.id,
                    expires_at,
                },
            )
            .await
            .map_err(map_session_error)?;
        info!(user_id = %user.id, "issued session");
        Ok(IssuedSession {
            token,
            expires_at,
            expires_in: self.settings.session_ttl.num_seconds(),
            user: user.profile(),
        })
    }

    /// Revoke a bearer token. Unknown tokens are ignored.
    pub async fn logout(&self, token: &SessionToken) -> Result<(), Error> {
        self.ports
            .sessions
            .remove(&token.digest())
            .await
            .map_err(map_session_error)
    }

    /// Resolve a bearer token to its user, revoking it once expired.
    pub async fn authenticate(&self, token: &SessionToken) -> Result<UserId, Error> {
        let digest = token.digest();
        let Some(record) = self
            .ports
            .sessions
            .find(&digest)
            .await
            .map_err(map_session_error)?
        else {
            return Err(Error::unauthorized("invalid or expired token"));
        };

        if record.expires_at <= self.clock.utc() {
            self.ports
                .sessions
                .remove(&digest)
                .await
                .map_err(map_session_error)?;
            debug!(user_id = %record.user_id, "revoked expired session");
            return Err(Error::unauthorized("invalid or expired token"));
        }
        Ok(record.user_id)
    }

    /// Issue and deliver a reset code when `email` belongs to an account.
    ///
    /// Unknown emails succeed silently.
    pub async fn request_password_reset(&self, email: &EmailAddress) -> Result<(), Error> {
        let Some(mut user) = self
            .ports
            .users
            .find_by_email(email)
            .await
            .map_err(map_user_error)?
        else {
            debug!("password reset requested for unknown email");
            return Ok(());
        };

        let code = ResetCode::generate();
        let now = self.clock.utc();
        let expires_at = now + self.settings.reset_code_ttl;
        user.password_reset = Some(PasswordReset {
            code_digest: code.digest(),
            expires_at,
        });
        user.updated_at = now;
        self.ports.users.update(&user).await.map_err(map_user_error)?;
        self.ports
            .notifier
            .deliver(&user.email, &code, expires_at)
            .await
            .map_err(map_delivery_error)?;
        info!(user_id = %user.id, "issued password reset code");
        Ok(())
    }

    /// Replace the password using a previously issued reset code.
    pub async fn reset_password(&self, submission: PasswordResetSubmission) -> Result<(), Error> {
        let PasswordResetSubmission {
            email,
            code,
            new_password,
        } = submission;

        let Some(mut user) = self
            .ports
            .users
            .find_by_email(&email)
            .await
            .map_err(map_user_error)?
        else {
            return Err(Error::invalid_request(INVALID_RESET_CODE));
        };
        let Some(pending) = user.password_reset.clone() else {
            return Err(Error::invalid_request(INVALID_RESET_CODE));
        };

        let now = self.clock.utc();
        if pending.expires_at <= now {
            user.password_reset = None;
            user.updated_at = now;
            self.ports.users.update(&user).await.map_err(map_user_error)?;
            debug!(user_id = %user.id, "cleared expired reset code");
            return Err(Error::invalid_request(INVALID_RESET_CODE));
        }
        if pending.code_digest != code.digest() {
            warn!(user_id = %user.id, "reset code mismatch");
            return Err(Error::invalid_request(INVALID_RESET_CODE));
        }

        user.password_hash = self
            .ports
            .hasher
            .hash(new_password.expose())
            .map_err(map_hasher_error)?;
        user.password_reset = None;
        user.updated_at = now;
        self.ports.users.update(&user).await.map_err(map_user_error)?;
        self.ports
            .sessions
            .remove_for_user(&user.id)
            .await
            .map_err(map_session_error)?;
        info!(user_id = %user.id, "password reset");
        Ok(())
    }

    /// Public profile for `user_id`.
    pub async fn profile(&self, user_id: &UserId) -> Result<UserProfile, Error> {
        self.load_user(user_id).await.map(|user| user.profile())
    }

    /// Apply profile changes and return the updated profile.
    pub async fn update_profile(
        &self,
        user_id: &UserId,
        changes: ProfileUpdate,
    ) -> Result<UserProfile, Error> {
        let mut user = self.load_user(user_id).await?;
        let ProfileUpdate {
            full_name,
            profile_photo,
        } = changes;
        if let Some(full_name) = full_name {
            user.full_name = full_name;
        }
        if let Some(photo) = profile_photo {
            user.profile_photo = Some(photo);
        }
        user.updated_at = self.clock.utc();
        self.ports.users.update(&user).await.map_err(map_user_error)?;
        Ok(user.profile())
    }

    async fn load_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.ports
            .users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict("email already registered"),
        UserPersistenceError::Missing { .. } => Error::not_found("user not found"),
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

fn map_session_error(error: SessionPersistenceError) -> Error {
    Error::internal(format!("session repository error: {error}"))
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(format!("password hasher error: {error}"))
}

fn map_delivery_error(error: ResetCodeDeliveryError) -> Error {
    Error::internal(format!("reset code notifier error: {error}"))
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
