//! Authentication primitives: credentials, password policy, reset codes and
//! bearer session tokens.
//!
//! Inbound adapters build these from request payloads; services never see raw
//! strings for secrets.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::domain::{EmailAddress, FullName, UserId, UserProfile, UserValidationError};

/// Minimum password length in characters.
pub const PASSWORD_MIN: usize = 8;
/// Maximum password length in characters.
pub const PASSWORD_MAX: usize = 128;
/// Number of digits in a password reset code.
pub const RESET_CODE_DIGITS: usize = 6;

/// Whether `password` mixes lower case, upper case and digits.
pub fn meets_password_composition(password: &str) -> bool {
    password.chars().any(char::is_lowercase)
        && password.chars().any(char::is_uppercase)
        && password.chars().any(|c| c.is_ascii_digit())
}

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsError {
    /// Email was malformed.
    #[error(transparent)]
    Email(#[from] UserValidationError),
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password length outside the policy bounds.
    #[error("password must be between 8 and 128 characters")]
    PasswordLength,
    /// Password lacks one of the required character classes.
    #[error("password must contain a lowercase letter, an uppercase letter and a digit")]
    PasswordComposition,
    /// Reset code is not exactly six digits.
    #[error("reset code must be exactly 6 digits")]
    ResetCodeFormat,
}

/// A password that satisfied the strength policy.
#[derive(Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Check length and composition.
    pub fn new(raw: &str) -> Result<Self, CredentialsError> {
        let length = raw.chars().count();
        if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&length) {
            return Err(CredentialsError::PasswordLength);
        }
        if !meets_password_composition(raw) {
            return Err(CredentialsError::PasswordComposition);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Plain text for hashing.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword(..)")
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is canonical.
/// - `password` is non-empty; strength is not re-checked at login.
///
/// # Examples
/// ```
/// use fintrack::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "pw").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(CredentialsError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Login email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// New account request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Full name.
    pub full_name: FullName,
    /// Login email.
    pub email: EmailAddress,
    /// Password satisfying the policy.
    pub password: NewPassword,
}

/// Six digit one-time password reset code.
#[derive(Clone, PartialEq, Eq)]
pub struct ResetCode(Zeroizing<String>);

impl ResetCode {
    /// Validate a code supplied by the user.
    pub fn parse(raw: &str) -> Result<Self, CredentialsError> {
        if raw.len() != RESET_CODE_DIGITS || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CredentialsError::ResetCodeFormat);
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Draw a uniformly random code.
    pub fn generate() -> Self {
        let value: u32 = rand::thread_rng().gen_range(0..1_000_000);
        Self(Zeroizing::new(format!("{value:06}")))
    }

    /// Code digits, for delivery to the user.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Hex SHA-256 digest stored on the user record.
    pub fn digest(&self) -> String {
        sha256_hex(self.0.as_bytes())
    }
}

impl fmt::Debug for ResetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResetCode(..)")
    }
}

/// Password reset submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetSubmission {
    /// Account email.
    pub email: EmailAddress,
    /// Code received out of band.
    pub code: ResetCode,
    /// Replacement password.
    pub new_password: NewPassword,
}

/// Opaque bearer token handed to clients after login.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(Zeroizing<String>);

impl SessionToken {
    /// Draw 32 random bytes and hex-encode them.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(Zeroizing::new(hex::encode(bytes)))
    }

    /// Wrap a token presented by a client.
    pub fn from_presented(raw: &str) -> Self {
        Self(Zeroizing::new(raw.to_owned()))
    }

    /// Token text.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Digest used as the storage key; raw tokens are never stored.
    pub fn digest(&self) -> String {
        sha256_hex(self.0.as_bytes())
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(..)")
    }
}

/// Stored side of an issued bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionRecord {
    /// Authenticated user.
    pub user_id: UserId,
    /// Instant the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    /// Bearer token for subsequent requests.
    pub token: SessionToken,
    /// Token expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Seconds until expiry, as reported to the client.
    pub expires_in: i64,
    /// Profile of the authenticated user.
    pub user: UserProfile,
}

fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
