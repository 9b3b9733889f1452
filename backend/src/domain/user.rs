//! User account records.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors raised by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was blank.
    #[error("user id must not be empty")]
    EmptyId,
    /// Identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Full name length outside the permitted bounds.
    #[error("full name must be between {min} and {max} characters")]
    FullNameLength {
        /// Inclusive lower bound.
        min: usize,
        /// Inclusive upper bound.
        max: usize,
    },
    /// Full name contains something other than letters and spaces.
    #[error("full name may only contain letters and spaces")]
    FullNameCharacters,
    /// Email is not shaped like `local@domain.tld`.
    #[error("email address is not valid")]
    InvalidEmail,
    /// Profile photo reference too long.
    #[error("profile photo reference must be at most {max} characters")]
    ProfilePhotoTooLong {
        /// Inclusive upper bound.
        max: usize,
    },
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from text.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Minimum full name length in characters.
pub const FULL_NAME_MIN: usize = 2;
/// Maximum full name length in characters.
pub const FULL_NAME_MAX: usize = 225;
/// Maximum profile photo reference length.
pub const PROFILE_PHOTO_MAX: usize = 2048;

static FULL_NAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn full_name_regex() -> &'static Regex {
    FULL_NAME_RE.get_or_init(|| {
        // Length is enforced separately; this constrains characters only.
        Regex::new(r"^[\p{L} ]+$")
            .unwrap_or_else(|error| panic!("full name regex failed to compile: {error}"))
    })
}

/// Shape check shared by the validation rules and [`EmailAddress`].
pub fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Whether `value` consists of letters and spaces only.
pub fn is_letters_and_spaces(value: &str) -> bool {
    full_name_regex().is_match(value)
}

/// Person's full name as entered at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FullName(String);

impl FullName {
    /// Validate and construct a full name; surrounding whitespace is dropped.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let value = value.as_ref().trim();
        let length = value.chars().count();
        if !(FULL_NAME_MIN..=FULL_NAME_MAX).contains(&length) {
            return Err(UserValidationError::FullNameLength {
                min: FULL_NAME_MIN,
                max: FULL_NAME_MAX,
            });
        }
        if !is_letters_and_spaces(value) {
            return Err(UserValidationError::FullNameCharacters);
        }
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<FullName> for String {
    fn from(value: FullName) -> Self {
        value.0
    }
}

impl TryFrom<String> for FullName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Email address in canonical lower-case form.
///
/// # Examples
/// ```
/// use fintrack::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Ada@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let value = value.as_ref().trim();
        if !email_regex().is_match(value) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(value.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Encoded password hash produced by a `PasswordHasher` adapter.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Reference to an uploaded profile photo (URL or storage key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProfilePhoto(String);

impl ProfilePhoto {
    /// Validate a photo reference.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let value = value.as_ref().trim();
        if value.chars().count() > PROFILE_PHOTO_MAX {
            return Err(UserValidationError::ProfilePhotoTooLong {
                max: PROFILE_PHOTO_MAX,
            });
        }
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for ProfilePhoto {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ProfilePhoto> for String {
    fn from(value: ProfilePhoto) -> Self {
        value.0
    }
}

impl TryFrom<String> for ProfilePhoto {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Pending password reset: digest of the one-time code and its deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordReset {
    /// Hex-encoded SHA-256 digest of the issued code.
    pub code_digest: String,
    /// Instant after which the code is rejected.
    pub expires_at: DateTime<Utc>,
}

/// Persisted user record.
///
/// ## Invariants
/// - `email` is unique across users and stored in canonical form.
/// - `password_reset` is `None` once a code was used or found expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// Full name.
    pub full_name: FullName,
    /// Unique login email.
    pub email: EmailAddress,
    /// Password hash.
    pub password_hash: PasswordHash,
    /// Optional profile photo reference.
    pub profile_photo: Option<ProfilePhoto>,
    /// Outstanding reset code, if any.
    pub password_reset: Option<PasswordReset>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Public view of the record, without credentials.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            profile_photo: self.profile_photo.clone(),
            created_at: self.created_at,
        }
    }
}

/// User data safe to return to the account owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Stable identifier.
    pub id: UserId,
    /// Full name.
    pub full_name: FullName,
    /// Login email.
    pub email: EmailAddress,
    /// Optional profile photo reference.
    pub profile_photo: Option<ProfilePhoto>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Requested profile changes; `None` leaves a value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New full name.
    pub full_name: Option<FullName>,
    /// New profile photo reference.
    pub profile_photo: Option<ProfilePhoto>,
}
