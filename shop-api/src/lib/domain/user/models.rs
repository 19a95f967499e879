use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::EmailError;
use crate::user::errors::NameError;
use crate::user::errors::PasswordPolicyError;
use crate::user::errors::UserIdError;

/// User aggregate entity.
///
/// Represents a stored user record, password hash included. Never serialize
/// this directly; use [`UserProfile`] for anything leaving the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: Name,
    pub email: EmailAddress,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Public projection of this user (no password hash).
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// A user record ready to be persisted.
///
/// The store assigns the identity and creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: Name,
    pub email: EmailAddress,
    pub password_hash: String,
    pub is_admin: bool,
}

/// The subset of a user's fields that is safe to return to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub name: Name,
    pub email: EmailAddress,
    pub is_admin: bool,
}

/// Successful login: the user's projection plus a freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub profile: UserProfile,
    pub token: String,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// 4-20 characters; ASCII letters, digits, underscore and space only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(String);

impl Name {
    const MIN_LENGTH: usize = 4;
    const MAX_LENGTH: usize = 20;

    /// Create a new valid display name.
    ///
    /// # Errors
    /// * `TooShort` - Name shorter than 4 characters
    /// * `TooLong` - Name longer than 20 characters
    /// * `InvalidCharacters` - Contains anything but letters, digits, `_` and space
    pub fn new(name: String) -> Result<Self, NameError> {
        let name = Self::with_valid_length(name)?;
        let name = Self::with_valid_chars(name)?;
        Ok(Self(name))
    }

    fn with_valid_length(name: String) -> Result<String, NameError> {
        let length = name.chars().count();
        if length < Self::MIN_LENGTH {
            Err(NameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(name)
        }
    }

    fn with_valid_chars(name: String) -> Result<String, NameError> {
        if name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ')
        {
            Ok(name)
        } else {
            Err(NameError::InvalidCharacters)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password accepted at registration.
///
/// At least 8 characters drawn from ASCII letters, digits and `@$!%*#?&`,
/// with at least one of each class. The value is redacted from `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const SPECIAL_CHARACTERS: &'static str = "@$!%*#?&";

    /// Create a password that satisfies the registration policy.
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 8 characters
    /// * `InvalidCharacters` - Contains a character outside the allowed set
    /// * `MissingCharacterClass` - Lacks a letter, a digit or a special character
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }

        if !password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || Self::is_special(c))
        {
            return Err(PasswordPolicyError::InvalidCharacters);
        }

        let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        let has_special = password.chars().any(Self::is_special);
        if !(has_letter && has_digit && has_special) {
            return Err(PasswordPolicyError::MissingCharacterClass);
        }

        Ok(Self(password))
    }

    fn is_special(c: char) -> bool {
        Self::SPECIAL_CHARACTERS.contains(c)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Command to register a new user with validated fields
#[derive(Debug)]
pub struct RegisterUserCommand {
    pub name: Name,
    pub email: EmailAddress,
    pub password: Password,
}

impl RegisterUserCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `name` - Validated display name
    /// * `email` - Validated email address
    /// * `password` - Plaintext password (hashed by the service)
    pub fn new(name: Name, email: EmailAddress, password: Password) -> Self {
        Self {
            name,
            email,
            password,
        }
    }
}

/// Login attempt as received from the client.
///
/// Deliberately unvalidated: a malformed email must fail the same way an
/// unknown one does.
#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_accepts_letters_digits_underscore_and_space() {
        assert!(Name::new("Jane".to_string()).is_ok());
        assert!(Name::new("Admin User".to_string()).is_ok());
        assert!(Name::new("jane_doe_42".to_string()).is_ok());
    }

    #[test]
    fn test_name_length_bounds() {
        assert_eq!(
            Name::new("Bob".to_string()),
            Err(NameError::TooShort { min: 4, actual: 3 })
        );
        assert_eq!(
            Name::new("a".repeat(21)),
            Err(NameError::TooLong {
                max: 20,
                actual: 21
            })
        );
        assert!(Name::new("a".repeat(20)).is_ok());
    }

    #[test]
    fn test_name_rejects_special_characters() {
        assert_eq!(
            Name::new("Jane-Doe".to_string()),
            Err(NameError::InvalidCharacters)
        );
        assert_eq!(
            Name::new("Zoë Smith".to_string()),
            Err(NameError::InvalidCharacters)
        );
    }

    #[test]
    fn test_email_validation() {
        assert!(EmailAddress::new("jane@x.com".to_string()).is_ok());
        assert!(matches!(
            EmailAddress::new("not-an-email".to_string()),
            Err(EmailError::InvalidFormat(_))
        ));
        assert!(EmailAddress::new(String::new()).is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(Password::new("Secret1!".to_string()).is_ok());
        assert_eq!(
            Password::new("Sec1!".to_string()),
            Err(PasswordPolicyError::TooShort { min: 8, actual: 5 })
        );
        assert_eq!(
            Password::new("Secret 1!".to_string()),
            Err(PasswordPolicyError::InvalidCharacters)
        );
        assert_eq!(
            Password::new("Secretpass!".to_string()),
            Err(PasswordPolicyError::MissingCharacterClass)
        );
        assert_eq!(
            Password::new("Secret123".to_string()),
            Err(PasswordPolicyError::MissingCharacterClass)
        );
        assert_eq!(
            Password::new("12345678!".to_string()),
            Err(PasswordPolicyError::MissingCharacterClass)
        );
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let password = Password::new("Secret1!".to_string()).unwrap();
        assert!(!format!("{:?}", password).contains("Secret1!"));
    }

    #[test]
    fn test_user_id_round_trips_through_string() {
        let id = UserId::new();
        assert_eq!(UserId::from_string(&id.to_string()), Ok(id));
        assert!(UserId::from_string("42").is_err());
    }

    #[test]
    fn test_profile_copies_public_fields() {
        let user = User {
            id: UserId::new(),
            name: Name::new("Jane".to_string()).unwrap(),
            email: EmailAddress::new("jane@x.com".to_string()).unwrap(),
            password_hash: "$argon2id$hash".to_string(),
            is_admin: true,
            created_at: Utc::now(),
        };

        let profile = user.profile();
        assert_eq!(profile.id, user.id);
        assert_eq!(profile.name, user.name);
        assert_eq!(profile.email, user.email);
        assert!(profile.is_admin);
    }
}
