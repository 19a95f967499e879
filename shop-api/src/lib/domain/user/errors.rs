use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for display name validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NameError {
    #[error("Name too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Name too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Name contains invalid characters (only letters, digits, underscore, and space allowed)")]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for registration password policy failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Password contains invalid characters (only letters, digits, and @$!%*#?& allowed)")]
    InvalidCharacters,

    #[error("Password must contain at least one letter, one digit, and one of @$!%*#?&")]
    MissingCharacterClass,
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserError {
    // Request-scoped failures
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User already exists")]
    UserAlreadyExists(String),

    #[error("Invalid user data: {0}")]
    InvalidUserData(String),

    #[error("User not found")]
    UserNotFound(String),

    // Infrastructure errors
    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<UserIdError> for UserError {
    fn from(err: UserIdError) -> Self {
        UserError::InvalidUserData(err.to_string())
    }
}

impl From<NameError> for UserError {
    fn from(err: NameError) -> Self {
        UserError::InvalidUserData(err.to_string())
    }
}

impl From<EmailError> for UserError {
    fn from(err: EmailError) -> Self {
        UserError::InvalidUserData(err.to_string())
    }
}

impl From<PasswordPolicyError> for UserError {
    fn from(err: PasswordPolicyError) -> Self {
        UserError::InvalidUserData(err.to_string())
    }
}

impl From<auth::PasswordError> for UserError {
    fn from(err: auth::PasswordError) -> Self {
        UserError::Internal(err.to_string())
    }
}

impl From<auth::JwtError> for UserError {
    fn from(err: auth::JwtError) -> Self {
        UserError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for UserError {
    fn from(err: tokio::task::JoinError) -> Self {
        UserError::Internal(format!("Blocking task failed: {}", err))
    }
}
