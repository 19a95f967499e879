use async_trait::async_trait;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;

/// Port for user authentication operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Verify credentials and issue an access token.
    ///
    /// # Arguments
    /// * `command` - Email and plaintext password as submitted
    ///
    /// # Returns
    /// Public projection of the user plus a signed token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `StoreUnavailable` - Credential store failed
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, UserError>;

    /// Register a new, non-admin user.
    ///
    /// # Arguments
    /// * `command` - Validated name, email and password
    ///
    /// # Returns
    /// Public projection of the created user
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Email is already registered
    /// * `InvalidUserData` - Store rejected the record
    /// * `StoreUnavailable` - Credential store failed
    async fn register(&self, command: RegisterUserCommand) -> Result<UserProfile, UserError>;

    /// Retrieve a user's public projection by identity.
    ///
    /// # Errors
    /// * `UserNotFound` - No user with this identity
    /// * `StoreUnavailable` - Credential store failed
    async fn get_profile(&self, id: &UserId) -> Result<UserProfile, UserError>;
}

/// Persistence operations for user records.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user; the store assigns its identity.
    ///
    /// # Arguments
    /// * `user` - Record to create
    ///
    /// # Returns
    /// Stored user entity
    ///
    /// # Errors
    /// * `UserAlreadyExists` - Email is already registered (never overwrites)
    /// * `InvalidUserData` - Record violates a store constraint
    /// * `StoreUnavailable` - Store operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;

    /// Remove every user record. Used by the seeder's destroy mode.
    ///
    /// # Returns
    /// Number of deleted records
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn delete_all(&self) -> Result<u64, UserError>;
}
