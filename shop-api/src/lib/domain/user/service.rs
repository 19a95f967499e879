use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user authentication.
///
/// Password hashing and verification run on the blocking thread pool so a
/// slow hash never occupies an async worker.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hasher and token issuer
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, UserError> {
        let Some(user) = self.repository.find_by_email(&command.email).await? else {
            let authenticator = Arc::clone(&self.authenticator);
            let rejection =
                tokio::task::spawn_blocking(move || authenticator.reject_unknown(&command.password))
                    .await?;
            if let AuthenticationError::PasswordError(e) = rejection {
                tracing::error!(error = %e, "Decoy password verification failed");
            }
            tracing::warn!("Login rejected: invalid credentials");
            return Err(UserError::InvalidCredentials);
        };

        let authenticator = Arc::clone(&self.authenticator);
        let password_hash = user.password_hash.clone();
        let subject = user.id;
        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&command.password, &password_hash, subject)
        })
        .await?;

        match result {
            Ok(authenticated) => {
                tracing::info!(user_id = %user.id, "User logged in");
                Ok(LoginOutcome {
                    profile: user.profile(),
                    token: authenticated.access_token,
                })
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::warn!("Login rejected: invalid credentials");
                Err(UserError::InvalidCredentials)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::error!(user_id = %user.id, error = %e, "Stored password hash is unreadable");
                Err(e.into())
            }
            Err(AuthenticationError::JwtError(e)) => {
                tracing::error!(user_id = %user.id, error = %e, "Token issuance failed");
                Err(e.into())
            }
        }
    }

    async fn register(&self, command: RegisterUserCommand) -> Result<UserProfile, UserError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::UserAlreadyExists(command.email.to_string()));
        }

        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let password_hash =
            tokio::task::spawn_blocking(move || authenticator.hash_password(password.as_str()))
                .await??;

        let user = self
            .repository
            .create(NewUser {
                name: command.name,
                email: command.email,
                password_hash,
                is_admin: false,
            })
            .await?;

        tracing::info!(user_id = %user.id, email = %user.email, "User registered");

        Ok(user.profile())
    }

    async fn get_profile(&self, id: &UserId) -> Result<UserProfile, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .map(|user| user.profile())
            .ok_or(UserError::UserNotFound(id.to_string()))
    }
}
