//! Sample accounts for development databases.

use auth::PasswordHasher;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Name;
use crate::domain::user::models::NewUser;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const SAMPLE_PASSWORD: &str = "123456";

const SAMPLE_USERS: [(&str, &str); 3] = [
    ("Admin User", "admin@example.com"),
    ("John Doe", "john@example.com"),
    ("Helen Bekit", "helen@bashllc.com"),
];

/// Build the sample admin accounts, hashing their shared password.
///
/// These bypass the registration password policy.
pub fn sample_users(hasher: &PasswordHasher) -> Result<Vec<NewUser>, UserError> {
    SAMPLE_USERS
        .iter()
        .map(|(name, email)| {
            Ok(NewUser {
                name: Name::new(name.to_string())?,
                email: EmailAddress::new(email.to_string())?,
                password_hash: hasher.hash(SAMPLE_PASSWORD)?,
                is_admin: true,
            })
        })
        .collect()
}

/// Insert `users`, skipping any whose email is already registered.
///
/// # Returns
/// Number of users actually created
pub async fn import<R>(repository: &R, users: Vec<NewUser>) -> Result<usize, UserError>
where
    R: UserRepository + ?Sized,
{
    let mut imported = 0;

    for user in users {
        let email = user.email.to_string();
        match repository.create(user).await {
            Ok(created) => {
                tracing::info!(user_id = %created.id, email = %email, "Seeded user");
                imported += 1;
            }
            Err(UserError::UserAlreadyExists(_)) => {
                tracing::debug!(email = %email, "Sample user already present");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(imported)
}
