use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::error::ErrorKind;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Name;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// PostgreSQL implementation of the credential store.
///
/// Email uniqueness is enforced by the `users_email_key` constraint.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row shape of the `users` table.
#[derive(Debug, sqlx::FromRow)]
struct UserRecord {
    id: Uuid,
    name: String,
    email: String,
    password: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRecord> for User {
    type Error = UserError;

    fn try_from(r: UserRecord) -> Result<Self, Self::Error> {
        let name = Name::new(r.name).map_err(|e| corrupt_record(r.id, e))?;
        let email = EmailAddress::new(r.email).map_err(|e| corrupt_record(r.id, e))?;

        Ok(User {
            id: UserId(r.id),
            name,
            email,
            password_hash: r.password,
            is_admin: r.is_admin,
            created_at: r.created_at,
        })
    }
}

/// Stored rows that fail domain validation surface as internal errors.
fn corrupt_record(id: Uuid, e: impl std::fmt::Display) -> UserError {
    tracing::error!(user_id = %id, error = %e, "Stored user record is invalid");
    UserError::Internal(format!("Stored user {} is invalid: {}", id, e))
}

fn store_unavailable(e: sqlx::Error) -> UserError {
    tracing::error!(error = %e, "Credential store query failed");
    UserError::StoreUnavailable(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (name, email, password, is_admin)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, password, is_admin, created_at
            "#,
        )
        .bind(user.name.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                match db_err.kind() {
                    ErrorKind::UniqueViolation => {
                        return UserError::UserAlreadyExists(user.email.to_string());
                    }
                    ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                        return UserError::InvalidUserData(db_err.message().to_string());
                    }
                    _ => {}
                }
            }
            store_unavailable(e)
        })?;

        record.try_into()
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password, is_admin, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_unavailable)?;

        record.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, name, email, password, is_admin, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_unavailable)?;

        record.map(User::try_from).transpose()
    }

    async fn delete_all(&self) -> Result<u64, UserError> {
        let result = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await
            .map_err(store_unavailable)?;

        Ok(result.rows_affected())
    }
}
