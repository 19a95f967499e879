use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// In-memory credential store.
///
/// Records are keyed by email; a second map indexes identities. Creation
/// goes through the email entry, so two concurrent registrations for the
/// same address cannot both succeed.
pub struct InMemoryUserRepository {
    users: DashMap<String, User>,
    emails_by_id: DashMap<UserId, String>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            emails_by_id: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        match self.users.entry(user.email.as_str().to_string()) {
            Entry::Occupied(_) => Err(UserError::UserAlreadyExists(user.email.to_string())),
            Entry::Vacant(slot) => {
                let stored = User {
                    id: UserId::new(),
                    name: user.name,
                    email: user.email,
                    password_hash: user.password_hash,
                    is_admin: user.is_admin,
                    created_at: Utc::now(),
                };
                self.emails_by_id
                    .insert(stored.id, stored.email.as_str().to_string());
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let Some(email) = self.emails_by_id.get(id).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };

        Ok(self.users.get(&email).map(|entry| entry.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self.users.get(email).map(|entry| entry.value().clone()))
    }

    async fn delete_all(&self) -> Result<u64, UserError> {
        let deleted = self.users.len() as u64;
        self.users.clear();
        self.emails_by_id.clear();
        Ok(deleted)
    }
}
