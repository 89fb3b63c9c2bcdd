//! User Repository

use async_trait::async_trait;
use shared::models::RegisterRequest;
use shared::util::now_millis;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, record_id};
use crate::db::models::User;
use crate::notify::RecipientDirectory;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id ("user:abc" or "abc")
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let user: Option<User> = self.base.db().select(record_id(TABLE, id)).await?;
        Ok(user)
    }

    /// Find user by email (case-insensitive, stored lowercase)
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", normalize_email(email)))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a user; the password must already be validated
    pub async fn create(&self, data: RegisterRequest) -> RepoResult<User> {
        let email = normalize_email(&data.email);
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        let password_hash = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let user = User {
            id: None,
            email,
            password_hash,
            first_name: data.first_name.trim().to_string(),
            last_name: data.last_name.trim().to_string(),
            role: data.role,
            phone_number: data.phone_number,
            address: data.address,
            language: data.language,
            latitude: data.latitude,
            longitude: data.longitude,
            created_at: now_millis(),
        };

        let created: Option<User> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }
}

#[async_trait]
impl RecipientDirectory for UserRepository {
    async fn email_of(&self, user_id: &str) -> RepoResult<Option<String>> {
        Ok(self.find_by_id(user_id).await?.map(|u| u.email))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
