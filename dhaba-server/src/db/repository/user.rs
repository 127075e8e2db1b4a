//! User Repository

use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::auth::Role;
use crate::db::models::{User, UserCreate, UserUpdate};

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

    /// Find all users, owner first
    pub async fn find_all(&self) -> RepoResult<Vec<User>> {
        let users: Vec<User> = self
            .base
            .db()
            .query("SELECT * FROM user ORDER BY role, name")
            .await?
            .take(0)?;
        Ok(users)
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find user by id, NotFound when absent
    pub async fn get_by_id(&self, id: &str) -> RepoResult<User> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("User {} not found", id)))
    }

    /// Find user by login email
    pub async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE email = $email LIMIT 1")
            .bind(("email", email.to_lowercase()))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user, password hashed before storage
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        let email = data.email.to_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "User '{}' already exists",
                email
            )));
        }

        let password_hash = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?;

        // Explicit SET query: `.content()` goes through serde and the
        // model skips password_hash on serialization.
        let mut result = self
            .base
            .db()
            .query("CREATE user SET name = $name, email = $email, password_hash = $password_hash, role = $role, active = true RETURN AFTER")
            .bind(("name", data.name))
            .bind(("email", email))
            .bind(("password_hash", password_hash))
            .bind(("role", data.role))
            .await?;
        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Update a user
    pub async fn update(&self, id: &str, data: UserUpdate) -> RepoResult<User> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        let existing = self.get_by_id(id).await?;

        let password_hash = match data.password {
            Some(password) => User::hash_password(&password)
                .map_err(|e| RepoError::Database(format!("Password hashing failed: {e}")))?,
            None => existing.password_hash,
        };
        let name = data.name.unwrap_or(existing.name);
        let role = data.role.unwrap_or(existing.role);
        let active = data.active.unwrap_or(existing.active);

        self.base
            .db()
            .query("UPDATE $thing SET name = $name, password_hash = $password_hash, role = $role, active = $active")
            .bind(("thing", thing))
            .bind(("name", name))
            .bind(("password_hash", password_hash))
            .bind(("role", role))
            .bind(("active", active))
            .await?;

        self.get_by_id(id).await
    }

    /// Hard delete a user
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        self.base
            .db()
            .query("DELETE $thing")
            .bind(("thing", thing))
            .await?;
        Ok(true)
    }

    /// Count users holding a role
    pub async fn count_by_role(&self, role: Role) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() AS value FROM user WHERE role = $role GROUP ALL")
            .bind(("role", role))
            .await?;
        #[derive(serde::Deserialize)]
        struct CountRow {
            value: i64,
        }
        let row: Option<CountRow> = result.take(0)?;
        Ok(row.map(|r| r.value as usize).unwrap_or(0))
    }
}
