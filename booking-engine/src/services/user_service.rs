//! User registration and account state

use crate::clock::Clock;
use crate::repository::UserRepository;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{User, UserCreate};
use shared::util::snowflake_id;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    /// Register a new user. Accounts start active.
    pub async fn register(&self, data: UserCreate) -> AppResult<User> {
        if data.name.trim().is_empty() {
            return Err(AppError::validation("Name must not be empty"));
        }
        if data.email.trim().is_empty() {
            return Err(AppError::validation("Email must not be empty"));
        }

        let user = User {
            id: snowflake_id(),
            name: data.name,
            email: data.email,
            role: data.role,
            is_active: true,
            created_at: self.clock.now_millis(),
        };
        let created = self.users.insert(user).await?;
        info!(user_id = created.id, role = ?created.role, "User registered");
        Ok(created)
    }

    pub async fn get_user(&self, user_id: i64) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                AppError::new(ErrorCode::UserNotFound).with_detail("user_id", user_id)
            })
    }

    /// Enable or disable an account. Admins may toggle anyone; a user
    /// may only disable themselves.
    pub async fn set_active(&self, actor: &User, user_id: i64, active: bool) -> AppResult<User> {
        if !actor.is_admin() && actor.id != user_id {
            return Err(AppError::permission_denied(format!(
                "User {} may not change account state of user {}",
                actor.id, user_id
            )));
        }

        let mut user = self.get_user(user_id).await?;
        user.is_active = active;
        let updated = self.users.update(user).await?;
        info!(user_id, active, "Account state changed");
        Ok(updated)
    }
}
