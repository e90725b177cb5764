use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::services::password::{hash_password, verify_password};
use crate::features::auth::services::{IssuedToken, TokenService};
use crate::features::reports::models::Category;
use crate::features::users::models::{CreateUser, Role, User};
use crate::features::users::services::UserService;

/// Service for account registration and credential-based login
pub struct AuthService {
    user_service: Arc<UserService>,
    token_service: Arc<TokenService>,
}

impl AuthService {
    pub fn new(user_service: Arc<UserService>, token_service: Arc<TokenService>) -> Self {
        Self {
            user_service,
            token_service,
        }
    }

    /// Register a new citizen account and log it in
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<(User, IssuedToken)> {
        let user = self
            .user_service
            .create(&CreateUser {
                name,
                email,
                password_hash: hash_password(&password),
                role: Role::Citizen,
                assigned_category: None,
            })
            .await?;

        let token = self.token_service.issue(user.id, user.role)?;
        Ok((user, token))
    }

    /// Authenticate by email and password.
    ///
    /// Unknown email and wrong password produce the same error so the
    /// endpoint does not leak which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, IssuedToken)> {
        let invalid = || AppError::Auth("Invalid email or password".to_string());

        let user = self
            .user_service
            .find_by_email(email)
            .await?
            .ok_or_else(invalid)?;

        if !verify_password(password, &user.password_hash) {
            return Err(invalid());
        }

        let token = self.token_service.issue(user.id, user.role)?;
        Ok((user, token))
    }

    /// Create a worker account bound to a category (admin only)
    pub async fn create_worker(
        &self,
        name: String,
        email: String,
        password: String,
        assigned_category: Category,
    ) -> Result<User> {
        self.user_service
            .create(&CreateUser {
                name,
                email,
                password_hash: hash_password(&password),
                role: Role::Worker,
                assigned_category: Some(assigned_category),
            })
            .await
    }

    /// Create the initial admin account at startup if none exists yet
    pub async fn ensure_bootstrap_admin(&self, email: &str, password: &str) -> Result<()> {
        if self.user_service.admin_exists().await? {
            return Ok(());
        }

        let admin = self
            .user_service
            .create(&CreateUser {
                name: "Administrator".to_string(),
                email: email.to_string(),
                password_hash: hash_password(password),
                role: Role::Admin,
                assigned_category: None,
            })
            .await?;

        tracing::info!(admin_id = %admin.id, "Bootstrapped initial admin account");
        Ok(())
    }
}
