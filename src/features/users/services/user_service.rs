use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::reports::models::Category;
use crate::features::users::models::{CreateUser, User};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, role, assigned_category, created_at, updated_at";

/// Service for user account storage
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user account
    ///
    /// Email uniqueness is case-insensitive; a duplicate surfaces as Conflict.
    pub async fn create(&self, data: &CreateUser) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, role, assigned_category)
            VALUES ($1, lower($2), $3, $4, $5)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.password_hash)
        .bind(data.role)
        .bind(data.assigned_category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Email is already registered".to_string())
            } else {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::Database(e)
            }
        })?;

        tracing::info!("Created {} account: {}", user.role, user.id);

        Ok(user)
    }

    /// Find a user by email (case-insensitive)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE lower(email) = lower($1)
            "#
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find user by email: {:?}", e);
            AppError::Database(e)
        })
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to get user: {:?}", e);
            AppError::Database(e)
        })?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Current assigned category for a worker, read per request so that a
    /// reassignment takes effect immediately
    pub async fn assigned_category(&self, user_id: Uuid) -> Result<Option<Category>> {
        let row: Option<(Option<Category>,)> =
            sqlx::query_as("SELECT assigned_category FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to read assigned category: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(row.and_then(|(category,)| category))
    }

    /// Whether any admin account exists (used for startup bootstrap)
    pub async fn admin_exists(&self) -> Result<bool> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE role = 'admin')")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to check for admin account: {:?}", e);
                    AppError::Database(e)
                })?;

        Ok(exists)
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505")
    )
}
