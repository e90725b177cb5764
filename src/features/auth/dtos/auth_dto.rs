use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::reports::models::Category;
use crate::features::users::models::{Role, User};
use crate::shared::validation::DISPLAY_NAME_REGEX;

/// Request body for citizen self-registration
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        regex(path = *DISPLAY_NAME_REGEX, message = "Name contains invalid characters")
    )]
    #[schema(example = "Siti Rahma")]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    #[schema(example = "siti@example.com")]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Request body for login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password must not be empty"))]
    pub password: String,
}

/// Request body for the admin-only worker creation endpoint
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWorkerDto {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        regex(path = *DISPLAY_NAME_REGEX, message = "Name contains invalid characters")
    )]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Category whose reports this worker will handle
    pub assigned_category: Category,
}

/// Public view of a user account
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthUserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub assigned_category: Option<Category>,
}

impl From<User> for AuthUserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            assigned_category: user.assigned_category,
        }
    }
}

/// Token plus the account it belongs to
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponseDto {
    pub access_token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: u64,
    pub user: AuthUserDto,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_rejects_short_password() {
        let dto = RegisterRequestDto {
            name: "Siti Rahma".to_string(),
            email: "siti@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_register_rejects_bad_email() {
        let dto = RegisterRequestDto {
            name: "Siti Rahma".to_string(),
            email: "not-an-email".to_string(),
            password: "longenough".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_register_accepts_valid_input() {
        let dto = RegisterRequestDto {
            name: "Siti Rahma".to_string(),
            email: "siti@example.com".to_string(),
            password: "longenough".to_string(),
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_worker_requires_known_category() {
        let body = serde_json::json!({
            "name": "Budi",
            "email": "budi@example.com",
            "password": "longenough",
            "assigned_category": "Plumbing"
        });
        assert!(serde_json::from_value::<CreateWorkerDto>(body).is_err());
    }
}
