use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::users::models::Role;

/// Identity attached to a request after token validation.
///
/// Deliberately small: the worker's assigned category is NOT carried here,
/// it is read from the store per request so reassignment takes effect
/// without reissuing tokens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_citizen(&self) -> bool {
        self.role == Role::Citizen
    }

    pub fn is_worker(&self) -> bool {
        self.role == Role::Worker
    }
}

/// JWT claims carried in access tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub role: Role,
    pub iat: u64,
    pub exp: u64,
}
