pub mod jwt;

pub use jwt::{Claims, JwtManager};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a user inside their organization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "text")]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Instructor,
    Student,
}

impl Role {
    /// May manage students and content
    pub fn is_staff(&self) -> bool {
        !matches!(self, Role::Student)
    }

    /// May grant credits and manage billing
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Owner | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Owner => write!(f, "owner"),
            Role::Admin => write!(f, "admin"),
            Role::Instructor => write!(f, "instructor"),
            Role::Student => write!(f, "student"),
        }
    }
}

/// Authenticated caller, resolved once per request by the auth middleware
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub role: Role,
    pub email: String,
}

#[cfg(test)]
impl AuthContext {
    pub fn for_tests(user_id: Uuid, organization_id: Uuid) -> Self {
        Self {
            user_id,
            organization_id,
            role: Role::Owner,
            email: "owner@academy.test".to_string(),
        }
    }
}
