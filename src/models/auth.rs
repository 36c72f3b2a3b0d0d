// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
}

// Usuário local, espelho do provedor de identidade (id externo)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = "user_2abcDEF")]
    pub id: String,
    #[schema(example = "ana@libreria.com")]
    pub email: String,
    pub name: Option<String>,
    pub status: UserStatus,
    pub is_super_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Super-admins passam mesmo sem aprovação (são eles que aprovam).
    pub fn can_operate(&self) -> bool {
        self.is_super_admin || self.status == UserStatus::Approved
    }
}

// "Claims" do JWT emitido pelo provedor de identidade
#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub iat: Option<usize>,
}

/// Identidade autenticada: só o que o provedor nos entrega.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub external_id: String,
    pub email: String,
    pub name: Option<String>,
}

impl From<IdentityClaims> for Identity {
    fn from(claims: IdentityClaims) -> Self {
        Self {
            external_id: claims.sub,
            email: claims.email.unwrap_or_default(),
            name: claims.name.filter(|n| !n.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(status: UserStatus, is_super_admin: bool) -> User {
        User {
            id: "user_1".into(),
            email: "a@b.com".into(),
            name: None,
            status,
            is_super_admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn only_approved_users_or_super_admins_operate() {
        assert!(user(UserStatus::Approved, false).can_operate());
        assert!(!user(UserStatus::Pending, false).can_operate());
        assert!(!user(UserStatus::Suspended, false).can_operate());
        assert!(user(UserStatus::Pending, true).can_operate());
    }

    #[test]
    fn blank_names_from_claims_are_dropped() {
        let identity = Identity::from(IdentityClaims {
            sub: "user_1".into(),
            email: Some("a@b.com".into()),
            name: Some("  ".into()),
            exp: 0,
            iat: None,
        });
        assert_eq!(identity.name, None);
        assert_eq!(identity.email, "a@b.com");
    }
}
