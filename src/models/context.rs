// src/models/context.rs

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::User,
        store::{Module, StoreUser},
    },
};

/// Calculadas uma vez por requisição (store_guard).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Capabilities {
    pub is_super_admin: bool,
    pub modules: Vec<Module>,
}

/// Contexto da requisição: quem está operando e em qual loja.
/// Todo serviço de negócio recebe este valor explicitamente.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user: User,
    pub store_id: Uuid,
    pub impersonating: bool,
    pub capabilities: Capabilities,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveStore {
    pub store_id: Uuid,
    pub impersonating: bool,
    pub modules: Vec<Module>,
}

/// Escolhe a loja ativa.
/// `impersonated` só chega aqui quando o cookie aponta para uma loja existente;
/// mesmo assim ele só vale para super-admins. Caso contrário usa o primeiro vínculo.
pub fn resolve_active_store(
    user: &User,
    memberships: &[StoreUser],
    impersonated: Option<Uuid>,
) -> Result<ActiveStore, AppError> {
    if user.is_super_admin {
        if let Some(store_id) = impersonated {
            return Ok(ActiveStore {
                store_id,
                impersonating: true,
                modules: Module::ALL.to_vec(),
            });
        }
    }

    let first = memberships.first().ok_or(AppError::NoStoreAssigned)?;
    let modules = if user.is_super_admin {
        Module::ALL.to_vec()
    } else {
        Module::parse_all(&first.permissions)
    };

    Ok(ActiveStore {
        store_id: first.store_id,
        impersonating: false,
        modules,
    })
}

impl RequestContext {
    pub fn new(user: User, active: ActiveStore) -> Self {
        let capabilities = Capabilities {
            is_super_admin: user.is_super_admin,
            modules: active.modules,
        };
        Self {
            user,
            store_id: active.store_id,
            impersonating: active.impersonating,
            capabilities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{auth::UserStatus, store::StoreRole};
    use chrono::Utc;

    fn user(is_super_admin: bool) -> User {
        User {
            id: "user_1".into(),
            email: "a@b.com".into(),
            name: None,
            status: UserStatus::Approved,
            is_super_admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn membership(store_id: Uuid, permissions: &[&str]) -> StoreUser {
        StoreUser {
            id: Uuid::new_v4(),
            user_id: "user_1".into(),
            store_id,
            role: StoreRole::Owner,
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn regular_user_ignores_impersonation_cookie() {
        let own = Uuid::new_v4();
        let other = Uuid::new_v4();
        let active = resolve_active_store(&user(false), &[membership(own, &["sales"])], Some(other)).unwrap();
        assert_eq!(active.store_id, own);
        assert!(!active.impersonating);
        assert_eq!(active.modules, vec![Module::Sales]);
    }

    #[test]
    fn super_admin_impersonates_with_all_modules() {
        let target = Uuid::new_v4();
        let active = resolve_active_store(&user(true), &[], Some(target)).unwrap();
        assert_eq!(active.store_id, target);
        assert!(active.impersonating);
        assert_eq!(active.modules, Module::ALL.to_vec());
    }

    #[test]
    fn first_membership_wins() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let memberships = [membership(first, &["quotes", "history"]), membership(second, &["sales"])];
        let active = resolve_active_store(&user(false), &memberships, None).unwrap();
        assert_eq!(active.store_id, first);
        assert_eq!(active.modules, vec![Module::History, Module::Quotes]);
    }

    #[test]
    fn no_membership_and_no_cookie_means_no_store() {
        assert!(matches!(
            resolve_active_store(&user(true), &[], None),
            Err(AppError::NoStoreAssigned)
        ));
        assert!(matches!(
            resolve_active_store(&user(false), &[], Some(Uuid::new_v4())),
            Err(AppError::NoStoreAssigned)
        ));
    }
}
