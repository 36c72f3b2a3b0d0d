// src/services/admin_service.rs

use sqlx::PgPool;

use crate::{
    common::error::{AppError, Resource},
    db::{StoreRepository, UserRepository},
    models::{
        auth::{User, UserStatus},
        store::{Module, Store, StoreUser},
    },
};

// Ações exclusivas de super-admin (o extrator RequireSuperAdmin garante o acesso)
#[derive(Clone)]
pub struct AdminService {
    user_repo: UserRepository,
    store_repo: StoreRepository,
    pool: PgPool,
}

impl AdminService {
    pub fn new(user_repo: UserRepository, store_repo: StoreRepository, pool: PgPool) -> Self {
        Self { user_repo, store_repo, pool }
    }

    pub async fn list_users(&self, status: Option<UserStatus>) -> Result<Vec<User>, AppError> {
        self.user_repo.list(&self.pool, status).await
    }

    pub async fn list_stores(&self) -> Result<Vec<Store>, AppError> {
        self.store_repo.list_all(&self.pool).await
    }

    pub async fn set_user_status(&self, admin: &User, user_id: &str, status: UserStatus) -> Result<User, AppError> {
        let user = self
            .user_repo
            .set_status(&self.pool, user_id, status)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::User))?;

        tracing::info!(admin_id = %admin.id, user_id = %user.id, status = ?status, "Status do usuário alterado");
        Ok(user)
    }

    pub async fn set_super_admin(&self, admin: &User, user_id: &str, is_super_admin: bool) -> Result<User, AppError> {
        let user = self
            .user_repo
            .set_super_admin(&self.pool, user_id, is_super_admin)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::User))?;

        tracing::info!(admin_id = %admin.id, user_id = %user.id, is_super_admin, "Papel do usuário alterado");
        Ok(user)
    }

    /// Módulos visíveis no primeiro vínculo do usuário.
    pub async fn update_user_permissions(
        &self,
        admin: &User,
        user_id: &str,
        modules: &[Module],
    ) -> Result<StoreUser, AppError> {
        // Ordem canônica, sem repetições
        let tags: Vec<String> = Module::ALL
            .into_iter()
            .filter(|m| modules.contains(m))
            .map(|m| m.tag().to_string())
            .collect();

        let member = self
            .store_repo
            .update_first_membership_permissions(&self.pool, user_id, &tags)
            .await?
            .ok_or(AppError::NoStoreAssigned)?;

        tracing::info!(admin_id = %admin.id, user_id, store_id = %member.store_id, modules = ?tags, "Permissões atualizadas");
        Ok(member)
    }

    pub async fn delete_user(&self, admin: &User, user_id: &str) -> Result<(), AppError> {
        if !self.user_repo.delete(&self.pool, user_id).await? {
            return Err(AppError::ResourceNotFound(Resource::User));
        }
        tracing::info!(admin_id = %admin.id, user_id, "Usuário excluído");
        Ok(())
    }
}
