// src/services/store_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{AppError, Resource},
    db::{StoreRepository, UserRepository},
    models::{
        auth::{User, UserStatus},
        context::{resolve_active_store, RequestContext},
        store::{slugify, Module, Store, StoreRole, StoreSettings, UpdateSettingsRequest},
    },
};

#[derive(Clone)]
pub struct StoreService {
    store_repo: StoreRepository,
    user_repo: UserRepository,
    pool: PgPool,
}

impl StoreService {
    pub fn new(store_repo: StoreRepository, user_repo: UserRepository, pool: PgPool) -> Self {
        Self { store_repo, user_repo, pool }
    }

    // --- ONBOARDING ---
    /// Cria a primeira loja do usuário e o vínculo OWNER (todos os módulos), numa transação.
    pub async fn create_first_store(&self, user: &User, name: &str) -> Result<Store, AppError> {
        if user.status != UserStatus::Approved {
            return Err(AppError::AccountNotApproved);
        }

        let mut tx = self.pool.begin().await?;

        // 1. Trava o usuário: dois onboardings simultâneos não criam duas lojas
        self.user_repo
            .lock_for_update(&mut *tx, &user.id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::User))?;

        // 2. Só a primeira loja
        let memberships = self.store_repo.memberships_for_user(&mut *tx, &user.id).await?;
        if !memberships.is_empty() {
            return Err(AppError::StoreAlreadyExists);
        }

        // 3. Loja + vínculo OWNER
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(6).collect();
        let slug = slugify(name, &suffix);
        let store = self.store_repo.create_store(&mut *tx, name.trim(), &slug).await?;

        let all_modules: Vec<String> = Module::ALL.iter().map(|m| m.tag().to_string()).collect();
        self.store_repo
            .add_member(&mut *tx, &user.id, store.id, StoreRole::Owner, &all_modules)
            .await?;

        tx.commit().await?;

        tracing::info!(store_id = %store.id, user_id = %user.id, slug = %store.slug, "Loja criada");
        Ok(store)
    }

    // --- CONTEXTO ---
    /// Monta o contexto da requisição. O cookie de impersonação só é
    /// considerado para super-admins e quando a loja existe.
    pub async fn resolve_context(&self, user: User, impersonated: Option<Uuid>) -> Result<RequestContext, AppError> {
        let impersonated = match impersonated {
            Some(store_id) if user.is_super_admin => self
                .store_repo
                .find_by_id(&self.pool, store_id)
                .await?
                .map(|store| store.id),
            _ => None,
        };

        let memberships = self.store_repo.memberships_for_user(&self.pool, &user.id).await?;
        let active = resolve_active_store(&user, &memberships, impersonated)?;
        Ok(RequestContext::new(user, active))
    }

    pub async fn find_store(&self, store_id: Uuid) -> Result<Store, AppError> {
        self.store_repo
            .find_by_id(&self.pool, store_id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Store))
    }

    // --- CONFIGURAÇÕES ---
    pub async fn get_settings(&self, ctx: &RequestContext) -> Result<StoreSettings, AppError> {
        Ok(self.find_store(ctx.store_id).await?.into())
    }

    pub async fn update_settings(
        &self,
        ctx: &RequestContext,
        input: &UpdateSettingsRequest,
    ) -> Result<StoreSettings, AppError> {
        let store = self
            .store_repo
            .update_settings(&self.pool, ctx.store_id, input)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Store))?;

        tracing::info!(store_id = %store.id, user_id = %ctx.user.id, "Configurações da loja atualizadas");
        Ok(store.into())
    }
}
