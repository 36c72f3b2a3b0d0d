// src/db/store_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::store::{Store, StoreRole, StoreUser, UpdateSettingsRequest},
};

const STORE_COLUMNS: &str = "id, name, slug, pdf_primary_color, pdf_secondary_color, contact_phone, \
     contact_email, address, quote_validity_days, created_at, updated_at";

const MEMBER_COLUMNS: &str = "id, user_id, store_id, role, permissions, created_at";

#[derive(Clone)]
pub struct StoreRepository {
    pool: PgPool,
}

impl StoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_store<'e, E>(&self, executor: E, name: &str, slug: &str) -> Result<Store, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("INSERT INTO stores (name, slug) VALUES ($1, $2) RETURNING {STORE_COLUMNS}");
        let store = sqlx::query_as::<_, Store>(&sql)
            .bind(name)
            .bind(slug)
            .fetch_one(executor)
            .await?;
        Ok(store)
    }

    pub async fn add_member<'e, E>(
        &self,
        executor: E,
        user_id: &str,
        store_id: Uuid,
        role: StoreRole,
        permissions: &[String],
    ) -> Result<StoreUser, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO store_users (user_id, store_id, role, permissions) VALUES ($1, $2, $3, $4) RETURNING {MEMBER_COLUMNS}"
        );
        let member = sqlx::query_as::<_, StoreUser>(&sql)
            .bind(user_id)
            .bind(store_id)
            .bind(role)
            .bind(permissions)
            .fetch_one(executor)
            .await?;
        Ok(member)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, store_id: Uuid) -> Result<Option<Store>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores WHERE id = $1");
        let store = sqlx::query_as::<_, Store>(&sql)
            .bind(store_id)
            .fetch_optional(executor)
            .await?;
        Ok(store)
    }

    pub async fn list_all<'e, E>(&self, executor: E) -> Result<Vec<Store>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {STORE_COLUMNS} FROM stores ORDER BY created_at DESC");
        let stores = sqlx::query_as::<_, Store>(&sql).fetch_all(executor).await?;
        Ok(stores)
    }

    // Vínculos do usuário, o mais antigo primeiro ("primeira loja")
    pub async fn memberships_for_user<'e, E>(&self, executor: E, user_id: &str) -> Result<Vec<StoreUser>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM store_users WHERE user_id = $1 ORDER BY created_at ASC, id ASC"
        );
        let members = sqlx::query_as::<_, StoreUser>(&sql)
            .bind(user_id)
            .fetch_all(executor)
            .await?;
        Ok(members)
    }

    /// Atualiza as permissões do primeiro vínculo do usuário.
    pub async fn update_first_membership_permissions<'e, E>(
        &self,
        executor: E,
        user_id: &str,
        permissions: &[String],
    ) -> Result<Option<StoreUser>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE store_users SET permissions = $2
            WHERE id = (
                SELECT id FROM store_users WHERE user_id = $1
                ORDER BY created_at ASC, id ASC LIMIT 1
            )
            RETURNING {MEMBER_COLUMNS}
            "#
        );
        let member = sqlx::query_as::<_, StoreUser>(&sql)
            .bind(user_id)
            .bind(permissions)
            .fetch_optional(executor)
            .await?;
        Ok(member)
    }

    // Campos ausentes (None) mantêm o valor atual
    pub async fn update_settings<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        input: &UpdateSettingsRequest,
    ) -> Result<Option<Store>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE stores SET
                name = COALESCE($2, name),
                pdf_primary_color = COALESCE($3, pdf_primary_color),
                pdf_secondary_color = COALESCE($4, pdf_secondary_color),
                contact_phone = COALESCE($5, contact_phone),
                contact_email = COALESCE($6, contact_email),
                address = COALESCE($7, address),
                quote_validity_days = COALESCE($8, quote_validity_days),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {STORE_COLUMNS}
            "#
        );
        let store = sqlx::query_as::<_, Store>(&sql)
            .bind(store_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.pdf_primary_color.as_deref())
            .bind(input.pdf_secondary_color.as_deref())
            .bind(input.contact_phone.as_deref())
            .bind(input.contact_email.as_deref())
            .bind(input.address.as_deref())
            .bind(input.quote_validity_days)
            .fetch_optional(executor)
            .await?;
        Ok(store)
    }
}
