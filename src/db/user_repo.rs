// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::auth::{Identity, User, UserStatus},
};

const USER_COLUMNS: &str = "id, email, name, status, is_super_admin, created_at, updated_at";

// Repositório da tabela 'users' (espelho local do provedor de identidade)
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Serializa o onboarding do mesmo usuário
    pub async fn lock_for_update<'e, E>(&self, executor: E, id: &str) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(user)
    }

    // Cria no primeiro login (PENDING); depois só atualiza e-mail/nome.
    // Status e super-admin nunca mudam por aqui.
    pub async fn upsert_from_identity<'e, E>(
        &self,
        executor: E,
        identity: &Identity,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO users (id, email, name)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                name = COALESCE(EXCLUDED.name, users.name),
                updated_at = CASE
                    WHEN users.email IS DISTINCT FROM EXCLUDED.email
                      OR users.name IS DISTINCT FROM COALESCE(EXCLUDED.name, users.name)
                    THEN NOW() ELSE users.updated_at END
            RETURNING {USER_COLUMNS}
            "#
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&identity.external_id)
            .bind(&identity.email)
            .bind(&identity.name)
            .fetch_one(executor)
            .await?;
        Ok(user)
    }

    pub async fn list<'e, E>(&self, executor: E, status: Option<UserStatus>) -> Result<Vec<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE ($1::user_status IS NULL OR status = $1) ORDER BY created_at DESC"
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(status)
            .fetch_all(executor)
            .await?;
        Ok(users)
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: &str,
        status: UserStatus,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(status)
            .fetch_optional(executor)
            .await?;
        Ok(user)
    }

    pub async fn set_super_admin<'e, E>(
        &self,
        executor: E,
        id: &str,
        is_super_admin: bool,
    ) -> Result<Option<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE users SET is_super_admin = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(is_super_admin)
            .fetch_optional(executor)
            .await?;
        Ok(user)
    }

    // Vínculos com lojas caem em cascata
    pub async fn delete<'e, E>(&self, executor: E, id: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
