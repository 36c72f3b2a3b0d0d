// src/db/quote_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::quote::{Quote, QuoteItem, QuoteStatus, QuoteSummary},
};

const QUOTE_COLUMNS: &str = "id, store_id, client_name, total, status, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, quote_id, product_id, product_name, position, quantity, price";

/// Linha pronta para gravar (nome do produto já resolvido).
#[derive(Debug, Clone)]
pub struct NewQuoteItem {
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
}

#[derive(Clone)]
pub struct QuoteRepository {
    pool: PgPool,
}

impl QuoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_quote<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        client_name: &str,
        total: Decimal,
    ) -> Result<Quote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO quotes (store_id, client_name, total, status) VALUES ($1, $2, $3, 'DRAFT') RETURNING {QUOTE_COLUMNS}"
        );
        let quote = sqlx::query_as::<_, Quote>(&sql)
            .bind(store_id)
            .bind(client_name)
            .bind(total)
            .fetch_one(executor)
            .await?;
        Ok(quote)
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        quote_id: Uuid,
        position: i32,
        item: &NewQuoteItem,
    ) -> Result<QuoteItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO quote_items (quote_id, product_id, product_name, position, quantity, price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ITEM_COLUMNS}
            "#
        );
        let item = sqlx::query_as::<_, QuoteItem>(&sql)
            .bind(quote_id)
            .bind(item.product_id)
            .bind(&item.product_name)
            .bind(position)
            .bind(item.quantity)
            .bind(item.price)
            .fetch_one(executor)
            .await?;
        Ok(item)
    }

    pub async fn list_by_store<'e, E>(&self, executor: E, store_id: Uuid) -> Result<Vec<QuoteSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let summaries = sqlx::query_as::<_, QuoteSummary>(
            r#"
            SELECT q.id, q.store_id, q.client_name, q.total, q.status, q.created_at, q.updated_at,
                   (SELECT COUNT(*) FROM quote_items qi WHERE qi.quote_id = q.id) AS item_count
            FROM quotes q
            WHERE q.store_id = $1
            ORDER BY q.created_at DESC, q.id DESC
            "#,
        )
        .bind(store_id)
        .fetch_all(executor)
        .await?;
        Ok(summaries)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, store_id: Uuid, id: Uuid) -> Result<Option<Quote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = $1 AND store_id = $2");
        let quote = sqlx::query_as::<_, Quote>(&sql)
            .bind(id)
            .bind(store_id)
            .fetch_optional(executor)
            .await?;
        Ok(quote)
    }

    // Serializa conversões/mudanças de status concorrentes no mesmo orçamento
    pub async fn lock_for_update<'e, E>(&self, executor: E, store_id: Uuid, id: Uuid) -> Result<Option<Quote>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {QUOTE_COLUMNS} FROM quotes WHERE id = $1 AND store_id = $2 FOR UPDATE");
        let quote = sqlx::query_as::<_, Quote>(&sql)
            .bind(id)
            .bind(store_id)
            .fetch_optional(executor)
            .await?;
        Ok(quote)
    }

    pub async fn items<'e, E>(&self, executor: E, quote_id: Uuid) -> Result<Vec<QuoteItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM quote_items WHERE quote_id = $1 ORDER BY position");
        let items = sqlx::query_as::<_, QuoteItem>(&sql)
            .bind(quote_id)
            .fetch_all(executor)
            .await?;
        Ok(items)
    }

    pub async fn set_status<'e, E>(&self, executor: E, id: Uuid, status: QuoteStatus) -> Result<Quote, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("UPDATE quotes SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {QUOTE_COLUMNS}");
        let quote = sqlx::query_as::<_, Quote>(&sql)
            .bind(id)
            .bind(status)
            .fetch_one(executor)
            .await?;
        Ok(quote)
    }

    // Itens caem em cascata
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
