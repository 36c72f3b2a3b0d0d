// src/db/sales_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::is_unique_violation, error::AppError},
    models::sales::{LineItemInput, PaymentMethod, Sale, SaleItemDetail},
};

const SALE_COLUMNS: &str = "id, store_id, total, payment_method, quote_id, created_at";

const ITEM_DETAIL_SELECT: &str = r#"
    SELECT si.sale_id, si.product_id, p.name AS product_name, si.position, si.quantity, si.price
    FROM sale_items si
    JOIN products p ON p.id = si.product_id
"#;

#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // sales.quote_id é UNIQUE: uma segunda conversão do mesmo orçamento bate aqui
    pub async fn insert_sale<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        total: Decimal,
        payment_method: PaymentMethod,
        quote_id: Option<Uuid>,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO sales (store_id, total, payment_method, quote_id) VALUES ($1, $2, $3, $4) RETURNING {SALE_COLUMNS}"
        );
        sqlx::query_as::<_, Sale>(&sql)
            .bind(store_id)
            .bind(total)
            .bind(payment_method)
            .bind(quote_id)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                if quote_id.is_some() && is_unique_violation(&e) {
                    AppError::AlreadyConverted
                } else {
                    AppError::DatabaseError(e)
                }
            })
    }

    pub async fn insert_item<'e, E>(
        &self,
        executor: E,
        sale_id: Uuid,
        position: i32,
        line: &LineItemInput,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "INSERT INTO sale_items (sale_id, product_id, position, quantity, price) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(sale_id)
        .bind(line.product_id)
        .bind(position)
        .bind(line.quantity)
        .bind(line.price)
        .execute(executor)
        .await?;
        Ok(())
    }

    // Mais recentes primeiro
    pub async fn list_by_store<'e, E>(&self, executor: E, store_id: Uuid) -> Result<Vec<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE store_id = $1 ORDER BY created_at DESC, id DESC");
        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(store_id)
            .fetch_all(executor)
            .await?;
        Ok(sales)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, store_id: Uuid, id: Uuid) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = $1 AND store_id = $2");
        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .bind(store_id)
            .fetch_optional(executor)
            .await?;
        Ok(sale)
    }

    pub async fn items_for_store<'e, E>(&self, executor: E, store_id: Uuid) -> Result<Vec<SaleItemDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "{ITEM_DETAIL_SELECT} JOIN sales s ON s.id = si.sale_id WHERE s.store_id = $1 ORDER BY si.sale_id, si.position"
        );
        let items = sqlx::query_as::<_, SaleItemDetail>(&sql)
            .bind(store_id)
            .fetch_all(executor)
            .await?;
        Ok(items)
    }

    pub async fn items_for_sale<'e, E>(&self, executor: E, sale_id: Uuid) -> Result<Vec<SaleItemDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{ITEM_DETAIL_SELECT} WHERE si.sale_id = $1 ORDER BY si.position");
        let items = sqlx::query_as::<_, SaleItemDetail>(&sql)
            .bind(sale_id)
            .fetch_all(executor)
            .await?;
        Ok(items)
    }
}
