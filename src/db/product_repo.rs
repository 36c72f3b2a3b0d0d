// src/db/product_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{is_check_violation, is_foreign_key_violation, is_unique_violation},
        error::{AppError, Resource},
        money::round_money,
    },
    models::product::{Product, ProductPayload, ProductStock},
};

const PRODUCT_COLUMNS: &str =
    "id, store_id, name, barcode, brand, description, category, price, cost, stock, created_at, updated_at";

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca literal por nome (case-insensitive); sem termo lista tudo.
    // strpos em vez de ILIKE: '%' e '_' do termo não viram curingas.
    pub async fn list<'e, E>(&self, executor: E, store_id: Uuid, search: Option<&str>) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE store_id = $1
              AND ($2::text IS NULL OR strpos(lower(name), lower($2)) > 0)
            ORDER BY name ASC, id ASC
            "#
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(store_id)
            .bind(search)
            .fetch_all(executor)
            .await?;
        Ok(products)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, store_id: Uuid, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND store_id = $2");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(store_id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn find_by_barcode<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        barcode: &str,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE store_id = $1 AND barcode = $2");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(store_id)
            .bind(barcode)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Algum outro produto da loja já usa este código?
    pub async fn barcode_taken<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        barcode: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM products
                WHERE store_id = $1 AND barcode = $2
                  AND ($3::uuid IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(store_id)
        .bind(barcode)
        .bind(exclude_id)
        .fetch_one(executor)
        .await?;
        Ok(taken)
    }

    pub async fn create<'e, E>(&self, executor: E, store_id: Uuid, input: &ProductPayload) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let barcode = input.normalized_barcode();
        let sql = format!(
            r#"
            INSERT INTO products (store_id, name, barcode, brand, description, category, price, cost, stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(store_id)
            .bind(input.name.trim())
            .bind(barcode.clone())
            .bind(&input.brand)
            .bind(&input.description)
            .bind(&input.category)
            .bind(round_money(input.price))
            .bind(input.cost.map(round_money))
            .bind(input.stock)
            .fetch_one(executor)
            .await
            .map_err(|e| map_barcode_conflict(e, barcode))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        id: Uuid,
        input: &ProductPayload,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let barcode = input.normalized_barcode();
        let sql = format!(
            r#"
            UPDATE products SET
                name = $3, barcode = $4, brand = $5, description = $6, category = $7,
                price = $8, cost = $9, stock = $10, updated_at = NOW()
            WHERE id = $1 AND store_id = $2
            RETURNING {PRODUCT_COLUMNS}
            "#
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(store_id)
            .bind(input.name.trim())
            .bind(barcode.clone())
            .bind(&input.brand)
            .bind(&input.description)
            .bind(&input.category)
            .bind(round_money(input.price))
            .bind(input.cost.map(round_money))
            .bind(input.stock)
            .fetch_optional(executor)
            .await
            .map_err(|e| map_barcode_conflict(e, barcode))
    }

    // Produto com vendas: a FK RESTRICT vira ForeignKeyConstraint
    pub async fn delete<'e, E>(&self, executor: E, store_id: Uuid, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store_id)
            .execute(executor)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AppError::ForeignKeyConstraint
                } else {
                    AppError::DatabaseError(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(Resource::Product));
        }
        Ok(())
    }

    /// Trava as linhas dos produtos da loja, sempre na ordem do id.
    /// Ids de outra loja (ou inexistentes) simplesmente não voltam.
    pub async fn lock_for_update<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<ProductStock>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, ProductStock>(
            r#"
            SELECT id, name, stock FROM products
            WHERE store_id = $1 AND id = ANY($2)
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(store_id)
        .bind(ids)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Nomes dos produtos da loja (snapshot das linhas do orçamento).
    pub async fn find_stock_rows<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<ProductStock>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, ProductStock>(
            "SELECT id, name, stock FROM products WHERE store_id = $1 AND id = ANY($2)",
        )
        .bind(store_id)
        .bind(ids)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    // O CHECK (stock >= 0) é a última barreira
    pub async fn decrement_stock<'e, E>(
        &self,
        executor: E,
        store_id: Uuid,
        id: Uuid,
        quantity: i32,
        product_name: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE products SET stock = stock - $3, updated_at = NOW() WHERE id = $1 AND store_id = $2")
            .bind(id)
            .bind(store_id)
            .bind(quantity)
            .execute(executor)
            .await
            .map_err(|e| {
                if is_check_violation(&e, "products_stock_check") {
                    AppError::InsufficientStock {
                        product: product_name.to_string(),
                        available: 0,
                    }
                } else {
                    AppError::DatabaseError(e)
                }
            })?;
        Ok(())
    }
}

fn map_barcode_conflict(err: sqlx::Error, barcode: Option<String>) -> AppError {
    if is_unique_violation(&err) {
        AppError::DuplicateBarcode(barcode.unwrap_or_default())
    } else {
        AppError::DatabaseError(err)
    }
}
