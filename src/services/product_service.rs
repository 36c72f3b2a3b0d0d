// src/services/product_service.rs

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::{AppError, Resource},
    db::ProductRepository,
    models::{
        context::RequestContext,
        product::{normalize_barcode, Product, ProductPayload},
    },
    services::view_cache::ViewCache,
};

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
    cache: ViewCache,
    pool: PgPool,
}

impl ProductService {
    pub fn new(product_repo: ProductRepository, cache: ViewCache, pool: PgPool) -> Self {
        Self { product_repo, cache, pool }
    }

    /// Listagem ordenada por nome. Sem termo de busca vem do cache da loja.
    pub async fn list_products(&self, ctx: &RequestContext, search: Option<&str>) -> Result<Arc<Vec<Product>>, AppError> {
        let search = search.map(str::trim).filter(|q| !q.is_empty());

        match search {
            Some(term) => {
                let products = self.product_repo.list(&self.pool, ctx.store_id, Some(term)).await?;
                Ok(Arc::new(products))
            }
            None => {
                self.cache
                    .products_or_load(ctx.store_id, || self.product_repo.list(&self.pool, ctx.store_id, None))
                    .await
            }
        }
    }

    pub async fn get_product(&self, ctx: &RequestContext, id: Uuid) -> Result<Product, AppError> {
        self.product_repo
            .find_by_id(&self.pool, ctx.store_id, id)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Product))
    }

    // Leitor de código de barras no caixa
    pub async fn find_by_barcode(&self, ctx: &RequestContext, code: &str) -> Result<Product, AppError> {
        let code = normalize_barcode(Some(code)).ok_or(AppError::ResourceNotFound(Resource::Product))?;
        self.product_repo
            .find_by_barcode(&self.pool, ctx.store_id, &code)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Product))
    }

    pub async fn create_product(&self, ctx: &RequestContext, input: &ProductPayload) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        // 1. Código de barras único na loja (o índice parcial é a última barreira)
        if let Some(barcode) = input.normalized_barcode() {
            if self.product_repo.barcode_taken(&mut *tx, ctx.store_id, &barcode, None).await? {
                return Err(AppError::DuplicateBarcode(barcode));
            }
        }

        // 2. Grava
        let product = self.product_repo.create(&mut *tx, ctx.store_id, input).await?;
        tx.commit().await?;

        self.cache.invalidate_store(ctx.store_id).await;
        tracing::info!(store_id = %ctx.store_id, product_id = %product.id, "Produto criado");
        Ok(product)
    }

    pub async fn update_product(&self, ctx: &RequestContext, id: Uuid, input: &ProductPayload) -> Result<Product, AppError> {
        let mut tx = self.pool.begin().await?;

        if let Some(barcode) = input.normalized_barcode() {
            if self.product_repo.barcode_taken(&mut *tx, ctx.store_id, &barcode, Some(id)).await? {
                return Err(AppError::DuplicateBarcode(barcode));
            }
        }

        let product = self
            .product_repo
            .update(&mut *tx, ctx.store_id, id, input)
            .await?
            .ok_or(AppError::ResourceNotFound(Resource::Product))?;
        tx.commit().await?;

        self.cache.invalidate_store(ctx.store_id).await;
        tracing::info!(store_id = %ctx.store_id, product_id = %product.id, "Produto atualizado");
        Ok(product)
    }

    pub async fn delete_product(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.product_repo.delete(&self.pool, ctx.store_id, id).await?;

        self.cache.invalidate_store(ctx.store_id).await;
        tracing::info!(store_id = %ctx.store_id, product_id = %id, "Produto excluído");
        Ok(())
    }
}
