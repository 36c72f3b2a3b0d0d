// src/services/view_cache.rs

use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex},
    time::Duration,
};

use moka::future::Cache;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{product::Product, sales::SalesHistory},
};

const MAX_STORES: u64 = 1_000;

/// Cache de leitura das telas mais acessadas, por loja.
/// Toda escrita que mexe em produtos/vendas chama `invalidate_store` após o commit.
///
/// Cada loja tem uma geração, incrementada a cada invalidação. Uma carga só
/// fica no cache se a geração não mudou enquanto ela rodava.
#[derive(Clone)]
pub struct ViewCache {
    products: Cache<Uuid, Arc<Vec<Product>>>,
    sales_history: Cache<Uuid, Arc<SalesHistory>>,
    generations: Arc<Mutex<HashMap<Uuid, u64>>>,
}

impl ViewCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            products: Cache::builder().max_capacity(MAX_STORES).time_to_live(ttl).build(),
            sales_history: Cache::builder().max_capacity(MAX_STORES).time_to_live(ttl).build(),
            generations: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn products_or_load<F, Fut>(&self, store_id: Uuid, load: F) -> Result<Arc<Vec<Product>>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<Product>, AppError>>,
    {
        self.read_through(&self.products, store_id, load).await
    }

    pub async fn sales_history_or_load<F, Fut>(&self, store_id: Uuid, load: F) -> Result<Arc<SalesHistory>, AppError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<SalesHistory, AppError>>,
    {
        self.read_through(&self.sales_history, store_id, load).await
    }

    pub async fn invalidate_store(&self, store_id: Uuid) {
        // Geração primeiro: cargas em andamento deixam de poder gravar
        self.bump_generation(store_id);
        self.products.invalidate(&store_id).await;
        self.sales_history.invalidate(&store_id).await;
        tracing::debug!(%store_id, "Cache da loja invalidado");
    }

    async fn read_through<V, F, Fut>(
        &self,
        cache: &Cache<Uuid, Arc<V>>,
        store_id: Uuid,
        load: F,
    ) -> Result<Arc<V>, AppError>
    where
        V: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, AppError>>,
    {
        if let Some(cached) = cache.get(&store_id).await {
            return Ok(cached);
        }

        let started = self.generation(store_id);
        let fresh = Arc::new(load().await?);

        if self.generation(store_id) == started {
            cache.insert(store_id, fresh.clone()).await;
            // Invalidação entre a conferência e o insert
            if self.generation(store_id) != started {
                cache.invalidate(&store_id).await;
            }
        }
        Ok(fresh)
    }

    fn generation(&self, store_id: Uuid) -> u64 {
        let generations = self.generations.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        generations.get(&store_id).copied().unwrap_or(0)
    }

    fn bump_generation(&self, store_id: Uuid) {
        let mut generations = self.generations.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *generations.entry(store_id).or_insert(0) += 1;
    }
}
