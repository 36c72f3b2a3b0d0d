// src/config.rs

use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{ProductRepository, QuoteRepository, SalesRepository, StoreRepository, UserRepository},
    models::quote::ConversionPolicy,
    services::{
        admin_service::AdminService,
        auth::{AuthService, IdentityVerifier},
        document_service::DocumentService,
        product_service::ProductService,
        quote_service::QuoteService,
        sales_service::SalesService,
        store_service::StoreService,
        view_cache::ViewCache,
    },
};

/// Configuração lida do ambiente (.env via dotenvy).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub fonts_dir: String,
    pub require_quote_approval: bool,
    pub secure_cookies: bool,
    pub view_cache_ttl: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("IDENTITY_JWT_SECRET").context("IDENTITY_JWT_SECRET deve ser definido")?;

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_issuer: env::var("IDENTITY_ISSUER").ok().filter(|v| !v.trim().is_empty()),
            bind_addr: parse_var("BIND_ADDR", "0.0.0.0:3000".parse()?)?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            db_acquire_timeout: Duration::from_secs(parse_var("DB_ACQUIRE_TIMEOUT_SECS", 3)?),
            fonts_dir: env::var("FONTS_DIR").unwrap_or_else(|_| "./fonts".to_string()),
            require_quote_approval: parse_var("REQUIRE_QUOTE_APPROVAL", false)?,
            secure_cookies: parse_var("SECURE_COOKIES", false)?,
            view_cache_ttl: Duration::from_secs(parse_var("VIEW_CACHE_TTL_SECS", 60)?),
        })
    }
}

// Variável opcional com valor padrão; presente mas inválida é erro
fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} inválida: {raw}")),
        _ => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<AppConfig>,
    pub i18n_store: Arc<I18nStore>,
    pub view_cache: ViewCache,
    pub auth_service: AuthService,
    pub store_service: StoreService,
    pub product_service: ProductService,
    pub sales_service: SalesService,
    pub quote_service: QuoteService,
    pub document_service: DocumentService,
    pub admin_service: AdminService,
}

impl AppState {
    // Conecta ao banco e monta o grafo de dependências
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(Self::from_pool(db_pool, config))
    }

    /// Monta o estado sobre um pool já criado (testes usam pool preguiçoso).
    pub fn from_pool(db_pool: PgPool, config: AppConfig) -> Self {
        let view_cache = ViewCache::new(config.view_cache_ttl);

        // --- Repositórios ---
        let user_repo = UserRepository::new(db_pool.clone());
        let store_repo = StoreRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let sales_repo = SalesRepository::new(db_pool.clone());
        let quote_repo = QuoteRepository::new(db_pool.clone());

        // --- Serviços ---
        let verifier = IdentityVerifier::new(&config.jwt_secret, config.jwt_issuer.as_deref());
        let auth_service = AuthService::new(user_repo.clone(), verifier, db_pool.clone());
        let store_service = StoreService::new(store_repo.clone(), user_repo.clone(), db_pool.clone());
        let product_service = ProductService::new(product_repo.clone(), view_cache.clone(), db_pool.clone());
        let sales_service = SalesService::new(
            sales_repo,
            product_repo.clone(),
            view_cache.clone(),
            db_pool.clone(),
        );
        let quote_service = QuoteService::new(
            quote_repo,
            product_repo,
            sales_service.clone(),
            view_cache.clone(),
            ConversionPolicy {
                require_approval: config.require_quote_approval,
            },
            db_pool.clone(),
        );
        let document_service = DocumentService::new(config.fonts_dir.clone());
        let admin_service = AdminService::new(user_repo, store_repo, db_pool.clone());

        Self {
            db_pool,
            config: Arc::new(config),
            i18n_store: Arc::new(I18nStore::new()),
            view_cache,
            auth_service,
            store_service,
            product_service,
            sales_service,
            quote_service,
            document_service,
            admin_service,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_uses_default_when_unset() {
        let value: u32 = parse_var("POS_TEST_SURELY_UNSET_VAR", 7).unwrap();
        assert_eq!(value, 7);
    }
}
