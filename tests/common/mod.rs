// tests/common/mod.rs
//
// Testes de banco: rodam contra TEST_DATABASE_URL e são pulados sem ela.
// Cada teste cria seu próprio usuário e loja, então podem rodar em paralelo.

#![allow(dead_code)]

use std::{net::SocketAddr, time::Duration};

use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use pos_backend::{
    config::{AppConfig, AppState},
    db::MIGRATOR,
    models::{
        auth::User,
        context::RequestContext,
        product::{Product, ProductPayload},
        sales::LineItemInput,
    },
};

pub struct TestStore {
    pub state: AppState,
    pub ctx: RequestContext,
}

pub async fn setup() -> Option<TestStore> {
    let Ok(database_url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL não definida; pulando teste de banco");
        return None;
    };

    let config = AppConfig {
        database_url: database_url.clone(),
        jwt_secret: "segredo-de-teste".to_string(),
        jwt_issuer: None,
        bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
        db_max_connections: 8,
        db_acquire_timeout: Duration::from_secs(5),
        fonts_dir: "./fonts".to_string(),
        require_quote_approval: false,
        secure_cookies: false,
        view_cache_ttl: Duration::from_secs(60),
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&database_url)
        .await
        .expect("conexão com TEST_DATABASE_URL");
    MIGRATOR.run(&pool).await.expect("migrações");

    let state = AppState::from_pool(pool, config);
    let user = seed_approved_user(&state).await;
    state
        .store_service
        .create_first_store(&user, "Tienda de Prueba")
        .await
        .expect("loja criada");
    let ctx = state
        .store_service
        .resolve_context(user, None)
        .await
        .expect("contexto da loja");

    Some(TestStore { state, ctx })
}

pub async fn seed_approved_user(state: &AppState) -> User {
    let id = format!("test|{}", Uuid::new_v4());
    sqlx::query_as::<_, User>(
        "INSERT INTO users (id, email, name, status) VALUES ($1, $2, $3, 'APPROVED') RETURNING *",
    )
    .bind(&id)
    .bind(format!("{id}@example.com"))
    .bind("Cajero de Prueba")
    .fetch_one(&state.db_pool)
    .await
    .expect("usuário semeado")
}

pub fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub async fn product(store: &TestStore, name: &str, price_cents: i64, stock: i32, barcode: Option<&str>) -> Product {
    let payload = ProductPayload {
        name: name.to_string(),
        barcode: barcode.map(str::to_string),
        description: None,
        brand: None,
        category: None,
        price: money(price_cents),
        cost: None,
        stock,
    };
    store
        .state
        .product_service
        .create_product(&store.ctx, &payload)
        .await
        .expect("produto criado")
}

pub fn line(product: &Product, quantity: i32) -> LineItemInput {
    LineItemInput {
        product_id: product.id,
        quantity,
        price: product.price,
    }
}

pub async fn stock_of(store: &TestStore, product: &Product) -> i32 {
    store
        .state
        .product_service
        .get_product(&store.ctx, product.id)
        .await
        .expect("produto existe")
        .stock
}
