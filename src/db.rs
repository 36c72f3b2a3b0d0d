// src/db.rs

pub mod product_repo;
pub mod quote_repo;
pub mod sales_repo;
pub mod store_repo;
pub mod user_repo;

pub use product_repo::ProductRepository;
pub use quote_repo::{NewQuoteItem, QuoteRepository};
pub use sales_repo::SalesRepository;
pub use store_repo::StoreRepository;
pub use user_repo::UserRepository;

// Migrações embutidas no binário (pasta migrations/)
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
