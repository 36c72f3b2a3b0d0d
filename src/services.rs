// src/services.rs

pub mod admin_service;
pub mod auth;
pub mod document_service;
pub mod product_service;
pub mod quote_service;
pub mod sales_service;
pub mod store_service;
pub mod view_cache;
