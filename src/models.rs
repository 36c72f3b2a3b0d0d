// src/models.rs

pub mod admin;
pub mod auth;
pub mod context;
pub mod product;
pub mod quote;
pub mod sales;
pub mod store;
