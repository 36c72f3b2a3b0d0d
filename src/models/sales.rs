// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::validate_money;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
}

impl PaymentMethod {
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Efectivo",
            PaymentMethod::Card => "Tarjeta",
            PaymentMethod::Transfer => "Transferencia",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    #[schema(ignore)]
    pub store_id: Uuid,
    #[schema(example = "32401.50")]
    pub total: Decimal,
    pub payment_method: PaymentMethod,
    /// Orçamento de origem, quando a venda veio de uma conversão
    pub quote_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub position: i32,
    pub quantity: i32,
    pub price: Decimal,
}

// Item de venda com o nome do produto já resolvido (histórico / PDF)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemDetail {
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub position: i32,
    pub quantity: i32,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetail {
    #[serde(flatten)]
    pub sale: Sale,
    pub items: Vec<SaleItemDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub sales_count: usize,
    pub total_revenue: Decimal,
    pub units_sold: i64,
}

impl SalesSummary {
    pub fn from_sales(sales: &[SaleDetail]) -> Self {
        Self {
            sales_count: sales.len(),
            total_revenue: sales.iter().map(|s| s.sale.total).sum(),
            units_sold: sales
                .iter()
                .flat_map(|s| s.items.iter())
                .map(|i| i64::from(i.quantity))
                .sum(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesHistory {
    pub summary: SalesSummary,
    pub sales: Vec<SaleDetail>,
}

// --- Payloads ---

/// Linha de carrinho/orçamento: produto, quantidade e preço unitário do momento.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub product_id: Uuid,

    #[validate(range(min = 1, max = 100_000, message = "La cantidad debe ser mayor a cero."))]
    #[schema(example = 2)]
    pub quantity: i32,

    #[validate(custom(function = "validate_money"))]
    #[schema(example = "8500.00")]
    pub price: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSalePayload {
    #[validate(length(min = 1, message = "El carrito está vacío."), nested)]
    pub items: Vec<LineItemInput>,

    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleCreated {
    pub success: bool,
    pub message: String,
    pub sale_id: Uuid,
    pub total: Decimal,
}
