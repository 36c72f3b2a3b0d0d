// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::validation::{validate_not_blank, validate_money};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(ignore)]
    pub store_id: Uuid,
    #[schema(example = "Cien Años de Soledad")]
    pub name: String,
    #[schema(example = "9789500722096")]
    pub barcode: Option<String>,
    #[schema(example = "Sudamericana")]
    pub brand: Option<String>,
    pub description: Option<String>,
    #[schema(example = "Libros")]
    pub category: Option<String>,
    #[schema(example = "15000.00")]
    pub price: Decimal,
    #[schema(example = "9000.00")]
    pub cost: Option<Decimal>,
    #[schema(example = 20)]
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Linha bloqueada (FOR UPDATE) durante a baixa de estoque.
#[derive(Debug, Clone, FromRow)]
pub struct ProductStock {
    pub id: Uuid,
    pub name: String,
    pub stock: i32,
}

// --- Payloads ---

// Mesmo payload para criar e editar
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[validate(
        length(min = 1, max = 200, message = "El nombre es obligatorio."),
        custom(function = "validate_not_blank")
    )]
    pub name: String,

    #[validate(length(max = 64))]
    pub barcode: Option<String>,

    pub description: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,

    #[validate(custom(function = "validate_money"))]
    #[schema(example = "8500.00")]
    pub price: Decimal,

    #[validate(custom(function = "validate_money"))]
    pub cost: Option<Decimal>,

    #[validate(range(min = 0, message = "El stock no puede ser negativo."))]
    #[serde(default)]
    pub stock: i32,
}

impl ProductPayload {
    /// Código vazio é tratado como "sem código" (isento da unicidade).
    pub fn normalized_barcode(&self) -> Option<String> {
        normalize_barcode(self.barcode.as_deref())
    }
}

pub fn normalize_barcode(barcode: Option<&str>) -> Option<String> {
    barcode
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Busca por nome (sem diferenciar maiúsculas)
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSaved {
    pub success: bool,
    pub message: String,
    pub product: Product,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ProductPayload {
        ProductPayload {
            name: "El Principito".into(),
            barcode: Some(" 9788414450001 ".into()),
            description: None,
            brand: Some("Salamandra".into()),
            category: Some("Libros".into()),
            price: "8500".parse().unwrap(),
            cost: Some("4500".parse().unwrap()),
            stock: 50,
        }
    }

    #[test]
    fn barcode_is_trimmed_and_empty_means_none() {
        assert_eq!(payload().normalized_barcode().as_deref(), Some("9788414450001"));
        assert_eq!(normalize_barcode(Some("   ")), None);
        assert_eq!(normalize_barcode(None), None);
    }

    #[test]
    fn negative_stock_or_price_is_invalid() {
        assert!(payload().validate().is_ok());

        let mut p = payload();
        p.stock = -1;
        assert!(p.validate().unwrap_err().field_errors().contains_key("stock"));

        let mut p = payload();
        p.price = "-1".parse().unwrap();
        assert!(p.validate().unwrap_err().field_errors().contains_key("price"));

        let mut p = payload();
        p.name = "  ".into();
        assert!(p.validate().unwrap_err().field_errors().contains_key("name"));
    }
}
