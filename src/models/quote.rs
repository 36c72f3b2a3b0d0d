// src/models/quote.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{error::AppError, validation::validate_not_blank},
    models::sales::{LineItemInput, PaymentMethod},
};

// --- Enums ---
// DRAFT -> APPROVED -> CONVERTED (terminal). APPROVED -> DRAFT é a reativação.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "quote_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatus {
    Draft,
    Approved,
    Converted,
}

impl QuoteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            QuoteStatus::Draft => "DRAFT",
            QuoteStatus::Approved => "APPROVED",
            QuoteStatus::Converted => "CONVERTED",
        }
    }

    /// Mudança manual de status. CONVERTED só se alcança pela conversão.
    pub fn check_manual_transition(self, target: QuoteStatus) -> Result<(), AppError> {
        match (self, target) {
            (QuoteStatus::Converted, _) => Err(AppError::AlreadyConverted),
            (_, QuoteStatus::Converted) => Err(AppError::InvalidStatusTransition { from: self, to: target }),
            // DRAFT <-> APPROVED e no-ops
            _ => Ok(()),
        }
    }
}

/// Regra de conversão orçamento -> venda.
/// Com `require_approval = false` qualquer status não convertido pode ser convertido.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionPolicy {
    pub require_approval: bool,
}

impl ConversionPolicy {
    pub fn check(&self, status: QuoteStatus) -> Result<(), AppError> {
        match status {
            QuoteStatus::Converted => Err(AppError::AlreadyConverted),
            QuoteStatus::Draft if self.require_approval => Err(AppError::QuoteNotApproved),
            _ => Ok(()),
        }
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    #[schema(ignore)]
    pub store_id: Uuid,
    #[schema(example = "Colegio San Martín")]
    pub client_name: String,
    #[schema(example = "45000.00")]
    pub total: Decimal,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    pub id: Uuid,
    pub quote_id: Uuid,
    /// Nulo quando o produto foi excluído depois do orçamento
    pub product_id: Option<Uuid>,
    pub product_name: String,
    pub position: i32,
    pub quantity: i32,
    pub price: Decimal,
}

// Listagem: cabeçalho + quantidade de linhas
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub quote: Quote,
    pub item_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDetail {
    #[serde(flatten)]
    pub quote: Quote,
    pub items: Vec<QuoteItem>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuotePayload {
    #[validate(
        length(min = 1, max = 200, message = "El nombre del cliente es obligatorio."),
        custom(function = "validate_not_blank")
    )]
    pub client_name: String,

    #[validate(length(min = 1, message = "La cotización no tiene productos."), nested)]
    pub items: Vec<LineItemInput>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateQuotePayload {
    #[validate(
        length(min = 1, max = 200, message = "El nombre del cliente es obligatorio."),
        custom(function = "validate_not_blank")
    )]
    pub client_name: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuoteStatusPayload {
    pub status: QuoteStatus,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ConvertQuoteQuery {
    /// Forma de pagamento da venda gerada (padrão: CASH)
    pub payment_method: Option<PaymentMethod>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSaved {
    pub success: bool,
    pub message: String,
    pub quote: QuoteDetail,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteConverted {
    pub success: bool,
    pub message: String,
    pub sale_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use QuoteStatus::*;

    #[test]
    fn manual_transitions() {
        assert!(Draft.check_manual_transition(Approved).is_ok());
        assert!(Approved.check_manual_transition(Draft).is_ok());
        assert!(Draft.check_manual_transition(Draft).is_ok());
        assert!(matches!(
            Approved.check_manual_transition(Converted),
            Err(AppError::InvalidStatusTransition { from: Approved, to: Converted })
        ));
        assert!(matches!(Converted.check_manual_transition(Draft), Err(AppError::AlreadyConverted)));
        assert!(matches!(Converted.check_manual_transition(Converted), Err(AppError::AlreadyConverted)));
    }

    #[test]
    fn default_policy_converts_drafts() {
        let policy = ConversionPolicy::default();
        assert!(policy.check(Draft).is_ok());
        assert!(policy.check(Approved).is_ok());
        assert!(matches!(policy.check(Converted), Err(AppError::AlreadyConverted)));
    }

    #[test]
    fn strict_policy_requires_approval() {
        let policy = ConversionPolicy { require_approval: true };
        assert!(matches!(policy.check(Draft), Err(AppError::QuoteNotApproved)));
        assert!(policy.check(Approved).is_ok());
        assert!(matches!(policy.check(Converted), Err(AppError::AlreadyConverted)));
    }

    #[test]
    fn duplicate_requires_non_blank_name() {
        assert!(DuplicateQuotePayload { client_name: "   ".into() }.validate().is_err());
        assert!(DuplicateQuotePayload { client_name: "Ana".into() }.validate().is_ok());
    }

    #[test]
    fn status_wire_format() {
        let payload: UpdateQuoteStatusPayload = serde_json::from_str(r#"{"status":"APPROVED"}"#).unwrap();
        assert_eq!(payload.status, Approved);
    }
}
