// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    common::i18n::{I18nStore, DEFAULT_LANG},
    middleware::i18n::Locale,
    models::quote::QuoteStatus,
};

/// Entidades que podem faltar (ou pertencer a outra loja).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Product,
    Quote,
    Sale,
    Store,
    User,
}

impl Resource {
    fn key(self) -> &'static str {
        match self {
            Resource::Product => "resource.product",
            Resource::Quote => "resource.quote",
            Resource::Sale => "resource.sale",
            Resource::Store => "resource.store",
            Resource::User => "resource.user",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Não autenticado")]
    Unauthorized,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Erro ao decodificar JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Conta não aprovada")]
    AccountNotApproved,

    #[error("Acesso restrito a super-admin")]
    Forbidden,

    #[error("Usuário sem loja")]
    NoStoreAssigned,

    #[error("{0:?} não encontrado")]
    ResourceNotFound(Resource),

    #[error("Estoque insuficiente para '{product}' (disponível: {available})")]
    InsufficientStock { product: String, available: i32 },

    #[error("Código de barras já existe: {0}")]
    DuplicateBarcode(String),

    #[error("Orçamento já convertido")]
    AlreadyConverted,

    #[error("Orçamento não aprovado")]
    QuoteNotApproved,

    #[error("Transição de status inválida: {from:?} -> {to:?}")]
    InvalidStatusTransition { from: QuoteStatus, to: QuoteStatus },

    #[error("Registro referenciado por outros dados")]
    ForeignKeyConstraint,

    #[error("Usuário já possui loja")]
    StoreAlreadyExists,

    #[error("Carrinho vazio")]
    EmptyCart,

    #[error("Total acima do limite permitido")]
    TotalTooLarge,

    #[error("Erro ao gerar PDF: {0}")]
    PdfError(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro ao aplicar migrações: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

/// Corpo de falha devolvido à UI: `{ success: false, message, details? }`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            message: message.into(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::EmptyCart | AppError::TotalTooLarge => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized | AppError::InvalidToken | AppError::JwtError(_) => {
                StatusCode::UNAUTHORIZED
            }
            AppError::AccountNotApproved | AppError::Forbidden | AppError::NoStoreAssigned => {
                StatusCode::FORBIDDEN
            }
            AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InsufficientStock { .. }
            | AppError::DuplicateBarcode(_)
            | AppError::AlreadyConverted
            | AppError::QuoteNotApproved
            | AppError::ForeignKeyConstraint
            | AppError::StoreAlreadyExists => StatusCode::CONFLICT,
            AppError::InvalidStatusTransition { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PdfError(_)
            | AppError::DatabaseError(_)
            | AppError::MigrationError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message_key(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "error.validation",
            AppError::Unauthorized => "error.unauthorized",
            AppError::InvalidToken | AppError::JwtError(_) => "error.invalid_token",
            AppError::AccountNotApproved => "error.account_not_approved",
            AppError::Forbidden => "error.forbidden",
            AppError::NoStoreAssigned => "error.no_store_assigned",
            AppError::ResourceNotFound(_) => "error.not_found",
            AppError::InsufficientStock { .. } => "error.insufficient_stock",
            AppError::DuplicateBarcode(_) => "error.duplicate_barcode",
            AppError::AlreadyConverted => "error.already_converted",
            AppError::QuoteNotApproved => "error.quote_not_approved",
            AppError::InvalidStatusTransition { .. } => "error.invalid_status_transition",
            AppError::ForeignKeyConstraint => "error.foreign_key_constraint",
            AppError::StoreAlreadyExists => "error.store_already_exists",
            AppError::EmptyCart => "error.empty_cart",
            AppError::TotalTooLarge => "error.total_too_large",
            AppError::PdfError(_) => "error.pdf",
            AppError::DatabaseError(_) | AppError::MigrationError(_) | AppError::InternalServerError(_) => {
                "error.internal"
            }
        }
    }

    /// Converte para a resposta estruturada, traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();

        let args: Vec<(&str, String)> = match self {
            AppError::ResourceNotFound(resource) => {
                vec![("resource", i18n.translate(lang, resource.key(), &[]))]
            }
            AppError::InsufficientStock { product, available } => {
                vec![("product", product.clone()), ("available", available.to_string())]
            }
            AppError::DuplicateBarcode(barcode) => vec![("barcode", barcode.clone())],
            AppError::InvalidStatusTransition { from, to } => {
                vec![("from", from.as_str().to_string()), ("to", to.as_str().to_string())]
            }
            _ => Vec::new(),
        };

        let mut api_error = ApiError::new(self.status_code(), i18n.translate(lang, self.message_key(), &args));

        match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                api_error.details = Some(json!(details));
            }
            // O detalhe técnico só vai para o log.
            AppError::PdfError(_)
            | AppError::DatabaseError(_)
            | AppError::MigrationError(_)
            | AppError::InternalServerError(_) => {
                tracing::error!(error = %self, "Erro interno do servidor");
            }
            AppError::JwtError(e) => {
                tracing::debug!(error = %e, "Token rejeitado");
            }
            _ => {}
        }

        api_error
    }
}

// Usado quando não há Locale/AppState à mão (rejeição de extratores).
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale(DEFAULT_LANG.to_string()), I18nStore::shared())
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn es() -> Locale {
        Locale("es".to_string())
    }

    #[test]
    fn business_errors_map_to_http_status() {
        assert_eq!(AppError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NoStoreAssigned.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::ResourceNotFound(Resource::Quote).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::InsufficientStock { product: "x".into(), available: 0 }.status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(AppError::AlreadyConverted.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::ForeignKeyConstraint.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::TotalTooLarge.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::InternalServerError(anyhow::anyhow!("boom")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_names_the_resource() {
        let api = AppError::ResourceNotFound(Resource::Product).to_api_error(&es(), &I18nStore::new());
        assert_eq!(api.message, "Producto no encontrado.");
        assert!(!api.success);

        let en = Locale("en".to_string());
        let api = AppError::ResourceNotFound(Resource::Quote).to_api_error(&en, &I18nStore::new());
        assert_eq!(api.message, "Quote not found.");
    }

    #[test]
    fn internal_errors_hide_details() {
        let api = AppError::InternalServerError(anyhow::anyhow!("connection reset by peer"))
            .to_api_error(&es(), &I18nStore::new());
        assert_eq!(api.message, "Ocurrió un error inesperado.");
        assert!(api.details.is_none());
    }

    #[test]
    fn body_has_success_false() {
        let api = AppError::DuplicateBarcode("779000000001".into()).to_api_error(&es(), &I18nStore::new());
        let body = serde_json::to_value(&api).unwrap();
        assert_eq!(body["success"], json!(false));
        assert_eq!(
            body["message"],
            json!("El código de barras '779000000001' ya existe en esta tienda.")
        );
        assert!(body.get("status").is_none());
    }

    #[test]
    fn status_transition_error_names_states() {
        let err = AppError::InvalidStatusTransition {
            from: QuoteStatus::Draft,
            to: QuoteStatus::Converted,
        };
        let api = err.to_api_error(&es(), &I18nStore::new());
        assert_eq!(api.message, "No se puede cambiar el estado de DRAFT a CONVERTED.");
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
