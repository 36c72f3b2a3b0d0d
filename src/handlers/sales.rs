// src/handlers/sales.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::ok_message,
    middleware::i18n::Locale,
    models::{
        context::RequestContext,
        sales::{ProcessSalePayload, SaleCreated, SalesHistory},
    },
};

// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Sales",
    request_body = ProcessSalePayload,
    responses(
        (status = 201, description = "Venda registrada; estoque baixado", body = SaleCreated),
        (status = 400, description = "Carrinho vazio ou linha inválida"),
        (status = 404, description = "Produto não pertence à loja"),
        (status = 409, description = "Estoque insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn process_sale(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    Json(payload): Json<ProcessSalePayload>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.items.is_empty() {
        return Err(AppError::EmptyCart.to_api_error(&locale, &app_state.i18n_store));
    }
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let sale = app_state
        .sales_service
        .process_sale(&ctx, &payload.items, payload.payment_method.unwrap_or_default())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let body = SaleCreated {
        success: true,
        message: ok_message(&app_state, &locale, "ok.sale_registered", &[]),
        sale_id: sale.id,
        total: sale.total,
    };
    Ok((StatusCode::CREATED, Json(body)))
}

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    responses(
        (status = 200, description = "Histórico (mais recentes primeiro) e resumo", body = SalesHistory)
    ),
    security(("api_jwt" = []))
)]
pub async fn sales_history(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
) -> Result<impl IntoResponse, ApiError> {
    let history = app_state
        .sales_service
        .sales_history(&ctx)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(history.as_ref().clone())))
}
