// src/handlers/quotes.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::ok_message,
    middleware::i18n::Locale,
    models::{
        admin::Ack,
        context::RequestContext,
        quote::{
            ConvertQuoteQuery, CreateQuotePayload, DuplicateQuotePayload, QuoteConverted, QuoteDetail,
            QuoteSaved, QuoteSummary, UpdateQuoteStatusPayload,
        },
    },
};

// POST /api/quotes
#[utoipa::path(
    post,
    path = "/api/quotes",
    tag = "Quotes",
    request_body = CreateQuotePayload,
    responses(
        (status = 201, description = "Orçamento criado em DRAFT", body = QuoteSaved),
        (status = 400, description = "Cliente vazio ou sem linhas"),
        (status = 404, description = "Produto não pertence à loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    Json(payload): Json<CreateQuotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.items.is_empty() {
        return Err(AppError::EmptyCart.to_api_error(&locale, &app_state.i18n_store));
    }
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let quote = app_state
        .quote_service
        .create_quote(&ctx, &payload.client_name, &payload.items)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let body = QuoteSaved {
        success: true,
        message: ok_message(&app_state, &locale, "ok.quote_created", &[]),
        quote,
    };
    Ok((StatusCode::CREATED, Json(body)))
}

// GET /api/quotes
#[utoipa::path(
    get,
    path = "/api/quotes",
    tag = "Quotes",
    responses(
        (status = 200, description = "Orçamentos da loja (mais recentes primeiro)", body = Vec<QuoteSummary>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_quotes(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
) -> Result<impl IntoResponse, ApiError> {
    let quotes = app_state
        .quote_service
        .list_quotes(&ctx)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(quotes)))
}

// GET /api/quotes/{id}
#[utoipa::path(
    get,
    path = "/api/quotes/{id}",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "Orçamento com linhas", body = QuoteDetail),
        (status = 404, description = "Orçamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = app_state
        .quote_service
        .get_quote(&ctx, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(quote)))
}

// POST /api/quotes/{id}/duplicate
#[utoipa::path(
    post,
    path = "/api/quotes/{id}/duplicate",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "Orçamento de origem")),
    request_body = DuplicateQuotePayload,
    responses(
        (status = 201, description = "Cópia independente em DRAFT", body = QuoteSaved),
        (status = 400, description = "Nome do cliente vazio"),
        (status = 404, description = "Orçamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn duplicate_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<DuplicateQuotePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let quote = app_state
        .quote_service
        .duplicate_quote(&ctx, id, &payload.client_name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let body = QuoteSaved {
        success: true,
        message: ok_message(&app_state, &locale, "ok.quote_duplicated", &[]),
        quote,
    };
    Ok((StatusCode::CREATED, Json(body)))
}

// PUT /api/quotes/{id}/status
#[utoipa::path(
    put,
    path = "/api/quotes/{id}/status",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    request_body = UpdateQuoteStatusPayload,
    responses(
        (status = 200, description = "Status alterado (DRAFT <-> APPROVED)", body = Ack),
        (status = 409, description = "Orçamento já convertido"),
        (status = 422, description = "Transição não permitida")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_quote_status(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateQuoteStatusPayload>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .quote_service
        .update_status(&ctx, id, payload.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let body = Ack::ok(ok_message(&app_state, &locale, "ok.status_updated", &[]));
    Ok((StatusCode::OK, Json(body)))
}

// POST /api/quotes/{id}/convert?paymentMethod=
#[utoipa::path(
    post,
    path = "/api/quotes/{id}/convert",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID do orçamento"), ConvertQuoteQuery),
    responses(
        (status = 201, description = "Venda criada a partir do orçamento", body = QuoteConverted),
        (status = 409, description = "Já convertido, não aprovado ou estoque insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn convert_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
    Query(query): Query<ConvertQuoteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let sale = app_state
        .quote_service
        .convert_to_sale(&ctx, id, query.payment_method.unwrap_or_default())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let body = QuoteConverted {
        success: true,
        message: ok_message(&app_state, &locale, "ok.quote_converted", &[]),
        sale_id: sale.id,
    };
    Ok((StatusCode::CREATED, Json(body)))
}

// DELETE /api/quotes/{id}
#[utoipa::path(
    delete,
    path = "/api/quotes/{id}",
    tag = "Quotes",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "Orçamento excluído", body = Ack),
        (status = 409, description = "Orçamento convertido não pode ser excluído")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_quote(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .quote_service
        .delete_quote(&ctx, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let body = Ack::ok(ok_message(&app_state, &locale, "ok.quote_deleted", &[]));
    Ok((StatusCode::OK, Json(body)))
}
