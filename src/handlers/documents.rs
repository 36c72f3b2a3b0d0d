// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::context::RequestContext,
    services::document_service::PrintableDocument,
};

// GET /api/quotes/{id}/pdf
#[utoipa::path(
    get,
    path = "/api/quotes/{id}/pdf",
    tag = "Documents",
    params(("id" = Uuid, Path, description = "ID do orçamento")),
    responses(
        (status = 200, description = "PDF da cotização"),
        (status = 404, description = "Orçamento não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn quote_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let document = async {
        let quote = app_state.quote_service.get_quote(&ctx, id).await?;
        let settings = app_state.store_service.get_settings(&ctx).await?;
        Ok::<_, AppError>(PrintableDocument::for_quote(&quote, &settings))
    }
    .await
    .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    pdf_response(&app_state, &locale, document).await
}

// GET /api/sales/{id}/pdf
#[utoipa::path(
    get,
    path = "/api/sales/{id}/pdf",
    tag = "Documents",
    params(("id" = Uuid, Path, description = "ID da venda")),
    responses(
        (status = 200, description = "Comprovante de venda em PDF"),
        (status = 404, description = "Venda não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn sale_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    ctx: RequestContext,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let document = async {
        let sale = app_state.sales_service.get_sale(&ctx, id).await?;
        let settings = app_state.store_service.get_settings(&ctx).await?;
        Ok::<_, AppError>(PrintableDocument::for_sale(&sale, &settings))
    }
    .await
    .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    pdf_response(&app_state, &locale, document).await
}

async fn pdf_response(app_state: &AppState, locale: &Locale, document: PrintableDocument) -> Result<Response, ApiError> {
    let file_name = document.file_name();
    let pdf_bytes = app_state
        .document_service
        .render(document)
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))?;

    // Headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{file_name}\"")),
    ];

    Ok((headers, pdf_bytes).into_response())
}
