// src/handlers/stores.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::ok_message,
    middleware::{auth::CurrentUser, i18n::Locale},
    models::store::{CreateStorePayload, Store},
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreCreated {
    pub success: bool,
    pub message: String,
    pub store: Store,
}

// POST /api/stores (onboarding: primeira loja do usuário)
#[utoipa::path(
    post,
    path = "/api/stores",
    tag = "Stores",
    request_body = CreateStorePayload,
    responses(
        (status = 201, description = "Loja criada; o usuário vira OWNER", body = StoreCreated),
        (status = 400, description = "Nome inválido"),
        (status = 403, description = "Conta não aprovada"),
        (status = 409, description = "Usuário já possui loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_store(
    State(app_state): State<AppState>,
    locale: Locale,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<CreateStorePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let store = app_state
        .store_service
        .create_first_store(&user, &payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let body = StoreCreated {
        success: true,
        message: ok_message(&app_state, &locale, "ok.store_created", &[]),
        store,
    };
    Ok((StatusCode::CREATED, Json(body)))
}
