// src/handlers/users.rs

use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::CurrentUser, context::impersonated_store, i18n::Locale},
    models::{auth::User, context::{Capabilities, RequestContext}},
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: User,
    /// Loja ativa (ausente antes do onboarding ou enquanto a conta não é aprovada)
    pub store_id: Option<Uuid>,
    pub impersonating: bool,
    pub capabilities: Option<Capabilities>,
}

// GET /api/me
#[utoipa::path(
    get,
    path = "/api/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário atual e loja ativa", body = MeResponse),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    locale: Locale,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
) -> Result<Json<MeResponse>, ApiError> {
    if !user.can_operate() {
        return Ok(Json(MeResponse {
            user,
            store_id: None,
            impersonating: false,
            capabilities: None,
        }));
    }

    let ctx = match app_state
        .store_service
        .resolve_context(user.clone(), impersonated_store(&jar))
        .await
    {
        Ok(ctx) => Some(ctx),
        Err(AppError::NoStoreAssigned) => None,
        Err(e) => return Err(e.to_api_error(&locale, &app_state.i18n_store)),
    };

    Ok(Json(match ctx {
        Some(ctx) => MeResponse {
            user: ctx.user,
            store_id: Some(ctx.store_id),
            impersonating: ctx.impersonating,
            capabilities: Some(ctx.capabilities),
        },
        None => MeResponse {
            user,
            store_id: None,
            impersonating: false,
            capabilities: None,
        },
    }))
}

// GET /api/me/modules
#[utoipa::path(
    get,
    path = "/api/me/modules",
    tag = "Users",
    responses(
        (status = 200, description = "Módulos visíveis no painel", body = Capabilities),
        (status = 403, description = "Conta não aprovada ou sem loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_my_modules(ctx: RequestContext) -> Json<Capabilities> {
    Json(ctx.capabilities)
}
