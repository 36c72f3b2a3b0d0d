// src/handlers/admin.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    handlers::ok_message,
    middleware::{context::IMPERSONATION_COOKIE, i18n::Locale, rbac::RequireSuperAdmin},
    models::{
        admin::{
            Ack, PermissionsUpdated, StartImpersonationPayload, UpdatePermissionsPayload, UpdateRolePayload,
            UserListQuery, UserUpdated,
        },
        auth::{User, UserStatus},
        store::Store,
    },
};

// ---
// Usuários
// ---

// GET /api/admin/users?status=
#[utoipa::path(
    get,
    path = "/api/admin/users",
    tag = "Admin",
    params(UserListQuery),
    responses(
        (status = 200, description = "Usuários (mais recentes primeiro)", body = Vec<User>),
        (status = 403, description = "Apenas super-admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let users = app_state
        .admin_service
        .list_users(query.status)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(users)))
}

async fn change_status(
    app_state: &AppState,
    locale: &Locale,
    admin: &User,
    user_id: &str,
    status: UserStatus,
    message_key: &str,
) -> Result<Json<UserUpdated>, ApiError> {
    let user = app_state
        .admin_service
        .set_user_status(admin, user_id, status)
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))?;

    Ok(Json(UserUpdated {
        success: true,
        message: ok_message(app_state, locale, message_key, &[]),
        user,
    }))
}

// POST /api/admin/users/{id}/approve
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/approve",
    tag = "Admin",
    params(("id" = String, Path, description = "ID externo do usuário")),
    responses(
        (status = 200, description = "Usuário aprovado", body = UserUpdated),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_user(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(user_id): Path<String>,
) -> Result<Json<UserUpdated>, ApiError> {
    change_status(&app_state, &locale, &admin, &user_id, UserStatus::Approved, "ok.user_approved").await
}

// POST /api/admin/users/{id}/reject
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/reject",
    tag = "Admin",
    params(("id" = String, Path, description = "ID externo do usuário")),
    responses(
        (status = 200, description = "Usuário rejeitado", body = UserUpdated),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_user(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(user_id): Path<String>,
) -> Result<Json<UserUpdated>, ApiError> {
    change_status(&app_state, &locale, &admin, &user_id, UserStatus::Rejected, "ok.user_rejected").await
}

// POST /api/admin/users/{id}/suspend
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/suspend",
    tag = "Admin",
    params(("id" = String, Path, description = "ID externo do usuário")),
    responses(
        (status = 200, description = "Usuário suspenso", body = UserUpdated),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn suspend_user(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(user_id): Path<String>,
) -> Result<Json<UserUpdated>, ApiError> {
    change_status(&app_state, &locale, &admin, &user_id, UserStatus::Suspended, "ok.user_suspended").await
}

// PUT /api/admin/users/{id}/role
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/role",
    tag = "Admin",
    params(("id" = String, Path, description = "ID externo do usuário")),
    request_body = UpdateRolePayload,
    responses(
        (status = 200, description = "Papel global alterado", body = UserUpdated),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_role(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateRolePayload>,
) -> Result<Json<UserUpdated>, ApiError> {
    let user = app_state
        .admin_service
        .set_super_admin(&admin, &user_id, payload.is_super_admin)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(UserUpdated {
        success: true,
        message: ok_message(&app_state, &locale, "ok.role_updated", &[]),
        user,
    }))
}

// PUT /api/admin/users/{id}/permissions
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/permissions",
    tag = "Admin",
    params(("id" = String, Path, description = "ID externo do usuário")),
    request_body = UpdatePermissionsPayload,
    responses(
        (status = 200, description = "Módulos do vínculo atualizados", body = PermissionsUpdated),
        (status = 403, description = "Usuário sem loja")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_permissions(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdatePermissionsPayload>,
) -> Result<Json<PermissionsUpdated>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let membership = app_state
        .admin_service
        .update_user_permissions(&admin, &user_id, &payload.modules)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(PermissionsUpdated {
        success: true,
        message: ok_message(&app_state, &locale, "ok.permissions_updated", &[]),
        membership,
    }))
}

// DELETE /api/admin/users/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/users/{id}",
    tag = "Admin",
    params(("id" = String, Path, description = "ID externo do usuário")),
    responses(
        (status = 200, description = "Usuário excluído", body = Ack),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    Path(user_id): Path<String>,
) -> Result<Json<Ack>, ApiError> {
    app_state
        .admin_service
        .delete_user(&admin, &user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(Ack::ok(ok_message(&app_state, &locale, "ok.user_deleted", &[]))))
}

// ---
// Lojas e impersonação
// ---

// GET /api/admin/stores
#[utoipa::path(
    get,
    path = "/api/admin/stores",
    tag = "Admin",
    responses(
        (status = 200, description = "Todas as lojas", body = Vec<Store>),
        (status = 403, description = "Apenas super-admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_stores(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireSuperAdmin(_admin): RequireSuperAdmin,
) -> Result<impl IntoResponse, ApiError> {
    let stores = app_state
        .admin_service
        .list_stores()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(stores)))
}

// POST /api/admin/impersonation
#[utoipa::path(
    post,
    path = "/api/admin/impersonation",
    tag = "Admin",
    request_body = StartImpersonationPayload,
    responses(
        (status = 200, description = "Cookie de impersonação gravado", body = Ack),
        (status = 404, description = "Loja não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn start_impersonation(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    jar: CookieJar,
    Json(payload): Json<StartImpersonationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let store = app_state
        .store_service
        .find_store(payload.store_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let cookie = Cookie::build((IMPERSONATION_COOKIE, store.id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(app_state.config.secure_cookies);

    tracing::info!(admin_id = %admin.id, store_id = %store.id, "Impersonação iniciada");

    let body = Ack::ok(ok_message(
        &app_state,
        &locale,
        "ok.impersonation_started",
        &[("store", store.name.clone())],
    ));
    Ok((jar.add(cookie), Json(body)))
}

// DELETE /api/admin/impersonation
#[utoipa::path(
    delete,
    path = "/api/admin/impersonation",
    tag = "Admin",
    responses(
        (status = 200, description = "Cookie de impersonação removido", body = Ack)
    ),
    security(("api_jwt" = []))
)]
pub async fn stop_impersonation(
    State(app_state): State<AppState>,
    locale: Locale,
    RequireSuperAdmin(admin): RequireSuperAdmin,
    jar: CookieJar,
) -> impl IntoResponse {
    tracing::info!(admin_id = %admin.id, "Impersonação encerrada");

    let body = Ack::ok(ok_message(&app_state, &locale, "ok.impersonation_stopped", &[]));
    (jar.remove(Cookie::build(IMPERSONATION_COOKIE).path("/")), Json(body))
}
