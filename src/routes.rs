// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    config::AppState,
    docs::ApiDoc,
    handlers,
    middleware::{auth::auth_guard, context::store_guard},
};

/// Monta o router completo da API.
pub fn build_router(app_state: AppState) -> Router {
    // --- Públicas ---
    let public_routes = Router::new().route("/api/health", get(handlers::health::health));

    // --- Só autenticação (onboarding, perfil, administração) ---
    let account_routes = Router::new()
        .route("/api/me", get(handlers::users::get_me))
        .route("/api/stores", post(handlers::stores::create_store))
        .route("/api/admin/users", get(handlers::admin::list_users))
        .route("/api/admin/users/{id}", delete(handlers::admin::delete_user))
        .route("/api/admin/users/{id}/approve", post(handlers::admin::approve_user))
        .route("/api/admin/users/{id}/reject", post(handlers::admin::reject_user))
        .route("/api/admin/users/{id}/suspend", post(handlers::admin::suspend_user))
        .route("/api/admin/users/{id}/role", put(handlers::admin::update_role))
        .route("/api/admin/users/{id}/permissions", put(handlers::admin::update_permissions))
        .route("/api/admin/stores", get(handlers::admin::list_stores))
        .route(
            "/api/admin/impersonation",
            post(handlers::admin::start_impersonation).delete(handlers::admin::stop_impersonation),
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // --- Autenticação + loja ativa ---
    let store_routes = Router::new()
        .route("/api/me/modules", get(handlers::users::get_my_modules))
        .route(
            "/api/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .route(
            "/api/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/api/products/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route("/api/products/barcode/{code}", get(handlers::products::find_by_barcode))
        .route(
            "/api/sales",
            get(handlers::sales::sales_history).post(handlers::sales::process_sale),
        )
        .route("/api/sales/{id}/pdf", get(handlers::documents::sale_pdf))
        .route(
            "/api/quotes",
            get(handlers::quotes::list_quotes).post(handlers::quotes::create_quote),
        )
        .route(
            "/api/quotes/{id}",
            get(handlers::quotes::get_quote).delete(handlers::quotes::delete_quote),
        )
        .route("/api/quotes/{id}/duplicate", post(handlers::quotes::duplicate_quote))
        .route("/api/quotes/{id}/status", put(handlers::quotes::update_quote_status))
        .route("/api/quotes/{id}/convert", post(handlers::quotes::convert_quote))
        .route("/api/quotes/{id}/pdf", get(handlers::documents::quote_pdf))
        // A última camada roda primeiro: auth_guard antes do store_guard
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), store_guard))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    Router::new()
        .merge(public_routes)
        .merge(account_routes)
        .merge(store_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(app_state)
}
