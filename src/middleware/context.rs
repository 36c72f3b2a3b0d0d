// src/middleware/context.rs

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::CurrentUser, i18n::Locale},
    models::context::RequestContext,
};

pub const IMPERSONATION_COOKIE: &str = "impersonated_store_id";

/// Loja pedida pelo cookie de impersonação (valor inválido = sem cookie).
pub fn impersonated_store(jar: &CookieJar) -> Option<Uuid> {
    jar.get(IMPERSONATION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

// Roda depois do auth_guard: exige conta aprovada e monta o RequestContext
pub async fn store_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    CurrentUser(user): CurrentUser,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !user.can_operate() {
        return Err(AppError::AccountNotApproved.to_api_error(&locale, &app_state.i18n_store));
    }

    let ctx = app_state
        .store_service
        .resolve_context(user, impersonated_store(&jar))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .ok_or(AppError::NoStoreAssigned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    #[test]
    fn reads_impersonation_cookie() {
        let store = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {IMPERSONATION_COOKIE}={store}")).unwrap(),
        );
        assert_eq!(impersonated_store(&CookieJar::from_headers(&headers)), Some(store));
    }

    #[test]
    fn garbage_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("impersonated_store_id=not-a-uuid"),
        );
        assert_eq!(impersonated_store(&CookieJar::from_headers(&headers)), None);
        assert_eq!(impersonated_store(&CookieJar::new()), None);
    }
}
