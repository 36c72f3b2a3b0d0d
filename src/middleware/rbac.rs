// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, middleware::auth::CurrentUser, models::auth::User};

/// Guardião das rotas de administração: só super-admins passam.
pub struct RequireSuperAdmin(pub User);

impl<S> FromRequestParts<S> for RequireSuperAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;

        if !user.is_super_admin {
            tracing::warn!(user_id = %user.id, "Acesso negado à área de administração");
            return Err(AppError::Forbidden);
        }
        Ok(RequireSuperAdmin(user))
    }
}
