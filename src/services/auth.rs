// src/services/auth.rs

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{Identity, IdentityClaims, User},
};

/// Valida os tokens emitidos pelo provedor de identidade (HS256).
#[derive(Clone)]
pub struct IdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl IdentityVerifier {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Identity, AppError> {
        let token_data = decode::<IdentityClaims>(token, &self.key, &self.validation)?;
        let identity = Identity::from(token_data.claims);
        if identity.external_id.trim().is_empty() {
            return Err(AppError::InvalidToken);
        }
        Ok(identity)
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    verifier: IdentityVerifier,
    pool: PgPool,
}

impl AuthService {
    pub fn new(user_repo: UserRepository, verifier: IdentityVerifier, pool: PgPool) -> Self {
        Self { user_repo, verifier, pool }
    }

    /// Token -> usuário local. O primeiro login cria o usuário como PENDING.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let identity = self.verifier.verify(token)?;
        self.sync_user(&identity).await
    }

    pub async fn sync_user(&self, identity: &Identity) -> Result<User, AppError> {
        let user = self.user_repo.upsert_from_identity(&self.pool, identity).await?;
        tracing::debug!(user_id = %user.id, status = ?user.status, "Usuário sincronizado");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "segredo-de-teste";

    fn token(claims: serde_json::Value, secret: &str) -> String {
        encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn future_exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn accepts_valid_token() {
        let verifier = IdentityVerifier::new(SECRET, None);
        let jwt = token(
            json!({ "sub": "user_2abc", "email": "ana@libreria.com", "name": "Ana", "exp": future_exp() }),
            SECRET,
        );
        let identity = verifier.verify(&jwt).unwrap();
        assert_eq!(identity.external_id, "user_2abc");
        assert_eq!(identity.email, "ana@libreria.com");
        assert_eq!(identity.name.as_deref(), Some("Ana"));
    }

    #[test]
    fn rejects_wrong_secret_and_expired_tokens() {
        let verifier = IdentityVerifier::new(SECRET, None);

        let forged = token(json!({ "sub": "u1", "exp": future_exp() }), "outro-segredo");
        assert!(matches!(verifier.verify(&forged), Err(AppError::JwtError(_))));

        let expired = token(json!({ "sub": "u1", "exp": 1_000_000 }), SECRET);
        assert!(matches!(verifier.verify(&expired), Err(AppError::JwtError(_))));

        assert!(verifier.verify("nao-e-um-jwt").is_err());
    }

    #[test]
    fn checks_issuer_when_configured() {
        let verifier = IdentityVerifier::new(SECRET, Some("https://id.example.com"));

        let good = token(json!({ "sub": "u1", "iss": "https://id.example.com", "exp": future_exp() }), SECRET);
        assert!(verifier.verify(&good).is_ok());

        let bad = token(json!({ "sub": "u1", "iss": "https://evil.example.com", "exp": future_exp() }), SECRET);
        assert!(verifier.verify(&bad).is_err());
    }
}
