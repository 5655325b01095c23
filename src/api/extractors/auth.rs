use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use crate::domain::models::actor::UserType;
use crate::error::AppError;
use crate::state::AppState;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::Arc;
use tracing::Span;

/// The externally authenticated actor. Identity verification (OTP, identity
/// checks) happens in the auth collaborator; this service only verifies the
/// bearer token it issued and trusts its claims.
#[derive(Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub user_type: UserType,
}

#[derive(Deserialize)]
struct Claims {
    sub: String,
    user_type: UserType,
    #[allow(dead_code)]
    exp: usize,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        // A malformed verification key is a deployment fault, not a caller one.
        let decoding_key = DecodingKey::from_ed_pem(app_state.config.jwt_public_key.as_bytes())
            .map_err(|_| AppError::Internal)?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[app_state.config.auth_issuer.clone()]);

        let token_data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|_| AppError::Unauthorized)?;

        let user = AuthUser {
            user_id: token_data.claims.sub,
            user_type: token_data.claims.user_type,
        };

        Span::current().record("user_id", user.user_id.as_str());
        Span::current().record("user_type", tracing::field::debug(user.user_type));

        Ok(user)
    }
}
