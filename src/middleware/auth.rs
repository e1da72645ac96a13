use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    routes::AppState,
};

/// Claims issued by the identity provider; `sub` is the stable user id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Authenticated caller, resolved once per request by [`require_auth`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: String,
}

/// Verifies bearer tokens signed with the identity provider's shared secret
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> AppResult<CurrentUser> {
        let data = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| AppError::Unauthenticated(format!("Invalid token: {}", e)))?;

        if data.claims.sub.trim().is_empty() {
            return Err(AppError::Unauthenticated(
                "Token carries no subject".to_string(),
            ));
        }

        Ok(CurrentUser {
            user_id: data.claims.sub,
        })
    }
}

/// Extract and validate the bearer JWT, storing the caller as [`CurrentUser`]
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthenticated("Missing bearer token".to_string()))?;

    let user = state.jwt.verify(token)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
