//! Session-cookie guard for mutating routes.
//!
//! The `token` cookie holds an HS256 JWT with `sub` and `exp` claims. Verified
//! claims are attached to the request as a [`SessionClaims`] extension.
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, Method};
use axum::middleware::Next;
use axum::response::Response;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use super::state::AppState;
use crate::ApiError;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: usize,
}

pub struct SessionVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SessionVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, ApiError> {
        decode::<SessionClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| ApiError::unauthorized(format!("invalid session token: {e}")))
    }
}

/// Rejects mutating requests without a valid session cookie when a session
/// secret is configured. Reads pass through.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(verifier) = state.session.as_ref() else {
        return Ok(next.run(req).await);
    };
    if !is_mutating(req.method()) {
        return Ok(next.run(req).await);
    }

    let token = session_token(req.headers())
        .ok_or_else(|| ApiError::unauthorized("missing session cookie"))?;
    let claims = verifier.verify(&token)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PATCH | Method::PUT | Method::DELETE
    )
}

fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[test]
    fn test_session_token_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark; token=abc.def"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc.def"));

        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("tokenish=1"));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn test_verify() {
        let claims = SessionClaims {
            sub: "u1".to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert_eq!(SessionVerifier::new("secret").verify(&token).unwrap(), claims);
        assert!(SessionVerifier::new("other").verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let claims = SessionClaims {
            sub: "u1".to_string(),
            exp: (chrono::Utc::now().timestamp() - 3600) as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(SessionVerifier::new("secret").verify(&token).is_err());
    }
}
