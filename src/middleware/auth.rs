use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};

use crate::app::AppState;
use crate::auth::{AuthError, Claims};
use crate::error::ApiError;

/// Authenticated caller extracted from a verified bearer token.
///
/// Handlers that take an `AuthUser` argument reject the request with 401
/// before any later extractor (and so before the body is read).
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub subject: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;
        let claims = state.auth.verify(token).map_err(|e| {
            tracing::warn!("Rejected bearer token for {} {}: {}", parts.method, parts.uri.path(), e);
            e
        })?;
        Ok(AuthUser::from(claims))
    }
}

/// Extract the token from `Authorization: Bearer <token>`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::TokenMissing)?;

    let auth_str = auth_header.to_str().map_err(|_| AuthError::TokenInvalid)?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err(AuthError::TokenMissing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(v) = value {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(v).unwrap());
        }
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(extract_bearer_token(&headers(Some("Bearer abc.def.ghi"))), Ok("abc.def.ghi"));
    }

    #[test]
    fn missing_header_is_token_missing() {
        assert_eq!(extract_bearer_token(&headers(None)), Err(AuthError::TokenMissing));
    }

    #[test]
    fn other_schemes_are_token_missing() {
        assert_eq!(
            extract_bearer_token(&headers(Some("Basic dXNlcjpwYXNz"))),
            Err(AuthError::TokenMissing)
        );
        assert_eq!(extract_bearer_token(&headers(Some("bearer abc"))), Err(AuthError::TokenMissing));
        assert_eq!(extract_bearer_token(&headers(Some("Bearer "))), Err(AuthError::TokenMissing));
    }

    #[test]
    fn unreadable_header_is_token_invalid() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap(),
        );
        assert_eq!(extract_bearer_token(&headers), Err(AuthError::TokenInvalid));
    }
}
