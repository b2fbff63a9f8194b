use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;

use jsi_types::api::Claims;

use crate::auth::AppState;
use crate::error::ApiError;

/// Resolve the caller's identity from the Authorization header.
///
/// No usable Bearer credential is `MissingToken` (401); a credential that
/// fails signature or expiry checks is `InvalidToken` (403).
pub fn authenticate(headers: &HeaderMap, secret: &str) -> Result<Claims, ApiError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(ApiError::MissingToken)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        debug!("Rejected token: {}", e);
        ApiError::InvalidToken
    })?;

    Ok(token_data.claims)
}

/// Extract and validate JWT from Authorization header.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = authenticate(req.headers(), &state.jwt_secret)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsi_types::models::Role;
    use uuid::Uuid;

    use crate::auth::create_token;

    const SECRET: &str = "test-secret";

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_missing_token() {
        let err = authenticate(&HeaderMap::new(), SECRET).unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
    }

    #[test]
    fn non_bearer_or_empty_is_missing_token() {
        for value in ["Basic abc", "Bearer ", "Bearer    "] {
            let err = authenticate(&headers(value), SECRET).unwrap_err();
            assert!(matches!(err, ApiError::MissingToken), "{}", value);
        }
    }

    #[test]
    fn garbage_token_is_invalid() {
        let err = authenticate(&headers("Bearer not.a.jwt"), SECRET).unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[test]
    fn wrong_secret_is_invalid() {
        let token =
            create_token("other-secret", Uuid::new_v4(), "budi", Role::User, chrono::Duration::hours(1))
                .unwrap();
        let err = authenticate(&headers(&format!("Bearer {}", token)), SECRET).unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[test]
    fn expired_token_is_invalid() {
        let token =
            create_token(SECRET, Uuid::new_v4(), "budi", Role::User, chrono::Duration::hours(-2))
                .unwrap();
        let err = authenticate(&headers(&format!("Bearer {}", token)), SECRET).unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }

    #[test]
    fn valid_token_yields_claims() {
        let id = Uuid::new_v4();
        let token = create_token(SECRET, id, "sari", Role::Staff, chrono::Duration::hours(1)).unwrap();
        let claims = authenticate(&headers(&format!("Bearer {}", token)), SECRET).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.username, "sari");
        assert_eq!(claims.role, Role::Staff);
    }
}
