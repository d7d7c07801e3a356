use crate::auth::{decode_token, TokenError};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use kontor_common::models::auth::Role;
use kontor_db::AccountRepo;
use std::sync::Arc;

/// The resolved requester, produced once per request by the extractor
/// below and passed to handlers as a parameter. Handlers must take the
/// requester id from here, never from a request body.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    pub account_id: i64,
    pub role: Role,
}

impl Identity {
    /// Strict equality; there is no role hierarchy.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::MissingToken)?;
    header.strip_prefix("Bearer ").ok_or(ApiError::MissingToken)
}

impl FromRequestParts<Arc<AppState>> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;

        let claims = decode_token(token, &state.config.auth.jwt_secret).map_err(|e| match e {
            TokenError::Expired => ApiError::TokenExpired,
            TokenError::Invalid => ApiError::InvalidToken,
        })?;

        let account_id: i64 = claims.sub.parse().map_err(|_| ApiError::InvalidToken)?;

        // Re-resolve the account on every request: a token for a deleted
        // account is dead, and the role comes from the row, not the claim.
        let account = AccountRepo::get_by_id(&state.pool, account_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(ApiError::InvalidToken)?;

        let role: Role = account
            .role
            .parse()
            .map_err(|e: String| ApiError::Internal(anyhow::anyhow!(e)))?;

        Ok(Identity {
            account_id: account.account_id,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/clients");
        if let Some(v) = value {
            builder = builder.header(header::AUTHORIZATION, v);
        }
        let (parts, _) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extracts() {
        let parts = parts_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_is_missing_token() {
        let parts = parts_with_auth(None);
        assert!(matches!(
            bearer_token(&parts),
            Err(ApiError::MissingToken)
        ));
    }

    #[test]
    fn test_wrong_scheme_is_missing_token() {
        for bad in ["Basic dXNlcjpwdw==", "bearer abc", "Token abc"] {
            let parts = parts_with_auth(Some(bad));
            assert!(
                matches!(bearer_token(&parts), Err(ApiError::MissingToken)),
                "scheme {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_require_admin() {
        let admin = Identity {
            account_id: 1,
            role: Role::Admin,
        };
        let user = Identity {
            account_id: 2,
            role: Role::User,
        };
        assert!(admin.require_admin().is_ok());
        assert!(matches!(user.require_admin(), Err(ApiError::Forbidden)));
    }
}
