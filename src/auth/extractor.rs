// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for authenticated wallets.
//!
//! Use the `Auth` extractor in handlers to require a valid access token:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(claims): Auth) -> impl IntoResponse {
//!     // claims is AccessTokenClaims
//! }
//! ```
//!
//! Beyond verifying the token itself, the extractor confirms the session
//! it references still exists. A revoked session invalidates every access
//! token minted under it, even ones that have not yet expired.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::warn;

use super::codec::TokenError;
use super::{AccessTokenClaims, AuthError};
use crate::state::AppState;

/// Extractor for authenticated wallets.
///
/// Validates the Bearer token from the Authorization header, checks the
/// backing session is still alive, and refreshes display metadata from
/// the address record so handlers see current values.
pub struct Auth(pub AccessTokenClaims);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // First check if an earlier layer already validated the claims.
        if let Some(claims) = parts.extensions.get::<AccessTokenClaims>().cloned() {
            return Ok(Auth(claims));
        }

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthHeader)?
            .to_str()
            .map_err(|_| AuthError::InvalidAuthHeader)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidAuthHeader)?;

        let mut claims = state.tokens.decode_access(token).map_err(|e| match e {
            TokenError::Expired => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })?;

        // A token outliving its session is useless; revocation wins.
        if state.store.get_session(claims.session_id).await.is_none() {
            return Err(AuthError::SessionRevoked);
        }

        let Some(record) = state.store.get_address(claims.address_id).await else {
            warn!(session_id = %claims.session_id, "Session references a missing address; revoking");
            state.store.delete_session(claims.session_id).await;
            return Err(AuthError::SessionRevoked);
        };

        // Display metadata can change between mint and use.
        claims.display_name = record.display_name;
        claims.avatar_url = record.avatar_url;

        Ok(Auth(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::issuance::{self, test_support::signed_login_request};
    use alloy::signers::local::PrivateKeySigner;
    use axum::http::Request;

    fn request_parts(auth_header: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/test");
        if let Some(value) = auth_header {
            builder = builder.header("Authorization", value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    async fn logged_in_state() -> (AppState, String) {
        let state = AppState::test_state();
        let signer = PrivateKeySigner::random();
        let tokens = issuance::login(&state, signed_login_request(&state, &signer))
            .await
            .unwrap();
        (state, tokens.access_token)
    }

    #[tokio::test]
    async fn extractor_requires_auth_header() {
        let state = AppState::test_state();
        let mut parts = request_parts(None);

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::MissingAuthHeader)));
    }

    #[tokio::test]
    async fn extractor_rejects_non_bearer_scheme() {
        let state = AppState::test_state();
        let mut parts = request_parts(Some("Basic dXNlcjpwYXNz"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidAuthHeader)));
    }

    #[tokio::test]
    async fn extractor_accepts_a_fresh_access_token() {
        let (state, access) = logged_in_state().await;
        let mut parts = request_parts(Some(&format!("Bearer {access}")));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        let Auth(claims) = result.unwrap();
        assert!(state.store.get_session(claims.session_id).await.is_some());
        assert_eq!(claims.address.as_str(), claims.address.as_str().to_lowercase());
    }

    #[tokio::test]
    async fn extractor_rejects_garbage_tokens() {
        let state = AppState::test_state();
        let mut parts = request_parts(Some("Bearer not.a.jwt"));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn extractor_rejects_refresh_tokens() {
        let state = AppState::test_state();
        let signer = PrivateKeySigner::random();
        let tokens = issuance::login(&state, signed_login_request(&state, &signer))
            .await
            .unwrap();
        let mut parts = request_parts(Some(&format!("Bearer {}", tokens.refresh_token)));

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn revoked_session_invalidates_live_access_tokens() {
        let (state, access) = logged_in_state().await;
        let claims = state.tokens.decode_access(&access).unwrap();
        state.store.delete_session(claims.session_id).await;

        let mut parts = request_parts(Some(&format!("Bearer {access}")));
        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::SessionRevoked)));
    }

    #[tokio::test]
    async fn extractor_prefers_extensions() {
        let (state, access) = logged_in_state().await;
        let claims = state.tokens.decode_access(&access).unwrap();

        let mut parts = request_parts(None);
        parts.extensions.insert(claims.clone());

        let result = Auth::from_request_parts(&mut parts, &state).await;
        assert_eq!(result.unwrap().0.session_id, claims.session_id);
    }

    #[tokio::test]
    async fn extractor_reflects_updated_display_metadata() {
        let (state, access) = logged_in_state().await;
        let claims = state.tokens.decode_access(&access).unwrap();
        state
            .store
            .set_display_metadata(
                claims.address_id,
                Some("vitalik".into()),
                Some("https://example.org/a.png".into()),
            )
            .await;

        let mut parts = request_parts(Some(&format!("Bearer {access}")));
        let Auth(fresh) = Auth::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(fresh.display_name.as_deref(), Some("vitalik"));
        assert_eq!(fresh.avatar_url.as_deref(), Some("https://example.org/a.png"));
    }
}
