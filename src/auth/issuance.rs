// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! First-time login: signature check, address upsert, session creation,
//! initial token pair at generation 0.

use tracing::{debug, info};

use crate::models::{LoginRequest, UserAuthTokens, WalletAddress};
use crate::state::AppState;

use super::claims::{AccessTokenClaims, RefreshTokenClaims};
use super::error::AuthError;
use super::identity::check_linked_identity;

/// Method name bound into the canonical signed login message.
pub const LOGIN_METHOD: &str = "auth";

/// Authenticate a wallet by signature and mint the initial token pair.
///
/// Side effects: one address upsert, zero-or-one identity unlink, one
/// session creation. A linked-identity freshness failure never blocks
/// login; the identity is simply dropped from the payload.
pub async fn login(state: &AppState, request: LoginRequest) -> Result<UserAuthTokens, AuthError> {
    let parsed: alloy::primitives::Address = request
        .address
        .parse()
        .map_err(|_| AuthError::InvalidAddress)?;

    // The client signs over the address string exactly as submitted.
    if !state.verifier.verify(
        &request.address,
        LOGIN_METHOD,
        &request.signature_data,
        &request.address,
    ) {
        info!(address = %request.address, "Login signature is invalid");
        return Err(AuthError::InvalidSignature);
    }

    let wallet = WalletAddress::from(parsed);
    let record = state.store.upsert_address(&wallet).await;

    let linked = match record.linked {
        Some(_) => check_linked_identity(&state.store, state.identity.as_ref(), &record).await,
        None => None,
    };

    let session = state.store.create_session(record.id).await;
    debug!(session_id = %session.id, address = %wallet, "Created login session");

    let access = AccessTokenClaims::new(
        &session,
        &record,
        linked,
        state.settings.access_token_ttl_seconds,
    );
    let refresh = RefreshTokenClaims::new(session.id, session.generation);

    Ok(UserAuthTokens {
        access_token: state
            .tokens
            .mint_access(&access)
            .map_err(|_| AuthError::InternalError)?,
        refresh_token: state
            .tokens
            .mint_refresh(&refresh)
            .map_err(|_| AuthError::InternalError)?,
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::LOGIN_METHOD;
    use crate::models::{LoginRequest, SignatureData};
    use crate::state::AppState;
    use alloy::signers::{local::PrivateKeySigner, SignerSync};
    use chrono::Utc;

    /// Build a correctly signed login request for `signer`.
    pub fn signed_login_request(state: &AppState, signer: &PrivateKeySigner) -> LoginRequest {
        let address = format!("{:#x}", signer.address());
        let created_at = Utc::now().timestamp_millis();
        let message = state
            .verifier
            .canonical_message(LOGIN_METHOD, created_at, &address)
            .unwrap();
        let signature = signer.sign_message_sync(message.as_bytes()).unwrap();
        LoginRequest {
            address,
            signature_data: SignatureData {
                signature: alloy::hex::encode(signature.as_bytes()),
                created_at,
                message: None,
            },
        }
    }
}
