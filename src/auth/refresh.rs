// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Refresh-token rotation.
//!
//! Each session carries a generation counter; a refresh token is valid
//! only while its embedded generation equals the session's current one.
//! Presenting an old generation is evidence the token was stolen or
//! duplicated, and the whole lineage is revoked: the session is deleted
//! and the holder must log in again. The counter, not token expiry, is
//! what detects theft — a stolen token races the legitimate client, one
//! of them wins the rotation, and the loser's next use trips the reuse
//! check.
//!
//! The generation advance is a storage-level compare-and-swap, never a
//! read-modify-write in process memory: of two concurrent refreshes at
//! the same generation, exactly one rotates and the other is told the
//! token was reused while the session survives at the new generation.

use chrono::{Duration, Utc};
use tracing::{debug, warn};

use crate::models::UserAuthTokens;
use crate::state::AppState;
use crate::store::CasOutcome;

use super::claims::{AccessTokenClaims, RefreshTokenClaims};
use super::error::AuthError;
use super::identity::check_linked_identity;

/// Exchange a valid refresh token for a new access/refresh pair at the
/// next generation.
///
/// Validation order is fixed: decode, session lookup, reuse check,
/// absolute expiry check, conditional increment. The linked-identity
/// freshness check runs strictly after all of these so a slow provider
/// can never stall or bypass a revocation decision.
pub async fn refresh(state: &AppState, token: &str) -> Result<UserAuthTokens, AuthError> {
    // Decode failures never touch the store.
    let payload = state
        .tokens
        .decode_refresh(token)
        .map_err(|_| AuthError::InvalidToken)?;

    let session = state
        .store
        .get_session(payload.session_id)
        .await
        .ok_or(AuthError::InvalidToken)?;

    // Reuse of an old generation taints the lineage; purge it completely.
    if payload.generation != session.generation {
        warn!(session_id = %session.id, "Refresh token was reused; revoking session");
        if !state.store.delete_session(session.id).await {
            warn!(session_id = %session.id, "Session was already deleted");
        }
        return Err(AuthError::TokenReused);
    }

    // Absolute expiry is checked before the rotation write so an expired
    // session is never extended.
    let max_age = Duration::days(state.settings.session_max_age_days);
    if Utc::now() - session.created_at > max_age {
        debug!(session_id = %session.id, "Session passed its absolute age limit");
        state.store.delete_session(session.id).await;
        return Err(AuthError::SessionExpired);
    }

    let session = match state
        .store
        .advance_generation(session.id, payload.generation)
        .await
    {
        CasOutcome::Updated(session) => session,
        CasOutcome::Conflict => {
            // Lost a race against a concurrent rotation of the same token.
            // The winner holds the live lineage; this caller is told the
            // token was reused and the session stays alive at g+1.
            warn!(session_id = %session.id, "Concurrent refresh lost the generation race");
            return Err(AuthError::TokenReused);
        }
        CasOutcome::Missing => return Err(AuthError::InvalidToken),
    };

    let Some(record) = state.store.get_address(session.address_id).await else {
        // Orphaned session; nothing to mint a payload from.
        state.store.delete_session(session.id).await;
        return Err(AuthError::InvalidToken);
    };

    let linked = match record.linked {
        Some(_) => check_linked_identity(&state.store, state.identity.as_ref(), &record).await,
        None => None,
    };

    debug!(session_id = %session.id, generation = session.generation, "Rotated refresh token");

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
