// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication endpoints.
//!
//! Login exchanges a wallet signature for an access/refresh token pair;
//! refresh rotates that pair forward one generation. All policy lives in
//! the service layer, these handlers only shape HTTP.

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::{issuance, refresh, Auth, AuthError};
use crate::models::{LoginRequest, Membership, RefreshRequest, UserAuthTokens};
use crate::state::AppState;

/// Response for GET /auth/session
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    /// Session backing this access token.
    pub session_id: Uuid,
    /// Identity anchor record.
    pub address_id: Uuid,
    /// Canonical wallet address.
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Linked developer-platform handle, when a fresh link exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linked_handle: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub memberships: Vec<Membership>,
}

/// Log in with a wallet signature.
///
/// The client signs a canonical message binding its address to this
/// deployment and a fresh timestamp. A valid signature opens a new
/// session and returns a token pair at generation 0.
#[utoipa::path(
    post,
    path = "/auth",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair for a new session", body = UserAuthTokens),
        (status = 400, description = "Malformed wallet address"),
        (status = 401, description = "Signature invalid or expired"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserAuthTokens>, AuthError> {
    issuance::login(&state, request).await.map(Json)
}

/// Rotate a refresh token.
///
/// Returns a new token pair at the next generation. Presenting an
/// already-rotated token revokes the whole session.
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "Auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Rotated token pair", body = UserAuthTokens),
        (status = 401, description = "Token invalid, reused, or session expired"),
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<UserAuthTokens>, AuthError> {
    refresh::refresh(&state, &request.token).await.map(Json)
}

/// Get the current authenticated session's identity snapshot.
#[utoipa::path(
    get,
    path = "/auth/session",
    tag = "Auth",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn get_session(Auth(claims): Auth) -> Json<SessionResponse> {
    Json(SessionResponse {
        session_id: claims.session_id,
        address_id: claims.address_id,
        address: claims.address,
        display_name: claims.display_name,
        avatar_url: claims.avatar_url,
        linked_handle: claims.linked_handle,
        memberships: claims.memberships,
    })
}
