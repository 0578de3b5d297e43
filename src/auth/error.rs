// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// The refresh endpoint distinguishes `invalid`, `reused`, and `expired`
/// codes so clients can tell "log in again" apart from "your token was
/// used elsewhere, possible compromise".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The submitted address is not a valid Ethereum address
    InvalidAddress,
    /// Signature did not verify for the claimed address, or the envelope
    /// is past its TTL
    InvalidSignature,
    /// Refresh token failed to decode, or its session does not exist
    InvalidToken,
    /// Refresh token's generation no longer matches the session; the
    /// lineage has been revoked
    TokenReused,
    /// The session passed its absolute age limit and has been deleted
    SessionExpired,
    /// Access token has expired
    TokenExpired,
    /// No authorization header present
    MissingAuthHeader,
    /// Invalid authorization header format
    InvalidAuthHeader,
    /// Access token was valid but its session no longer exists
    SessionRevoked,
    /// Server-side failure minting or signing tokens
    InternalError,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidAddress => "invalid_address",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::InvalidToken => "invalid",
            AuthError::TokenReused => "reused",
            AuthError::SessionExpired => "expired",
            AuthError::TokenExpired => "token_expired",
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::SessionRevoked => "session_revoked",
            AuthError::InternalError => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidAddress => StatusCode::BAD_REQUEST,
            AuthError::InvalidSignature
            | AuthError::InvalidToken
            | AuthError::TokenReused
            | AuthError::SessionExpired
            | AuthError::TokenExpired
            | AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::SessionRevoked => StatusCode::UNAUTHORIZED,
            AuthError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::InvalidAddress => write!(f, "The address is invalid"),
            AuthError::InvalidSignature => {
                write!(f, "The signature is not valid for this address and data")
            }
            AuthError::InvalidToken => write!(f, "The refresh token is invalid"),
            AuthError::TokenReused => write!(f, "The refresh token has already been used"),
            AuthError::SessionExpired => write!(f, "The login session has expired"),
            AuthError::TokenExpired => write!(f, "The access token has expired"),
            AuthError::MissingAuthHeader => write!(f, "Authorization header is required"),
            AuthError::InvalidAuthHeader => {
                write!(f, "Invalid authorization header format (expected 'Bearer <token>')")
            }
            AuthError::SessionRevoked => write!(f, "Not logged in with address"),
            AuthError::InternalError => write!(f, "An internal error occurred"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
