// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signed token encoding and decoding.
//!
//! Both token kinds are HS256 JWTs signed with the server-held symmetric
//! key. Decode rejects invalid signatures, wrong algorithms, and payloads
//! whose shape does not match the requested kind. Refresh tokens carry no
//! `exp`; their validity is bounded by the session's absolute age and the
//! generation match, both enforced by the refresh protocol.

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use thiserror::Error;

use super::claims::{AccessTokenClaims, RefreshTokenClaims};

/// Token decode/encode failure.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token signature is invalid")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("token payload does not match the expected kind")]
    WrongKind,
    #[error("token is malformed")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::BadSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => TokenError::WrongKind,
            _ => TokenError::Malformed,
        }
    }
}

/// Mints and verifies the two token kinds.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn mint_access(&self, claims: &AccessTokenClaims) -> Result<String, TokenError> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)?)
    }

    pub fn mint_refresh(&self, claims: &RefreshTokenClaims) -> Result<String, TokenError> {
        Ok(encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)?)
    }

    /// Decode and verify an access token. Enforces signature, HS256
    /// algorithm, and expiry.
    pub fn decode_access(&self, token: &str) -> Result<AccessTokenClaims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<AccessTokenClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }

    /// Decode and verify a refresh token. Enforces signature and HS256
    /// algorithm; refresh tokens have no embedded expiry to check.
    pub fn decode_refresh(&self, token: &str) -> Result<RefreshTokenClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        let data = decode::<RefreshTokenClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}
