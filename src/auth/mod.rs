// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Signature-based login and refresh-token rotation.
//!
//! ## Auth Flow
//!
//! 1. Client signs a canonical login message with its wallet key and posts
//!    the envelope to `POST /auth`
//! 2. Server recovers the signer, upserts the Address record, checks any
//!    linked third-party identity for freshness, creates a Session at
//!    generation 0, and returns an access/refresh JWT pair
//! 3. Client presents the refresh token to `POST /auth/refresh`; the server
//!    advances the session generation with a compare-and-swap and returns a
//!    fresh pair
//! 4. Reuse of a rotated refresh token taints the whole lineage: the
//!    session is deleted and the client must log in again
//!
//! ## Security
//!
//! - Signature envelopes expire after a configured TTL
//! - The canonical signed message binds the site, method, and request data,
//!   so a signature for one endpoint cannot be replayed against another
//! - Access and refresh tokens are structurally distinct JWTs; neither
//!   decodes as the other
//! - Session expiry is absolute (from creation), never extended by rotation

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod identity;
pub mod issuance;
pub mod refresh;
pub mod signature;

pub use claims::{AccessTokenClaims, RefreshTokenClaims};
pub use codec::TokenCodec;
pub use error::AuthError;
pub use extractor::Auth;
pub use identity::{GithubIdentityClient, LinkedIdentityClient};
pub use signature::SignatureVerifier;
