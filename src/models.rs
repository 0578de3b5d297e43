// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Data Models
//!
//! Request/response bodies for the auth API plus the records the session
//! store holds. All types derive `Serialize`, `Deserialize`, and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! ## Wallet Address Type
//!
//! The [`WalletAddress`] newtype wraps Ethereum-style addresses (0x-prefixed,
//! 40 hex characters), canonicalized to lowercase. Addresses are compared
//! only in their canonical form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Ethereum-compatible wallet address, canonicalized to lowercase.
///
/// Format: `0x` followed by 40 hexadecimal characters (20 bytes). The
/// canonical form is all-lowercase so that EIP-55 checksummed input and
/// plain hex input refer to the same identity anchor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Canonicalize raw input to the lowercase form.
    pub fn canonical(value: &str) -> Self {
        WalletAddress(value.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<alloy::primitives::Address> for WalletAddress {
    fn from(value: alloy::primitives::Address) -> Self {
        // LowerHex on a parsed Address yields the canonical 0x-lowercase form.
        WalletAddress(format!("{value:#x}"))
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// Store Records
// =============================================================================

/// A third-party developer-platform identity linked to an address.
///
/// The OAuth token is stored server-side only and never appears in API
/// responses or token payloads; it exists to let the freshness check ask
/// the provider whether the link is still valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedIdentity {
    /// Provider-side account id.
    pub linked_id: i64,
    /// Provider-side handle (login name).
    pub handle: String,
    /// OAuth token captured when the identity was linked.
    pub oauth_token: Option<String>,
}

/// Membership role within a team.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MembershipRole {
    Owner,
    Admin,
    Member,
}

/// A membership fact attached to an address, snapshotted into access tokens.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    /// The team this membership belongs to.
    pub team_id: Uuid,
    /// Role held within the team.
    pub role: MembershipRole,
}

/// The identity anchor: one record per canonical wallet address.
///
/// Created on the first successful login for a previously-unseen address.
/// The upsert on later logins never overwrites existing fields.
#[derive(Debug, Clone)]
pub struct AddressRecord {
    /// Opaque record id.
    pub id: Uuid,
    /// Canonical (lowercase) wallet address.
    pub eth_address: WalletAddress,
    /// Resolved display name, if name-resolution has populated one.
    pub display_name: Option<String>,
    /// Resolved avatar URL, if any.
    pub avatar_url: Option<String>,
    /// At most one linked third-party identity.
    pub linked: Option<LinkedIdentity>,
    /// Membership facts snapshotted into access tokens.
    pub memberships: Vec<Membership>,
}

/// Server-side anchor of a refresh-token lineage.
///
/// Holds the generation counter: a refresh token is valid only while its
/// embedded generation equals this record's current generation. Deleted
/// outright when reuse or expiration is detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque session id, assigned at creation.
    pub id: Uuid,
    /// Owning address record.
    pub address_id: Uuid,
    /// Rotation counter; starts at 0, +1 per successful refresh.
    pub generation: u64,
    /// Immutable creation time; anchors absolute session expiry.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Request / Response Bodies
// =============================================================================

/// Signature envelope submitted with a login request.
///
/// `created_at` is a millisecond epoch timestamp set by the client when it
/// produced the signature; envelopes older than the configured TTL are
/// rejected regardless of cryptographic validity.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignatureData {
    /// Hex-encoded 65-byte secp256k1 signature.
    pub signature: String,
    /// Millisecond epoch timestamp of signature creation.
    pub created_at: i64,
    /// Legacy single-value signing path: the exact message string that was
    /// signed. When absent, the canonical `{site, method, createdAt, data}`
    /// serialization is reconstructed server-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Request body for `POST /auth`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Wallet address claiming to have produced the signature. Checksummed
    /// or lowercase hex are both accepted.
    pub address: String,
    /// The signature envelope.
    pub signature_data: SignatureData,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshRequest {
    /// The refresh token previously issued to this client.
    pub token: String,
}

/// An access/refresh token pair returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserAuthTokens {
    /// Short-lived access token (JWT, carries the identity snapshot).
    pub access_token: String,
    /// Long-lived refresh token (JWT, carries session id + generation).
    pub refresh_token: String,
}
