// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token payloads.
//!
//! The two token kinds are structurally distinct on purpose: an access
//! token cannot decode as a refresh token (no `generation`) and a refresh
//! token cannot decode as an access token (no address fields, no `exp`).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{AddressRecord, Membership, Session};

/// Payload of a short-lived access token.
///
/// Carries a snapshot of the address's identity at issuance time: display
/// metadata, the linked third-party identity (if still fresh), and
/// membership facts. Nothing here is persisted; the session id lets API
/// middleware confirm the login is still live.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenClaims {
    /// Session this token was minted under.
    pub session_id: Uuid,
    /// Owning address record id.
    pub address_id: Uuid,
    /// Canonical (lowercase) wallet address.
    pub address: String,
    /// Display name snapshot, if resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Avatar URL snapshot, if resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Linked third-party account id, absent when no fresh link exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_id: Option<i64>,
    /// Linked third-party handle, paired with `linked_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_handle: Option<String>,
    /// Membership snapshot.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub memberships: Vec<Membership>,
    /// Issued-at (seconds epoch).
    pub iat: i64,
    /// Expiry (seconds epoch).
    pub exp: i64,
}

impl AccessTokenClaims {
    /// Build the access payload for a session/address pair.
    ///
    /// `linked` is the freshness-checked identity; a stale or absent link
    /// never reaches the payload.
    pub fn new(
        session: &Session,
        record: &AddressRecord,
        linked: Option<(i64, String)>,
        ttl_seconds: i64,
    ) -> Self {
        let now = Utc::now().timestamp();
        let (linked_id, linked_handle) = match linked {
            Some((id, handle)) => (Some(id), Some(handle)),
            None => (None, None),
        };
        Self {
            session_id: session.id,
            address_id: record.id,
            address: record.eth_address.as_str().to_string(),
            display_name: record.display_name.clone(),
            avatar_url: record.avatar_url.clone(),
            linked_id,
            linked_handle,
            memberships: record.memberships.clone(),
            iat: now,
            exp: now + ttl_seconds,
        }
    }
}

/// Payload of a refresh token.
///
/// Deliberately carries no expiry: absolute session age is enforced by the
/// refresh protocol against the session's `created_at`, and validity is
/// gated by the generation match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenClaims {
    /// Session this token belongs to.
    pub session_id: Uuid,
    /// Generation this token was minted at; valid only while it equals the
    /// session's current generation.
    pub generation: u64,
    /// Issued-at (seconds epoch).
    pub iat: i64,
}

impl RefreshTokenClaims {
    pub fn new(session_id: Uuid, generation: u64) -> Self {
        Self {
            session_id,
            generation,
            iat: Utc::now().timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WalletAddress;

    fn sample_record() -> AddressRecord {
        AddressRecord {
            id: Uuid::new_v4(),
            eth_address: WalletAddress::canonical("0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B"),
            display_name: Some("sam.eth".into()),
            avatar_url: None,
            linked: None,
            memberships: Vec::new(),
        }
    }

    fn sample_session(address_id: Uuid) -> Session {
        Session {
            id: Uuid::new_v4(),
            address_id,
            generation: 0,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn access_claims_snapshot_address_fields() {
        let record = sample_record();
        let session = sample_session(record.id);
        let claims = AccessTokenClaims::new(&session, &record, Some((77, "octocat".into())), 600);

        assert_eq!(claims.session_id, session.id);
        assert_eq!(claims.address_id, record.id);
        assert_eq!(claims.address, record.eth_address.as_str());
        assert_eq!(claims.display_name.as_deref(), Some("sam.eth"));
        assert_eq!(claims.linked_id, Some(77));
        assert_eq!(claims.linked_handle.as_deref(), Some("octocat"));
        assert_eq!(claims.exp - claims.iat, 600);
    }

    #[test]
    fn access_claims_without_link_have_no_identity_fields() {
        let record = sample_record();
        let session = sample_session(record.id);
        let claims = AccessTokenClaims::new(&session, &record, None, 600);

        assert!(claims.linked_id.is_none());
        assert!(claims.linked_handle.is_none());

        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("linkedId").is_none());
        assert!(json.get("linkedHandle").is_none());
    }

    #[test]
    fn refresh_claims_serialize_without_exp() {
        let claims = RefreshTokenClaims::new(Uuid::new_v4(), 3);
        let json = serde_json::to_value(&claims).unwrap();
        assert!(json.get("exp").is_none());
        assert_eq!(json["generation"], 3);
    }
}
