// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet signature verification.
//!
//! Login requests prove control of an address with an EIP-191 personal
//! message signature. The signed message is a canonical JSON serialization
//! of `{site, method, createdAt, data}` so a signature captured for one
//! endpoint (or another deployment) cannot be replayed against a different
//! one. A legacy path accepts a bare message string supplied in the
//! envelope instead.
//!
//! Verification is pure: no I/O, no persistence of attempts.

use alloy::primitives::{Address, Signature};
use chrono::{Duration, TimeZone, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::SignatureData;

/// Canonical serialization of the signed login message.
///
/// Field order is the struct declaration order, which `serde_json`
/// preserves, so the serialization is deterministic.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CanonicalMessage<'a> {
    site: &'a str,
    method: &'a str,
    created_at: i64,
    data: &'a str,
}

/// Validates that a presented signature was produced by the claimed
/// address over the expected message, within the configured TTL window.
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    site: String,
    ttl: Duration,
}

impl SignatureVerifier {
    pub fn new(site: impl Into<String>, ttl_minutes: i64) -> Self {
        Self {
            site: site.into(),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Verify a signature envelope for `address`.
    ///
    /// `method` names the endpoint being called and `data` carries the
    /// request-specific payload; both are bound into the canonical message.
    /// Returns `false` for expired envelopes regardless of cryptographic
    /// validity. Address comparison is case-insensitive (both sides are
    /// parsed 20-byte values).
    pub fn verify(&self, address: &str, method: &str, envelope: &SignatureData, data: &str) -> bool {
        let Some(created_at) = Utc.timestamp_millis_opt(envelope.created_at).single() else {
            debug!("Rejected signature with unrepresentable createdAt");
            return false;
        };

        // checked_add_signed: a createdAt near the representable maximum
        // must reject, not overflow.
        let Some(deadline) = created_at.checked_add_signed(self.ttl) else {
            debug!("Rejected signature with unrepresentable createdAt");
            return false;
        };

        if deadline < Utc::now() {
            debug!("Rejected expired signature");
            return false;
        }

        let Ok(claimed) = address.parse::<Address>() else {
            debug!("Rejected signature for unparseable address");
            return false;
        };

        let Ok(signature) = envelope.signature.parse::<Signature>() else {
            debug!("Rejected malformed signature bytes");
            return false;
        };

        let message = match &envelope.message {
            // Legacy path: the client signed a bare message string.
            Some(message) => message.clone(),
            None => match self.canonical_message(method, envelope.created_at, data) {
                Some(message) => message,
                None => return false,
            },
        };

        match signature.recover_address_from_msg(message.as_bytes()) {
            Ok(recovered) => recovered == claimed,
            Err(_) => {
                debug!(address, "Rejected unrecoverable signature");
                false
            }
        }
    }

    pub(crate) fn canonical_message(
        &self,
        method: &str,
        created_at: i64,
        data: &str,
    ) -> Option<String> {
        serde_json::to_string(&CanonicalMessage {
            site: &self.site,
            method,
            created_at,
            data,
        })
        .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::signers::{local::PrivateKeySigner, SignerSync};

    fn verifier() -> SignatureVerifier {
        SignatureVerifier::new("relational.network", 15)
    }

    fn sign_canonical(
        signer: &PrivateKeySigner,
        verifier: &SignatureVerifier,
        method: &str,
        created_at: i64,
        data: &str,
    ) -> SignatureData {
        let message = verifier
            .canonical_message(method, created_at, data)
            .expect("canonical message serializes");
        let signature = signer.sign_message_sync(message.as_bytes()).unwrap();
        SignatureData {
            signature: alloy::hex::encode(signature.as_bytes()),
            created_at,
            message: None,
        }
    }

    #[test]
    fn accepts_fresh_signature_from_claimed_address() {
        let signer = PrivateKeySigner::random();
        let verifier = verifier();
        let address = format!("{:#x}", signer.address());
        let envelope = sign_canonical(&signer, &verifier, "auth", Utc::now().timestamp_millis(), &address);

        assert!(verifier.verify(&address, "auth", &envelope, &address));
    }

    #[test]
    fn address_comparison_is_case_insensitive() {
        let signer = PrivateKeySigner::random();
        let verifier = verifier();
        let checksummed = signer.address().to_string();
        let lowercase = checksummed.to_lowercase();
        let envelope = sign_canonical(
            &signer,
            &verifier,
            "auth",
            Utc::now().timestamp_millis(),
            &lowercase,
        );

        assert!(verifier.verify(&checksummed, "auth", &envelope, &lowercase));
        assert!(verifier.verify(&lowercase, "auth", &envelope, &lowercase));
    }

    #[test]
    fn rejects_signature_from_other_address() {
        let signer = PrivateKeySigner::random();
        let other = PrivateKeySigner::random();
        let verifier = verifier();
        let address = format!("{:#x}", signer.address());
        let envelope = sign_canonical(&signer, &verifier, "auth", Utc::now().timestamp_millis(), &address);

        assert!(!verifier.verify(
            &format!("{:#x}", other.address()),
            "auth",
            &envelope,
            &address
        ));
    }

    #[test]
    fn rejects_expired_envelope_despite_valid_signature() {
        let signer = PrivateKeySigner::random();
        let verifier = verifier();
        let address = format!("{:#x}", signer.address());
        let stale = Utc::now().timestamp_millis() - Duration::minutes(16).num_milliseconds();
        let envelope = sign_canonical(&signer, &verifier, "auth", stale, &address);

        assert!(!verifier.verify(&address, "auth", &envelope, &address));
    }

    #[test]
    fn rejects_cross_endpoint_replay() {
        let signer = PrivateKeySigner::random();
        let verifier = verifier();
        let address = format!("{:#x}", signer.address());
        let envelope = sign_canonical(&signer, &verifier, "auth", Utc::now().timestamp_millis(), &address);

        // Same envelope presented for a different method must fail.
        assert!(!verifier.verify(&address, "unlink", &envelope, &address));
    }

    #[test]
    fn rejects_signature_for_other_site() {
        let signer = PrivateKeySigner::random();
        let other_site = SignatureVerifier::new("evil.example", 15);
        let verifier = verifier();
        let address = format!("{:#x}", signer.address());
        let envelope = sign_canonical(
            &signer,
            &other_site,
            "auth",
            Utc::now().timestamp_millis(),
            &address,
        );

        assert!(!verifier.verify(&address, "auth", &envelope, &address));
    }

    #[test]
    fn legacy_bare_message_path_verifies() {
        let signer = PrivateKeySigner::random();
        let verifier = verifier();
        let address = format!("{:#x}", signer.address());
        let message = "I am signing in to relational.network";
        let signature = signer.sign_message_sync(message.as_bytes()).unwrap();
        let envelope = SignatureData {
            signature: alloy::hex::encode(signature.as_bytes()),
            created_at: Utc::now().timestamp_millis(),
            message: Some(message.to_string()),
        };

        assert!(verifier.verify(&address, "auth", &envelope, &address));
    }

    #[test]
    fn rejects_created_at_at_the_representable_maximum() {
        let signer = PrivateKeySigner::random();
        let verifier = verifier();
        let address = format!("{:#x}", signer.address());
        // Largest millisecond timestamp chrono accepts; adding the TTL
        // would overflow. Must reject cleanly.
        let envelope = sign_canonical(&signer, &verifier, "auth", 8_210_266_876_799_999, &address);

        assert!(!verifier.verify(&address, "auth", &envelope, &address));
    }

    #[test]
    fn rejects_garbage_signature_and_address() {
        let verifier = verifier();
        let envelope = SignatureData {
            signature: "0xnothex".into(),
            created_at: Utc::now().timestamp_millis(),
            message: None,
        };
        assert!(!verifier.verify("0xab", "auth", &envelope, "0xab"));
        assert!(!verifier.verify("not-an-address", "auth", &envelope, "x"));
    }
}
