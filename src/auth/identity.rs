// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Linked-identity freshness checking.
//!
//! Addresses may carry one linked third-party developer-platform account.
//! Before that identity is asserted inside a freshly minted access token,
//! the stored OAuth token is re-validated against the provider. A stale
//! link is cleaned up (stored token dropped, link removed from the
//! address) and excluded from the payload; cleanup happens on the
//! issuance path, so callers tolerate the extra write latency on that
//! cold path.
//!
//! Provider outages fail open: the identity is kept for the current
//! issuance and no destructive cleanup runs on a transport error. Only a
//! definitive "token is not valid for this account" answer unlinks.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::AddressRecord;
use crate::store::SessionStore;

/// Failure talking to the identity provider.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("identity provider returned status {0}")]
    Status(u16),
}

/// External collaborator that can confirm an OAuth token still belongs to
/// a given provider-side account.
#[async_trait]
pub trait LinkedIdentityClient: Send + Sync {
    /// Returns `Ok(true)` when `oauth_token` is currently valid for the
    /// account `linked_id`, `Ok(false)` when the provider definitively
    /// rejects it, and `Err` when no definitive answer was available.
    async fn validate_token(&self, oauth_token: &str, linked_id: i64) -> Result<bool, IdentityError>;
}

#[derive(Debug, Deserialize)]
struct ProviderUser {
    id: i64,
}

/// GitHub-backed identity client.
pub struct GithubIdentityClient {
    client: reqwest::Client,
    api_base: String,
}

impl GithubIdentityClient {
    pub fn new() -> Self {
        Self::with_base("https://api.github.com")
    }

    pub fn with_base(api_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .user_agent("wallet-auth-server")
                .build()
                .unwrap_or_default(),
            api_base: api_base.into(),
        }
    }
}

impl Default for GithubIdentityClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LinkedIdentityClient for GithubIdentityClient {
    async fn validate_token(&self, oauth_token: &str, linked_id: i64) -> Result<bool, IdentityError> {
        let response = self
            .client
            .get(format!("{}/user", self.api_base))
            .bearer_auth(oauth_token)
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            // Revoked or expired token; definitively invalid.
            return Ok(false);
        }
        if !status.is_success() {
            return Err(IdentityError::Status(status.as_u16()));
        }

        let user: ProviderUser = response.json().await?;
        Ok(user.id == linked_id)
    }
}

/// Re-validate an address's linked identity before it is asserted in a
/// token payload.
///
/// Returns the `(linked_id, handle)` pair to embed, or `None` when the
/// address has no fresh link. Stale links are unlinked from the address
/// as a side effect. Never blocks issuance: provider errors keep the
/// identity as-is for this token.
pub async fn check_linked_identity(
    store: &SessionStore,
    client: &dyn LinkedIdentityClient,
    record: &AddressRecord,
) -> Option<(i64, String)> {
    let linked = record.linked.as_ref()?;

    let Some(oauth_token) = linked.oauth_token.as_deref() else {
        info!(
            address_id = %record.id,
            "Removing linked identity with no stored OAuth token"
        );
        store.clear_linked_identity(record.id).await;
        return None;
    };

    match client.validate_token(oauth_token, linked.linked_id).await {
        Ok(true) => Some((linked.linked_id, linked.handle.clone())),
        Ok(false) => {
            info!(
                address_id = %record.id,
                linked_id = linked.linked_id,
                "Removing invalid linked-identity OAuth token"
            );
            store.clear_linked_identity(record.id).await;
            None
        }
        Err(err) => {
            warn!(
                address_id = %record.id,
                error = %err,
                "Identity provider unavailable; keeping linked identity for this issuance"
            );
            Some((linked.linked_id, linked.handle.clone()))
        }
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::StaticIdentityClient;
    use super::*;
    use crate::models::{LinkedIdentity, WalletAddress};
    use std::sync::atomic::Ordering;

    async fn linked_record(store: &SessionStore, oauth_token: Option<&str>) -> AddressRecord {
        let record = store
            .upsert_address(&WalletAddress::canonical("0xaaa1"))
            .await;
        store
            .link_identity(
                record.id,
                LinkedIdentity {
                    linked_id: 4242,
                    handle: "octocat".into(),
                    oauth_token: oauth_token.map(String::from),
                },
            )
            .await;
        store.get_address(record.id).await.unwrap()
    }

    #[tokio::test]
    async fn valid_token_keeps_identity_without_writes() {
        let store = SessionStore::new();
        let record = linked_record(&store, Some("gho_ok")).await;
        let client = StaticIdentityClient::valid();

        let result = check_linked_identity(&store, &client, &record).await;
        assert_eq!(result, Some((4242, "octocat".to_string())));
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);

        // Link untouched.
        assert!(store.get_address(record.id).await.unwrap().linked.is_some());
    }

    #[tokio::test]
    async fn invalid_token_unlinks_and_returns_none() {
        let store = SessionStore::new();
        let record = linked_record(&store, Some("gho_revoked")).await;
        let client = StaticIdentityClient::invalid();

        let result = check_linked_identity(&store, &client, &record).await;
        assert_eq!(result, None);
        assert!(store.get_address(record.id).await.unwrap().linked.is_none());
    }

    #[tokio::test]
    async fn absent_stored_token_unlinks_without_provider_call() {
        let store = SessionStore::new();
        let record = linked_record(&store, None).await;
        let client = StaticIdentityClient::valid();

        let result = check_linked_identity(&store, &client, &record).await;
        assert_eq!(result, None);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
        assert!(store.get_address(record.id).await.unwrap().linked.is_none());
    }

    #[tokio::test]
    async fn provider_outage_fails_open_without_cleanup() {
        let store = SessionStore::new();
        let record = linked_record(&store, Some("gho_ok")).await;
        let client = StaticIdentityClient::unavailable();

        let result = check_linked_identity(&store, &client, &record).await;
        assert_eq!(result, Some((4242, "octocat".to_string())));
        assert!(store.get_address(record.id).await.unwrap().linked.is_some());
    }

    #[tokio::test]
    async fn unlinked_record_short_circuits() {
        let store = SessionStore::new();
        let record = store
            .upsert_address(&WalletAddress::canonical("0xbbb2"))
            .await;
        let client = StaticIdentityClient::valid();

        assert_eq!(check_linked_identity(&store, &client, &record).await, None);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }
}
