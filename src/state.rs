// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::{LinkedIdentityClient, SignatureVerifier, TokenCodec};
use crate::config::AuthSettings;
use crate::store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub tokens: Arc<TokenCodec>,
    pub verifier: Arc<SignatureVerifier>,
    pub identity: Arc<dyn LinkedIdentityClient>,
    pub settings: Arc<AuthSettings>,
}

impl AppState {
    pub fn new(
        store: Arc<SessionStore>,
        identity: Arc<dyn LinkedIdentityClient>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            store,
            tokens: Arc::new(TokenCodec::new(&settings.jwt_secret)),
            verifier: Arc::new(SignatureVerifier::new(
                settings.signature_domain.clone(),
                settings.signature_ttl_minutes,
            )),
            identity,
            settings: Arc::new(settings),
        }
    }
}

#[cfg(test)]
impl AppState {
    /// State wired to a fresh in-memory store and an always-valid identity
    /// client; used throughout unit tests.
    pub fn test_state() -> Self {
        use crate::auth::identity::test_support::StaticIdentityClient;

        Self::new(
            Arc::new(SessionStore::new()),
            Arc::new(StaticIdentityClient::valid()),
            AuthSettings::test_defaults(),
        )
    }

    /// Same as `test_state` but with a scripted identity client.
    pub fn test_state_with_identity(identity: Arc<dyn LinkedIdentityClient>) -> Self {
        Self::new(
            Arc::new(SessionStore::new()),
            identity,
            AuthSettings::test_defaults(),
        )
    }
}
