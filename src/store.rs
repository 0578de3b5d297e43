// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process session store.
//!
//! This is the persistence collaborator behind the auth core. It exposes
//! exactly the narrow interface the token lifecycle needs: address upsert,
//! session create/lookup/delete, and a conditional generation increment.
//! The relational layer a production deployment would use sits behind the
//! same operations; everything here runs under a single `RwLock` so the
//! conditional increment is a true compare-and-swap, equivalent to
//! `UPDATE ... SET generation = generation + 1 WHERE id = ? AND generation = ?`.
//!
//! The `generation` field is the only mutable shared state in the auth
//! core, and [`SessionStore::advance_generation`] is its only mutation
//! path. Callers never cache generation values across requests.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{AddressRecord, LinkedIdentity, Membership, Session, WalletAddress};

/// Outcome of the conditional generation increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CasOutcome {
    /// The increment applied; the returned session carries the new generation.
    Updated(Session),
    /// The session's generation no longer matched the expected value.
    Conflict,
    /// The session does not exist (deleted concurrently or never existed).
    Missing,
}

#[derive(Default)]
struct StoreInner {
    addresses: HashMap<Uuid, AddressRecord>,
    address_ids: HashMap<WalletAddress, Uuid>,
    sessions: HashMap<Uuid, Session>,
}

/// Shared session/address store.
#[derive(Default)]
pub struct SessionStore {
    inner: RwLock<StoreInner>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch-or-create the record for a canonical address.
    ///
    /// Idempotent: an existing record is returned untouched; no field is
    /// overwritten by a repeat login.
    pub async fn upsert_address(&self, address: &WalletAddress) -> AddressRecord {
        let mut inner = self.inner.write().await;
        if let Some(id) = inner.address_ids.get(address) {
            return inner.addresses[id].clone();
        }

        let record = AddressRecord {
            id: Uuid::new_v4(),
            eth_address: address.clone(),
            display_name: None,
            avatar_url: None,
            linked: None,
            memberships: Vec::new(),
        };
        inner.address_ids.insert(address.clone(), record.id);
        inner.addresses.insert(record.id, record.clone());
        record
    }

    pub async fn get_address(&self, id: Uuid) -> Option<AddressRecord> {
        self.inner.read().await.addresses.get(&id).cloned()
    }

    /// Create a new session for an address at generation 0.
    pub async fn create_session(&self, address_id: Uuid) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            address_id,
            generation: 0,
            created_at: Utc::now(),
        };
        self.inner
            .write()
            .await
            .sessions
            .insert(session.id, session.clone());
        session
    }

    pub async fn get_session(&self, id: Uuid) -> Option<Session> {
        self.inner.read().await.sessions.get(&id).cloned()
    }

    /// Insert a pre-built session record, keeping its id and timestamps.
    ///
    /// Tests use this to backdate sessions; `created_at` is immutable
    /// through every production path.
    #[cfg(test)]
    pub(crate) async fn restore_session_for_tests(&self, session: Session) {
        self.inner
            .write()
            .await
            .sessions
            .insert(session.id, session);
    }

    /// Conditionally increment a session's generation.
    ///
    /// The check and the increment happen under one write-lock critical
    /// section: of two concurrent calls expecting the same generation,
    /// exactly one observes a match and increments.
    pub async fn advance_generation(&self, id: Uuid, expected_generation: u64) -> CasOutcome {
        let mut inner = self.inner.write().await;
        let Some(session) = inner.sessions.get_mut(&id) else {
            return CasOutcome::Missing;
        };

        if session.generation != expected_generation {
            return CasOutcome::Conflict;
        }

        session.generation += 1;
        CasOutcome::Updated(session.clone())
    }

    /// Delete a session. Idempotent; returns whether the session existed.
    pub async fn delete_session(&self, id: Uuid) -> bool {
        self.inner.write().await.sessions.remove(&id).is_some()
    }

    /// Remove an address's linked identity and its stored OAuth token.
    ///
    /// Called by the freshness check when the provider reports the stored
    /// token invalid. Idempotent.
    pub async fn clear_linked_identity(&self, address_id: Uuid) {
        if let Some(record) = self.inner.write().await.addresses.get_mut(&address_id) {
            record.linked = None;
        }
    }

    /// Attach a linked identity to an address, replacing any existing one.
    pub async fn link_identity(&self, address_id: Uuid, identity: LinkedIdentity) {
        if let Some(record) = self.inner.write().await.addresses.get_mut(&address_id) {
            record.linked = Some(identity);
        }
    }

    /// Set resolved display metadata for an address.
    pub async fn set_display_metadata(
        &self,
        address_id: Uuid,
        display_name: Option<String>,
        avatar_url: Option<String>,
    ) {
        if let Some(record) = self.inner.write().await.addresses.get_mut(&address_id) {
            record.display_name = display_name;
            record.avatar_url = avatar_url;
        }
    }

    /// Record a membership fact for an address.
    pub async fn add_membership(&self, address_id: Uuid, membership: Membership) {
        if let Some(record) = self.inner.write().await.addresses.get_mut(&address_id) {
            record.memberships.push(membership);
        }
    }
}
