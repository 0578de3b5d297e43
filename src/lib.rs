// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet Auth - Signature-Based Authentication Service
//!
//! This crate provides wallet-native authentication: users prove control of
//! an Ethereum address by signing a canonical message, and receive a JWT
//! access/refresh token pair. Refresh tokens rotate through a per-session
//! generation counter that detects token theft and revokes the whole
//! session lineage on reuse.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Signature verification, token issuance, and rotation
//! - `store` - In-memory session and address store
//! - `config` - Environment-driven settings

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod state;
pub mod store;
