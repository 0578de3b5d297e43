// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! [`AuthSettings`] struct loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SECRET` | Symmetric HS256 key for signing tokens | Required |
//! | `SIGNATURE_DOMAIN` | Site string embedded in signed login messages | `relational.network` |
//! | `SIGNATURE_TTL_MINUTES` | Max age of a login signature envelope | `15` |
//! | `ACCESS_TOKEN_TTL_SECONDS` | Access token lifetime | `600` |
//! | `SESSION_MAX_AGE_DAYS` | Absolute session expiry from creation | `30` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

/// Environment variable name for the token-signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the signature site/domain string.
pub const SIGNATURE_DOMAIN_ENV: &str = "SIGNATURE_DOMAIN";

/// Environment variable name for the signature envelope TTL (minutes).
pub const SIGNATURE_TTL_MINUTES_ENV: &str = "SIGNATURE_TTL_MINUTES";

/// Environment variable name for the access token TTL (seconds).
pub const ACCESS_TOKEN_TTL_SECONDS_ENV: &str = "ACCESS_TOKEN_TTL_SECONDS";

/// Environment variable name for the absolute session age limit (days).
pub const SESSION_MAX_AGE_DAYS_ENV: &str = "SESSION_MAX_AGE_DAYS";

/// Environment variable name for the logging format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_SIGNATURE_DOMAIN: &str = "relational.network";
const DEFAULT_SIGNATURE_TTL_MINUTES: i64 = 15;
const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 600;
const DEFAULT_SESSION_MAX_AGE_DAYS: i64 = 30;

/// Authentication settings shared across the issuance and refresh paths.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    /// Symmetric secret used to sign and verify both token kinds.
    pub jwt_secret: String,
    /// Site string included in the canonical signed-message serialization.
    /// Binds signatures to this deployment so they cannot be replayed
    /// against another service.
    pub signature_domain: String,
    /// How long a signature envelope stays acceptable after its `createdAt`.
    pub signature_ttl_minutes: i64,
    /// Access token lifetime, embedded as `exp` in the access JWT.
    pub access_token_ttl_seconds: i64,
    /// Absolute session lifetime measured from session creation. Rotation
    /// activity does not extend it.
    pub session_max_age_days: i64,
}

impl AuthSettings {
    /// Load settings from the environment.
    ///
    /// Panics if `JWT_SECRET` is unset: the service cannot mint or verify
    /// tokens without it.
    pub fn from_env() -> Self {
        Self {
            jwt_secret: env::var(JWT_SECRET_ENV)
                .expect("JWT_SECRET must be set to sign session tokens"),
            signature_domain: env::var(SIGNATURE_DOMAIN_ENV)
                .unwrap_or_else(|_| DEFAULT_SIGNATURE_DOMAIN.to_string()),
            signature_ttl_minutes: env_i64(SIGNATURE_TTL_MINUTES_ENV, DEFAULT_SIGNATURE_TTL_MINUTES),
            access_token_ttl_seconds: env_i64(
                ACCESS_TOKEN_TTL_SECONDS_ENV,
                DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
            ),
            session_max_age_days: env_i64(SESSION_MAX_AGE_DAYS_ENV, DEFAULT_SESSION_MAX_AGE_DAYS),
        }
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
impl AuthSettings {
    /// Settings used by unit tests; no environment access.
    pub fn test_defaults() -> Self {
        Self {
            jwt_secret: "test-jwt-secret".to_string(),
            signature_domain: DEFAULT_SIGNATURE_DOMAIN.to_string(),
            signature_ttl_minutes: DEFAULT_SIGNATURE_TTL_MINUTES,
            access_token_ttl_seconds: DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
            session_max_age_days: DEFAULT_SESSION_MAX_AGE_DAYS,
        }
    }
}
