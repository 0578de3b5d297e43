// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, sync::Arc};

use tracing_subscriber::EnvFilter;

use wallet_auth_server::api::router;
use wallet_auth_server::auth::GithubIdentityClient;
use wallet_auth_server::config::{AuthSettings, LOG_FORMAT_ENV};
use wallet_auth_server::state::AppState;
use wallet_auth_server::store::SessionStore;

#[tokio::main]
async fn main() {
    init_tracing();

    let settings = AuthSettings::from_env();
    let store = Arc::new(SessionStore::new());
    let identity = Arc::new(GithubIdentityClient::new());

    let state = AppState::new(store, identity, settings);
    let app = router(state);

    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    tracing::info!("Wallet auth server listening on http://{addr} (docs at /docs)");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("HTTP server failed");
}

/// Initialize the tracing subscriber.
///
/// `LOG_FORMAT=json` selects machine-readable output; anything else gets
/// the human-readable default. `RUST_LOG` overrides the filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if env::var(LOG_FORMAT_ENV).as_deref() == Ok("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install ctrl-c handler");
    tracing::info!("Shutting down");
}
