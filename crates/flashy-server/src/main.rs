//! # flashy-server
//!
//! HTTP API for the Flashy flashcard app.
//!
//! This binary provides:
//! - **Deck and card CRUD** (axum) scoped by the caller-asserted
//!   `X-Device-Id` header
//! - **Starter decks** seeded at startup, readable by every caller and
//!   writable by none
//! - **Health check** reporting the database clock

mod api;
mod config;
mod error;
mod identity;

use std::sync::{Arc, Mutex};

use anyhow::Context;
use flashy_store::{Database, StarterDeck};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::ServerConfig;

const BUILTIN_STARTER_DECKS: &str = include_str!("../starter_decks.json");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,flashy_server=debug,flashy_store=info")),
        )
        .init();

    info!("Starting Flashy server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Open the database and seed starter decks
    // -----------------------------------------------------------------------
    let mut db = match &config.database_path {
        Some(path) => Database::open_at(path)
            .with_context(|| format!("opening database at {}", path.display()))?,
        None => Database::new().context("opening default database")?,
    };

    prepare_starter_decks(&mut db, &config).await?;

    let app_state = AppState {
        db: Arc::new(Mutex::new(db)),
        config: Arc::new(config.clone()),
    };

    // -----------------------------------------------------------------------
    // 4. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, config.http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}

/// Seed starter decks (when enabled), then delete any listed in
/// `REMOVE_STARTER_DECKS`.
async fn prepare_starter_decks(db: &mut Database, config: &ServerConfig) -> anyhow::Result<()> {
    if config.seed_starter_decks {
        let decks = load_starter_decks(config).await?;
        let inserted = db.seed_starter_decks(&decks)?;
        info!(available = decks.len(), inserted, "Starter decks ready");
    }

    if !config.remove_starter_decks.is_empty() {
        let titles: Vec<&str> = config.remove_starter_decks.iter().map(String::as_str).collect();
        let removed = db.remove_starter_decks(&titles)?;
        info!(requested = titles.len(), removed, "Removed starter decks");
    }

    Ok(())
}

async fn load_starter_decks(config: &ServerConfig) -> anyhow::Result<Vec<StarterDeck>> {
    let json = match &config.starter_decks_path {
        Some(path) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading starter decks from {}", path.display()))?,
        None => BUILTIN_STARTER_DECKS.to_string(),
    };
    StarterDeck::parse_list(&json).context("parsing starter decks")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashy_shared::DeviceId;

    #[test]
    fn builtin_starter_decks_parse() {
        let decks = StarterDeck::parse_list(BUILTIN_STARTER_DECKS).unwrap();
        assert!(!decks.is_empty());
        assert!(decks.iter().all(|d| !d.cards.is_empty()));
    }

    #[tokio::test]
    async fn startup_removes_listed_starter_decks_after_seeding() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = Database::open_at(&dir.path().join("flashy.db")).unwrap();
        let builtin = StarterDeck::parse_list(BUILTIN_STARTER_DECKS).unwrap();
        let dropped = builtin[0].title.clone();
        let config = ServerConfig {
            remove_starter_decks: vec![dropped.clone()],
            ..ServerConfig::default()
        };

        prepare_starter_decks(&mut db, &config).await.unwrap();

        let caller = DeviceId::parse("device-a").unwrap();
        let titles: Vec<String> = db
            .list_decks(&caller)
            .unwrap()
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(titles.len(), builtin.len() - 1);
        assert!(!titles.contains(&dropped));
    }
}
