//! Console host for the card review engine.
//!
//! Owns the event loop and the external collaborators: SQLite persistence,
//! deck files, speech synthesis, text extraction, camera frames and audio
//! playback. The engine itself lives in `qa-core`.

pub mod app;
pub mod audio;
pub mod commands;
pub mod config;
pub mod db;
pub mod notice;
pub mod ocr;
pub mod sensor;
pub mod speech;
pub mod state;

use crate::app::{App, Event};
use crate::config::Config;
use crate::db::{DeckRepository, SqliteStore};
use crate::state::{AppState, Services};
use qa_core::DeckStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();

    tracing::info!(path = %config.db_path.display(), "opening database");
    let store = SqliteStore::open(&config.db_path)?;
    let deck = match store.load_deck() {
        Ok(Some(deck)) => deck,
        Ok(None) => DeckStore::new(),
        Err(error) => {
            tracing::warn!(%error, "stored deck could not be read, starting empty");
            DeckStore::new()
        }
    };
    tracing::info!(cards = deck.len(), "deck loaded");

    let services = Services::from_config(&config, Box::new(store));
    let mut app = App::new(AppState::new(deck, config.settings), services);

    let tx = app.sender();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().is_empty() {
                continue;
            }
            if tx.send(Event::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Event::Line("quit".into()));
    });

    println!("{} cards loaded. Type `help` for commands.", app.state().deck.len());
    while let Some(event) = app.next_event().await {
        for notice in app.handle(event).await {
            println!("{notice}");
        }
        if app.should_quit() {
            break;
        }
    }

    tracing::info!("shutting down");
    Ok(())
}
