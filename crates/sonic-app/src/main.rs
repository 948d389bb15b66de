mod core;
mod http;
mod notify;
mod player;
mod scene;
mod search;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sonic_proto::config::Config;
use sonic_proto::platform;
use sonic_proto::state::{self, StateManager};
use tokio::sync::{mpsc, Mutex};
use tracing::{error, info, warn};

use crate::core::{AppCore, AppEvent};
use crate::notify::ToastManager;
use crate::player::SimulatedPlayer;
use crate::scene::SceneFeed;
use crate::search::SearchGateway;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;

    let log_path = platform::log_path();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so the operator can tail it immediately.
    eprintln!("sonicverse log: {}", log_path.display());

    info!("sonicverse starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });

    // ── Application context ──────────────────────────────────────────────────
    let seed = state::load_seed(&config.catalog).unwrap_or_else(|e| {
        warn!("Failed to load catalog seed, starting empty: {}", e);
        Vec::new()
    });
    info!("Catalog seeded with {} collections", seed.len());
    let state_manager = Arc::new(StateManager::new(seed));

    // ── AppEvent channel (HTTP/player/search tasks → AppCore) ───────────────
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(1024);

    let gateway = SearchGateway::from_config(&config.search)?;
    let player = SimulatedPlayer::new(
        event_tx.clone(),
        config.player.simulated_track_secs.map(Duration::from_secs),
    );
    let (scene_feed, scene_rx) = SceneFeed::new();
    let notifications = Arc::new(Mutex::new(ToastManager::new()));

    let core = AppCore::new(
        Arc::clone(&state_manager),
        gateway,
        Box::new(player),
        Box::new(scene_feed),
        Arc::clone(&notifications),
        event_tx.clone(),
    );
    let core_task = tokio::spawn(core.run(event_rx));

    // ── HTTP intent API ──────────────────────────────────────────────────────
    if config.http.enabled {
        http::start_server(
            config.http.bind_address.clone(),
            config.http.port,
            http::HttpState {
                state_manager,
                event_tx: event_tx.clone(),
                notifications,
                scene_rx,
            },
        );
    } else {
        info!("HTTP intent API disabled");
    }

    // ── Run until interrupted ────────────────────────────────────────────────
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;
    info!("Interrupt received, shutting down");
    let _ = event_tx.send(AppEvent::Shutdown).await;

    match core_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("AppCore exited with error: {}", e),
        Err(e) => error!("AppCore task panicked: {}", e),
    }

    Ok(())
}
