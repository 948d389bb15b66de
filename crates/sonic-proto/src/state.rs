use crate::catalog::CatalogStore;
use crate::config::CatalogConfig;
use crate::error::CatalogError;
use crate::fixtures;
use crate::protocol::{AppSnapshot, Collection, Track};
use crate::session::SessionState;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Catalog and session together, plus a revision counter bumped on every
/// effective mutation.
#[derive(Debug, Default)]
pub struct AppState {
    pub rev: u64,
    pub catalog: CatalogStore,
    pub session: SessionState,
}

impl AppState {
    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            rev: self.rev,
            collections: self.catalog.collections().to_vec(),
            session: self.session.snapshot(),
        }
    }
}

/// The process-wide application context.  Created once in `main`; the app
/// core is the only writer, the HTTP surface only reads.
pub struct StateManager {
    state: Arc<RwLock<AppState>>,
}

impl StateManager {
    pub fn new(seed: Vec<Collection>) -> Self {
        let state = AppState {
            rev: 1,
            catalog: CatalogStore::with_collections(seed),
            session: SessionState::new(),
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub async fn get_state(&self) -> AppSnapshot {
        self.state.read().await.snapshot()
    }

    pub async fn collection(&self, collection_id: &str) -> Result<Collection, CatalogError> {
        self.state
            .read()
            .await
            .catalog
            .collection(collection_id)
            .cloned()
    }

    pub async fn create_collection(&self, name: &str) -> Result<Collection, CatalogError> {
        let mut state = self.state.write().await;
        let created = state.catalog.create_collection(name)?.clone();
        state.rev += 1;
        Ok(created)
    }

    pub async fn delete_collection(&self, collection_id: &str) -> bool {
        let mut state = self.state.write().await;
        let removed = state.catalog.delete_collection(collection_id);
        if removed {
            state.rev += 1;
        }
        removed
    }

    /// Returns the collection name when the track was added.
    pub async fn add_track(&self, collection_id: &str, track: Track) -> Option<String> {
        let mut state = self.state.write().await;
        if !state.catalog.add_track(collection_id, track) {
            return None;
        }
        state.rev += 1;
        state
            .catalog
            .collection(collection_id)
            .ok()
            .map(|c| c.name.clone())
    }

    pub async fn remove_track(&self, collection_id: &str, track_id: &str) -> bool {
        let mut state = self.state.write().await;
        let removed = state.catalog.remove_track(collection_id, track_id);
        if removed {
            state.rev += 1;
        }
        removed
    }

    pub async fn select_track(&self, track: Option<Track>) {
        let mut state = self.state.write().await;
        state.session.select_track(track);
        state.rev += 1;
    }

    /// Select a track out of the last search results.  Returns the track, or
    /// `None` (and leaves the selection alone) if the id is not a result.
    pub async fn select_result(&self, track_id: &str) -> Option<Track> {
        let mut state = self.state.write().await;
        let track = state.session.find_result(track_id).cloned()?;
        state.session.select_track(Some(track.clone()));
        state.rev += 1;
        Some(track)
    }

    pub async fn set_playing(&self, playing: bool) {
        let mut state = self.state.write().await;
        state.session.set_playing(playing);
        state.rev += 1;
    }

    pub async fn on_track_ended(&self) {
        let mut state = self.state.write().await;
        state.session.on_track_ended();
        state.rev += 1;
    }

    pub async fn set_search_results(&self, results: Vec<Track>) {
        let mut state = self.state.write().await;
        state.session.set_search_results(results);
        state.rev += 1;
    }

    /// Cover image and playback flag, the inputs of the 3D scene.
    pub async fn scene_inputs(&self) -> (Option<String>, bool) {
        let state = self.state.read().await;
        (
            state
                .session
                .selected_track()
                .map(|t| t.album_cover_url.clone()),
            state.session.is_playing(),
        )
    }
}

// ── TOML catalog seed ─────────────────────────────────────────────────────────

/// Intermediate structs matching the `[[collection]]` tables of the seed
/// file, kept apart from the wire types so the file format can drift.
#[derive(Debug, serde::Deserialize)]
struct TomlCatalogFile {
    #[serde(default)]
    collection: Vec<TomlCollection>,
}

#[derive(Debug, serde::Deserialize)]
struct TomlCollection {
    id: String,
    name: String,
    #[serde(default)]
    track: Vec<TomlTrack>,
}

#[derive(Debug, serde::Deserialize)]
struct TomlTrack {
    id: String,
    title: String,
    artist: String,
    #[serde(default)]
    cover: String,
    #[serde(default)]
    youtube_id: Option<String>,
    #[serde(default)]
    audio_url: Option<String>,
}

pub fn parse_catalog_from_toml_str(content: &str) -> anyhow::Result<Vec<Collection>> {
    let file: TomlCatalogFile = toml::from_str(content)?;
    let collections = file
        .collection
        .into_iter()
        .map(|c| Collection {
            id: c.id,
            name: c.name,
            tracks: c
                .track
                .into_iter()
                .map(|t| Track {
                    id: t.id,
                    title: t.title,
                    artist: t.artist,
                    album_cover_url: t.cover,
                    youtube_id: t.youtube_id,
                    audio_url: t.audio_url,
                })
                .collect(),
        })
        .collect();
    Ok(collections)
}

pub fn load_catalog_from_toml(path: &std::path::Path) -> anyhow::Result<Vec<Collection>> {
    let content = std::fs::read_to_string(path)?;
    parse_catalog_from_toml_str(&content)
}

/// Startup catalog: seed file if present, then built-in fixtures if enabled,
/// otherwise empty.
pub fn load_seed(config: &CatalogConfig) -> anyhow::Result<Vec<Collection>> {
    if config.seed_file.exists() {
        tracing::info!("Loading catalog seed from {}", config.seed_file.display());
        return load_catalog_from_toml(&config.seed_file);
    }
    if config.seed_fixtures {
        tracing::debug!("No catalog seed file, using built-in collections");
        return Ok(fixtures::initial_collections());
    }
    Ok(Vec::new())
}
