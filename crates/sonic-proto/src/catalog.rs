//! Catalog store: the session's collections and their member tracks.
//!
//! All operations are synchronous.  Mutations addressed at a collection or
//! track that does not exist are no-ops; they report what happened through
//! their `bool` return so callers can word notifications, but never fail.

use crate::error::CatalogError;
use crate::protocol::{Collection, Track};

#[derive(Debug, Clone, Default)]
pub struct CatalogStore {
    collections: Vec<Collection>,
    /// Last id handed out by `create_collection`, as epoch milliseconds.
    last_id: i64,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store.  Duplicate collection ids keep the first occurrence,
    /// duplicate track ids inside a collection keep the last one.
    pub fn with_collections(seed: Vec<Collection>) -> Self {
        let mut store = Self::new();
        for collection in seed {
            if store.index_of(&collection.id).is_some() {
                tracing::warn!("Skipping duplicate seed collection id {}", collection.id);
                continue;
            }
            if let Ok(numeric) = collection.id.parse::<i64>() {
                store.last_id = store.last_id.max(numeric);
            }
            let Collection { id, name, tracks } = collection;
            let mut unique = Vec::with_capacity(tracks.len());
            for track in tracks {
                push_unique(&mut unique, track);
            }
            store.collections.push(Collection {
                id,
                name,
                tracks: unique,
            });
        }
        store
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn collection(&self, collection_id: &str) -> Result<&Collection, CatalogError> {
        self.collections
            .iter()
            .find(|c| c.id == collection_id)
            .ok_or_else(|| CatalogError::NotFound(collection_id.to_string()))
    }

    /// Append a new empty collection named `name` (trimmed).
    pub fn create_collection(&mut self, name: &str) -> Result<&Collection, CatalogError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "collection name must not be empty".to_string(),
            ));
        }

        let id = self.next_id();
        self.collections.push(Collection {
            id,
            name: name.to_string(),
            tracks: Vec::new(),
        });
        Ok(&self.collections[self.collections.len() - 1])
    }

    /// Returns `true` if a collection was removed.
    pub fn delete_collection(&mut self, collection_id: &str) -> bool {
        let before = self.collections.len();
        self.collections.retain(|c| c.id != collection_id);
        self.collections.len() != before
    }

    /// Move-to-end insert.  Returns `false` when the collection is absent.
    pub fn add_track(&mut self, collection_id: &str, track: Track) -> bool {
        match self.index_of(collection_id) {
            Some(idx) => {
                push_unique(&mut self.collections[idx].tracks, track);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if a track was removed.
    pub fn remove_track(&mut self, collection_id: &str, track_id: &str) -> bool {
        let Some(idx) = self.index_of(collection_id) else {
            return false;
        };
        let tracks = &mut self.collections[idx].tracks;
        let before = tracks.len();
        tracks.retain(|t| t.id != track_id);
        tracks.len() != before
    }

    fn index_of(&self, collection_id: &str) -> Option<usize> {
        self.collections.iter().position(|c| c.id == collection_id)
    }

    /// Timestamp-derived id, bumped past the previous one when two
    /// collections are created within the same millisecond.
    fn next_id(&mut self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        self.last_id = now.max(self.last_id + 1);
        self.last_id.to_string()
    }
}

fn push_unique(tracks: &mut Vec<Track>, track: Track) {
    tracks.retain(|t| t.id != track.id);
    tracks.push(track);
}
