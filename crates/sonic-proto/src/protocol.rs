use serde::{Deserialize, Serialize};

/// A single playable item with display metadata.  Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album_cover_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl Track {
    /// Identifier handed to the media player: the provider video id when
    /// known, the track id otherwise.
    pub fn media_id(&self) -> &str {
        self.youtube_id.as_deref().unwrap_or(&self.id)
    }

    /// "Title by Artist", used in notifications and logs.
    pub fn label(&self) -> String {
        format!("{} by {}", self.title, self.artist)
    }
}

/// A user-named, ordered group of tracks.  Never holds two tracks with the
/// same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Playback flag.  Two states only; anything richer belongs to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

impl PlaybackState {
    pub fn from_flag(playing: bool) -> Self {
        if playing {
            Self::Playing
        } else {
            Self::Paused
        }
    }

    pub fn is_playing(self) -> bool {
        self == Self::Playing
    }
}

/// Serialisable view of the session, served to the view layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub selected_track: Option<Track>,
    pub is_playing: bool,
    pub last_search_results: Vec<Track>,
}

/// Full read model.  `rev` is bumped on every mutation so clients can tell
/// whether anything changed since their last poll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppSnapshot {
    #[serde(default)]
    pub rev: u64,
    pub collections: Vec<Collection>,
    pub session: SessionSnapshot,
}

/// User intents dispatched from the view layer into the app core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "intent")]
pub enum Intent {
    CreateCollection { name: String },
    DeleteCollection { collection_id: String },
    AddTrack { collection_id: String, track: Track },
    RemoveTrack { collection_id: String, track_id: String },
    Search { query: String },
    /// Select a track out of the last search results by id.
    SelectResult { track_id: String },
    /// Select an arbitrary track (e.g. one from a collection), or clear the
    /// selection with `None`.
    Select { track: Option<Track> },
    SetPlaying { playing: bool },
}
