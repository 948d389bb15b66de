//! Session state: the selected track, the playback flag and the last search
//! results.  Nothing here resets on its own; values persist until overwritten.

use crate::protocol::{PlaybackState, SessionSnapshot, Track};

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    selected_track: Option<Track>,
    playback: PlaybackState,
    last_search_results: Vec<Track>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.selected_track.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.playback.is_playing()
    }

    pub fn last_search_results(&self) -> &[Track] {
        &self.last_search_results
    }

    /// Does not touch the playback flag.
    pub fn select_track(&mut self, track: Option<Track>) {
        self.selected_track = track;
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playback = PlaybackState::from_flag(playing);
    }

    /// The media player reported the end of the track.
    pub fn on_track_ended(&mut self) {
        self.playback = PlaybackState::Paused;
    }

    pub fn set_search_results(&mut self, results: Vec<Track>) {
        self.last_search_results = results;
    }

    pub fn find_result(&self, track_id: &str) -> Option<&Track> {
        self.last_search_results.iter().find(|t| t.id == track_id)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            selected_track: self.selected_track.clone(),
            is_playing: self.is_playing(),
            last_search_results: self.last_search_results.clone(),
        }
    }
}
