//! Offline search over a fixed track list.

use sonic_proto::protocol::Track;

#[derive(Debug, Clone)]
pub struct FixtureSearch {
    tracks: Vec<Track>,
    max_results: usize,
}

impl FixtureSearch {
    pub fn new(tracks: Vec<Track>, max_results: usize) -> Self {
        Self {
            tracks,
            max_results,
        }
    }

    /// Case-insensitive substring match on title or artist, in list order.
    pub fn search(&self, query: &str) -> Vec<Track> {
        let needle = query.to_lowercase();
        self.tracks
            .iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&needle)
                    || t.artist.to_lowercase().contains(&needle)
            })
            .take(self.max_results)
            .cloned()
            .collect()
    }
}
