//! Media player collaborator.
//!
//! The core only needs `load / play / pause / dispose` and an "ended"
//! notification.  No audio is decoded here: `SimulatedPlayer` keeps a play
//! clock and, when configured with a track length, reports the end of the
//! track into the core's event channel once that much time has been played.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::core::AppEvent;

/// Events the player pushes back into the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Playback of `media_id` reached its end.
    Ended { media_id: String },
}

pub trait MediaPlayer: Send {
    fn load(&mut self, media_id: &str) -> anyhow::Result<()>;
    fn play(&mut self) -> anyhow::Result<()>;
    fn pause(&mut self) -> anyhow::Result<()>;
    fn dispose(&mut self) -> anyhow::Result<()>;
}

pub struct SimulatedPlayer {
    events: mpsc::Sender<AppEvent>,
    track_len: Option<Duration>,
    loaded: Option<String>,
    /// Time already played of the loaded track.
    position: Duration,
    /// Set while playing.
    playing_since: Option<Instant>,
    end_timer: Option<tokio::task::AbortHandle>,
}

impl SimulatedPlayer {
    pub fn new(events: mpsc::Sender<AppEvent>, track_len: Option<Duration>) -> Self {
        Self {
            events,
            track_len,
            loaded: None,
            position: Duration::ZERO,
            playing_since: None,
            end_timer: None,
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(handle) = self.end_timer.take() {
            handle.abort();
        }
    }

    fn played(&self) -> Duration {
        self.position + self.playing_since.map_or(Duration::ZERO, |since| since.elapsed())
    }

    fn reached_end(&self) -> bool {
        self.track_len.is_some_and(|len| self.played() >= len)
    }

    fn stop_clock(&mut self) {
        if let Some(since) = self.playing_since.take() {
            self.position += since.elapsed();
        }
    }
}

impl MediaPlayer for SimulatedPlayer {
    fn load(&mut self, media_id: &str) -> anyhow::Result<()> {
        if self.loaded.as_deref() == Some(media_id) {
            return Ok(());
        }
        self.cancel_timer();
        self.playing_since = None;
        self.position = Duration::ZERO;
        self.loaded = Some(media_id.to_string());
        debug!("Player: loaded {}", media_id);
        Ok(())
    }

    fn play(&mut self) -> anyhow::Result<()> {
        let Some(media_id) = self.loaded.clone() else {
            anyhow::bail!("nothing loaded");
        };
        if self.playing_since.is_some() && !self.reached_end() {
            return Ok(());
        }
        self.stop_clock();
        if self.reached_end() {
            // Played to the end: start over.
            self.position = Duration::ZERO;
        }
        self.playing_since = Some(Instant::now());
        info!("Player: playing {}", media_id);

        if let Some(len) = self.track_len {
            let remaining = len.saturating_sub(self.position);
            let events = self.events.clone();
            let task = tokio::spawn(async move {
                tokio::time::sleep(remaining).await;
                let _ = events
                    .send(AppEvent::Player(PlayerEvent::Ended { media_id }))
                    .await;
            });
            self.end_timer = Some(task.abort_handle());
        }
        Ok(())
    }

    fn pause(&mut self) -> anyhow::Result<()> {
        self.cancel_timer();
        self.stop_clock();
        debug!("Player: paused at {:.1}s", self.position.as_secs_f64());
        Ok(())
    }

    fn dispose(&mut self) -> anyhow::Result<()> {
        self.cancel_timer();
        self.playing_since = None;
        self.position = Duration::ZERO;
        if let Some(media_id) = self.loaded.take() {
            debug!("Player: disposed {}", media_id);
        }
        Ok(())
    }
}

impl Drop for SimulatedPlayer {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}
