//! AppCore: single-owner event loop for all mutable application state.
//!
//! Every intent from the view layer, every search completion and every
//! player notification arrives as an `AppEvent` on one mpsc channel and is
//! applied in order.  AppCore is the only writer of the `StateManager`; the
//! HTTP surface holds read handles.
//!
//! Searches are the only suspension point.  They run in spawned tasks and
//! come back as `SearchCompleted`, tagged with a sequence number: only the
//! most recently issued search may write `lastSearchResults`, so a slow
//! response to an old query can never overwrite a newer one.

use std::sync::Arc;
use std::time::Duration;

use sonic_proto::error::{CatalogError, ProviderError};
use sonic_proto::protocol::{Collection, Intent, Track};
use sonic_proto::state::StateManager;
use tokio::sync::{mpsc, oneshot, Mutex};
use tracing::{debug, info, warn};

use crate::notify::{Severity, ToastManager};
use crate::player::{MediaPlayer, PlayerEvent};
use crate::scene::{SceneFrame, ScenePresenter};
use crate::search::SearchGateway;

// ── AppEvent ──────────────────────────────────────────────────────────────────

/// What an intent did.  No-ops are not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum IntentOutcome {
    Applied,
    Created(Collection),
    NoOp,
}

pub type IntentReply = Result<IntentOutcome, CatalogError>;

/// All inputs into the AppCore loop.
#[derive(Debug)]
pub enum AppEvent {
    /// A user intent, with an optional channel for the outcome.
    Intent {
        intent: Intent,
        reply: Option<oneshot::Sender<IntentReply>>,
    },
    /// A spawned search finished.
    SearchCompleted {
        seq: u64,
        query: String,
        outcome: Result<Vec<Track>, ProviderError>,
    },
    Player(PlayerEvent),
    /// Periodic housekeeping (toast expiry).
    Tick,
    Shutdown,
}

// ── AppCore ───────────────────────────────────────────────────────────────────

pub struct AppCore {
    state_manager: Arc<StateManager>,
    gateway: SearchGateway,
    player: Box<dyn MediaPlayer>,
    scene: Box<dyn ScenePresenter>,
    notifications: Arc<Mutex<ToastManager>>,
    /// Sender side of our own channel, handed to search tasks.
    event_tx: mpsc::Sender<AppEvent>,
    /// Sequence number of the latest issued search.
    search_seq: u64,
}

impl AppCore {
    pub fn new(
        state_manager: Arc<StateManager>,
        gateway: SearchGateway,
        player: Box<dyn MediaPlayer>,
        scene: Box<dyn ScenePresenter>,
        notifications: Arc<Mutex<ToastManager>>,
        event_tx: mpsc::Sender<AppEvent>,
    ) -> Self {
        Self {
            state_manager,
            gateway,
            player,
            scene,
            notifications,
            event_tx,
            search_seq: 0,
        }
    }

    /// Run until `Shutdown` arrives or every sender is gone, then release
    /// the player.
    pub async fn run(mut self, mut event_rx: mpsc::Receiver<AppEvent>) -> anyhow::Result<()> {
        info!(
            "AppCore: starting event loop (search provider: {})",
            self.gateway.provider_name()
        );

        let tick_tx = self.event_tx.clone();
        let ticker = tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_secs(1)).await;
                if tick_tx.send(AppEvent::Tick).await.is_err() {
                    break;
                }
            }
        });

        while let Some(evt) = event_rx.recv().await {
            if !self.handle_event(evt).await {
                info!("AppCore: shutdown requested");
                break;
            }
        }

        ticker.abort();
        self.player.dispose()?;
        info!("AppCore: stopped");
        Ok(())
    }

    /// Apply one event.  Returns `false` when the loop should stop.
    pub async fn handle_event(&mut self, evt: AppEvent) -> bool {
        match evt {
            AppEvent::Intent { intent, reply } => {
                let result = self.handle_intent(intent).await;
                if let Some(reply) = reply {
                    let _ = reply.send(result);
                }
            }
            AppEvent::SearchCompleted {
                seq,
                query,
                outcome,
            } => self.on_search_completed(seq, query, outcome).await,
            AppEvent::Player(PlayerEvent::Ended { media_id }) => {
                self.on_track_ended(media_id).await
            }
            AppEvent::Tick => self.notifications.lock().await.tick(),
            AppEvent::Shutdown => return false,
        }
        true
    }

    async fn handle_intent(&mut self, intent: Intent) -> IntentReply {
        match intent {
            Intent::CreateCollection { name } => {
                match self.state_manager.create_collection(&name).await {
                    Ok(collection) => {
                        info!("Created collection {} ({})", collection.name, collection.id);
                        self.toast(
                            Severity::Success,
                            format!("Created collection \"{}\"", collection.name),
                        )
                        .await;
                        Ok(IntentOutcome::Created(collection))
                    }
                    Err(e) => {
                        warn!("Rejected collection name {:?}: {}", name, e);
                        self.toast(Severity::Warning, "Collection name cannot be empty")
                            .await;
                        Err(e)
                    }
                }
            }
            Intent::DeleteCollection { collection_id } => {
                if self.state_manager.delete_collection(&collection_id).await {
                    info!("Deleted collection {}", collection_id);
                    self.toast(Severity::Info, "Collection deleted").await;
                    Ok(IntentOutcome::Applied)
                } else {
                    debug!("Delete of unknown collection {} ignored", collection_id);
                    Ok(IntentOutcome::NoOp)
                }
            }
            Intent::AddTrack {
                collection_id,
                track,
            } => {
                let title = track.title.clone();
                match self.state_manager.add_track(&collection_id, track).await {
                    Some(name) => {
                        self.toast(Severity::Success, format!("Added \"{}\" to {}", title, name))
                            .await;
                        Ok(IntentOutcome::Applied)
                    }
                    None => {
                        debug!("Add to unknown collection {} ignored", collection_id);
                        Ok(IntentOutcome::NoOp)
                    }
                }
            }
            Intent::RemoveTrack {
                collection_id,
                track_id,
            } => {
                if self
                    .state_manager
                    .remove_track(&collection_id, &track_id)
                    .await
                {
                    self.toast(Severity::Info, "Removed from collection").await;
                    Ok(IntentOutcome::Applied)
                } else {
                    Ok(IntentOutcome::NoOp)
                }
            }
            Intent::Search { query } => {
                self.start_search(query).await;
                Ok(IntentOutcome::Applied)
            }
            Intent::SelectResult { track_id } => {
                match self.state_manager.select_result(&track_id).await {
                    Some(track) => {
                        self.on_selection(Some(&track)).await;
                        Ok(IntentOutcome::Applied)
                    }
                    None => {
                        debug!("Track {} is not among the last results", track_id);
                        Ok(IntentOutcome::NoOp)
                    }
                }
            }
            Intent::Select { track } => {
                self.state_manager.select_track(track.clone()).await;
                self.on_selection(track.as_ref()).await;
                Ok(IntentOutcome::Applied)
            }
            Intent::SetPlaying { playing } => {
                self.set_playing(playing).await;
                Ok(IntentOutcome::Applied)
            }
        }
    }

    // ── Search ────────────────────────────────────────────────────────────────

    async fn start_search(&mut self, query: String) {
        self.search_seq += 1;
        let seq = self.search_seq;

        if query.trim().is_empty() {
            // Nothing to ask the provider; clear results right away.  The
            // bumped seq also retires any search still in flight.
            self.state_manager.set_search_results(Vec::new()).await;
            self.notifications.lock().await.dismiss_spinner();
            return;
        }

        info!("Search #{} for {:?}", seq, query);
        self.notifications
            .lock()
            .await
            .spinner(format!("Searching for \"{}\"…", query.trim()));

        let gateway = self.gateway.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let outcome = gateway.search(&query).await;
            let _ = tx
                .send(AppEvent::SearchCompleted {
                    seq,
                    query,
                    outcome,
                })
                .await;
        });
    }

    async fn on_search_completed(
        &mut self,
        seq: u64,
        query: String,
        outcome: Result<Vec<Track>, ProviderError>,
    ) {
        if seq != self.search_seq {
            debug!(
                "Discarding stale search #{} for {:?} (latest is #{})",
                seq, query, self.search_seq
            );
            return;
        }

        match outcome {
            Ok(tracks) => {
                info!("Search #{} returned {} tracks", seq, tracks.len());
                let mut notifications = self.notifications.lock().await;
                if tracks.is_empty() {
                    notifications.resolve_spinner(
                        Severity::Info,
                        format!("No results for \"{}\"", query.trim()),
                        Duration::from_secs(3),
                    );
                } else {
                    notifications.dismiss_spinner();
                }
                drop(notifications);
                self.state_manager.set_search_results(tracks).await;
            }
            Err(e) => {
                warn!("Search #{} for {:?} failed: {}", seq, query, e);
                self.state_manager.set_search_results(Vec::new()).await;
                self.notifications.lock().await.resolve_spinner(
                    Severity::Error,
                    e.user_message(),
                    Duration::from_secs(5),
                );
            }
        }
    }

    // ── Playback ──────────────────────────────────────────────────────────────

    async fn on_selection(&mut self, track: Option<&Track>) {
        let result = match track {
            Some(track) => {
                let loaded = self.player.load(track.media_id());
                let playing = self.state_manager.get_state().await.session.is_playing;
                match loaded {
                    Ok(()) if playing => self.player.play(),
                    other => other,
                }
            }
            None => self.player.dispose(),
        };
        if let Err(e) = result {
            warn!("Player rejected selection: {}", e);
            self.toast(Severity::Error, format!("Player error: {}", e))
                .await;
        }
        self.publish_scene().await;
    }

    async fn set_playing(&mut self, playing: bool) {
        let was_playing = self.state_manager.get_state().await.session.is_playing;
        self.state_manager.set_playing(playing).await;
        let selected = self.state_manager.get_state().await.session.selected_track;

        let result = match (&selected, playing) {
            (Some(_), true) => self.player.play(),
            (_, false) => self.player.pause(),
            (None, true) => Ok(()),
        };
        if let Err(e) = result {
            warn!("Player error: {}", e);
        }

        // Announce only the paused -> playing transition.
        if let (Some(track), true, false) = (&selected, playing, was_playing) {
            self.toast(Severity::Success, format!("Playing: {}", track.label()))
                .await;
        }
        self.publish_scene().await;
    }

    async fn on_track_ended(&mut self, media_id: String) {
        let state = self.state_manager.get_state().await;
        let current = state.session.selected_track.as_ref().map(|t| t.media_id());
        if current != Some(media_id.as_str()) {
            debug!("Ignoring end of {} (no longer selected)", media_id);
            return;
        }
        if state.session.is_playing {
            info!("Track {} ended", media_id);
            self.state_manager.on_track_ended().await;
            if let Err(e) = self.player.pause() {
                warn!("Player error: {}", e);
            }
            self.publish_scene().await;
        }
    }

    async fn publish_scene(&mut self) {
        let (cover_url, playing) = self.state_manager.scene_inputs().await;
        self.scene.present(SceneFrame { cover_url, playing });
    }

    async fn toast(&mut self, severity: Severity, message: impl Into<String>) {
        let mut notifications = self.notifications.lock().await;
        match severity {
            Severity::Info => notifications.info(message),
            Severity::Success => notifications.success(message),
            Severity::Warning => notifications.warning(message),
            Severity::Error => notifications.error(message),
        }
    }
}
