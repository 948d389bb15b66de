//! Feed for the 3D/VR background.  Data flows one way: the core publishes the
//! selected cover image and the playback flag, the renderer never answers.

use serde::Serialize;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFrame {
    pub cover_url: Option<String>,
    pub playing: bool,
}

pub trait ScenePresenter: Send {
    fn present(&mut self, frame: SceneFrame);
}

/// Publishes frames on a `watch` channel; identical frames are not re-sent.
pub struct SceneFeed {
    tx: watch::Sender<SceneFrame>,
}

impl SceneFeed {
    pub fn new() -> (Self, watch::Receiver<SceneFrame>) {
        let (tx, rx) = watch::channel(SceneFrame::default());
        (Self { tx }, rx)
    }
}

impl ScenePresenter for SceneFeed {
    fn present(&mut self, frame: SceneFrame) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == frame {
                false
            } else {
                *current = frame.clone();
                true
            }
        });
        if changed {
            debug!(
                "Scene frame: cover={:?} playing={}",
                frame.cover_url, frame.playing
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_changes_are_published() {
        let (mut feed, mut rx) = SceneFeed::new();
        assert!(!rx.has_changed().unwrap());

        feed.present(SceneFrame::default());
        assert!(!rx.has_changed().unwrap());

        let frame = SceneFrame {
            cover_url: Some("https://covers.example/201.jpg".to_string()),
            playing: true,
        };
        feed.present(frame.clone());
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), frame);

        feed.present(frame);
        assert!(!rx.has_changed().unwrap());
    }
}
