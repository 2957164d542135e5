//! Playback session that owns the loaded lyrics and drives a [`LyricSync`]
//! cursor from an explicit position channel.

use crate::error::{CoreError, Result};
use crate::lrc::{LyricDocument, LyricLine};
use crate::lyrics::Lyrics;
use crate::sync::LyricSync;
use crate::time::DurationExt;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Events emitted by a lyric session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    /// Synchronized lyrics were loaded; the cursor is inactive until the next
    /// position update
    LyricsLoaded { line_count: usize },
    /// Only untimed lyrics are available
    LyricsUnsynced { text: String },
    /// No lyrics for the current track
    LyricsNotFound,
    /// The active line changed
    ActiveLineChanged {
        index: Option<usize>,
        line: Option<LyricLine>,
        position_ms: u64,
    },
    /// A line was tapped; the host should forward `target_ms` to its player
    SeekRequested { index: usize, target_ms: u64 },
}

/// Session state
struct SessionInner {
    document: Arc<LyricDocument>,
    unsynced: Option<String>,
    active: Option<usize>,
    position: Duration,
}

impl Default for SessionInner {
    fn default() -> Self {
        Self {
            document: Arc::new(LyricDocument::default()),
            unsynced: None,
            active: None,
            position: Duration::ZERO,
        }
    }
}

/// Explicit playback-session object shared by whoever needs lyric state.
///
/// Position updates arrive through [`update_position`](Self::update_position)
/// or a `watch` channel consumed by [`start`](Self::start); changes are
/// published on a broadcast channel.
pub struct LyricSession {
    inner: RwLock<SessionInner>,
    event_tx: broadcast::Sender<SyncEvent>,
}

impl LyricSession {
    /// Create a new session with no lyrics
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.event_tx.subscribe()
    }

    /// Replace the loaded lyrics and reset the cursor to inactive
    pub async fn load(&self, lyrics: Lyrics) {
        let mut inner = self.inner.write().await;
        inner.active = None;

        match lyrics {
            Lyrics::Synced(document) => {
                let line_count = document.len();
                info!("Loaded synchronized lyrics ({} lines)", line_count);
                inner.document = Arc::new(document);
                inner.unsynced = None;
                let _ = self.event_tx.send(SyncEvent::LyricsLoaded { line_count });
            }
            Lyrics::Unsynced(text) => {
                info!("Loaded unsynchronized lyrics");
                inner.document = Arc::new(LyricDocument::default());
                inner.unsynced = Some(text.clone());
                let _ = self.event_tx.send(SyncEvent::LyricsUnsynced { text });
            }
            Lyrics::NotFound => {
                info!("No lyrics available");
                inner.document = Arc::new(LyricDocument::default());
                inner.unsynced = None;
                let _ = self.event_tx.send(SyncEvent::LyricsNotFound);
            }
        }
    }

    /// Apply a playback position update and return the active index.
    ///
    /// Emits [`SyncEvent::ActiveLineChanged`] only when the index changes.
    pub async fn update_position(&self, position: Duration) -> Option<usize> {
        let mut inner = self.inner.write().await;
        let document = Arc::clone(&inner.document);

        let mut cursor = LyricSync::resume(&document, inner.active);
        let active = cursor.advance(position.as_millis_i64());
        let index = active.index();

        inner.position = position;
        if index != inner.active {
            debug!("Active line changed: {:?} -> {:?}", inner.active, index);
            inner.active = index;
            let _ = self.event_tx.send(SyncEvent::ActiveLineChanged {
                index,
                line: active.line().cloned(),
                position_ms: position.as_millis_u64(),
            });
        }

        index
    }

    /// Resolve the seek target for a tapped line.
    ///
    /// The session does not move playback itself; the returned position is for
    /// the caller to forward to its player. The cursor only follows once that
    /// position is reported back.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OutOfRange`] if `index` is not a line of the loaded
    /// document.
    pub async fn seek_to_line(&self, index: usize) -> Result<Duration> {
        let inner = self.inner.read().await;
        let cursor = LyricSync::resume(&inner.document, inner.active);

        let target_ms = cursor.seek_target_for(index).inspect_err(|e| {
            warn!("Rejected seek request: {}", e);
        })?;

        let _ = self
            .event_tx
            .send(SyncEvent::SeekRequested { index, target_ms });
        Ok(Duration::from_millis(target_ms))
    }

    /// Get the loaded document (empty if none)
    pub async fn document(&self) -> Arc<LyricDocument> {
        Arc::clone(&self.inner.read().await.document)
    }

    /// Get the untimed lyrics text, if that is what was loaded
    pub async fn unsynced_text(&self) -> Option<String> {
        self.inner.read().await.unsynced.clone()
    }

    /// Get the active line index
    pub async fn active_index(&self) -> Option<usize> {
        self.inner.read().await.active
    }

    /// Get the last reported position
    pub async fn position(&self) -> Duration {
        self.inner.read().await.position
    }

    /// Whether line `index` would be active at `position`, without touching
    /// the session cursor
    pub async fn is_line_active(&self, index: usize, position: Duration) -> bool {
        let inner = self.inner.read().await;
        LyricSync::new(&inner.document).is_active(index, position.as_millis_i64())
    }

    /// Consume position updates in a background task
    #[must_use]
    pub fn start(
        self: Arc<Self>,
        positions: watch::Receiver<Duration>,
        cancel_token: CancellationToken,
    ) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(async move { self.listen(positions, cancel_token).await })
    }

    /// Apply every position published on `positions` until cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SessionClosed`] if the position sender is dropped
    /// before cancellation.
    pub async fn listen(
        &self,
        mut positions: watch::Receiver<Duration>,
        cancel_token: CancellationToken,
    ) -> Result<()> {
        debug!("Lyric session listening for position updates");

        let initial = *positions.borrow_and_update();
        self.update_position(initial).await;

        loop {
            tokio::select! {
                () = cancel_token.cancelled() => {
                    debug!("Lyric session listener shutting down");
                    return Ok(());
                }
                changed = positions.changed() => {
                    if changed.is_err() {
                        return Err(CoreError::SessionClosed);
                    }
                    let position = *positions.borrow_and_update();
                    self.update_position(position).await;
                }
            }
        }
    }
}

impl Default for LyricSession {
    fn default() -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            inner: RwLock::new(SessionInner::default()),
            event_tx,
        }
    }
}
