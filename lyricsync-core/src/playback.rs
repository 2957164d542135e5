use std::time::Duration;
use tokio::time::Instant;

/// Playback clock that interpolates position between reports.
///
/// Hosts that learn the playback position only occasionally (or, like the CLI,
/// simulate playback) use this as their position source and seek sink.
#[derive(Debug, Clone)]
pub struct PlaybackClock {
    /// Whether playback is currently running
    is_playing: bool,
    /// Position at `updated_at`
    position: Duration,
    /// Total track duration
    duration: Duration,
    /// When the position was last anchored
    updated_at: Instant,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl PlaybackClock {
    /// Create a paused clock at the start of a track of the given length
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            is_playing: false,
            position: Duration::ZERO,
            duration,
            updated_at: Instant::now(),
        }
    }

    /// Get interpolated position based on time elapsed since last update
    #[must_use]
    pub fn position(&self) -> Duration {
        if !self.is_playing {
            return self.position;
        }

        let interpolated = self.position + self.updated_at.elapsed();

        // Clamp to track duration
        interpolated.min(self.duration)
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.is_playing
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether the position has reached the end of the track
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.position() >= self.duration
    }

    pub fn play(&mut self) {
        if !self.is_playing {
            self.anchor(self.position);
            self.is_playing = true;
        }
    }

    pub fn pause(&mut self) {
        if self.is_playing {
            self.anchor(self.position());
            self.is_playing = false;
        }
    }

    /// Reposition playback, clamped to the track duration
    pub fn seek(&mut self, position: Duration) {
        self.anchor(position.min(self.duration));
    }

    fn anchor(&mut self, position: Duration) {
        self.position = position;
        self.updated_at = Instant::now();
    }
}
