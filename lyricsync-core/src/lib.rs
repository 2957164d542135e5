//! Time-synchronized lyrics engine.
//!
//! [`LyricDocument::parse`] turns LRC-style text into a time-ordered document,
//! [`LyricSync`] tracks the active line as a playback position advances, and
//! [`LyricSession`] wraps both behind a channel-driven session object.

pub mod config;
pub mod error;
pub mod lrc;
pub mod lyrics;
pub mod paths;
pub mod playback;
pub mod session;
pub mod sync;
pub mod time;

pub use config::{DisplayConfig, LoggingConfig, LyricSyncConfig, OutputFormat, PlaybackConfig};
pub use error::{CoreError, Result};
pub use lrc::{parse, LyricDocument, LyricLine};
pub use lyrics::Lyrics;
pub use paths::{
    config_dir, config_path, is_lyric_file, locate_companion_file, log_file_path,
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, LYRIC_FILE_EXTENSION,
};
pub use playback::PlaybackClock;
pub use session::{LyricSession, SyncEvent};
pub use sync::{ActiveLine, LyricSync};
pub use time::DurationExt;
