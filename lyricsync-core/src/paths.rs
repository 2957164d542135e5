//! Path helpers for companion lyric files and configuration.

use std::path::{Path, PathBuf};

/// Extension of companion lyric files
pub const LYRIC_FILE_EXTENSION: &str = "lrc";

/// The name of the configuration directory under ~/.config/
pub const CONFIG_DIR_NAME: &str = "lyricsync";

/// The name of the main configuration file
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// The name of the log file written when file logging is enabled
pub const LOG_FILE_NAME: &str = "lyricsync.log";

/// Propose the lyric file that sits next to a media file.
///
/// `music/Song.mp3` becomes `music/Song.lrc`. Only the path is derived; whether
/// the file exists is for the caller to check. Returns `None` for paths with no
/// file name.
#[must_use]
pub fn locate_companion_file(media_path: &Path) -> Option<PathBuf> {
    let stem = media_path.file_stem()?;
    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(LYRIC_FILE_EXTENSION);
    Some(media_path.with_file_name(file_name))
}

/// Whether `path` already names a lyric file
#[must_use]
pub fn is_lyric_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(LYRIC_FILE_EXTENSION))
}

/// Get the configuration directory path (~/.config/lyricsync/)
#[must_use]
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join(CONFIG_DIR_NAME)
}

/// Get the config file path (~/.config/lyricsync/config.toml)
#[must_use]
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE_NAME)
}

/// Get the log file path (`~/.cache/lyricsync/lyricsync.log`)
#[must_use]
pub fn log_file_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(config_dir)
        .join(CONFIG_DIR_NAME)
        .join(LOG_FILE_NAME)
}
