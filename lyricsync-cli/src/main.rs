mod args;
mod display;

use crate::args::Args;
use crate::display::Renderer;
use clap::Parser;
use lyricsync_core::{
    is_lyric_file, locate_companion_file, CoreError, LyricSession, LyricSyncConfig, Lyrics,
    PlaybackClock,
};
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    let file_logging_enabled = check_file_logging_enabled();
    init_tracing(file_logging_enabled);

    let args = Args::parse();

    let config = match LyricSyncConfig::load_or_create() {
        Ok(config) => config,
        Err(CoreError::ConfigNotFound { path }) => {
            info!(
                "Created config template at {}, continuing with defaults",
                path.display()
            );
            LyricSyncConfig::default()
        }
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    let lyrics = match load_lyrics(&args.path) {
        Ok(lyrics) => lyrics,
        Err(e) => {
            error!("Failed to read lyrics: {e}");
            std::process::exit(1);
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    // Create shared cancellation token for graceful shutdown
    let cancel_token = CancellationToken::new();

    let ctrlc_token = cancel_token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received Ctrl+C, shutting down gracefully...");
        ctrlc_token.cancel();
    }) {
        error!("Failed to set Ctrl+C handler: {}", e);
    }

    if let Err(e) = runtime.block_on(play(&config, lyrics, &args, cancel_token)) {
        error!("{e}");
        std::process::exit(1);
    }
}

/// Read the lyrics for a media file or an `.lrc` file.
///
/// A missing companion file is not an error; it means there are no lyrics.
fn load_lyrics(path: &Path) -> lyricsync_core::Result<Lyrics> {
    let lyric_path = if is_lyric_file(path) {
        path.to_path_buf()
    } else {
        let Some(companion) = locate_companion_file(path) else {
            warn!("Cannot derive a lyric file from {}", path.display());
            return Ok(Lyrics::NotFound);
        };
        companion
    };

    if !lyric_path.is_file() {
        warn!("No lyric file at {}", lyric_path.display());
        return Ok(Lyrics::NotFound);
    }

    info!("Reading lyrics from {}", lyric_path.display());
    let text = fs::read_to_string(&lyric_path)?;
    Ok(Lyrics::from_text(&text))
}

/// Simulate playback of the loaded lyrics until the end or cancellation
async fn play(
    config: &LyricSyncConfig,
    lyrics: Lyrics,
    args: &Args,
    cancel_token: CancellationToken,
) -> lyricsync_core::Result<()> {
    let session = LyricSession::new();
    let mut events = session.subscribe();
    session.load(lyrics).await;

    let document = session.document().await;
    let renderer = Renderer::new(config.display.clone(), Arc::clone(&document));

    if document.is_empty() {
        // Nothing to synchronize; show what was loaded and stop
        while let Ok(event) = events.try_recv() {
            renderer.show(&event);
        }
        return Ok(());
    }

    let end_ms = document
        .last_timestamp_ms()
        .unwrap_or_default()
        .saturating_add(config.playback.tail_ms);
    let mut clock = PlaybackClock::new(Duration::from_millis(end_ms));
    clock.play();

    let (position_tx, position_rx) = watch::channel(clock.position());
    let listener = Arc::clone(&session).start(position_rx, cancel_token.clone());

    if let Some(index) = args.seek_line {
        match session.seek_to_line(index).await {
            // The clock is this host's seek sink
            Ok(target) => clock.seek(target),
            Err(e) => warn!("Ignoring --seek-line: {e}"),
        }
    }

    let mut ticker = tokio::time::interval(Duration::from_millis(
        config.playback.tick_interval_ms,
    ));

    loop {
        tokio::select! {
            () = cancel_token.cancelled() => break,
            _ = ticker.tick() => {
                // Ignore send errors: the listener only stops on cancellation
                let _ = position_tx.send(clock.position());
                if clock.is_finished() {
                    info!("Reached end of lyrics");
                    break;
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => renderer.show(&event),
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Missed {} sync events", n);
                    }
                }
            }
        }
    }

    // Closing the feed lets the listener apply the final position and stop
    drop(position_tx);
    match listener.await {
        Ok(Ok(()) | Err(CoreError::SessionClosed)) => {}
        Ok(Err(e)) => return Err(e),
        Err(e) => error!("Lyric session listener panicked: {e}"),
    }

    while let Ok(event) = events.try_recv() {
        renderer.show(&event);
    }

    Ok(())
}

/// Initialize tracing on stderr, plus a plain-text log file when enabled.
///
/// Stdout is left to the lyric output.
fn init_tracing(file_logging_enabled: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = file_logging_enabled
        .then(open_log_file)
        .flatten()
        .map(|file| {
            tracing_subscriber::fmt::layer()
                .with_writer(Arc::new(file))
                .with_ansi(false)
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();
}

/// Create (truncating) the log file; tracing is not up yet, so failures go to stderr
fn open_log_file() -> Option<File> {
    let log_path = lyricsync_core::log_file_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Failed to create log directory {}: {e}", parent.display());
            return None;
        }
    }

    File::create(&log_path)
        .inspect_err(|e| eprintln!("Failed to create log file at {}: {e}", log_path.display()))
        .ok()
}

/// Read `[logging] enabled` before the full config is loaded, so logging is
/// up while the config itself is being validated
fn check_file_logging_enabled() -> bool {
    fs::read_to_string(LyricSyncConfig::config_path())
        .is_ok_and(|content| file_logging_enabled_in(&content))
}

/// Anything other than a readable `enabled = true` counts as disabled
fn file_logging_enabled_in(content: &str) -> bool {
    toml::from_str::<toml::Table>(content)
        .ok()
        .and_then(|table| table.get("logging")?.get("enabled")?.as_bool())
        .unwrap_or(false)
}
