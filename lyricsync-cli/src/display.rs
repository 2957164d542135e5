use lyricsync_core::{DisplayConfig, LyricDocument, OutputFormat, SyncEvent};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::warn;

/// Renders session events to stdout
pub struct Renderer {
    config: DisplayConfig,
    document: Arc<LyricDocument>,
}

impl Renderer {
    pub const fn new(config: DisplayConfig, document: Arc<LyricDocument>) -> Self {
        Self { config, document }
    }

    pub fn show(&self, event: &SyncEvent) {
        if let Some(output) = self.render(event) {
            println!("{output}");
        }
    }

    fn render(&self, event: &SyncEvent) -> Option<String> {
        match self.config.output {
            OutputFormat::Json => match serde_json::to_string(event) {
                Ok(json) => Some(json),
                Err(e) => {
                    warn!("Failed to serialize event: {}", e);
                    None
                }
            },
            OutputFormat::Text => self.render_text(event),
        }
    }

    fn render_text(&self, event: &SyncEvent) -> Option<String> {
        match event {
            SyncEvent::ActiveLineChanged { index, .. } => Some(self.render_window(*index)),
            SyncEvent::SeekRequested { index, target_ms } => Some(format!(
                "-- seeking to line {} at {}",
                index,
                format_timestamp(*target_ms)
            )),
            SyncEvent::LyricsLoaded { line_count } => {
                Some(format!("-- loaded {line_count} synchronized line(s)"))
            }
            SyncEvent::LyricsUnsynced { text } => Some(text.clone()),
            SyncEvent::LyricsNotFound => Some("-- no lyrics available".to_string()),
        }
    }

    /// Active line with its surrounding context, the active one marked
    fn render_window(&self, index: Option<usize>) -> String {
        let range = self.document.visible_range(
            index,
            self.config.context_before,
            self.config.context_after,
        );

        let mut out = String::new();
        if index.is_none() {
            out.push_str("   ...\n");
        }
        for i in range {
            let Some(line) = self.document.get(i) else {
                continue;
            };
            let marker = if Some(i) == index { '>' } else { ' ' };
            let _ = writeln!(
                out,
                "{marker} [{}] {}",
                format_timestamp(line.timestamp_ms),
                line.text
            );
        }
        out
    }
}

/// Format milliseconds as `MM:SS.mmm`
pub fn format_timestamp(ms: u64) -> String {
    format!("{:02}:{:02}.{:03}", ms / 60_000, (ms / 1000) % 60, ms % 1000)
}
