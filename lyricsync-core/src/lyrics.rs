use crate::lrc::LyricDocument;

/// Lyrics loaded for the current track, from a companion file or manual entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lyrics {
    /// Synchronized lyrics with timing
    Synced(LyricDocument),
    /// Plain text lyrics without timing
    Unsynced(String),
    /// No lyrics available
    NotFound,
}

impl Lyrics {
    /// Classify already-read lyric text.
    ///
    /// Text with at least one timed line becomes [`Lyrics::Synced`]. Otherwise
    /// non-blank text is kept verbatim (trimmed) as [`Lyrics::Unsynced`], which
    /// bypasses the timed model entirely.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let document = LyricDocument::parse(text);
        if !document.is_empty() {
            return Self::Synced(document);
        }

        let text = text.trim();
        if text.is_empty() {
            Self::NotFound
        } else {
            Self::Unsynced(text.to_string())
        }
    }

    /// Check if lyrics were found
    #[must_use]
    pub const fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }

    /// Check if lyrics are synced
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        matches!(self, Self::Synced(_))
    }

    /// Get as `LyricDocument` if synced
    #[must_use]
    pub const fn as_synced(&self) -> Option<&LyricDocument> {
        match self {
            Self::Synced(document) => Some(document),
            _ => None,
        }
    }

    /// Get text content regardless of type
    #[must_use]
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Synced(document) => Some(document.text()),
            Self::Unsynced(text) => Some(text.clone()),
            Self::NotFound => None,
        }
    }
}

impl From<LyricDocument> for Lyrics {
    fn from(document: LyricDocument) -> Self {
        if document.is_empty() {
            Self::NotFound
        } else {
            Self::Synced(document)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_synced() {
        let lyrics = Lyrics::from_text("[ar:Someone]\n[00:01.00]Hello\n[00:02.00]World");
        assert!(lyrics.is_synced());
        assert_eq!(lyrics.as_synced().map(LyricDocument::len), Some(2));
        assert_eq!(lyrics.text().as_deref(), Some("Hello\nWorld"));
    }

    #[test]
    fn test_from_text_unsynced() {
        let lyrics = Lyrics::from_text("\n  First verse\nSecond verse  \n");
        assert_eq!(lyrics, Lyrics::Unsynced("First verse\nSecond verse".to_string()));
        assert!(lyrics.is_found());
        assert!(!lyrics.is_synced());
        assert!(lyrics.as_synced().is_none());
    }

    #[test]
    fn test_from_text_blank() {
        assert_eq!(Lyrics::from_text(""), Lyrics::NotFound);
        assert_eq!(Lyrics::from_text(" \n\t\n"), Lyrics::NotFound);
        assert!(!Lyrics::NotFound.is_found());
        assert_eq!(Lyrics::NotFound.text(), None);
    }

    #[test]
    fn test_from_text_only_blank_timed_lines_is_unsynced() {
        // Timed lines with no text are dropped, leaving only the raw markup
        let lyrics = Lyrics::from_text("[00:01.00]\n[00:02.00]   ");
        assert!(matches!(lyrics, Lyrics::Unsynced(_)));
    }

    #[test]
    fn test_from_empty_document() {
        assert_eq!(Lyrics::from(LyricDocument::default()), Lyrics::NotFound);
        let document = LyricDocument::parse("[00:01.00]Hi");
        assert!(Lyrics::from(document).is_synced());
    }
}
