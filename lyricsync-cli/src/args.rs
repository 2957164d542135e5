use clap::Parser;
use std::path::PathBuf;

/// Play back the lyrics for a media file (read from the .lrc file next to it)
/// or for an .lrc file directly, printing each line as it becomes active.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "lyricsync", version, about)]
pub struct Args {
    /// Media file or .lrc file to play
    pub path: PathBuf,

    /// Jump to the given line (0-based) right after starting
    #[arg(long, value_name = "INDEX")]
    pub seek_line: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_path_only() {
        let args = Args::try_parse_from(["lyricsync", "song.mp3"]).unwrap();
        assert_eq!(args.path, PathBuf::from("song.mp3"));
        assert_eq!(args.seek_line, None);
    }

    #[test]
    fn test_seek_line() {
        let args = Args::try_parse_from(["lyricsync", "--seek-line", "4", "song.lrc"]).unwrap();
        assert_eq!(args.path, PathBuf::from("song.lrc"));
        assert_eq!(args.seek_line, Some(4));
    }

    #[test]
    fn test_help() {
        let err = Args::try_parse_from(["lyricsync", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_errors() {
        assert!(Args::try_parse_from(["lyricsync"]).is_err());
        assert!(Args::try_parse_from(["lyricsync", "song.mp3", "--seek-line"]).is_err());
        assert!(Args::try_parse_from(["lyricsync", "song.mp3", "--seek-line", "-1"]).is_err());
        assert!(Args::try_parse_from(["lyricsync", "song.mp3", "--seek-line", "x"]).is_err());
        assert!(Args::try_parse_from(["lyricsync", "song.mp3", "--loop"]).is_err());
        assert!(Args::try_parse_from(["lyricsync", "a.mp3", "b.mp3"]).is_err());
    }

    #[test]
    fn test_command_is_well_formed() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
