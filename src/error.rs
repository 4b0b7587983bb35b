//! Error and warning types for recording export and replay import.

use std::fmt;
use std::io;

/// Failures that abort an export or import before any session state changes.
#[derive(Debug)]
pub enum ReplayError {
    /// Reading or writing an archive entry failed.
    Io(io::Error),
    /// The archive lacks a required named entry.
    MissingEntry {
        /// Entry that was looked up.
        name: &'static str,
    },
    /// A table entry has no header row.
    MissingHeader {
        /// Entry whose text was empty.
        entry: &'static str,
    },
    /// The metadata table has a header but no data row.
    MissingMetadataRow,
    /// A metadata cell is missing, non-numeric or out of range.
    InvalidMetadata {
        /// Column name.
        column: &'static str,
        /// Raw cell text (empty if the cell was absent).
        value: String,
    },
    /// Import or export attempted while a live episode is running.
    EpisodeRunning,
    /// Export attempted with nothing recorded.
    EmptyLog,
}

impl ReplayError {
    /// Refused because of session state, not because of bad data.
    pub fn is_guard_violation(&self) -> bool {
        matches!(self, Self::EpisodeRunning | Self::EmptyLog)
    }
}

impl fmt::Display for ReplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::MissingEntry { name } => write!(f, "invalid replay archive: missing {name}"),
            Self::MissingHeader { entry } => write!(f, "invalid replay archive: {entry} has no header row"),
            Self::MissingMetadataRow => write!(f, "invalid replay archive: metadata has no data row"),
            Self::InvalidMetadata { column, value } => {
                write!(f, "invalid metadata value for {column}: {value:?}")
            }
            Self::EpisodeRunning => write!(f, "can't do that while an episode is running"),
            Self::EmptyLog => write!(f, "nothing recorded to export"),
        }
    }
}

impl std::error::Error for ReplayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ReplayError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

/// Non-fatal import findings; playback proceeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportWarning {
    /// The frames payload exceeded the byte ceiling and was cut at a row boundary.
    Truncated {
        /// Size of the payload as stored.
        original_bytes: usize,
        /// Bytes kept after cutting.
        kept_bytes: usize,
    },
    /// Rows beyond the row ceiling were dropped.
    RowsCapped {
        /// Rows kept.
        kept: usize,
        /// Rows dropped.
        dropped: usize,
    },
    /// Rows with cells that failed to decode (recovered per row).
    MalformedRows {
        /// Number of affected rows.
        rows: usize,
    },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated {
                original_bytes,
                kept_bytes,
            } => write!(
                f,
                "replay truncated: kept {kept_bytes} of {original_bytes} bytes"
            ),
            Self::RowsCapped { kept, dropped } => {
                write!(f, "replay capped at {kept} frames ({dropped} dropped)")
            }
            Self::MalformedRows { rows } => write!(f, "{rows} replay rows had malformed cells"),
        }
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    /// Id of the replay that is now playing.
    pub replay_id: u64,
    /// Snapshots queued for playback.
    pub frames: usize,
    /// Non-fatal findings.
    pub warnings: Vec<ImportWarning>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_classification() {
        assert!(ReplayError::EpisodeRunning.is_guard_violation());
        assert!(ReplayError::EmptyLog.is_guard_violation());
        assert!(!ReplayError::MissingMetadataRow.is_guard_violation());
    }

    #[test]
    fn test_messages() {
        let err = ReplayError::MissingEntry { name: "frames.csv" };
        assert_eq!(err.to_string(), "invalid replay archive: missing frames.csv");
        let warn = ImportWarning::RowsCapped { kept: 10, dropped: 2 };
        assert_eq!(warn.to_string(), "replay capped at 10 frames (2 dropped)");
    }

    #[test]
    fn test_io_source() {
        use std::error::Error;
        let err = ReplayError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(err.source().is_some());
    }
}
