//! Replay archive codec
//!
//! An archive holds two delimited text entries:
//! - `frames.csv`: one row per recorded snapshot
//! - `metadata.csv`: one row of simulation constants
//!
//! Reading is pure: nothing here touches a running session.

pub mod archive;
pub mod frames;
pub mod metadata;
pub mod table;

use chrono::NaiveDateTime;
use log::info;

pub use archive::{Archive, DirArchive, FRAMES_ENTRY, METADATA_ENTRY, MemoryArchive};
pub use frames::ReplayFrame;
pub use metadata::MetadataRecord;

use crate::consts::{MAX_FRAMES_BYTES, MAX_REPLAY_FRAMES};
use crate::error::{ImportWarning, ReplayError};
use crate::recorder::FrameSnapshot;
use crate::tuning::Tuning;
use table::Table;

/// Ceilings applied when reading a frames entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportLimits {
    pub max_frames_bytes: usize,
    pub max_frames: usize,
}

impl Default for ImportLimits {
    fn default() -> Self {
        Self {
            max_frames_bytes: MAX_FRAMES_BYTES,
            max_frames: MAX_REPLAY_FRAMES,
        }
    }
}

/// A validated archive, ready to configure a session
#[derive(Debug, Clone)]
pub struct ReplayData {
    pub tuning: Tuning,
    pub frames: Vec<ReplayFrame>,
    pub warnings: Vec<ImportWarning>,
}

fn require_entry(archive: &dyn Archive, name: &'static str) -> Result<Vec<u8>, ReplayError> {
    archive
        .read_entry(name)?
        .ok_or(ReplayError::MissingEntry { name })
}

/// Read and validate an archive. Metadata overrides `base` wholesale.
pub fn read_replay(archive: &dyn Archive, base: &Tuning) -> Result<ReplayData, ReplayError> {
    read_replay_with_limits(archive, base, &ImportLimits::default())
}

pub fn read_replay_with_limits(
    archive: &dyn Archive,
    base: &Tuning,
    limits: &ImportLimits,
) -> Result<ReplayData, ReplayError> {
    let frames_bytes = require_entry(archive, FRAMES_ENTRY)?;
    let metadata_bytes = require_entry(archive, METADATA_ENTRY)?;

    let metadata_text = String::from_utf8_lossy(&metadata_bytes);
    let metadata = MetadataRecord::from_table(&Table::parse(&metadata_text, METADATA_ENTRY)?)?;
    let (frames, warnings) = frames::parse_frames(&frames_bytes, limits)?;

    Ok(ReplayData {
        tuning: metadata.apply_to(base),
        frames,
        warnings,
    })
}

/// Write both entries for `frames` recorded under `tuning`
pub fn write_replay(
    archive: &mut dyn Archive,
    frames: &[FrameSnapshot],
    tuning: &Tuning,
) -> Result<(), ReplayError> {
    let frames_text = frames::frames_table(frames).to_text();
    let metadata_text = MetadataRecord::from(tuning).to_table().to_text();

    archive.write_entry(FRAMES_ENTRY, frames_text.as_bytes())?;
    archive.write_entry(METADATA_ENTRY, metadata_text.as_bytes())?;

    info!(
        "Wrote replay archive: {} frames, {} bytes",
        frames.len(),
        frames_text.len()
    );
    Ok(())
}

/// Download name for an archive captured at `captured_at`
pub fn export_file_name(captured_at: NaiveDateTime) -> String {
    captured_at
        .format("flappy_bird_game_%Y%m%d_%H%M%S.zip")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn snapshot(frame_id: u64) -> FrameSnapshot {
        FrameSnapshot {
            episode_id: 0,
            frame_id,
            bird_y: 330.0 + frame_id as f32,
            bird_velocity: 10.0,
            action: frame_id == 0,
            pipes: Vec::new(),
            score: 0,
            game_over: frame_id == 2,
        }
    }

    #[test]
    fn test_export_file_name() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 1)
            .unwrap();
        assert_eq!(export_file_name(at), "flappy_bird_game_20240307_090501.zip");
    }

    #[test]
    fn test_write_then_read() {
        let mut archive = MemoryArchive::new();
        let tuning = Tuning {
            agent_type: "bot".into(),
            gravity: 750.0,
            ..Tuning::default()
        };
        let frames: Vec<_> = (0..3).map(snapshot).collect();
        write_replay(&mut archive, &frames, &tuning).unwrap();

        let data = read_replay(&archive, &Tuning::default()).unwrap();
        assert_eq!(data.tuning.agent_type, "bot");
        assert_eq!(data.tuning.gravity, 750.0);
        assert_eq!(data.frames.len(), 3);
        assert_eq!(data.frames[1].bird_y, Some(331.0));
        assert_eq!(data.frames[2].game_over, Some(true));
        assert!(data.warnings.is_empty());
    }

    #[test]
    fn test_missing_entries() {
        let mut archive = MemoryArchive::new();
        archive.write_entry(METADATA_ENTRY, b"agent_type\nhuman").unwrap();
        assert!(matches!(
            read_replay(&archive, &Tuning::default()),
            Err(ReplayError::MissingEntry { name: FRAMES_ENTRY })
        ));

        let mut archive = MemoryArchive::new();
        archive.write_entry(FRAMES_ENTRY, b"episode_id").unwrap();
        assert!(matches!(
            read_replay(&archive, &Tuning::default()),
            Err(ReplayError::MissingEntry { name: METADATA_ENTRY })
        ));
    }

    #[test]
    fn test_empty_metadata_rejected() {
        let mut archive = MemoryArchive::new();
        write_replay(&mut archive, &[snapshot(0)], &Tuning::default()).unwrap();
        archive.write_entry(METADATA_ENTRY, b"").unwrap();
        assert!(matches!(
            read_replay(&archive, &Tuning::default()),
            Err(ReplayError::MissingHeader { entry: METADATA_ENTRY })
        ));
    }

    #[test]
    fn test_header_only_frames_is_valid() {
        let mut archive = MemoryArchive::new();
        write_replay(&mut archive, &[], &Tuning::default()).unwrap();
        let data = read_replay(&archive, &Tuning::default()).unwrap();
        assert!(data.frames.is_empty());
    }

    #[test]
    fn test_dir_archive_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut archive = DirArchive::new(dir.path());
        write_replay(&mut archive, &[snapshot(0), snapshot(1)], &Tuning::default()).unwrap();
        let data = read_replay(&archive, &Tuning::default()).unwrap();
        assert_eq!(data.frames.len(), 2);
        assert_eq!(data.frames[0].action, Some(true));
    }
}
