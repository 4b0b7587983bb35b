//! The frames table
//!
//! One row per snapshot. The pipe list rides in a single cell as base64 of a
//! JSON array so the row stays delimiter-free.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::warn;

use super::ImportLimits;
use super::archive::FRAMES_ENTRY;
use super::table::{Record, Table};
use crate::error::{ImportWarning, ReplayError};
use crate::recorder::{FrameSnapshot, PipeRecord};

pub const FRAME_COLUMNS: [&str; 9] = [
    "episode_id",
    "frame_id",
    "bird_y",
    "bird_velocity",
    "action",
    "pipe_pair_number",
    "pipes",
    "score",
    "game_is_over",
];

/// Pipes cell written when no pair is active
pub const NO_PIPES: &str = "null";

const PIPES_COLUMNS: &[&str] = &["pipes", "pipes_encoded"];
const GAME_OVER_COLUMNS: &[&str] = &["game_is_over", "game_over"];

pub fn encode_pipes(pipes: &[PipeRecord]) -> String {
    if pipes.is_empty() {
        return NO_PIPES.to_string();
    }
    match serde_json::to_string(pipes) {
        Ok(json) => STANDARD.encode(json),
        Err(e) => {
            warn!("Failed to encode pipe list: {e}");
            NO_PIPES.to_string()
        }
    }
}

/// `None` if the cell is neither the sentinel nor a valid encoded list
pub fn decode_pipes(cell: &str) -> Option<Vec<PipeRecord>> {
    let cell = cell.trim();
    if cell == NO_PIPES {
        return Some(Vec::new());
    }
    let json = STANDARD.decode(cell).ok()?;
    serde_json::from_slice(&json).ok()
}

fn bool_cell(flag: bool) -> String {
    if flag { "1" } else { "0" }.to_string()
}

pub fn frame_row(frame: &FrameSnapshot) -> Vec<String> {
    vec![
        frame.episode_id.to_string(),
        frame.frame_id.to_string(),
        frame.bird_y.to_string(),
        frame.bird_velocity.to_string(),
        bool_cell(frame.action),
        frame.pipe_pair_count().to_string(),
        encode_pipes(&frame.pipes),
        frame.score.to_string(),
        bool_cell(frame.game_over),
    ]
}

pub fn frames_table(frames: &[FrameSnapshot]) -> Table {
    let mut table = Table::new(FRAME_COLUMNS);
    for frame in frames {
        table.push_row(frame_row(frame));
    }
    table
}

/// A decoded row. Scalars that were missing or malformed are `None` and
/// left untouched on playback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReplayFrame {
    pub episode_id: Option<i64>,
    pub frame_id: Option<u64>,
    pub bird_y: Option<f32>,
    pub bird_velocity: Option<f32>,
    pub action: Option<bool>,
    pub pipes: Vec<PipeRecord>,
    pub score: Option<u32>,
    pub game_over: Option<bool>,
}

/// Tracks whether any cell of the row failed to decode
struct RowDecoder<'a> {
    record: Record<'a>,
    malformed: bool,
}

impl RowDecoder<'_> {
    fn field<T>(&mut self, columns: &[&str], parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        let value = self.record.get_any(columns).and_then(|raw| parse(raw.trim()));
        if value.is_none() {
            self.malformed = true;
        }
        value
    }
}

fn parse_f32(raw: &str) -> Option<f32> {
    raw.parse::<f32>().ok().filter(|n| n.is_finite())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Decode one row; the flag reports whether any cell was malformed
pub fn decode_row(record: Record<'_>) -> (ReplayFrame, bool) {
    let mut row = RowDecoder {
        record,
        malformed: false,
    };
    let frame = ReplayFrame {
        episode_id: row.field(&["episode_id"], |s| s.parse().ok()),
        frame_id: row.field(&["frame_id"], |s| s.parse().ok()),
        bird_y: row.field(&["bird_y"], parse_f32),
        bird_velocity: row.field(&["bird_velocity"], parse_f32),
        action: row.field(&["action"], parse_flag),
        pipes: row.field(PIPES_COLUMNS, decode_pipes).unwrap_or_default(),
        score: row.field(&["score"], |s| s.parse().ok()),
        game_over: row.field(GAME_OVER_COLUMNS, parse_flag),
    };
    (frame, row.malformed)
}

/// Cut an oversized payload back to the last row boundary at or before
/// `max` bytes
pub fn cap_payload(bytes: &[u8], max: usize) -> (String, Option<ImportWarning>) {
    if bytes.len() <= max {
        return (String::from_utf8_lossy(bytes).into_owned(), None);
    }

    let kept = if bytes[max] == b'\n' {
        max
    } else {
        bytes[..max].iter().rposition(|&b| b == b'\n').unwrap_or(0)
    };
    let warning = ImportWarning::Truncated {
        original_bytes: bytes.len(),
        kept_bytes: kept,
    };
    (String::from_utf8_lossy(&bytes[..kept]).into_owned(), Some(warning))
}

/// Decode the frames entry under the import limits
pub fn parse_frames(
    bytes: &[u8],
    limits: &ImportLimits,
) -> Result<(Vec<ReplayFrame>, Vec<ImportWarning>), ReplayError> {
    let mut warnings = Vec::new();

    let (text, truncated) = cap_payload(bytes, limits.max_frames_bytes);
    warnings.extend(truncated);

    let mut table = Table::parse(&text, FRAMES_ENTRY)?;
    let dropped = table.truncate_rows(limits.max_frames);
    if dropped > 0 {
        warnings.push(ImportWarning::RowsCapped {
            kept: table.len(),
            dropped,
        });
    }

    let mut malformed = 0;
    let frames = table
        .records()
        .map(|record| {
            let (frame, bad) = decode_row(record);
            malformed += usize::from(bad);
            frame
        })
        .collect();
    if malformed > 0 {
        warnings.push(ImportWarning::MalformedRows { rows: malformed });
    }

    for warning in &warnings {
        warn!("{warning}");
    }
    Ok((frames, warnings))
}
