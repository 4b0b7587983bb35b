//! The one-row metadata table
//!
//! Captures the constants needed to replay a log at its recorded scale and
//! speed.

use super::table::{Record, Table};
use crate::error::ReplayError;
use crate::tuning::Tuning;

pub const METADATA_COLUMNS: [&str; 11] = [
    "agent_type",
    "game_width",
    "game_height",
    "bird_x_ratio",
    "bird_width",
    "bird_height",
    "gravity",
    "pipe_gap",
    "pipe_width",
    "pipe_velocity",
    "pipes_interval",
];

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRecord {
    pub agent_type: String,
    pub game_width: f32,
    pub game_height: f32,
    pub bird_x_ratio: f32,
    pub bird_width: f32,
    pub bird_height: f32,
    pub gravity: f32,
    pub pipe_gap: f32,
    pub pipe_width: f32,
    pub pipe_velocity: f32,
    pub pipes_interval: f32,
}

impl From<&Tuning> for MetadataRecord {
    fn from(tuning: &Tuning) -> Self {
        Self {
            agent_type: tuning.agent_type.clone(),
            game_width: tuning.world_width,
            game_height: tuning.world_height,
            bird_x_ratio: tuning.bird_x_ratio,
            bird_width: tuning.bird_width,
            bird_height: tuning.bird_height,
            gravity: tuning.gravity,
            pipe_gap: tuning.pipe_gap,
            pipe_width: tuning.pipe_width,
            pipe_velocity: tuning.pipe_velocity,
            pipes_interval: tuning.pipes_interval,
        }
    }
}

impl MetadataRecord {
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(METADATA_COLUMNS);
        table.push_row(vec![
            self.agent_type.clone(),
            self.game_width.to_string(),
            self.game_height.to_string(),
            self.bird_x_ratio.to_string(),
            self.bird_width.to_string(),
            self.bird_height.to_string(),
            self.gravity.to_string(),
            self.pipe_gap.to_string(),
            self.pipe_width.to_string(),
            self.pipe_velocity.to_string(),
            self.pipes_interval.to_string(),
        ]);
        table
    }

    /// Read the single data row. Every numeric column must be present and
    /// finite; world and bird sizes must be positive.
    pub fn from_table(table: &Table) -> Result<Self, ReplayError> {
        let row = table.first_record().ok_or(ReplayError::MissingMetadataRow)?;

        let agent_type = row
            .get("agent_type")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| invalid(&row, "agent_type"))?;

        Ok(Self {
            agent_type,
            game_width: positive(&row, "game_width")?,
            game_height: positive(&row, "game_height")?,
            bird_x_ratio: finite(&row, "bird_x_ratio")?,
            bird_width: positive(&row, "bird_width")?,
            bird_height: positive(&row, "bird_height")?,
            gravity: finite(&row, "gravity")?,
            pipe_gap: finite(&row, "pipe_gap")?,
            pipe_width: finite(&row, "pipe_width")?,
            pipe_velocity: finite(&row, "pipe_velocity")?,
            pipes_interval: finite(&row, "pipes_interval")?,
        })
    }

    /// `base` with every recorded constant overwritten
    pub fn apply_to(&self, base: &Tuning) -> Tuning {
        Tuning {
            agent_type: self.agent_type.clone(),
            world_width: self.game_width,
            world_height: self.game_height,
            bird_x_ratio: self.bird_x_ratio,
            bird_width: self.bird_width,
            bird_height: self.bird_height,
            gravity: self.gravity,
            pipe_gap: self.pipe_gap,
            pipe_width: self.pipe_width,
            pipe_velocity: self.pipe_velocity,
            pipes_interval: self.pipes_interval,
            ..base.clone()
        }
    }
}

fn invalid(row: &Record<'_>, column: &'static str) -> ReplayError {
    ReplayError::InvalidMetadata {
        column,
        value: row.get(column).unwrap_or_default().to_string(),
    }
}

fn finite(row: &Record<'_>, column: &'static str) -> Result<f32, ReplayError> {
    row.number(column)
        .map(|n| n as f32)
        .filter(|n| n.is_finite())
        .ok_or_else(|| invalid(row, column))
}

fn positive(row: &Record<'_>, column: &'static str) -> Result<f32, ReplayError> {
    finite(row, column)?;
    row.number(column)
        .map(|n| n as f32)
        .filter(|n| *n > 0.0)
        .ok_or_else(|| invalid(row, column))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(text: &str) -> Table {
        Table::parse(text, "metadata.csv").unwrap()
    }

    #[test]
    fn test_layout_matches_recorded_columns() {
        let text = MetadataRecord::from(&Tuning::default()).to_table().to_text();
        assert_eq!(
            text,
            "agent_type,game_width,game_height,bird_x_ratio,bird_width,bird_height,gravity,pipe_gap,pipe_width,pipe_velocity,pipes_interval\n\
             human,500,700,0.3,50,40,600,200,75,100,3"
        );
    }

    #[test]
    fn test_parse_and_apply() {
        let meta = MetadataRecord::from_table(&table(
            "agent_type,game_width,game_height,bird_x_ratio,bird_width,bird_height,gravity,pipe_gap,pipe_width,pipe_velocity,pipes_interval\n\
             bot,800,600,0.25,34,24,900,150,60,120,2.5",
        ))
        .unwrap();
        assert_eq!(meta.agent_type, "bot");

        let base = Tuning {
            pipe_start_point: 640.0,
            ..Tuning::default()
        };
        let tuning = meta.apply_to(&base);
        assert_eq!(tuning.world_width, 800.0);
        assert_eq!(tuning.gravity, 900.0);
        assert_eq!(tuning.pipes_interval, 2.5);
        assert_eq!(tuning.bird_x(), 200.0);
        // Not part of the metadata: kept from the base
        assert_eq!(tuning.pipe_start_point, 640.0);
    }

    #[test]
    fn test_missing_row() {
        let err = MetadataRecord::from_table(&table("agent_type,game_width")).unwrap_err();
        assert!(matches!(err, ReplayError::MissingMetadataRow));
    }

    #[test]
    fn test_non_numeric_cell_rejected() {
        let text = MetadataRecord::from(&Tuning::default())
            .to_table()
            .to_text()
            .replace(",600,", ",heavy,");
        let err = MetadataRecord::from_table(&table(&text)).unwrap_err();
        match err {
            ReplayError::InvalidMetadata { column, value } => {
                assert_eq!(column, "gravity");
                assert_eq!(value, "heavy");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_zero_world_rejected() {
        let text = MetadataRecord::from(&Tuning::default())
            .to_table()
            .to_text()
            .replace("human,500,", "human,0,");
        let err = MetadataRecord::from_table(&table(&text)).unwrap_err();
        assert!(matches!(err, ReplayError::InvalidMetadata { column: "game_width", .. }));
    }

    #[test]
    fn test_missing_column_rejected() {
        let err = MetadataRecord::from_table(&table("agent_type,game_width\nhuman,500")).unwrap_err();
        assert!(matches!(err, ReplayError::InvalidMetadata { column: "game_height", .. }));
    }
}
