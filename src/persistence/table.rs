//! Delimited text tables
//!
//! A header row of column names followed by data rows, cells joined by
//! [`DELIMITER`], rows joined by `\n`. No quoting: every cell we write is
//! delimiter-free (the pipe list is embedded as base64).

use crate::error::ReplayError;

pub const DELIMITER: char = ',';

/// A parsed cell: numeric-looking text becomes a number, everything else
/// passes through as text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Number(f64),
    Text(&'a str),
}

impl<'a> Cell<'a> {
    pub fn parse(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() && !trimmed.is_empty() => Cell::Number(n),
            _ => Cell::Text(raw),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Keep the first `max` rows; returns how many were dropped
    pub fn truncate_rows(&mut self, max: usize) -> usize {
        let dropped = self.rows.len().saturating_sub(max);
        self.rows.truncate(max);
        dropped
    }

    pub fn to_text(&self) -> String {
        let delimiter = DELIMITER.to_string();
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.headers.join(&delimiter));
        for row in &self.rows {
            lines.push(row.join(&delimiter));
        }
        lines.join("\n")
    }

    /// Parse table text. `entry` names the source in the error.
    pub fn parse(text: &str, entry: &'static str) -> Result<Self, ReplayError> {
        let mut lines = text
            .trim()
            .split('\n')
            .map(|line| line.trim_end_matches('\r'));

        let header = match lines.next() {
            Some(line) if !line.trim().is_empty() => line,
            _ => return Err(ReplayError::MissingHeader { entry }),
        };

        let headers = header.split(DELIMITER).map(|h| h.trim().to_string()).collect();
        let rows = lines
            .filter(|line| !line.is_empty())
            .map(|line| line.split(DELIMITER).map(str::to_string).collect())
            .collect();

        Ok(Self { headers, rows })
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(move |cells| Record {
            table: self,
            cells: cells.as_slice(),
        })
    }

    pub fn first_record(&self) -> Option<Record<'_>> {
        self.records().next()
    }
}

/// One data row with by-name access
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    table: &'a Table,
    cells: &'a [String],
}

impl<'a> Record<'a> {
    /// Raw cell text under `column`
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.table.column(column)?;
        self.cells.get(idx).map(String::as_str)
    }

    /// Raw cell text under the first of `columns` present in the header
    pub fn get_any(&self, columns: &[&str]) -> Option<&'a str> {
        columns.iter().find_map(|c| self.get(c))
    }

    pub fn cell(&self, column: &str) -> Option<Cell<'a>> {
        self.get(column).map(Cell::parse)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.cell(column)?.as_number()
    }

    pub fn number_any(&self, columns: &[&str]) -> Option<f64> {
        Cell::parse(self.get_any(columns)?).as_number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_parse() {
        assert_eq!(Cell::parse("42"), Cell::Number(42.0));
        assert_eq!(Cell::parse("-1.5"), Cell::Number(-1.5));
        assert_eq!(Cell::parse("human"), Cell::Text("human"));
        assert_eq!(Cell::parse(""), Cell::Text(""));
        assert_eq!(Cell::parse("NaN"), Cell::Text("NaN"));
    }

    #[test]
    fn test_text_layout() {
        let mut table = Table::new(["a", "b"]);
        table.push_row(vec!["1".into(), "x".into()]);
        table.push_row(vec!["2".into(), "y".into()]);
        assert_eq!(table.to_text(), "a,b\n1,x\n2,y");
    }

    #[test]
    fn test_parse_records() {
        let table = Table::parse("a,b\r\n1,x\r\n\r\n2,y\n", "t.csv").unwrap();
        assert_eq!(table.headers(), ["a", "b"]);
        assert_eq!(table.len(), 2);
        let rows: Vec<_> = table.records().collect();
        assert_eq!(rows[0].number("a"), Some(1.0));
        assert_eq!(rows[1].get("b"), Some("y"));
        assert_eq!(rows[1].get("c"), None);
        assert_eq!(rows[0].get_any(&["c", "b"]), Some("x"));
    }

    #[test]
    fn test_header_only_is_valid() {
        let table = Table::parse("a,b", "t.csv").unwrap();
        assert!(table.is_empty());
        assert!(table.first_record().is_none());
    }

    #[test]
    fn test_empty_text_has_no_header() {
        assert!(matches!(
            Table::parse(" \n \n", "frames.csv"),
            Err(ReplayError::MissingHeader { entry: "frames.csv" })
        ));
    }

    #[test]
    fn test_short_row_yields_missing_cells() {
        let table = Table::parse("a,b,c\n1", "t.csv").unwrap();
        let row = table.first_record().unwrap();
        assert_eq!(row.number("a"), Some(1.0));
        assert_eq!(row.get("c"), None);
    }

    #[test]
    fn test_truncate_rows() {
        let mut table = Table::parse("a\n1\n2\n3", "t.csv").unwrap();
        assert_eq!(table.truncate_rows(2), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.truncate_rows(5), 0);
    }
}
