//! CSV rendering and re-parsing of data logs
//!
//! Format:
//! - First line: column headers, `Name (unit)`
//! - One line per record, comma separated, `\n` line endings
//! - Numbers at the column's fixed precision, `∞` for the infinite sentinel
//! - Fields are quoted only when they contain a delimiter, quote or newline

use csv::{ErrorKind, ReaderBuilder, Terminator, WriterBuilder};
use thiserror::Error;

use crate::sim::{Cell, DataLog, INFINITY_MARK, Quantity};

/// Malformed CSV on re-read
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty document")]
    Empty,
    #[error("line {line}: expected {expected} fields, found {found}")]
    Width { line: u64, expected: u64, found: u64 },
    #[error("malformed csv: {0}")]
    Csv(#[source] csv::Error),
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            ErrorKind::UnequalLengths {
                pos,
                expected_len,
                len,
            } => ParseError::Width {
                line: pos.as_ref().map_or(0, |p| p.line()),
                expected: *expected_len,
                found: *len,
            },
            _ => ParseError::Csv(err),
        }
    }
}

/// Header and rows read back from an exported file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Render the full log, header first
pub fn render(log: &DataLog) -> Result<Vec<u8>, csv::Error> {
    let columns = log.columns();
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(columns.iter().map(|c| c.header()))?;
    for record in log.records() {
        writer.write_record(
            record
                .iter()
                .zip(columns)
                .map(|(cell, column)| cell.format(column.precision)),
        )?;
    }
    writer.into_inner().map_err(|e| e.into_error().into())
}

fn parse_cell(field: &str) -> Cell {
    let trimmed = field.trim();
    if trimmed == INFINITY_MARK {
        return Cell::Quantity(Quantity::Infinite);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Number(v),
        _ => Cell::Text(field.to_string()),
    }
}

/// Parse text produced by [`render`]
pub fn parse(text: &str) -> Result<ParsedTable, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(parse_cell).collect());
    }
    Ok(ParsedTable { headers, rows })
}
