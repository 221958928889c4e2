//! Append-only data log
//!
//! One record per tick (dynamic simulations) or per accepted parameter
//! change (static simulations). Records are never edited; `clear` is only
//! reachable through a simulation reset.

use serde::Serialize;

use super::quantity::Quantity;

/// Column schema entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: &'static str,
    pub unit: Option<&'static str>,
    /// Decimal places on export (ignored for counts and text)
    pub precision: usize,
}

impl Column {
    pub const fn new(name: &'static str, unit: Option<&'static str>, precision: usize) -> Self {
        Self {
            name,
            unit,
            precision,
        }
    }

    /// Header text, e.g. `Time (s)`
    pub fn header(&self) -> String {
        match self.unit {
            Some(unit) => format!("{} ({})", self.name, unit),
            None => self.name.to_string(),
        }
    }
}

/// A single logged value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Cell {
    Number(f64),
    Quantity(Quantity),
    Count(u32),
    Text(String),
}

impl Cell {
    /// Numeric view; `None` for text and the infinite sentinel
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Quantity(q) => q.finite(),
            Cell::Count(n) => Some(f64::from(*n)),
            Cell::Text(_) => None,
        }
    }

    pub fn format(&self, precision: usize) -> String {
        match self {
            Cell::Number(v) => crate::fixed(*v, precision),
            Cell::Quantity(q) => q.format(precision),
            Cell::Count(n) => n.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<Quantity> for Cell {
    fn from(value: Quantity) -> Self {
        Cell::Quantity(value)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Count(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// One row of the log
pub type Record = Vec<Cell>;

/// Ordered, append-only record sequence with a fixed column schema
#[derive(Debug, Clone, Serialize)]
pub struct DataLog {
    columns: &'static [Column],
    records: Vec<Record>,
}

impl DataLog {
    pub fn new(columns: &'static [Column]) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    pub fn columns(&self) -> &'static [Column] {
        self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&Record> {
        self.records.last()
    }

    /// Append a record; its width must match the schema
    pub fn push(&mut self, record: Record) {
        debug_assert_eq!(record.len(), self.columns.len(), "record width mismatch");
        self.records.push(record);
    }

    /// Numeric values of one column, skipping text and sentinels
    pub fn series(&self, column: usize) -> impl Iterator<Item = f64> + '_ {
        self.records
            .iter()
            .filter_map(move |r| r.get(column).and_then(Cell::as_f64))
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[Column] = &[
        Column::new("Time", Some("s"), 3),
        Column::new("Image Distance", Some("px"), 2),
    ];

    #[test]
    fn test_header() {
        assert_eq!(COLUMNS[0].header(), "Time (s)");
        assert_eq!(Column::new("Turns", None, 0).header(), "Turns");
    }

    #[test]
    fn test_append_only_order() {
        let mut log = DataLog::new(COLUMNS);
        assert!(log.is_empty());
        log.push(vec![0.016.into(), Quantity::Finite(75.0).into()]);
        log.push(vec![0.032.into(), Quantity::Infinite.into()]);
        assert_eq!(log.len(), 2);
        assert_eq!(log.records()[0][0], Cell::Number(0.016));
        assert_eq!(log.last().map(|r| r[1].clone()), Some(Cell::Quantity(Quantity::Infinite)));
    }

    #[test]
    fn test_series_skips_sentinels() {
        let mut log = DataLog::new(COLUMNS);
        log.push(vec![0.016.into(), Quantity::Finite(75.0).into()]);
        log.push(vec![0.032.into(), Quantity::Infinite.into()]);
        let image: Vec<f64> = log.series(1).collect();
        assert_eq!(image, vec![75.0]);
    }

    #[test]
    fn test_cell_format() {
        assert_eq!(Cell::Number(1.0 / 3.0).format(3), "0.333");
        assert_eq!(Cell::Count(12).format(3), "12");
        assert_eq!(Cell::Text("Series".into()).format(3), "Series");
        assert_eq!(Cell::Quantity(Quantity::Infinite).format(2), "∞");
    }
}
