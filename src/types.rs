//! Core data types for WaveSense
//!
//! These types describe a decoded waveform dump:
//!
//! - [`ColumnMap`] - header mapping of row positions to signal names
//! - [`SampleRow`] - one whitespace-tokenized timestep as read from the dump
//! - [`SignalSeries`] - one signal's decoded values over time
//! - [`WaveformDocument`] - the full dump with its time vector
//!
//! Every series in a document has the same length as the time vector.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A decoded sample value
pub type SampleValue = i64;

/// Header mapping from row position to signal name
///
/// Position 0 is always the time axis. Positions are unique; inserting a
/// position twice replaces the earlier name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMap {
    columns: BTreeMap<usize, String>,
}

impl ColumnMap {
    /// Row position of the time axis
    pub const TIME_COLUMN: usize = 0;

    /// Create an empty column map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` at `position`, returning the name it replaced
    pub fn insert(&mut self, position: usize, name: impl Into<String>) -> Option<String> {
        self.columns.insert(position, name.into())
    }

    /// Get the signal name declared at `position`
    pub fn get(&self, position: usize) -> Option<&str> {
        self.columns.get(&position).map(String::as_str)
    }

    /// Number of declared columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no column was declared
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether the time axis column was declared
    pub fn has_time_column(&self) -> bool {
        self.columns.contains_key(&Self::TIME_COLUMN)
    }

    /// Iterate `(position, name)` pairs in ascending position order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.columns.iter().map(|(pos, name)| (*pos, name.as_str()))
    }
}

impl FromIterator<(usize, String)> for ColumnMap {
    fn from_iter<I: IntoIterator<Item = (usize, String)>>(iter: I) -> Self {
        Self {
            columns: iter.into_iter().collect(),
        }
    }
}

/// One timestep's raw tokens, borrowed from the dump text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRow<'a> {
    tokens: Vec<&'a str>,
}

impl<'a> SampleRow<'a> {
    /// Split a data line on whitespace
    pub fn tokenize(line: &'a str) -> Self {
        Self {
            tokens: line.split_whitespace().collect(),
        }
    }

    /// Number of tokens in the row
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the row has no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Raw token at `position`
    pub fn token(&self, position: usize) -> Option<&'a str> {
        self.tokens.get(position).copied()
    }
}

/// One signal's decoded values over time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalSeries {
    /// Row position the signal was read from
    pub column: usize,
    /// Signal name from the header
    pub name: String,
    /// Decoded values, one per accepted row
    pub values: Vec<SampleValue>,
}

impl SignalSeries {
    /// Create a series
    pub fn new(column: usize, name: impl Into<String>, values: Vec<SampleValue>) -> Self {
        Self {
            column,
            name: name.into(),
            values,
        }
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series holds no samples
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at sample `index`
    pub fn value_at(&self, index: usize) -> Option<SampleValue> {
        self.values.get(index).copied()
    }

    /// Whether this series is the time axis
    pub fn is_time_axis(&self) -> bool {
        self.column == ColumnMap::TIME_COLUMN
    }
}

/// A fully decoded waveform dump
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveformDocument {
    columns: ColumnMap,
    time: Vec<SampleValue>,
    series: Vec<SignalSeries>,
}

impl WaveformDocument {
    /// Assemble a document from decoded parts
    ///
    /// `series` must be in ascending column order and every series must be
    /// as long as `time`.
    pub fn new(columns: ColumnMap, time: Vec<SampleValue>, series: Vec<SignalSeries>) -> Self {
        debug_assert!(series.iter().all(|s| s.len() == time.len()));
        Self {
            columns,
            time,
            series,
        }
    }

    /// The header column map
    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    /// The time vector (column 0, or a synthetic `0..N-1` sequence)
    pub fn time(&self) -> &[SampleValue] {
        &self.time
    }

    /// Number of decoded rows
    pub fn sample_count(&self) -> usize {
        self.time.len()
    }

    /// Whether the document holds no rows
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Every decoded series in ascending column order, time axis included
    pub fn series(&self) -> &[SignalSeries] {
        &self.series
    }

    /// Signals drawn as tracks: every series except the time axis
    pub fn signals(&self) -> impl Iterator<Item = &SignalSeries> {
        self.series.iter().filter(|s| !s.is_time_axis())
    }

    /// Number of tracks
    pub fn signal_count(&self) -> usize {
        self.signals().count()
    }

    /// Track at `index` (time axis excluded)
    pub fn signal_at(&self, index: usize) -> Option<&SignalSeries> {
        self.signals().nth(index)
    }

    /// Look up a series by name
    pub fn signal(&self, name: &str) -> Option<&SignalSeries> {
        self.series.iter().find(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_document() -> WaveformDocument {
        let columns: ColumnMap = [(0, "time".to_string()), (1, "clk".to_string())]
            .into_iter()
            .collect();
        WaveformDocument::new(
            columns,
            vec![0, 2],
            vec![
                SignalSeries::new(0, "time", vec![0, 2]),
                SignalSeries::new(1, "clk", vec![1, 1]),
            ],
        )
    }

    #[test]
    fn test_column_map_later_insert_wins() {
        let mut columns = ColumnMap::new();
        assert!(columns.insert(1, "en").is_none());
        assert_eq!(columns.insert(1, "rst").as_deref(), Some("en"));
        assert_eq!(columns.get(1), Some("rst"));
        assert_eq!(columns.len(), 1);
        assert!(!columns.has_time_column());
    }

    #[test]
    fn test_column_map_iterates_ascending() {
        let mut columns = ColumnMap::new();
        columns.insert(3, "count");
        columns.insert(0, "time");
        columns.insert(1, "clk");
        let order: Vec<_> = columns.iter().map(|(pos, _)| pos).collect();
        assert_eq!(order, vec![0, 1, 3]);
    }

    #[test]
    fn test_sample_row_tokenize() {
        let row = SampleRow::tokenize("  12   1 0\tff ");
        assert_eq!(row.len(), 4);
        assert_eq!(row.token(3), Some("ff"));
        assert_eq!(row.token(4), None);
    }

    #[test]
    fn test_document_signals_exclude_time_axis() {
        let doc = sample_document();
        assert_eq!(doc.series().len(), 2);
        assert_eq!(doc.signal_count(), 1);
        assert_eq!(doc.signal_at(0).map(|s| s.name.as_str()), Some("clk"));
        assert_eq!(doc.signal("time").map(|s| s.values.clone()), Some(vec![0, 2]));
    }

    #[test]
    fn test_empty_document() {
        let doc = WaveformDocument::default();
        assert!(doc.is_empty());
        assert_eq!(doc.signal_count(), 0);
        assert!(doc.signal_at(0).is_none());
    }
}
