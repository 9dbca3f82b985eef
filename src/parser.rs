//! Tabular waveform dump parser
//!
//! Decodes the text dumps written by the simulator flow into a
//! [`WaveformDocument`]. A dump looks like:
//!
//! ```text
//! 0 time
//! 1 clk
//! 2 count
//! =====
//! 0 1 00
//! 2 1 01
//! ```
//!
//! Header lines map a row position to a signal name. The header ends at a
//! separator line made only of `=` or at a row of two or more plain integers
//! (producers that skip the separator). Columns whose name contains `count`
//! hold hexadecimal values; every other column is decimal.
//!
//! The parser never fails. Short rows are dropped, undecodable tokens become
//! 0, and a missing time column is replaced by `0..N-1`.

use crate::types::{ColumnMap, SampleRow, SampleValue, SignalSeries, WaveformDocument};

/// Counters collected while parsing one dump
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Header lines that declared a column
    pub header_lines: usize,
    /// Data rows kept
    pub rows_accepted: usize,
    /// Data rows dropped for having too few tokens
    pub rows_dropped: usize,
    /// Tokens that failed to decode and were replaced by 0
    pub decode_failures: usize,
    /// Declared positions past the end of a kept row, read as 0
    pub missing_tokens: usize,
}

/// Parser for the tabular dump grammar
#[derive(Debug, Clone, Copy, Default)]
pub struct TabularWaveformParser;

impl TabularWaveformParser {
    /// Create a parser
    pub fn new() -> Self {
        Self
    }

    /// Parse dump text into a document
    pub fn parse(&self, text: &str) -> WaveformDocument {
        self.parse_with_stats(text).0
    }

    /// Parse dump text, also returning parse counters
    pub fn parse_with_stats(&self, text: &str) -> (WaveformDocument, ParseStats) {
        let mut stats = ParseStats::default();
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        // Header phase
        let mut columns = ColumnMap::new();
        let mut cursor = 0;
        while cursor < lines.len() {
            let line = lines[cursor];
            if is_separator(line) || is_numeric_row(line) {
                break;
            }
            if let Some((position, name)) = parse_header_line(line) {
                if let Some(previous) = columns.insert(position, name) {
                    tracing::debug!("Column {} redeclared: {} -> {}", position, previous, name);
                }
                stats.header_lines += 1;
            }
            cursor += 1;
        }

        // Consume through the first separator; without one, data starts at the
        // numeric row that ended the header.
        if let Some(offset) = lines[cursor..].iter().position(|line| is_separator(line)) {
            cursor += offset + 1;
        }

        // Data phase
        let rows: Vec<SampleRow<'_>> = lines[cursor..]
            .iter()
            .filter(|line| !is_separator(line))
            .map(|line| SampleRow::tokenize(line))
            .filter(|row| {
                let keep = row.len() >= columns.len();
                if !keep {
                    stats.rows_dropped += 1;
                }
                keep
            })
            .collect();
        stats.rows_accepted = rows.len();

        // Decoding
        let series: Vec<SignalSeries> = columns
            .iter()
            .map(|(position, name)| {
                let values = rows
                    .iter()
                    .map(|row| match row.token(position) {
                        Some(token) => decode_token(token, name).unwrap_or_else(|| {
                            stats.decode_failures += 1;
                            0
                        }),
                        None => {
                            stats.missing_tokens += 1;
                            0
                        }
                    })
                    .collect();
                SignalSeries::new(position, name, values)
            })
            .collect();

        let time = series
            .iter()
            .find(|s| s.is_time_axis())
            .map(|s| s.values.clone())
            .unwrap_or_else(|| (0..rows.len() as SampleValue).collect());

        tracing::debug!(
            columns = columns.len(),
            rows = stats.rows_accepted,
            dropped = stats.rows_dropped,
            decode_failures = stats.decode_failures,
            missing_tokens = stats.missing_tokens,
            "Parsed waveform dump"
        );
        if stats.rows_dropped > 0 {
            tracing::warn!(
                "Dropped {} rows with fewer than {} tokens",
                stats.rows_dropped,
                columns.len()
            );
        }

        (WaveformDocument::new(columns, time, series), stats)
    }
}

/// Parse dump text with the default parser
pub fn parse(text: &str) -> WaveformDocument {
    TabularWaveformParser::new().parse(text)
}

/// Decode one token for the column called `column_name`
///
/// `count` columns are hexadecimal (optional `0x` prefix), all others decimal.
pub fn decode_token(token: &str, column_name: &str) -> Option<SampleValue> {
    if column_name.to_lowercase().contains("count") {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        SampleValue::from_str_radix(digits, 16).ok()
    } else {
        token.parse().ok()
    }
}

fn is_separator(line: &str) -> bool {
    line.len() >= 2 && line.chars().all(|c| c == '=')
}

fn is_numeric_row(line: &str) -> bool {
    let mut count = 0;
    for token in line.split_whitespace() {
        if !token.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        count += 1;
    }
    count >= 2
}

fn parse_header_line(line: &str) -> Option<(usize, &str)> {
    let split = line.find(char::is_whitespace)?;
    let (index, name) = line.split_at(split);
    if index.is_empty() || !index.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some((index.parse().ok()?, name))
}
