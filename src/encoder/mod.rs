//! Run-length wave encoder
//!
//! Converts one signal's samples into WaveJSON wave notation: a marker string
//! with one marker per sample, plus a literal list for bus signals.
//!
//! | Kind | First / changed sample | Held sample |
//! |------|------------------------|-------------|
//! | Clock | `P` (first only) | `.` |
//! | Bus | `=` + literal `0x..` | `.` |
//! | Digital (everything else) | `0` or `1` | `.` |
//!
//! Digital encoding keeps only two levels: every non-zero value becomes `1`.

pub mod wavejson;

use crate::classify::{SignalClassifier, SignalKind};
use crate::types::{SampleValue, SignalSeries};
use thiserror::Error;

pub use wavejson::{WaveConfig, WaveHead, WaveJson, WaveSignal};

/// Free-running clock marker
pub const MARK_PERIODIC: char = 'P';
/// Value held from the previous sample
pub const MARK_CONTINUE: char = '.';
/// New bus value, taken from the literal list
pub const MARK_LITERAL: char = '=';
/// Logic low
pub const MARK_LOW: char = '0';
/// Logic high
pub const MARK_HIGH: char = '1';

/// Encoded form of one signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedWave {
    /// One marker per sample
    pub wave: String,
    /// Literals for bus signals, one per run of equal values
    pub data: Option<Vec<String>>,
}

impl EncodedWave {
    fn markers(wave: String) -> Self {
        Self { wave, data: None }
    }
}

/// Errors raised when decoding wave notation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Unknown marker '{0}' at sample {1}")]
    UnknownMarker(char, usize),

    #[error("Continuation marker at sample 0 has no previous value")]
    LeadingContinuation,

    #[error("Marker at sample {0} needs a literal but the list is exhausted")]
    MissingLiteral(usize),

    #[error("Invalid literal '{0}'")]
    BadLiteral(String),
}

/// Format a bus value as a literal: `0x` and at least two lowercase hex digits
pub fn format_literal(value: SampleValue) -> String {
    format!("0x{:02x}", value)
}

fn parse_literal(literal: &str) -> Result<SampleValue, DecodeError> {
    let digits = literal.strip_prefix("0x").unwrap_or(literal);
    u64::from_str_radix(digits, 16)
        .map(|v| v as SampleValue)
        .map_err(|_| DecodeError::BadLiteral(literal.to_string()))
}

/// Encoder that classifies signals by name before encoding them
#[derive(Debug, Clone, Default)]
pub struct WaveformEncoder {
    classifier: SignalClassifier,
}

impl WaveformEncoder {
    /// Create an encoder using `classifier` to pick each signal's encoding
    pub fn new(classifier: SignalClassifier) -> Self {
        Self { classifier }
    }

    /// The classification policy in use
    pub fn classifier(&self) -> &SignalClassifier {
        &self.classifier
    }

    /// Classify and encode one series
    pub fn encode_signal(&self, series: &SignalSeries) -> (SignalKind, EncodedWave) {
        let kind = self.classifier.classify(&series.name);
        (kind, Self::encode(&series.values, kind))
    }

    /// Encode `values` for the given kind
    pub fn encode(values: &[SampleValue], kind: SignalKind) -> EncodedWave {
        match kind {
            SignalKind::Clock => Self::encode_clock(values),
            SignalKind::Bus => Self::encode_bus(values),
            SignalKind::Reset | SignalKind::Enable | SignalKind::Digital => {
                Self::encode_digital(values)
            }
        }
    }

    fn encode_clock(values: &[SampleValue]) -> EncodedWave {
        let mut wave = String::with_capacity(values.len().max(1));
        wave.push(MARK_PERIODIC);
        wave.extend(std::iter::repeat(MARK_CONTINUE).take(values.len().saturating_sub(1)));
        EncodedWave::markers(wave)
    }

    fn encode_bus(values: &[SampleValue]) -> EncodedWave {
        if values.is_empty() {
            return EncodedWave::markers(MARK_LOW.to_string());
        }
        let mut wave = String::with_capacity(values.len());
        let mut data = Vec::new();
        let mut previous = None;
        for &value in values {
            if previous == Some(value) {
                wave.push(MARK_CONTINUE);
            } else {
                wave.push(MARK_LITERAL);
                data.push(format_literal(value));
                previous = Some(value);
            }
        }
        EncodedWave {
            wave,
            data: Some(data),
        }
    }

    fn encode_digital(values: &[SampleValue]) -> EncodedWave {
        if values.is_empty() {
            return EncodedWave::markers(MARK_LOW.to_string());
        }
        let mut wave = String::with_capacity(values.len());
        let mut previous = None;
        for &value in values {
            if previous == Some(value) {
                wave.push(MARK_CONTINUE);
            } else {
                wave.push(if value == 0 { MARK_LOW } else { MARK_HIGH });
                previous = Some(value);
            }
        }
        EncodedWave::markers(wave)
    }

    /// Reconstruct a sample series from wave notation
    ///
    /// Clocks decode as a constant high level; digital values come back as 0/1.
    pub fn decode(encoded: &EncodedWave) -> Result<Vec<SampleValue>, DecodeError> {
        let mut literals = encoded.data.iter().flatten();
        let mut values = Vec::with_capacity(encoded.wave.len());
        for (index, marker) in encoded.wave.chars().enumerate() {
            let value = match marker {
                MARK_LOW => 0,
                MARK_HIGH | MARK_PERIODIC => 1,
                MARK_LITERAL => {
                    let literal = literals.next().ok_or(DecodeError::MissingLiteral(index))?;
                    parse_literal(literal)?
                }
                MARK_CONTINUE => *values.last().ok_or(DecodeError::LeadingContinuation)?,
                other => return Err(DecodeError::UnknownMarker(other, index)),
            };
            values.push(value);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clock_encoding() {
        let encoded = WaveformEncoder::encode(&[1, 1, 1, 1], SignalKind::Clock);
        assert_eq!(encoded.wave, "P...");
        assert!(encoded.data.is_none());
    }

    #[test]
    fn test_bus_encoding_one_literal_per_run() {
        let encoded = WaveformEncoder::encode(&[0, 0, 1, 1, 1, 10, 0x1ff], SignalKind::Bus);
        assert_eq!(encoded.wave, "=.=..==");
        assert_eq!(
            encoded.data,
            Some(vec![
                "0x00".to_string(),
                "0x01".to_string(),
                "0x0a".to_string(),
                "0x1ff".to_string()
            ])
        );
    }

    #[test]
    fn test_digital_encoding_collapses_magnitudes() {
        let encoded = WaveformEncoder::encode(&[0, 0, 3, 3, 0, 1], SignalKind::Enable);
        assert_eq!(encoded.wave, "0.1.01");
        assert!(encoded.data.is_none());
    }

    #[test]
    fn test_digital_change_between_nonzero_values_emits_marker() {
        // 2 -> 5 is a change even though both are high
        let encoded = WaveformEncoder::encode(&[2, 5], SignalKind::Digital);
        assert_eq!(encoded.wave, "11");
    }

    #[test]
    fn test_empty_series() {
        assert_eq!(WaveformEncoder::encode(&[], SignalKind::Clock).wave, "P");
        assert_eq!(WaveformEncoder::encode(&[], SignalKind::Digital).wave, "0");
        let bus = WaveformEncoder::encode(&[], SignalKind::Bus);
        assert_eq!(bus.wave, "0");
        assert!(bus.data.is_none());
    }

    #[test]
    fn test_encode_signal_uses_classifier() {
        let encoder = WaveformEncoder::default();
        let series = SignalSeries::new(2, "count", vec![4, 4, 5]);
        let (kind, encoded) = encoder.encode_signal(&series);
        assert_eq!(kind, SignalKind::Bus);
        assert_eq!(encoded.wave, "=.=");
    }

    #[test]
    fn test_bus_round_trip() {
        let values = vec![0, 255, 255, 3, 3, 3, 0, -1];
        let encoded = WaveformEncoder::encode(&values, SignalKind::Bus);
        assert_eq!(WaveformEncoder::decode(&encoded), Ok(values));
    }

    #[test]
    fn test_decode_errors() {
        let leading = EncodedWave::markers(".1".into());
        assert_eq!(
            WaveformEncoder::decode(&leading),
            Err(DecodeError::LeadingContinuation)
        );
        let missing = EncodedWave {
            wave: "==".into(),
            data: Some(vec!["0x01".into()]),
        };
        assert_eq!(
            WaveformEncoder::decode(&missing),
            Err(DecodeError::MissingLiteral(1))
        );
        let unknown = EncodedWave::markers("0x".into());
        assert_eq!(
            WaveformEncoder::decode(&unknown),
            Err(DecodeError::UnknownMarker('x', 1))
        );
        let bad = EncodedWave {
            wave: "=".into(),
            data: Some(vec!["0xzz".into()]),
        };
        assert!(matches!(
            WaveformEncoder::decode(&bad),
            Err(DecodeError::BadLiteral(_))
        ));
    }

    proptest! {
        #[test]
        fn test_digital_round_trip_normalizes_high(
            values in prop::collection::vec(0i64..4, 1..64)
        ) {
            let encoded = WaveformEncoder::encode(&values, SignalKind::Digital);
            prop_assert_eq!(encoded.wave.chars().count(), values.len());
            let decoded = WaveformEncoder::decode(&encoded).unwrap();
            let expected: Vec<i64> = values.iter().map(|&v| i64::from(v != 0)).collect();
            prop_assert_eq!(decoded, expected);
        }

        #[test]
        fn test_bus_round_trip_is_exact(
            values in prop::collection::vec(0i64..300, 1..64)
        ) {
            let encoded = WaveformEncoder::encode(&values, SignalKind::Bus);
            let runs = 1 + values.windows(2).filter(|w| w[0] != w[1]).count();
            prop_assert_eq!(encoded.data.as_ref().map(Vec::len), Some(runs));
            prop_assert_eq!(WaveformEncoder::decode(&encoded).unwrap(), values);
        }
    }
}
