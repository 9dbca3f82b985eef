//! WaveJSON interchange object
//!
//! The exported shape is fixed so external wave-diagram tools can render it:
//!
//! ```json
//! { "signal": [ { "name": "count", "wave": "=.=", "data": ["0x00", "0x01"] } ],
//!   "config": { "hscale": 2, "skin": "narrow" },
//!   "head": { "text": "Waveform" } }
//! ```

use crate::config::ExportConfig;
use crate::encoder::WaveformEncoder;
use crate::error::{Result, WaveError};
use crate::types::WaveformDocument;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete WaveJSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveJson {
    pub signal: Vec<WaveSignal>,
    pub config: WaveConfig,
    pub head: WaveHead,
}

/// One signal lane
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveSignal {
    pub name: String,
    pub wave: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<String>>,
}

/// Rendering hints for the consumer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveConfig {
    pub hscale: u32,
    pub skin: String,
}

/// Diagram title
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveHead {
    pub text: String,
}

impl WaveJson {
    /// Encode every non-time signal of `document`, in column order
    pub fn from_document(
        document: &WaveformDocument,
        encoder: &WaveformEncoder,
        export: &ExportConfig,
    ) -> Self {
        let signal = document
            .signals()
            .map(|series| {
                let (_, encoded) = encoder.encode_signal(series);
                WaveSignal {
                    name: series.name.clone(),
                    wave: encoded.wave,
                    data: encoded.data,
                }
            })
            .collect();

        Self {
            signal,
            config: WaveConfig {
                hscale: export.hscale,
                skin: export.skin.clone(),
            },
            head: WaveHead {
                text: export.title.clone(),
            },
        }
    }

    /// Serialize to a JSON string
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Write pretty JSON to `path`
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = self.to_json(true)?;
        std::fs::write(path, json).map_err(|e| {
            WaveError::Export(format!("Failed to write {}: {}", path.display(), e))
        })?;
        tracing::info!("Exported {} signals to {:?}", self.signal.len(), path);
        Ok(())
    }
}
