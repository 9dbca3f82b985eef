//! # WaveSense: timing diagrams for simulator waveform dumps
//!
//! Reads the tabular dumps a hardware simulator writes, re-encodes them as
//! WaveJSON for external wave-diagram tools, and shows them as interactive
//! timing diagrams with hover inspection, zoom and pan.
//!
//! ## Architecture
//!
//! - **Parser**: lenient header/separator/row grammar → [`WaveformDocument`]
//! - **Encoder**: run-length wave strings and the WaveJSON export object
//! - **Render**: draws a document through the [`render::Surface`] trait
//! - **Interaction**: per-surface view state, pointer mapping, tooltips
//! - **Loader**: a tokio-backed thread that reads dumps off the UI thread
//! - **Frontend**: eframe/egui viewer, one card per loaded dump
//!
//! ## Configuration
//!
//! Settings are stored in the platform-appropriate data directory under
//! `dev.wavesense`:
//!
//! - **Linux**: `~/.local/share/dev.wavesense/`
//! - **macOS**: `~/Library/Application Support/dev.wavesense/`
//! - **Windows**: `%APPDATA%\dev.wavesense\`
//!
//! ## Example
//!
//! ```
//! use wavesense::{parser, WaveJson, WaveformEncoder, config::ExportConfig};
//!
//! let dump = "0 time\n1 clk\n2 count\n=====\n0 1 00\n1 1 01\n";
//! let document = parser::parse(dump);
//! let json = WaveJson::from_document(&document, &WaveformEncoder::default(), &ExportConfig::default());
//! assert_eq!(json.signal[0].wave, "P.");
//! assert_eq!(json.signal[1].wave, "==");
//! ```

pub mod classify;
pub mod config;
pub mod encoder;
pub mod error;
pub mod frontend;
pub mod interaction;
pub mod loader;
pub mod parser;
pub mod render;
pub mod types;

// Re-export commonly used types
pub use classify::{SignalClassifier, SignalKind};
pub use config::AppConfig;
pub use encoder::{EncodedWave, WaveJson, WaveformEncoder};
pub use error::{Result, WaveError};
pub use interaction::{InteractionController, ViewAction, ViewState};
pub use parser::TabularWaveformParser;
pub use render::{RecordingSurface, RenderEngine, Surface};
pub use types::{SignalSeries, WaveformDocument};
