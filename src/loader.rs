//! Document loading off the UI thread
//!
//! The UI talks to a dedicated loader thread through [`LoaderBridge`]. The
//! thread owns a tokio runtime and loads every requested dump as an
//! independent task, so one unreadable file only fails its own card.
//!
//! A feature index is a markdown list naming features and the dumps that
//! illustrate them:
//!
//! ```text
//! - reset clears count: see `waves/reset.txt` and `waves/reset_long.txt`
//! ```

use crate::error::{Result, WaveError};
use crate::parser::TabularWaveformParser;
use crate::types::WaveformDocument;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Channel capacity for commands (UI → loader)
const CMD_CHANNEL_CAPACITY: usize = 64;

/// Identifier the UI assigns to each card it wants filled
pub type CardId = u64;

// ==================== Feature Index ====================

/// One feature and the dumps referenced for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEntry {
    pub feature: String,
    pub files: Vec<PathBuf>,
}

/// Parsed feature index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureIndex {
    pub entries: Vec<FeatureEntry>,
}

impl FeatureIndex {
    /// Parse index text; relative file names resolve against `base_dir`
    pub fn parse(text: &str, base_dir: &Path) -> Self {
        let entries = text
            .lines()
            .filter_map(|line| parse_feature_line(line, base_dir))
            .collect();
        Self { entries }
    }

    /// Read and parse an index file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| WaveError::load(path, e.to_string()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self::parse(&text, base_dir))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every referenced file, in index order, paired with its feature
    pub fn files(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().flat_map(|entry| {
            entry
                .files
                .iter()
                .map(move |file| (entry.feature.as_str(), file.as_path()))
        })
    }
}

/// `- <feature>: ... `<file>` ...`; lines without a backticked file are skipped
fn parse_feature_line(line: &str, base_dir: &Path) -> Option<FeatureEntry> {
    let rest = line.trim().strip_prefix("- ")?;
    let (feature, body) = rest.split_once(':')?;
    let feature = feature.trim();
    if feature.is_empty() {
        return None;
    }

    let files: Vec<PathBuf> = body
        .split('`')
        .skip(1)
        .step_by(2)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| base_dir.join(name))
        .collect();
    if files.is_empty() {
        return None;
    }

    Some(FeatureEntry {
        feature: feature.to_string(),
        files,
    })
}

// ==================== Async Load ====================

/// Read and parse one dump
pub async fn load_document(path: impl AsRef<Path>) -> Result<WaveformDocument> {
    let path = path.as_ref();
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| WaveError::load(path, e.to_string()))?;
    let (document, stats) = TabularWaveformParser::new().parse_with_stats(&text);
    tracing::debug!(
        "Loaded {:?}: {} signals, {} samples, {} rows dropped",
        path,
        document.signal_count(),
        document.sample_count(),
        stats.rows_dropped
    );
    Ok(document)
}

// ==================== Bridge ====================

/// Commands sent from the UI thread to the loader
#[derive(Debug, Clone)]
pub enum LoadCommand {
    /// Load a dump into the given card
    Document { card_id: CardId, path: PathBuf },
    /// Read a feature index; its files are reported back, not loaded
    FeatureIndex { path: PathBuf },
    /// Stop the loader thread
    Shutdown,
}

/// Messages sent from the loader to the UI thread
#[derive(Debug, Clone)]
pub enum LoadMessage {
    Loaded {
        card_id: CardId,
        path: PathBuf,
        document: Arc<WaveformDocument>,
    },
    Failed {
        card_id: CardId,
        path: PathBuf,
        error: String,
    },
    Index {
        path: PathBuf,
        index: FeatureIndex,
    },
    IndexFailed {
        path: PathBuf,
        error: String,
    },
}

/// UI-side handle for the loader thread
pub struct LoaderBridge {
    cmd_tx: Sender<LoadCommand>,
    msg_rx: Receiver<LoadMessage>,
    handle: Option<JoinHandle<()>>,
}

impl LoaderBridge {
    /// Spawn the loader thread
    pub fn spawn() -> Result<Self> {
        let (cmd_tx, cmd_rx) = bounded(CMD_CHANNEL_CAPACITY);
        let (msg_tx, msg_rx) = unbounded();

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?;

        let handle = std::thread::Builder::new()
            .name("wavesense-loader".to_string())
            .spawn(move || run_loader(runtime, cmd_rx, msg_tx))?;

        Ok(Self {
            cmd_tx,
            msg_rx,
            handle: Some(handle),
        })
    }

    /// Queue a dump for loading into `card_id`
    pub fn load_document(&self, card_id: CardId, path: impl Into<PathBuf>) -> bool {
        self.send_command(LoadCommand::Document {
            card_id,
            path: path.into(),
        })
    }

    /// Queue a feature index for reading
    pub fn load_feature_index(&self, path: impl Into<PathBuf>) -> bool {
        self.send_command(LoadCommand::FeatureIndex { path: path.into() })
    }

    pub fn send_command(&self, cmd: LoadCommand) -> bool {
        self.cmd_tx.send(cmd).is_ok()
    }

    /// Drain all pending messages
    pub fn drain(&self) -> Vec<LoadMessage> {
        self.msg_rx.try_iter().collect()
    }

    /// Block until a message arrives or `timeout` elapses
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<LoadMessage> {
        self.msg_rx.recv_timeout(timeout).ok()
    }

    /// Stop the loader thread and wait for it
    pub fn shutdown(&mut self) {
        let _ = self.cmd_tx.send(LoadCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Loader thread panicked");
            }
        }
    }
}

impl Drop for LoaderBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loader(
    runtime: tokio::runtime::Runtime,
    cmd_rx: Receiver<LoadCommand>,
    msg_tx: Sender<LoadMessage>,
) {
    tracing::info!("Loader thread started");
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            LoadCommand::Document { card_id, path } => {
                let msg_tx = msg_tx.clone();
                runtime.spawn(async move {
                    let msg = match load_document(&path).await {
                        Ok(document) => LoadMessage::Loaded {
                            card_id,
                            path,
                            document: Arc::new(document),
                        },
                        Err(e) => {
                            tracing::warn!("Card {} failed to load: {}", card_id, e);
                            LoadMessage::Failed {
                                card_id,
                                path,
                                error: e.to_string(),
                            }
                        }
                    };
                    let _ = msg_tx.send(msg);
                });
            }
            LoadCommand::FeatureIndex { path } => {
                let msg_tx = msg_tx.clone();
                runtime.spawn(async move {
                    let msg = match FeatureIndex::load(&path).await {
                        Ok(index) => LoadMessage::Index { path, index },
                        Err(e) => LoadMessage::IndexFailed {
                            path,
                            error: e.to_string(),
                        },
                    };
                    let _ = msg_tx.send(msg);
                });
            }
            LoadCommand::Shutdown => break,
        }
    }
    runtime.shutdown_background();
    tracing::info!("Loader thread stopped");
}
