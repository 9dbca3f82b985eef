//! Card state for the viewer
//!
//! Every opened dump becomes a [`WaveformCard`]. A card owns its own
//! [`InteractionController`] once loaded, so zoom, pan and hover are never
//! shared between cards. [`CardDeck`] turns loader messages into card updates
//! and is independent of egui.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Local};

use crate::classify::SignalClassifier;
use crate::config::{ExportConfig, RenderConfig};
use crate::encoder::{WaveJson, WaveformEncoder};
use crate::error::{Result, ResultExt, WaveError};
use crate::interaction::{InteractionController, ViewAction};
use crate::loader::{CardId, FeatureIndex, LoadMessage};
use crate::render::RenderEngine;
use crate::types::WaveformDocument;

/// Load state of a card
#[derive(Debug)]
pub enum CardStatus {
    Loading,
    Ready(Box<InteractionController>),
    Failed(String),
}

/// One opened dump
#[derive(Debug)]
pub struct WaveformCard {
    pub id: CardId,
    pub path: PathBuf,
    /// Feature this dump was opened for, if it came from an index
    pub feature: Option<String>,
    pub status: CardStatus,
    pub loaded_at: Option<DateTime<Local>>,
    pub export_error: Option<String>,
    pub last_export: Option<PathBuf>,
}

impl WaveformCard {
    fn new(id: CardId, path: PathBuf, feature: Option<String>) -> Self {
        Self {
            id,
            path,
            feature,
            status: CardStatus::Loading,
            loaded_at: None,
            export_error: None,
            last_export: None,
        }
    }

    /// File name shown in the card header
    pub fn title(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, CardStatus::Loading)
    }

    pub fn controller(&self) -> Option<&InteractionController> {
        match &self.status {
            CardStatus::Ready(controller) => Some(controller.as_ref()),
            _ => None,
        }
    }

    pub fn controller_mut(&mut self) -> Option<&mut InteractionController> {
        match &mut self.status {
            CardStatus::Ready(controller) => Some(controller.as_mut()),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            CardStatus::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// Default export file name: the dump's stem with a `.json` extension
    pub fn export_file_name(&self) -> String {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "waveform".to_string());
        format!("{}.json", stem)
    }

    /// Export the loaded document as WaveJSON; failures stay on this card
    pub fn export_to(&mut self, path: &Path, export: &ExportConfig) -> Result<()> {
        let result = match self.controller() {
            Some(controller) => {
                let encoder = WaveformEncoder::new(controller.engine().classifier().clone());
                WaveJson::from_document(controller.document(), &encoder, export)
                    .write_to(path)
                    .with_context(|| format!("Exporting {}", self.title()))
            }
            None => Err(WaveError::Export("Nothing loaded to export".to_string())),
        };

        match &result {
            Ok(()) => {
                self.export_error = None;
                self.last_export = Some(path.to_path_buf());
            }
            Err(e) => self.export_error = Some(e.to_string()),
        }
        result
    }
}

/// Actions emitted by card UI and handled by the app
#[derive(Debug, Clone, PartialEq)]
pub enum AppAction {
    View { card: CardId, action: ViewAction },
    Export(CardId),
    Reload(CardId),
    Close(CardId),
    OpenDocument(PathBuf),
    OpenFeatureIndex(PathBuf),
}

/// A load the app should hand to the loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub card_id: CardId,
    pub path: PathBuf,
}

/// All open cards plus the render settings they share
#[derive(Debug)]
pub struct CardDeck {
    cards: Vec<WaveformCard>,
    next_id: CardId,
    classifier: SignalClassifier,
    render: RenderConfig,
    feature_index: Option<(PathBuf, FeatureIndex)>,
    last_error: Option<String>,
}

impl CardDeck {
    pub fn new(classifier: SignalClassifier, render: RenderConfig) -> Self {
        Self {
            cards: Vec::new(),
            next_id: 1,
            classifier,
            render: render.sanitized(),
            feature_index: None,
            last_error: None,
        }
    }

    pub fn cards(&self) -> &[WaveformCard] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut [WaveformCard] {
        &mut self.cards
    }

    pub fn get(&self, id: CardId) -> Option<&WaveformCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CardId) -> Option<&mut WaveformCard> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    pub fn feature_index(&self) -> Option<(&Path, &FeatureIndex)> {
        self.feature_index
            .as_ref()
            .map(|(path, index)| (path.as_path(), index))
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    /// Add a loading card for `path`
    pub fn open(&mut self, path: impl Into<PathBuf>, feature: Option<String>) -> LoadRequest {
        let id = self.next_id;
        self.next_id += 1;
        let path = path.into();
        self.cards.push(WaveformCard::new(id, path.clone(), feature));
        LoadRequest { card_id: id, path }
    }

    /// Put an existing card back into the loading state
    pub fn reload(&mut self, id: CardId) -> Option<LoadRequest> {
        let card = self.get_mut(id)?;
        card.status = CardStatus::Loading;
        card.export_error = None;
        Some(LoadRequest {
            card_id: id,
            path: card.path.clone(),
        })
    }

    pub fn close(&mut self, id: CardId) -> bool {
        let before = self.cards.len();
        self.cards.retain(|c| c.id != id);
        self.cards.len() != before
    }

    /// Apply a zoom/pan control to one card
    pub fn apply_view(&mut self, id: CardId, action: ViewAction) {
        if let Some(controller) = self.get_mut(id).and_then(|c| c.controller_mut()) {
            controller.apply(action);
        }
    }

    /// Change the render inputs and redraw every loaded card
    pub fn set_render_config(&mut self, render: RenderConfig) {
        self.render = render.sanitized();
        for card in &mut self.cards {
            if let Some(controller) = card.controller_mut() {
                controller.set_render_config(self.render.clone());
            }
        }
    }

    /// Apply one loader message; returns loads to start for index entries
    pub fn handle_message(&mut self, msg: LoadMessage) -> Vec<LoadRequest> {
        match msg {
            LoadMessage::Loaded {
                card_id,
                path,
                document,
            } => {
                let controller = self.controller_for(Arc::unwrap_or_clone(document));
                match self.get_mut(card_id) {
                    Some(card) => {
                        tracing::info!("Card {} loaded from {:?}", card_id, path);
                        card.status = CardStatus::Ready(Box::new(controller));
                        card.loaded_at = Some(Local::now());
                    }
                    None => tracing::debug!("Dropping load for closed card {}", card_id),
                }
                Vec::new()
            }
            LoadMessage::Failed {
                card_id, error, ..
            } => {
                if let Some(card) = self.get_mut(card_id) {
                    card.status = CardStatus::Failed(error);
                }
                Vec::new()
            }
            LoadMessage::Index { path, index } => {
                tracing::info!("Feature index {:?}: {} features", path, index.len());
                let requests = index
                    .files()
                    .map(|(feature, file)| self.open(file, Some(feature.to_string())))
                    .collect();
                self.feature_index = Some((path, index));
                requests
            }
            LoadMessage::IndexFailed { path, error } => {
                tracing::warn!("Feature index {:?} failed: {}", path, error);
                self.last_error = Some(error);
                Vec::new()
            }
        }
    }

    fn controller_for(&self, document: WaveformDocument) -> InteractionController {
        InteractionController::new(
            document,
            RenderEngine::new(self.classifier.clone(), self.render.sample_cap),
            self.render.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::FeatureEntry;
    use crate::parser::parse;

    const DUMP: &str = "0 time\n1 clk\n2 count\n=====\n0 1 00\n1 1 01\n2 1 01\n";

    fn deck() -> CardDeck {
        CardDeck::new(SignalClassifier::default(), RenderConfig::default())
    }

    fn loaded(card_id: CardId) -> LoadMessage {
        LoadMessage::Loaded {
            card_id,
            path: PathBuf::from("counter.txt"),
            document: Arc::new(parse(DUMP)),
        }
    }

    #[test]
    fn test_open_assigns_unique_ids() {
        let mut deck = deck();
        let a = deck.open("a.txt", None);
        let b = deck.open("b.txt", None);
        assert_ne!(a.card_id, b.card_id);
        assert!(deck.get(a.card_id).unwrap().is_loading());
        assert_eq!(deck.get(b.card_id).unwrap().title(), "b.txt");
    }

    #[test]
    fn test_loaded_and_failed_cards_are_independent() {
        let mut deck = deck();
        let a = deck.open("a.txt", None);
        let b = deck.open("b.txt", None);

        deck.handle_message(LoadMessage::Failed {
            card_id: a.card_id,
            path: a.path.clone(),
            error: "Failed to load \"a.txt\": not found".to_string(),
        });
        deck.handle_message(loaded(b.card_id));

        assert!(deck.get(a.card_id).unwrap().error().unwrap().contains("not found"));
        let card = deck.get(b.card_id).unwrap();
        assert!(card.controller().is_some());
        assert!(card.loaded_at.is_some());
        assert!(deck.last_error().is_none());
    }

    #[test]
    fn test_view_state_is_per_card() {
        let mut deck = deck();
        let a = deck.open("a.txt", None);
        let b = deck.open("b.txt", None);
        deck.handle_message(loaded(a.card_id));
        deck.handle_message(loaded(b.card_id));

        deck.apply_view(a.card_id, ViewAction::ZoomIn);
        let zoom_a = deck.get(a.card_id).unwrap().controller().unwrap().view().zoom_level;
        let zoom_b = deck.get(b.card_id).unwrap().controller().unwrap().view().zoom_level;
        assert_eq!(zoom_a, 1.5);
        assert_eq!(zoom_b, 1.0);
    }

    #[test]
    fn test_load_for_closed_card_is_dropped() {
        let mut deck = deck();
        let a = deck.open("a.txt", None);
        assert!(deck.close(a.card_id));
        deck.handle_message(loaded(a.card_id));
        assert!(deck.cards().is_empty());
    }

    #[test]
    fn test_index_opens_card_per_file() {
        let mut deck = deck();
        let index = FeatureIndex {
            entries: vec![
                FeatureEntry {
                    feature: "reset".to_string(),
                    files: vec![PathBuf::from("r1.txt"), PathBuf::from("r2.txt")],
                },
                FeatureEntry {
                    feature: "enable".to_string(),
                    files: vec![PathBuf::from("e.txt")],
                },
            ],
        };
        let requests = deck.handle_message(LoadMessage::Index {
            path: PathBuf::from("index.md"),
            index,
        });

        assert_eq!(requests.len(), 3);
        assert_eq!(deck.cards().len(), 3);
        assert_eq!(deck.cards()[2].feature.as_deref(), Some("enable"));
        assert_eq!(deck.feature_index().unwrap().1.len(), 2);
    }

    #[test]
    fn test_index_failure_sets_error() {
        let mut deck = deck();
        deck.handle_message(LoadMessage::IndexFailed {
            path: PathBuf::from("index.md"),
            error: "missing".to_string(),
        });
        assert_eq!(deck.last_error(), Some("missing"));
        deck.clear_error();
        assert!(deck.last_error().is_none());
    }

    #[test]
    fn test_reload_resets_status() {
        let mut deck = deck();
        let a = deck.open("a.txt", None);
        deck.handle_message(loaded(a.card_id));
        let request = deck.reload(a.card_id).unwrap();
        assert_eq!(request, a);
        assert!(deck.get(a.card_id).unwrap().is_loading());
        assert!(deck.reload(99).is_none());
    }

    #[test]
    fn test_render_config_reaches_loaded_cards() {
        let mut deck = deck();
        let a = deck.open("a.txt", None);
        deck.handle_message(loaded(a.card_id));
        deck.set_render_config(RenderConfig {
            sample_cap: 2,
            surface_width: 800.0,
        });
        let controller = deck.get(a.card_id).unwrap().controller().unwrap();
        assert_eq!(controller.visible_window().len, 2);
        assert_eq!(controller.render_config().surface_width, 800.0);
    }

    #[test]
    fn test_export_writes_wavejson() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("counter.json");
        let mut deck = deck();
        let a = deck.open("counter.txt", None);
        deck.handle_message(loaded(a.card_id));

        let card = deck.get_mut(a.card_id).unwrap();
        assert_eq!(card.export_file_name(), "counter.json");
        card.export_to(&out, &ExportConfig::default()).unwrap();
        assert_eq!(card.last_export.as_deref(), Some(out.as_path()));

        let json: WaveJson = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json.signal.len(), 2);
        assert_eq!(json.signal[1].data, Some(vec!["0x00".to_string(), "0x01".to_string()]));
    }

    #[test]
    fn test_export_failure_stays_on_card() {
        let dir = tempfile::tempdir().unwrap();
        let mut deck = deck();
        let a = deck.open("a.txt", None);
        let b = deck.open("b.txt", None);
        deck.handle_message(loaded(a.card_id));
        deck.handle_message(loaded(b.card_id));

        let bad = dir.path().join("missing").join("a.json");
        assert!(deck.get_mut(a.card_id).unwrap().export_to(&bad, &ExportConfig::default()).is_err());
        assert!(deck.get(a.card_id).unwrap().export_error.is_some());
        assert!(deck.get(b.card_id).unwrap().export_error.is_none());
    }

    #[test]
    fn test_export_without_document_fails() {
        let mut deck = deck();
        let a = deck.open("a.txt", None);
        let card = deck.get_mut(a.card_id).unwrap();
        assert!(card.export_to(Path::new("x.json"), &ExportConfig::default()).is_err());
        assert!(card.export_error.is_some());
    }
}
