//! Pointer inspection, zoom and pan for a rendered waveform
//!
//! An [`InteractionController`] owns one loaded [`WaveformDocument`], the
//! [`ViewState`] for it and the last rendered frame. Each open surface gets
//! its own controller, so zoom and hover never leak between surfaces.
//!
//! Pointer positions map to samples with
//!
//! ```text
//! sample = floor((x - left_margin) / ((width - left_margin - right_margin) / visible))
//! signal = floor((y - top_margin) / track_height)
//! ```
//!
//! Every state change re-renders the frame using the current render config.

use crate::classify::SignalKind;
use crate::config::RenderConfig;
use crate::encoder::format_literal;
use crate::render::{Point, RecordingSurface, RenderEngine, VisibleWindow};
use crate::types::{SampleValue, WaveformDocument};

/// Zoom factor applied by one zoom in/out step
pub const ZOOM_STEP: f64 = 1.5;
/// Smallest zoom level
pub const MIN_ZOOM: f64 = 0.1;
/// Largest zoom level
pub const MAX_ZOOM: f64 = 10.0;
/// Zoom level after reset
pub const DEFAULT_ZOOM: f64 = 1.0;

/// Tooltip offset from the pointer, in pixels
const TOOLTIP_OFFSET: f32 = 12.0;

/// Zoom, pan and hover state for one surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Multiplier on the visible sample cap, within `[MIN_ZOOM, MAX_ZOOM]`
    pub zoom_level: f64,
    /// First visible sample
    pub pan_offset: usize,
    /// Hovered sample (absolute index)
    pub hovered_sample: Option<usize>,
    /// Hovered track (time axis excluded)
    pub hovered_signal: Option<usize>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom_level: DEFAULT_ZOOM,
            pan_offset: 0,
            hovered_sample: None,
            hovered_signal: None,
        }
    }
}

impl ViewState {
    pub fn zoom_in(&mut self) {
        self.zoom_level = (self.zoom_level * ZOOM_STEP).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_level = (self.zoom_level / ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Restore default zoom and pan
    pub fn reset(&mut self) {
        self.zoom_level = DEFAULT_ZOOM;
        self.pan_offset = 0;
    }

    pub fn clear_hover(&mut self) {
        self.hovered_sample = None;
        self.hovered_signal = None;
    }

    /// Whether a sample/track pair is hovered
    pub fn is_hovering(&self) -> bool {
        self.hovered_sample.is_some() && self.hovered_signal.is_some()
    }
}

/// User commands on a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    ZoomIn,
    ZoomOut,
    Reset,
    PanLeft,
    PanRight,
}

impl ViewAction {
    pub fn display_name(&self) -> &'static str {
        match self {
            ViewAction::ZoomIn => "Zoom In",
            ViewAction::ZoomOut => "Zoom Out",
            ViewAction::Reset => "Reset",
            ViewAction::PanLeft => "◀",
            ViewAction::PanRight => "▶",
        }
    }
}

/// Pointer events delivered by the host UI, in surface pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved(Point),
    Left,
}

/// Sample and track under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverTarget {
    /// Absolute sample index
    pub sample: usize,
    /// Track index (time axis excluded)
    pub signal: usize,
}

/// Transient pointer-anchored readout
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub anchor: Point,
    pub time: SampleValue,
    pub signal: String,
    pub value: String,
}

impl Tooltip {
    pub fn text(&self) -> String {
        format!("t = {}\n{}: {}", self.time, self.signal, self.value)
    }
}

/// One signal's value in the info panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoEntry {
    pub name: String,
    pub kind: SignalKind,
    pub value: String,
}

/// Every signal's value at the hovered sample
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfoPanel {
    pub sample: usize,
    pub time: SampleValue,
    pub entries: Vec<InfoEntry>,
}

/// Format a value for display; multi-level values show hex and decimal
pub fn format_value(value: SampleValue, kind: SignalKind) -> String {
    if kind.is_multi_level() {
        format!("{} ({})", format_literal(value), value)
    } else {
        value.to_string()
    }
}

/// Per-surface controller: document, view state and current frame
#[derive(Debug, Clone)]
pub struct InteractionController {
    document: WaveformDocument,
    engine: RenderEngine,
    render: RenderConfig,
    view: ViewState,
    tooltip: Option<Tooltip>,
    info: Option<InfoPanel>,
    frame: RecordingSurface,
}

impl InteractionController {
    /// Take ownership of `document` and render the first frame
    pub fn new(document: WaveformDocument, mut engine: RenderEngine, render: RenderConfig) -> Self {
        let render = render.sanitized();
        engine.set_sample_cap(render.sample_cap);
        let mut controller = Self {
            document,
            engine,
            render,
            view: ViewState::default(),
            tooltip: None,
            info: None,
            frame: RecordingSurface::default(),
        };
        controller.rerender();
        controller
    }

    pub fn document(&self) -> &WaveformDocument {
        &self.document
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn engine(&self) -> &RenderEngine {
        &self.engine
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    /// The most recently rendered frame
    pub fn frame(&self) -> &RecordingSurface {
        &self.frame
    }

    pub fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    pub fn info_panel(&self) -> Option<&InfoPanel> {
        self.info.as_ref()
    }

    /// Samples currently on screen
    pub fn visible_window(&self) -> VisibleWindow {
        self.engine.visible_window(&self.document, &self.view)
    }

    /// Redraw the frame from the document and view state
    pub fn rerender(&mut self) {
        let (width, height) = self
            .engine
            .frame_size(&self.document, self.render.surface_width);
        let mut frame = RecordingSurface::new(width, height);
        self.engine.render(&self.document, &self.view, &mut frame);
        self.frame = frame;
    }

    /// Change the sample cap or width and redraw
    pub fn set_render_config(&mut self, render: RenderConfig) {
        self.render = render.sanitized();
        self.engine.set_sample_cap(self.render.sample_cap);
        self.rerender();
    }

    /// Map a pointer position to the sample and track under it
    ///
    /// Returns `None` in the label area left of the traces and outside the
    /// visible samples or tracks.
    pub fn map_pointer(&self, point: Point) -> Option<HoverTarget> {
        let layout = self.engine.layout();
        if point.x < layout.left_margin || point.y < layout.top_margin {
            return None;
        }
        let window = self.visible_window();
        if window.is_empty() {
            return None;
        }

        let spacing = layout.plot_width(self.render.surface_width) as f64 / window.len as f64;
        let sample = ((point.x - layout.left_margin) as f64 / spacing).floor() as usize;
        let signal = ((point.y - layout.top_margin) / layout.track_height).floor() as usize;
        if sample >= window.len || signal >= self.document.signal_count() {
            return None;
        }

        Some(HoverTarget {
            sample: window.start + sample,
            signal,
        })
    }

    /// Handle a pointer event; returns true if the view changed
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Moved(point) => self.pointer_moved(point),
            PointerEvent::Left => self.pointer_left(),
        }
    }

    /// Update hover, tooltip and info panel for a pointer position
    pub fn pointer_moved(&mut self, point: Point) -> bool {
        let Some(target) = self.map_pointer(point) else {
            return false;
        };
        let Some(series) = self.document.signal_at(target.signal) else {
            return false;
        };

        let classifier = self.engine.classifier();
        let kind = classifier.classify(&series.name);
        let time = self.document.time()[target.sample];
        let value = series.value_at(target.sample).unwrap_or_default();
        self.tooltip = Some(Tooltip {
            anchor: Point::new(point.x + TOOLTIP_OFFSET, point.y + TOOLTIP_OFFSET),
            time,
            signal: series.name.clone(),
            value: format_value(value, kind),
        });
        self.info = Some(InfoPanel {
            sample: target.sample,
            time,
            entries: self
                .document
                .signals()
                .map(|s| {
                    let kind = classifier.classify(&s.name);
                    InfoEntry {
                        name: s.name.clone(),
                        kind,
                        value: format_value(s.value_at(target.sample).unwrap_or_default(), kind),
                    }
                })
                .collect(),
        });

        let changed = self.view.hovered_sample != Some(target.sample)
            || self.view.hovered_signal != Some(target.signal);
        if changed {
            self.view.hovered_sample = Some(target.sample);
            self.view.hovered_signal = Some(target.signal);
            self.rerender();
        }
        changed
    }

    /// Clear hover and hide the tooltip; the info panel keeps its last readout
    pub fn pointer_left(&mut self) -> bool {
        let changed = self.view.is_hovering() || self.tooltip.is_some();
        self.view.clear_hover();
        self.tooltip = None;
        if changed {
            self.rerender();
        }
        changed
    }

    /// Apply a zoom/pan control and redraw
    pub fn apply(&mut self, action: ViewAction) {
        match action {
            ViewAction::ZoomIn => self.view.zoom_in(),
            ViewAction::ZoomOut => self.view.zoom_out(),
            ViewAction::Reset => self.view.reset(),
            ViewAction::PanLeft => {
                let step = self.pan_step();
                self.view.pan_offset = self.view.pan_offset.saturating_sub(step);
            }
            ViewAction::PanRight => {
                let step = self.pan_step();
                let last = self.document.sample_count().saturating_sub(1);
                self.view.pan_offset = (self.view.pan_offset + step).min(last);
            }
        }
        tracing::debug!(
            ?action,
            zoom = self.view.zoom_level,
            pan = self.view.pan_offset,
            "View updated"
        );
        self.rerender();
    }

    fn pan_step(&self) -> usize {
        (self.visible_window().len / 4).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::SignalClassifier;
    use crate::parser::parse;
    use crate::render::Surface;
    use proptest::prelude::*;

    const DUMP: &str = "0 time\n1 clk\n2 en\n3 count\n=====\n\
        0 1 0 00\n10 1 1 01\n20 1 1 0a\n30 1 0 0a\n";

    fn controller(cap: usize) -> InteractionController {
        InteractionController::new(
            parse(DUMP),
            RenderEngine::new(SignalClassifier::default(), cap),
            RenderConfig {
                sample_cap: cap,
                surface_width: 520.0,
            },
        )
    }

    #[test]
    fn test_view_state_defaults() {
        let view = ViewState::default();
        assert_eq!(view.zoom_level, 1.0);
        assert_eq!(view.pan_offset, 0);
        assert!(!view.is_hovering());
    }

    #[test]
    fn test_zoom_in_clamps_at_max() {
        let mut c = controller(4);
        for _ in 0..40 {
            c.apply(ViewAction::ZoomIn);
        }
        assert_eq!(c.view().zoom_level, MAX_ZOOM);
    }

    #[test]
    fn test_zoom_out_clamps_at_min() {
        let mut view = ViewState::default();
        for _ in 0..40 {
            view.zoom_out();
        }
        assert_eq!(view.zoom_level, MIN_ZOOM);
    }

    #[test]
    fn test_reset_restores_zoom_and_pan() {
        let mut c = controller(2);
        c.apply(ViewAction::ZoomIn);
        c.apply(ViewAction::PanRight);
        assert_ne!(c.view().zoom_level, 1.0);
        assert_eq!(c.view().pan_offset, 1);
        c.apply(ViewAction::Reset);
        assert_eq!(c.view().zoom_level, 1.0);
        assert_eq!(c.view().pan_offset, 0);
    }

    #[test]
    fn test_pan_is_clamped() {
        let mut c = controller(4);
        c.apply(ViewAction::PanLeft);
        assert_eq!(c.view().pan_offset, 0);
        for _ in 0..10 {
            c.apply(ViewAction::PanRight);
        }
        assert_eq!(c.view().pan_offset, 3);
        assert_eq!(c.visible_window(), VisibleWindow { start: 3, len: 1 });
    }

    #[test]
    fn test_left_margin_maps_to_first_sample() {
        let c = controller(4);
        let layout = *c.engine().layout();
        let target = c.map_pointer(Point::new(layout.left_margin, layout.top_margin));
        assert_eq!(target, Some(HoverTarget { sample: 0, signal: 0 }));
    }

    #[test]
    fn test_pointer_mapping() {
        let c = controller(4);
        let layout = *c.engine().layout();
        // plot width 380 over 4 samples → 95 px per sample
        let target = c.map_pointer(Point::new(layout.left_margin + 200.0, layout.top_margin + 45.0));
        assert_eq!(target, Some(HoverTarget { sample: 2, signal: 1 }));
        // Past the last track
        assert_eq!(c.map_pointer(Point::new(300.0, layout.top_margin + 125.0)), None);
        // Past the right edge of the traces
        assert_eq!(c.map_pointer(Point::new(505.0, layout.top_margin)), None);
    }

    #[test]
    fn test_dead_zone_keeps_previous_hover() {
        let mut c = controller(4);
        assert!(c.pointer_moved(Point::new(150.0, 35.0)));
        let before = *c.view();
        assert!(!c.pointer_moved(Point::new(50.0, 35.0)));
        assert_eq!(*c.view(), before);
        assert!(c.tooltip().is_some());
    }

    #[test]
    fn test_hover_updates_tooltip_and_info_panel() {
        let mut c = controller(4);
        let layout = *c.engine().layout();
        // Sample 2 of the count track
        let point = Point::new(layout.left_margin + 200.0, layout.top_margin + 85.0);
        assert!(c.pointer_moved(point));

        assert_eq!(c.view().hovered_sample, Some(2));
        assert_eq!(c.view().hovered_signal, Some(2));

        let tooltip = c.tooltip().unwrap();
        assert_eq!(tooltip.time, 20);
        assert_eq!(tooltip.signal, "count");
        assert_eq!(tooltip.value, "0x0a (10)");
        assert_eq!(tooltip.anchor, Point::new(point.x + 12.0, point.y + 12.0));
        assert!(tooltip.text().contains("t = 20"));

        let info = c.info_panel().unwrap();
        assert_eq!(info.time, 20);
        let values: Vec<_> = info.entries.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(values, vec!["1", "1", "0x0a (10)"]);

        assert_eq!(c.frame().circle_count(), 1);
    }

    #[test]
    fn test_same_hover_does_not_rerender() {
        let mut c = controller(4);
        assert!(c.pointer_moved(Point::new(130.0, 35.0)));
        assert!(!c.pointer_moved(Point::new(131.0, 36.0)));
        assert_eq!(c.tooltip().unwrap().anchor, Point::new(143.0, 48.0));
    }

    #[test]
    fn test_pointer_left_clears_hover() {
        let mut c = controller(4);
        c.handle_pointer(PointerEvent::Moved(Point::new(130.0, 35.0)));
        assert!(c.handle_pointer(PointerEvent::Left));
        assert!(!c.view().is_hovering());
        assert!(c.tooltip().is_none());
        assert!(c.info_panel().is_some());
        assert_eq!(c.frame().circle_count(), 0);
        assert!(!c.handle_pointer(PointerEvent::Left));
    }

    #[test]
    fn test_hover_is_absolute_after_pan() {
        let mut c = controller(2);
        c.apply(ViewAction::PanRight);
        assert_eq!(c.visible_window(), VisibleWindow { start: 1, len: 2 });
        let layout = *c.engine().layout();
        let target = c.map_pointer(Point::new(layout.left_margin, layout.top_margin));
        assert_eq!(target, Some(HoverTarget { sample: 1, signal: 0 }));
    }

    #[test]
    fn test_zoom_changes_visible_window() {
        let mut c = controller(2);
        assert_eq!(c.visible_window().len, 2);
        c.apply(ViewAction::ZoomIn);
        assert_eq!(c.visible_window().len, 3);
        c.apply(ViewAction::ZoomOut);
        c.apply(ViewAction::ZoomOut);
        assert_eq!(c.visible_window().len, 1);
    }

    #[test]
    fn test_rerender_is_idempotent() {
        let mut c = controller(4);
        c.pointer_moved(Point::new(300.0, 75.0));
        let first = c.frame().clone();
        c.rerender();
        assert_eq!(c.frame(), &first);
    }

    #[test]
    fn test_set_render_config_redraws_at_new_width() {
        let mut c = controller(4);
        c.set_render_config(RenderConfig {
            sample_cap: 4,
            surface_width: 900.0,
        });
        assert_eq!(c.frame().width(), 900.0);
    }

    #[test]
    fn test_empty_document_never_hovers() {
        let mut c = InteractionController::new(
            parse(""),
            RenderEngine::new(SignalClassifier::default(), 10),
            RenderConfig::default(),
        );
        assert!(!c.pointer_moved(Point::new(200.0, 40.0)));
        assert!(c.frame().commands().is_empty());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(10, SignalKind::Bus), "0x0a (10)");
        assert_eq!(format_value(1, SignalKind::Clock), "1");
        assert_eq!(format_value(171, SignalKind::Digital), "0xab (171)");
    }

    proptest! {
        #[test]
        fn test_zoom_level_stays_in_range(steps in prop::collection::vec(any::<bool>(), 0..100)) {
            let mut view = ViewState::default();
            for zoom_in in steps {
                if zoom_in { view.zoom_in() } else { view.zoom_out() }
                prop_assert!(view.zoom_level >= MIN_ZOOM && view.zoom_level <= MAX_ZOOM);
            }
        }
    }
}
