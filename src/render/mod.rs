//! Timing diagram renderer
//!
//! Draws a [`WaveformDocument`] onto any [`Surface`]: a time grid, then one
//! track per signal (time axis excluded) in column order.
//!
//! # Geometry
//!
//! ```text
//!  ┌ top_margin ──────────────────────────────────────────────┐
//!  │ label │ track 0 ..................................... │ r │
//!  │ label │ track 1 ..................................... │ r │
//!  └ bottom_margin ───────────────────────────────────────────┘
//!    left_margin                                    right_margin
//! ```
//!
//! The visible window is `floor(sample_cap × zoom_level)` samples starting
//! at the pan offset, so zooming changes how many samples are shown rather
//! than only the pixel density. Time maps linearly from the window's time
//! range onto `[left_margin, width - right_margin]`.
//!
//! Clock, reset and enable signals are drawn as step waveforms between two
//! fixed levels. Every other signal, recognised bus or not, is drawn as a
//! step plot scaled against an 8-bit range with periodic hex annotations.

pub mod recorder;

pub use recorder::{DrawCommand, RecordingSurface};

use crate::classify::{SignalClassifier, SignalKind};
use crate::encoder::format_literal;
use crate::interaction::ViewState;
use crate::types::{SampleValue, WaveformDocument};

/// Largest bus value mapped inside the track; larger values clamp to the top
pub const BUS_FULL_SCALE: SampleValue = 255;

/// Minimum distance in samples between bus annotations
pub const MIN_ANNOTATION_STRIDE: usize = 4;

/// Target number of annotations per bus track
const ANNOTATIONS_PER_TRACK: usize = 16;

/// Number of grid intervals across the visible time span
const GRID_DIVISIONS: f64 = 10.0;

/// A point in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Font family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Proportional,
    Monospace,
}

/// Font used by `fill_text`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size: f32,
    pub family: FontFamily,
}

impl Font {
    pub const fn monospace(size: f32) -> Self {
        Self {
            size,
            family: FontFamily::Monospace,
        }
    }

    pub const fn proportional(size: f32) -> Self {
        Self {
            size,
            family: FontFamily::Proportional,
        }
    }
}

/// Minimal 2D drawing interface the renderer depends on
///
/// `fill_text` positions text by its left baseline.
#[cfg_attr(test, mockall::automock)]
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;
    fn begin_path(&mut self);
    fn move_to(&mut self, point: Point);
    fn line_to(&mut self, point: Point);
    fn stroke(&mut self, color: Color, width: f32);
    fn fill_text(&mut self, text: &str, at: Point, color: Color, font: Font);
    fn fill_circle(&mut self, center: Point, radius: f32, color: Color);
}

/// Colors used by the renderer
pub mod palette {
    use super::Color;
    use crate::classify::SignalKind;

    pub const GRID: Color = Color::rgba(128, 128, 128, 90);
    pub const GRID_TEXT: Color = Color::rgb(150, 150, 150);
    pub const LABEL: Color = Color::rgb(220, 220, 220);
    pub const ANNOTATION: Color = Color::rgb(240, 200, 120);
    pub const HOVER: Color = Color::rgb(255, 99, 71);

    /// Trace color for a signal kind
    pub fn trace(kind: SignalKind) -> Color {
        match kind {
            SignalKind::Clock => Color::rgb(50, 205, 50),
            SignalKind::Reset => Color::rgb(255, 120, 120),
            SignalKind::Enable => Color::rgb(255, 215, 0),
            SignalKind::Bus => Color::rgb(100, 149, 237),
            SignalKind::Digital => Color::rgb(0, 200, 200),
        }
    }
}

/// Fixed track geometry in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderLayout {
    pub track_height: f32,
    pub left_margin: f32,
    pub right_margin: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
    /// X offset of signal labels
    pub label_x: f32,
    /// Distance from the track's bottom edge to the label baseline
    pub label_inset: f32,
    /// Distance from the track edges to the high and low levels
    pub level_inset: f32,
    pub trace_width: f32,
    pub hover_radius: f32,
}

impl Default for RenderLayout {
    fn default() -> Self {
        Self {
            track_height: 40.0,
            left_margin: 120.0,
            right_margin: 20.0,
            top_margin: 30.0,
            bottom_margin: 20.0,
            label_x: 10.0,
            label_inset: 15.0,
            level_inset: 8.0,
            trace_width: 2.0,
            hover_radius: 4.0,
        }
    }
}

impl RenderLayout {
    /// Surface height needed for `tracks` tracks
    pub fn surface_height(&self, tracks: usize) -> f32 {
        self.top_margin + tracks as f32 * self.track_height + self.bottom_margin
    }

    /// Top edge of track `index`
    pub fn track_top(&self, index: usize) -> f32 {
        self.top_margin + index as f32 * self.track_height
    }

    /// Width available to traces on a surface `width` pixels wide
    pub fn plot_width(&self, width: f32) -> f32 {
        (width - self.left_margin - self.right_margin).max(0.0)
    }
}

/// Range of samples currently on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VisibleWindow {
    /// First visible sample index
    pub start: usize,
    /// Number of visible samples
    pub len: usize,
}

impl VisibleWindow {
    /// One past the last visible sample index
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Whether absolute sample `index` is on screen
    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Number of samples shown for a cap and zoom level
pub fn visible_sample_count(sample_cap: usize, zoom_level: f64) -> usize {
    (sample_cap as f64 * zoom_level).floor().max(0.0) as usize
}

/// Linear time → x mapping for the visible window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxis {
    pub t_min: SampleValue,
    pub t_max: SampleValue,
    x_start: f32,
    x_end: f32,
}

impl TimeAxis {
    /// Build the axis for `times` across `[x_start, x_end]`; `None` if empty
    pub fn new(times: &[SampleValue], x_start: f32, x_end: f32) -> Option<Self> {
        let t_min = *times.iter().min()?;
        let t_max = *times.iter().max()?;
        Some(Self {
            t_min,
            t_max,
            x_start,
            x_end,
        })
    }

    /// Visible time span; computed in f64 so the full i64 range fits
    pub fn span(&self) -> f64 {
        self.t_max as f64 - self.t_min as f64
    }

    /// Pixel x for time `t`
    pub fn x(&self, t: SampleValue) -> f32 {
        let span = self.span();
        let denominator = if span == 0.0 { 1.0 } else { span };
        let fraction = (t as f64 - self.t_min as f64) / denominator;
        self.x_start + (fraction * (self.x_end - self.x_start) as f64) as f32
    }

    /// Grid step: a tenth of the span, at least 1
    pub fn tick_step(&self) -> SampleValue {
        // `as` saturates, so the step stays representable
        ((self.span() / GRID_DIVISIONS).round() as SampleValue).max(1)
    }

    /// Grid tick times from `t_min` to `t_max` inclusive
    pub fn ticks(&self) -> impl Iterator<Item = SampleValue> {
        let step = self.tick_step();
        let t_max = self.t_max;
        std::iter::successors(Some(self.t_min), move |t| t.checked_add(step))
            .take_while(move |t| *t <= t_max)
    }
}

/// Stride in samples between bus annotations for `visible` samples
pub fn annotation_stride(visible: usize) -> usize {
    visible
        .div_ceil(ANNOTATIONS_PER_TRACK)
        .max(MIN_ANNOTATION_STRIDE)
}

/// Renders documents onto surfaces
#[derive(Debug, Clone)]
pub struct RenderEngine {
    layout: RenderLayout,
    classifier: SignalClassifier,
    sample_cap: usize,
}

impl RenderEngine {
    /// Create an engine with the default layout
    pub fn new(classifier: SignalClassifier, sample_cap: usize) -> Self {
        Self {
            layout: RenderLayout::default(),
            classifier,
            sample_cap,
        }
    }

    /// Replace the track geometry
    pub fn with_layout(mut self, layout: RenderLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn layout(&self) -> &RenderLayout {
        &self.layout
    }

    pub fn classifier(&self) -> &SignalClassifier {
        &self.classifier
    }

    pub fn sample_cap(&self) -> usize {
        self.sample_cap
    }

    pub fn set_sample_cap(&mut self, sample_cap: usize) {
        self.sample_cap = sample_cap;
    }

    /// Surface size needed to draw `document` at `width`
    pub fn frame_size(&self, document: &WaveformDocument, width: f32) -> (f32, f32) {
        (width, self.layout.surface_height(document.signal_count()))
    }

    /// Samples visible for the given view
    pub fn visible_window(&self, document: &WaveformDocument, view: &ViewState) -> VisibleWindow {
        let total = document.sample_count();
        let start = view.pan_offset.min(total);
        let len = visible_sample_count(self.sample_cap, view.zoom_level).min(total - start);
        VisibleWindow { start, len }
    }

    /// Draw `document` as seen through `view`
    pub fn render<S: Surface + ?Sized>(
        &self,
        document: &WaveformDocument,
        view: &ViewState,
        surface: &mut S,
    ) {
        let layout = &self.layout;
        let window = self.visible_window(document, view);
        let times = &document.time()[window.start..window.end()];
        let axis = TimeAxis::new(
            times,
            layout.left_margin,
            surface.width() - layout.right_margin,
        );

        if let Some(axis) = &axis {
            self.draw_grid(axis, surface);
        }

        for (track, series) in document.signals().enumerate() {
            let top = layout.track_top(track);
            surface.fill_text(
                &series.name,
                Point::new(layout.label_x, top + layout.track_height - layout.label_inset),
                palette::LABEL,
                Font::proportional(13.0),
            );

            let Some(axis) = &axis else {
                continue;
            };
            let kind = self.classifier.classify(&series.name);
            let values = &series.values[window.start..window.end()];
            let level = TrackLevels::new(layout, top, kind);

            draw_steps(surface, axis, times, values, &level, palette::trace(kind), layout.trace_width);
            if kind.is_multi_level() {
                draw_annotations(surface, axis, times, values, &level);
            }

            if view.hovered_signal == Some(track) {
                if let Some(sample) = view.hovered_sample.filter(|s| window.contains(*s)) {
                    let local = sample - window.start;
                    surface.fill_circle(
                        Point::new(axis.x(times[local]), level.y(values[local])),
                        layout.hover_radius,
                        palette::HOVER,
                    );
                }
            }
        }
    }

    fn draw_grid<S: Surface + ?Sized>(&self, axis: &TimeAxis, surface: &mut S) {
        let height = surface.height();
        for t in axis.ticks() {
            let x = axis.x(t);
            surface.begin_path();
            surface.move_to(Point::new(x, 0.0));
            surface.line_to(Point::new(x, height));
            surface.stroke(palette::GRID, 1.0);
            surface.fill_text(
                &t.to_string(),
                Point::new(x + 2.0, self.layout.top_margin - 10.0),
                palette::GRID_TEXT,
                Font::monospace(10.0),
            );
        }
    }
}

/// Value → y mapping within one track
struct TrackLevels {
    high: f32,
    low: f32,
    kind: SignalKind,
}

impl TrackLevels {
    fn new(layout: &RenderLayout, top: f32, kind: SignalKind) -> Self {
        Self {
            high: top + layout.level_inset,
            low: top + layout.track_height - layout.level_inset,
            kind,
        }
    }

    fn y(&self, value: SampleValue) -> f32 {
        if self.kind.is_two_level() {
            if value != 0 {
                self.high
            } else {
                self.low
            }
        } else {
            let fraction = value.clamp(0, BUS_FULL_SCALE) as f32 / BUS_FULL_SCALE as f32;
            self.low - fraction * (self.low - self.high)
        }
    }
}

fn draw_steps<S: Surface + ?Sized>(
    surface: &mut S,
    axis: &TimeAxis,
    times: &[SampleValue],
    values: &[SampleValue],
    level: &TrackLevels,
    color: Color,
    width: f32,
) {
    let (Some(&t0), Some(&v0)) = (times.first(), values.first()) else {
        return;
    };
    surface.begin_path();
    surface.move_to(Point::new(axis.x(t0), level.y(v0)));
    for (pair, &t) in values.windows(2).zip(&times[1..]) {
        let x = axis.x(t);
        surface.line_to(Point::new(x, level.y(pair[0])));
        if pair[1] != pair[0] {
            surface.line_to(Point::new(x, level.y(pair[1])));
        }
    }
    surface.stroke(color, width);
}

// Only compares against the sample one stride back, so plateaus shorter than
// the stride can go unlabeled.
fn draw_annotations<S: Surface + ?Sized>(
    surface: &mut S,
    axis: &TimeAxis,
    times: &[SampleValue],
    values: &[SampleValue],
    level: &TrackLevels,
) {
    let stride = annotation_stride(values.len());
    for i in (0..values.len()).step_by(stride) {
        if i > 0 && values[i] == values[i - stride] {
            continue;
        }
        surface.fill_text(
            &format_literal(values[i]),
            Point::new(axis.x(times[i]) + 2.0, level.high + 10.0),
            palette::ANNOTATION,
            Font::monospace(10.0),
        );
    }
}
