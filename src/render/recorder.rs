//! Recording surface
//!
//! Captures draw calls as an ordered command list. Rendering into a
//! [`RecordingSurface`] and replaying it later keeps the renderer independent
//! of any concrete graphics backend, and makes frames directly comparable.

use super::{Color, Font, Point, Surface};

/// One captured draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    Stroke { color: Color, width: f32 },
    FillText {
        text: String,
        at: Point,
        color: Color,
        font: Font,
    },
    FillCircle {
        center: Point,
        radius: f32,
        color: Color,
    },
}

/// A surface that records every draw call
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Create an empty surface of the given pixel size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Recorded commands in draw order
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Replay every recorded command onto `target`
    pub fn replay<S: Surface + ?Sized>(&self, target: &mut S) {
        for command in &self.commands {
            match command {
                DrawCommand::BeginPath => target.begin_path(),
                DrawCommand::MoveTo(p) => target.move_to(*p),
                DrawCommand::LineTo(p) => target.line_to(*p),
                DrawCommand::Stroke { color, width } => target.stroke(*color, *width),
                DrawCommand::FillText {
                    text,
                    at,
                    color,
                    font,
                } => target.fill_text(text, *at, *color, *font),
                DrawCommand::FillCircle {
                    center,
                    radius,
                    color,
                } => target.fill_circle(*center, *radius, *color),
            }
        }
    }

    /// Every string drawn with `fill_text`
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Number of stroked paths
    pub fn stroke_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Stroke { .. }))
            .count()
    }

    /// Number of filled circles
    pub fn circle_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::FillCircle { .. }))
            .count()
    }

    /// Points of each stroked path, in draw order
    pub fn path_points(&self) -> Vec<Vec<Point>> {
        let mut paths = Vec::new();
        let mut current = Vec::new();
        for command in &self.commands {
            match command {
                DrawCommand::BeginPath => current.clear(),
                DrawCommand::MoveTo(p) | DrawCommand::LineTo(p) => current.push(*p),
                DrawCommand::Stroke { .. } => paths.push(std::mem::take(&mut current)),
                _ => {}
            }
        }
        paths
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, point: Point) {
        self.commands.push(DrawCommand::MoveTo(point));
    }

    fn line_to(&mut self, point: Point) {
        self.commands.push(DrawCommand::LineTo(point));
    }

    fn stroke(&mut self, color: Color, width: f32) {
        self.commands.push(DrawCommand::Stroke { color, width });
    }

    fn fill_text(&mut self, text: &str, at: Point, color: Color, font: Font) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            at,
            color,
            font,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }
}
