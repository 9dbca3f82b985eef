//! [`Surface`] backed by an egui [`Painter`]
//!
//! Coordinates are surface-local; `origin` is the screen position of the
//! surface's top-left corner.

use egui::{Align2, Color32, FontId, Painter, Pos2, Stroke};

use crate::render::{Color, Font, FontFamily, Point, Surface};

/// Draws renderer output with an egui painter
pub struct PainterSurface {
    painter: Painter,
    origin: Pos2,
    width: f32,
    height: f32,
    subpaths: Vec<Vec<Pos2>>,
}

impl PainterSurface {
    pub fn new(painter: Painter, origin: Pos2, width: f32, height: f32) -> Self {
        Self {
            painter,
            origin,
            width,
            height,
            subpaths: Vec::new(),
        }
    }

    fn screen(&self, point: Point) -> Pos2 {
        to_screen(self.origin, point)
    }
}

/// Surface point → screen position
pub fn to_screen(origin: Pos2, point: Point) -> Pos2 {
    Pos2::new(origin.x + point.x, origin.y + point.y)
}

pub fn to_color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

pub fn to_font_id(font: Font) -> FontId {
    match font.family {
        FontFamily::Monospace => FontId::monospace(font.size),
        FontFamily::Proportional => FontId::proportional(font.size),
    }
}

impl Surface for PainterSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, point: Point) {
        let pos = self.screen(point);
        self.subpaths.push(vec![pos]);
    }

    fn line_to(&mut self, point: Point) {
        let pos = self.screen(point);
        match self.subpaths.last_mut() {
            Some(path) => path.push(pos),
            None => self.subpaths.push(vec![pos]),
        }
    }

    fn stroke(&mut self, color: Color, width: f32) {
        let stroke = Stroke::new(width, to_color32(color));
        for path in self.subpaths.drain(..) {
            if path.len() >= 2 {
                self.painter.line(path, stroke);
            }
        }
    }

    fn fill_text(&mut self, text: &str, at: Point, color: Color, font: Font) {
        self.painter.text(
            self.screen(at),
            Align2::LEFT_BOTTOM,
            text,
            to_font_id(font),
            to_color32(color),
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.painter
            .circle_filled(self.screen(center), radius, to_color32(color));
    }
}
