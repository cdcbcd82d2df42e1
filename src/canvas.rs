//! Drawing surfaces the animation driver paints onto.

use cgmath::Vector2;
use eframe::egui::{self, Color32};

/// The minimal 2D surface needed to paint particles.
pub trait Canvas {
    fn clear(&mut self);

    /// Opacity applied to every following draw call until changed.
    fn set_global_alpha(&mut self, alpha: f32);

    fn fill_circle(&mut self, center: Vector2<f32>, radius: f32, color: Color32);
}

/// Paints onto an egui [`egui::Painter`], offsetting surface-local coordinates
/// by the scene origin.
pub struct PainterCanvas {
    painter: egui::Painter,
    origin: egui::Pos2,
    alpha: f32,
}

impl PainterCanvas {
    pub fn new(painter: egui::Painter, origin: egui::Pos2) -> Self {
        Self {
            painter,
            origin,
            alpha: 1.0,
        }
    }
}

impl Canvas for PainterCanvas {
    fn clear(&mut self) {
        // egui rebuilds every frame from scratch, there is nothing to erase.
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_circle(&mut self, center: Vector2<f32>, radius: f32, color: Color32) {
        let a = (self.alpha * 255.0).round() as u8;
        self.painter.circle_filled(
            self.origin + egui::vec2(center.x, center.y),
            radius,
            Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), a),
        );
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    pub center: Vector2<f32>,
    pub radius: f32,
    pub color: Color32,
    pub alpha: f32,
}

/// Headless canvas that records what would have been drawn in the current frame.
#[derive(Debug)]
pub struct RecordingCanvas {
    pub calls: Vec<DrawCall>,
    pub clears: usize,
    pub global_alpha: f32,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            clears: 0,
            global_alpha: 1.0,
        }
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self) {
        self.calls.clear();
        self.clears += 1;
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.global_alpha = alpha;
    }

    fn fill_circle(&mut self, center: Vector2<f32>, radius: f32, color: Color32) {
        self.calls.push(DrawCall {
            center,
            radius,
            color,
            alpha: self.global_alpha,
        });
    }
}
