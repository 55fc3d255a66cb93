use eframe::egui;
use serde::{Deserialize, Serialize};

/// Scale bounds and wheel step shared by both canvases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    pub initial: f32,
    pub step: f32,
    pub min: f32,
    pub max: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            initial: 2.0,
            step: 0.1,
            min: 0.2,
            max: 10.0,
        }
    }
}

impl ZoomLimits {
    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min, self.max)
    }
}

/// How a zoom step kept the picture in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomAnchor {
    /// The image point under the cursor stayed put.
    Cursor,
    /// The cursor was outside the image; the image center stayed put.
    Centered,
}

/// Placement of an image inside a canvas: canvas = origin + image * scale.
///
/// All positions are canvas-local, so two canvases of the same size can share
/// one transform value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub scale: f32,
    pub origin: egui::Pos2,
}

impl ViewportTransform {
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            origin: egui::Pos2::ZERO,
        }
    }

    /// Canvas-space rectangle covered by an image of `image_size` pixels.
    pub fn image_bounds(&self, image_size: egui::Vec2) -> egui::Rect {
        egui::Rect::from_min_size(self.origin, image_size * self.scale)
    }

    pub fn canvas_to_image(&self, canvas: egui::Pos2) -> egui::Pos2 {
        if self.scale <= 0.0 {
            return egui::Pos2::ZERO;
        }
        ((canvas - self.origin) / self.scale).to_pos2()
    }

    pub fn image_to_canvas(&self, image: egui::Pos2) -> egui::Pos2 {
        self.origin + image.to_vec2() * self.scale
    }

    pub fn translate(&mut self, delta: egui::Vec2) {
        self.origin += delta;
    }

    /// Moves to `next` scale. With `anchor` strictly inside the current image
    /// bounds the image point under it is kept fixed, otherwise the image is
    /// grown or shrunk around its own center.
    pub fn zoom_to(&mut self, next: f32, anchor: egui::Pos2, image_size: egui::Vec2) -> ZoomAnchor {
        let previous = self.scale;
        let bounds = self.image_bounds(image_size);
        let inside = anchor.x > bounds.min.x
            && anchor.x < bounds.max.x
            && anchor.y > bounds.min.y
            && anchor.y < bounds.max.y;
        self.scale = next;
        if inside && previous > 0.0 {
            let ratio = next / previous - 1.0;
            self.origin -= (anchor - self.origin) * ratio;
            ZoomAnchor::Cursor
        } else {
            self.origin -= image_size * (next - previous) / 2.0;
            ZoomAnchor::Centered
        }
    }
}
