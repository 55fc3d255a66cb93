use eframe::egui;

use super::transform::{ViewportTransform, ZoomAnchor, ZoomLimits};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Canvas {
    Left,
    Right,
}

impl Canvas {
    fn index(self) -> usize {
        match self {
            Canvas::Left => 0,
            Canvas::Right => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerState {
    Idle,
    Panning { last: egui::Pos2 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoxelPosition {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelAction {
    Zoomed(ZoomAnchor),
    /// Already at a zoom bound; nothing moved.
    ZoomClamped,
    /// Unmodified wheel: move the depth slice by this many steps.
    SliceStep(i32),
    Ignored,
}

/// Pan and zoom for the left/right canvas pair.
///
/// Every gesture is applied to both transforms, so they always hold the same
/// scale and origin.
#[derive(Debug, Clone)]
pub struct ViewportController {
    limits: ZoomLimits,
    transforms: [ViewportTransform; 2],
    state: PointerState,
    /// (height, width) of the displayed slice.
    image_size: Option<[usize; 2]>,
}

impl ViewportController {
    pub fn new(limits: ZoomLimits) -> Self {
        let initial = ViewportTransform::new(limits.clamp(limits.initial));
        Self {
            limits,
            transforms: [initial; 2],
            state: PointerState::Idle,
            image_size: None,
        }
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    pub fn state(&self) -> PointerState {
        self.state
    }

    pub fn transform(&self, canvas: Canvas) -> ViewportTransform {
        self.transforms[canvas.index()]
    }

    pub fn scale(&self) -> f32 {
        self.transforms[0].scale
    }

    pub fn image_size(&self) -> Option<[usize; 2]> {
        self.image_size
    }

    /// `None` hides the image; pointer motion then stops reporting voxels.
    pub fn set_image_size(&mut self, size: Option<[usize; 2]>) {
        self.image_size = size.filter(|[height, width]| *height > 0 && *width > 0);
    }

    /// Back to the initial scale at the canvas origin.
    pub fn reset(&mut self) {
        self.transforms = [ViewportTransform::new(self.limits.clamp(self.limits.initial)); 2];
        self.state = PointerState::Idle;
    }

    pub fn pointer_down(&mut self, button: PointerButton, position: egui::Pos2) {
        if matches!(button, PointerButton::Primary | PointerButton::Middle) {
            self.state = PointerState::Panning { last: position };
        }
    }

    /// Pans while a drag is active and returns the voxel under the pointer.
    pub fn pointer_move(&mut self, position: egui::Pos2) -> Option<VoxelPosition> {
        if let PointerState::Panning { last } = self.state {
            let delta = position - last;
            for transform in &mut self.transforms {
                transform.translate(delta);
            }
            self.state = PointerState::Panning { last: position };
        }
        self.voxel_at(position)
    }

    pub fn pointer_up(&mut self) {
        self.state = PointerState::Idle;
    }

    /// `delta` > 0 is a wheel turn away from the user.
    pub fn wheel(&mut self, delta: f32, zoom_modifier: bool, anchor: egui::Pos2) -> WheelAction {
        if delta == 0.0 || !delta.is_finite() {
            return WheelAction::Ignored;
        }
        if !zoom_modifier {
            return WheelAction::SliceStep(if delta > 0.0 { 1 } else { -1 });
        }
        let Some(size) = self.image_vec() else {
            return WheelAction::Ignored;
        };

        let current = self.scale();
        let step = if delta > 0.0 {
            self.limits.step
        } else {
            -self.limits.step
        };
        let next = self.limits.clamp(current + step);
        if (next - current).abs() <= f32::EPSILON {
            log::debug!("zoom clamped at {current}");
            return WheelAction::ZoomClamped;
        }

        let mut outcome = ZoomAnchor::Centered;
        for transform in &mut self.transforms {
            outcome = transform.zoom_to(next, anchor, size);
        }
        WheelAction::Zoomed(outcome)
    }

    /// Voxel under a canvas position, clamped into the image.
    pub fn voxel_at(&self, position: egui::Pos2) -> Option<VoxelPosition> {
        let [height, width] = self.image_size?;
        let image = self.transforms[0].canvas_to_image(position);
        let clamp = |value: f32, len: usize| {
            if value.is_finite() {
                (value.floor().max(0.0) as usize).min(len - 1)
            } else {
                0
            }
        };
        Some(VoxelPosition {
            row: clamp(image.y, height),
            col: clamp(image.x, width),
        })
    }

    fn image_vec(&self) -> Option<egui::Vec2> {
        self.image_size
            .map(|[height, width]| egui::vec2(width as f32, height as f32))
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ZoomLimits::default())
    }
}
