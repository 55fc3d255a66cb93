mod controller;
mod transform;

pub use controller::{
    Canvas, PointerButton, PointerState, ViewportController, VoxelPosition, WheelAction,
};
pub use transform::{ViewportTransform, ZoomAnchor, ZoomLimits};
