mod blend;
mod compositor;
mod frame;


pub use blend::{blend_colored, blend_masked, gray_base, to_rgb_image};
pub use compositor::Compositor;
pub use frame::FramePair;
