mod colormap;
mod error;
mod layer;
mod logits;
mod palette;
mod segmentation;
mod util;
mod volume;

#[cfg(test)]
mod tests;

pub use colormap::{Colormap, jet};
pub use error::{ModelError, Result};
pub use layer::{ItemInfo, Layer};
pub use logits::{LoadOutcome, LogitsItem, ThresholdBand};
pub use palette::{BACKGROUND, PALETTE, Palette};
pub use segmentation::{DEFAULT_SEGMENTATION_OPACITY, SegmentationItem};
pub use volume::{DEFAULT_WINDOW, VolumeItem, Window};
