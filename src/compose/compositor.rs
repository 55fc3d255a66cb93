use ndarray::{Array3, Axis};

use super::blend::{blend_colored, blend_masked, gray_base, to_rgb_image};
use super::frame::FramePair;
use crate::model::{Layer, LogitsItem, SegmentationItem, VolumeItem};

/// Blends the loaded items into two RGB images for one depth slice.
///
/// Reads item state only. The segmentation is applied once to a shared base;
/// each side then blends its own logits inside that side's threshold band.
#[derive(Debug, Clone, Copy)]
pub struct Compositor<'a> {
    volume: &'a VolumeItem,
    segmentation: Option<&'a SegmentationItem>,
    left: Option<&'a LogitsItem>,
    right: Option<&'a LogitsItem>,
    logits_opacity: f32,
}

impl<'a> Compositor<'a> {
    pub fn new(volume: &'a VolumeItem) -> Self {
        Self {
            volume,
            segmentation: None,
            left: None,
            right: None,
            logits_opacity: 1.0,
        }
    }

    pub fn with_segmentation(mut self, segmentation: Option<&'a SegmentationItem>) -> Self {
        self.segmentation = segmentation;
        self
    }

    /// `opacity` is shared by both sides.
    pub fn with_logits(
        mut self,
        left: Option<&'a LogitsItem>,
        right: Option<&'a LogitsItem>,
        opacity: f32,
    ) -> Self {
        self.left = left;
        self.right = right;
        self.logits_opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// `None` when `slice` is outside the volume.
    pub fn render(&self, slice: usize) -> Option<FramePair> {
        let gray = self.volume.normalized_slice(slice)?;
        let mut base = gray_base(gray);

        if let Some(segmentation) = self.segmentation.filter(|item| item.visible()) {
            match segmentation.rgb_slice(slice) {
                Some(colors) if colors.dim() == base.dim() => {
                    blend_colored(&mut base, colors, segmentation.opacity());
                }
                _ => log::debug!(
                    "skipping segmentation {}: no matching slice {slice}",
                    segmentation.name()
                ),
            }
        }

        let (left, right) = rayon::join(
            || self.paint_logits(base.clone(), self.left, slice),
            || self.paint_logits(base.clone(), self.right, slice),
        );

        Some(FramePair {
            slice,
            left: to_rgb_image(&left),
            right: to_rgb_image(&right),
        })
    }

    fn paint_logits(
        &self,
        mut image: Array3<f32>,
        logits: Option<&LogitsItem>,
        slice: usize,
    ) -> Array3<f32> {
        let Some(logits) = logits.filter(|item| item.visible()) else {
            return image;
        };
        let (Some(values), Some(colors)) = (logits.class_slice(slice), logits.rgb_slice(slice))
        else {
            log::debug!("skipping logits {}: no slice {slice}", logits.name());
            return image;
        };
        if values.dim() != (image.len_of(Axis(0)), image.len_of(Axis(1))) {
            log::debug!("skipping logits {}: slice shape differs", logits.name());
            return image;
        }
        blend_masked(&mut image, colors, values, logits.band(), self.logits_opacity);
        image
    }
}
