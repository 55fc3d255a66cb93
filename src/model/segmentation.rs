use ndarray::{Array3, Array4, ArrayView3, Axis, Zip};

use super::util::shape3;
use super::{BACKGROUND, ItemInfo, Layer, ModelError, Palette, Result};

pub const DEFAULT_SEGMENTATION_OPACITY: f32 = 0.1;

/// Integer label volume with its palette colors precomputed per voxel.
#[derive(Debug, Clone)]
pub struct SegmentationItem {
    info: ItemInfo,
    labels: Array3<i32>,
    rgb: Array4<u8>,
    num_classes: usize,
    opacity: f32,
    visible: bool,
}

impl SegmentationItem {
    /// `expected` is the (D, H, W) shape of the active volume.
    pub fn load(
        labels: Array3<i32>,
        info: ItemInfo,
        expected: [usize; 3],
        palette: &Palette,
    ) -> Result<Self> {
        if shape3(labels.shape()) != Some(expected) {
            return Err(ModelError::ShapeMismatch {
                layer: "segmentation",
                expected,
                found: labels.shape().to_vec(),
            });
        }
        if let Some(&label) = labels.iter().find(|label| **label < 0) {
            return Err(ModelError::NegativeLabel { label });
        }
        let num_classes = labels.iter().copied().max().unwrap_or(0) as usize;
        palette.ensure_classes(num_classes)?;

        let (depth, height, width) = labels.dim();
        let mut rgb = Array4::<u8>::zeros((depth, height, width, 3));
        Zip::from(rgb.lanes_mut(Axis(3)))
            .and(&labels)
            .par_for_each(|mut pixel, &label| {
                let color = palette
                    .label_color(label as usize)
                    .unwrap_or(BACKGROUND);
                pixel[0] = color[0];
                pixel[1] = color[1];
                pixel[2] = color[2];
            });

        Ok(Self {
            info,
            labels,
            rgb,
            num_classes,
            opacity: DEFAULT_SEGMENTATION_OPACITY,
            visible: true,
        })
    }

    pub fn shape(&self) -> [usize; 3] {
        shape3(self.labels.shape()).unwrap_or([0, 0, 0])
    }

    /// Highest label present; label 0 is background.
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    pub fn labels(&self) -> &Array3<i32> {
        &self.labels
    }

    pub fn label(&self, depth: usize, row: usize, col: usize) -> Option<i32> {
        self.labels.get((depth, row, col)).copied()
    }

    pub fn rgb(&self) -> &Array4<u8> {
        &self.rgb
    }

    pub fn rgb_slice(&self, depth: usize) -> Option<ArrayView3<'_, u8>> {
        (depth < self.rgb.len_of(Axis(0))).then(|| self.rgb.index_axis(Axis(0), depth))
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        if opacity.is_finite() {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
    }
}

impl Layer for SegmentationItem {
    fn info(&self) -> &ItemInfo {
        &self.info
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}
