use ndarray::{Array4, ArrayD, ArrayView2, ArrayView3, Axis, Ix4};
use rayon::prelude::*;

use super::util::{min_max, shape3};
use super::{Colormap, ItemInfo, Layer, ModelError, Palette, Result};

/// How the spatial axes of a logits file were matched to the volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Clean,
    /// The last two spatial axes were swapped to fit the volume. This is a
    /// guess and can produce a geometrically wrong overlay.
    AxesSwapped,
}

/// Inclusive `[low, high]` band of logits values, `low < high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdBand {
    pub low: i32,
    pub high: i32,
}

impl ThresholdBand {
    pub fn contains(&self, value: f32) -> bool {
        value >= self.low as f32 && value <= self.high as f32
    }
}

/// Per-class network output, (C, D, H, W), with one color layer per class.
#[derive(Debug, Clone)]
pub struct LogitsItem {
    info: ItemInfo,
    data: Array4<f32>,
    rgb: Vec<Array4<u8>>,
    colormap: Colormap,
    palette: Palette,
    current_class: usize,
    range: ThresholdBand,
    band: ThresholdBand,
    outcome: LoadOutcome,
    visible: bool,
}

impl LogitsItem {
    /// Accepts (C, D, H, W) or (1, C, D, H, W). `expected` is the volume's
    /// (D, H, W). Colors every class eagerly and selects class 0.
    pub fn load(
        raw: ArrayD<f32>,
        info: ItemInfo,
        expected: [usize; 3],
        colormap: Colormap,
        palette: &Palette,
    ) -> Result<Self> {
        let data = squeeze_batch(raw)?;
        if data.len_of(Axis(0)) == 0 {
            return Err(ModelError::EmptyArray {
                shape: data.shape().to_vec(),
            });
        }
        let (data, outcome) = align_spatial(data, expected)?;
        if outcome == LoadOutcome::AxesSwapped {
            log::warn!(
                "{}: spatial shape did not match volume {:?}, swapped the last two axes",
                info.name,
                expected
            );
        }

        let rgb = colorize_classes(&data, colormap, palette);
        let mut item = Self {
            info,
            data,
            rgb,
            colormap,
            palette: palette.clone(),
            current_class: 0,
            range: ThresholdBand { low: 0, high: 1 },
            band: ThresholdBand { low: 0, high: 1 },
            outcome,
            visible: true,
        };
        item.set_class(0)?;
        Ok(item)
    }

    pub fn outcome(&self) -> LoadOutcome {
        self.outcome
    }

    pub fn num_classes(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    /// Spatial (D, H, W) shape.
    pub fn shape(&self) -> [usize; 3] {
        shape3(&self.data.shape()[1..]).unwrap_or([0, 0, 0])
    }

    pub fn data(&self) -> &Array4<f32> {
        &self.data
    }

    pub fn current_class(&self) -> usize {
        self.current_class
    }

    /// Selects the active class and resets the threshold band to
    /// `[floor(min) - 1, ceil(max) + 1]` of that class only.
    pub fn set_class(&mut self, class: usize) -> Result<()> {
        if class >= self.num_classes() {
            return Err(ModelError::ClassOutOfRange {
                class,
                count: self.num_classes(),
            });
        }
        let (min, max) = min_max(self.data.index_axis(Axis(0), class).iter()).unwrap_or((0.0, 0.0));
        self.current_class = class;
        self.range = ThresholdBand {
            low: (min.floor() as i32).saturating_sub(1),
            high: (max.ceil() as i32).saturating_add(1),
        };
        self.band = self.range;
        Ok(())
    }

    pub fn class_volume(&self) -> ArrayView3<'_, f32> {
        self.data.index_axis(Axis(0), self.current_class)
    }

    pub fn class_slice(&self, depth: usize) -> Option<ArrayView2<'_, f32>> {
        let volume = self.class_volume();
        (depth < volume.len_of(Axis(0))).then(|| volume.index_axis_move(Axis(0), depth))
    }

    pub fn rgb_slice(&self, depth: usize) -> Option<ArrayView3<'_, u8>> {
        let rgb = self.rgb.get(self.current_class)?;
        (depth < rgb.len_of(Axis(0))).then(|| rgb.index_axis(Axis(0), depth))
    }

    /// Values of every class at one voxel.
    pub fn class_values(&self, depth: usize, row: usize, col: usize) -> Option<Vec<f32>> {
        let [d, h, w] = self.shape();
        if depth >= d || row >= h || col >= w {
            return None;
        }
        Some(
            self.data
                .outer_iter()
                .map(|class| class[(depth, row, col)])
                .collect(),
        )
    }

    /// Slider range for the current class.
    pub fn value_range(&self) -> ThresholdBand {
        self.range
    }

    pub fn band(&self) -> ThresholdBand {
        self.band
    }

    pub fn set_threshold_low(&mut self, low: i32) -> Result<()> {
        if low >= self.band.high {
            return Err(ModelError::InvalidThreshold {
                low,
                high: self.band.high,
            });
        }
        self.band.low = low;
        Ok(())
    }

    pub fn set_threshold_high(&mut self, high: i32) -> Result<()> {
        if high <= self.band.low {
            return Err(ModelError::InvalidThreshold {
                low: self.band.low,
                high,
            });
        }
        self.band.high = high;
        Ok(())
    }

    pub fn colormap(&self) -> Colormap {
        self.colormap
    }

    /// Recolors every class, O(C·D·H·W).
    pub fn set_colormap(&mut self, colormap: Colormap) {
        self.colormap = colormap;
        self.rgb = colorize_classes(&self.data, colormap, &self.palette);
    }
}

impl Layer for LogitsItem {
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

fn squeeze_batch(raw: ArrayD<f32>) -> Result<Array4<f32>> {
    let raw = if raw.ndim() == 5 && raw.shape()[0] == 1 {
        raw.index_axis_move(Axis(0), 0)
    } else {
        raw
    };
    let shape = raw.shape().to_vec();
    raw.into_dimensionality::<Ix4>()
        .map_err(|_| ModelError::UnsupportedRank {
            ndim: shape.len(),
            shape,
        })
}

fn align_spatial(data: Array4<f32>, expected: [usize; 3]) -> Result<(Array4<f32>, LoadOutcome)> {
    let found = data.shape().to_vec();
    if shape3(&found[1..]) == Some(expected) {
        return Ok((data, LoadOutcome::Clean));
    }
    let swapped = data.permuted_axes([0, 1, 3, 2]);
    if shape3(&swapped.shape()[1..]) == Some(expected) {
        return Ok((
            swapped.as_standard_layout().into_owned(),
            LoadOutcome::AxesSwapped,
        ));
    }
    Err(ModelError::ShapeMismatch {
        layer: "logits",
        expected,
        found: found[1..].to_vec(),
    })
}

fn colorize_classes(data: &Array4<f32>, colormap: Colormap, palette: &Palette) -> Vec<Array4<u8>> {
    data.outer_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|class| colormap.colorize(class, palette))
        .collect()
}
