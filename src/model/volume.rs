use ndarray::{Array3, ArrayView2, Axis, Zip};
use serde::{Deserialize, Serialize};

use super::util::shape3;
use super::{ItemInfo, Layer, ModelError, Result};

pub const DEFAULT_WINDOW: Window = Window {
    min: -1200,
    max: 400,
};

/// Intensity window mapped linearly onto the 8-bit display range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub min: i32,
    pub max: i32,
}

impl Default for Window {
    fn default() -> Self {
        DEFAULT_WINDOW
    }
}

impl Window {
    pub fn new(min: i32, max: i32) -> Result<Self> {
        if min >= max {
            return Err(ModelError::InvalidWindow { min, max });
        }
        Ok(Self { min, max })
    }

    /// `clip((value - min) / (max - min), 0, 1) * 255`, truncated to 8 bits.
    pub fn normalize(&self, value: i32) -> u8 {
        let span = f64::from(self.max) - f64::from(self.min);
        let t = ((f64::from(value) - f64::from(self.min)) / span).clamp(0.0, 1.0);
        (t * 255.0) as u8
    }
}

/// Raw intensity volume plus its windowed 8-bit view.
///
/// The normalized view is recomputed on every accepted window change, an
/// O(D·H·W) pass that never runs per frame.
#[derive(Debug, Clone)]
pub struct VolumeItem {
    info: ItemInfo,
    raw: Array3<i32>,
    normalized: Array3<u8>,
    window: Window,
    range: (i32, i32),
    visible: bool,
}

impl VolumeItem {
    pub fn load(raw: Array3<i32>, info: ItemInfo) -> Result<Self> {
        Self::with_window(raw, info, DEFAULT_WINDOW)
    }

    pub fn with_window(raw: Array3<i32>, info: ItemInfo, window: Window) -> Result<Self> {
        if raw.is_empty() {
            return Err(ModelError::EmptyArray {
                shape: raw.shape().to_vec(),
            });
        }
        let window = Window::new(window.min, window.max)?;
        let range = raw
            .iter()
            .fold((i32::MAX, i32::MIN), |(lo, hi), &value| {
                (lo.min(value), hi.max(value))
            });
        let mut item = Self {
            info,
            normalized: Array3::zeros(raw.raw_dim()),
            raw,
            window,
            range,
            visible: true,
        };
        item.renormalize();
        Ok(item)
    }

    /// All-zero placeholder volume, used to open the viewer without data.
    pub fn from_dummy(shape: [usize; 3]) -> Result<Self> {
        Self::load(
            Array3::zeros((shape[0], shape[1], shape[2])),
            ItemInfo::in_memory("dummy_data"),
        )
    }

    pub fn shape(&self) -> [usize; 3] {
        shape3(self.raw.shape()).unwrap_or([0, 0, 0])
    }

    pub fn depth(&self) -> usize {
        self.raw.len_of(Axis(0))
    }

    pub fn height(&self) -> usize {
        self.raw.len_of(Axis(1))
    }

    pub fn width(&self) -> usize {
        self.raw.len_of(Axis(2))
    }

    pub fn window(&self) -> Window {
        self.window
    }

    /// Observed (min, max) of the raw intensities.
    pub fn value_range(&self) -> (i32, i32) {
        self.range
    }

    pub fn raw(&self) -> &Array3<i32> {
        &self.raw
    }

    pub fn normalized(&self) -> &Array3<u8> {
        &self.normalized
    }

    pub fn normalized_slice(&self, depth: usize) -> Option<ArrayView2<'_, u8>> {
        (depth < self.depth()).then(|| self.normalized.index_axis(Axis(0), depth))
    }

    pub fn intensity(&self, depth: usize, row: usize, col: usize) -> Option<i32> {
        self.raw.get((depth, row, col)).copied()
    }

    /// Rejected when `min` reaches the current upper bound or `max` falls
    /// to the current lower bound; the previous window is kept.
    pub fn set_window(&mut self, min: i32, max: i32) -> Result<()> {
        if min >= self.window.max || max <= self.window.min || min >= max {
            return Err(ModelError::InvalidWindow { min, max });
        }
        self.window = Window { min, max };
        self.renormalize();
        Ok(())
    }

    pub fn set_window_min(&mut self, min: i32) -> Result<()> {
        if min >= self.window.max {
            return Err(ModelError::InvalidWindow {
                min,
                max: self.window.max,
            });
        }
        self.window.min = min;
        self.renormalize();
        Ok(())
    }

    pub fn set_window_max(&mut self, max: i32) -> Result<()> {
        if max <= self.window.min {
            return Err(ModelError::InvalidWindow {
                min: self.window.min,
                max,
            });
        }
        self.window.max = max;
        self.renormalize();
        Ok(())
    }

    fn renormalize(&mut self) {
        let window = self.window;
        Zip::from(&mut self.normalized)
            .and(&self.raw)
            .par_for_each(|normalized, &raw| *normalized = window.normalize(raw));
    }
}

impl Layer for VolumeItem {
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
