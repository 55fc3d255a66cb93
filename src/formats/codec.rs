use std::path::Path;

use ndarray::{Array3, ArrayD};

use super::{Result, read_logits, read_volume};

/// Loads 3D integer arrays: volumes and segmentations.
pub trait VolumeReader {
    fn read_volume(&self, path: &Path) -> Result<Array3<i32>>;
}

/// Loads per-class probability tensors.
pub trait LogitsReader {
    fn read_logits(&self, path: &Path) -> Result<ArrayD<f32>>;
}

pub trait ArrayReader: VolumeReader + LogitsReader {}

impl<T: VolumeReader + LogitsReader> ArrayReader for T {}

/// File-backed reader dispatching on extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultReader;

impl VolumeReader for DefaultReader {
    fn read_volume(&self, path: &Path) -> Result<Array3<i32>> {
        read_volume(path)
    }
}

impl LogitsReader for DefaultReader {
    fn read_logits(&self, path: &Path) -> Result<ArrayD<f32>> {
        read_logits(path)
    }
}
