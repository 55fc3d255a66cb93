use std::path::{Path, PathBuf};

use ndarray::{Array3, ArrayD};
use serde::Serialize;

use super::nii::read_nifti;
use super::npy::read_npy_array;
use super::tiff::read_tiff_stack;
use super::util::{extension, to_volume};
use super::{IoError, Result};

/// Reads any supported file as a floating array in its natural axis order.
pub fn read_array(path: impl AsRef<Path>) -> Result<ArrayD<f32>> {
    let path = path.as_ref();
    let extension = extension(path)?;
    match extension.as_str() {
        "nii" | "nii.gz" => read_nifti(path),
        "npy" => read_npy_array(path),
        "tif" | "tiff" => read_tiff_stack(path),
        other => Err(IoError::UnsupportedFormat(other.to_string())),
    }
}

/// Reads a (depth, height, width) integer volume; floats are rounded.
pub fn read_volume(path: impl AsRef<Path>) -> Result<Array3<i32>> {
    to_volume(read_array(path)?)
}

/// Reads a (C, D, H, W) or (1, C, D, H, W) probability tensor. Rank is
/// checked by the logits item, not here.
pub fn read_logits(path: impl AsRef<Path>) -> Result<ArrayD<f32>> {
    let path = path.as_ref();
    match extension(path)?.as_str() {
        "npy" | "nii" | "nii.gz" => read_array(path),
        other => Err(IoError::UnsupportedFormat(other.to_string())),
    }
}

pub fn supported_formats() -> &'static [&'static str] {
    &["nii", "nii.gz", "npy", "tif", "tiff"]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayKind {
    Volume,
    Logits,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArraySummary {
    pub path: PathBuf,
    pub kind: ArrayKind,
    pub shape: Vec<usize>,
    pub min: Option<f32>,
    pub max: Option<f32>,
}

pub fn summarize(path: impl AsRef<Path>) -> Result<ArraySummary> {
    let path = path.as_ref();
    let array = read_array(path)?;
    let kind = match array.ndim() {
        3 => ArrayKind::Volume,
        4 => ArrayKind::Logits,
        5 if array.shape()[0] == 1 => ArrayKind::Logits,
        _ => ArrayKind::Other,
    };
    let range = array
        .iter()
        .copied()
        .filter(|value| value.is_finite())
        .fold(None, |range: Option<(f32, f32)>, value| match range {
            Some((min, max)) => Some((min.min(value), max.max(value))),
            None => Some((value, value)),
        });
    Ok(ArraySummary {
        path: path.to_path_buf(),
        kind,
        shape: array.shape().to_vec(),
        min: range.map(|(min, _)| min),
        max: range.map(|(_, max)| max),
    })
}
