use std::path::Path;

use ndarray::{Array3, ArrayD, Ix3};

use super::{IoError, Result};

/// Lowercase extension; `.nii.gz` is reported as `nii.gz`.
pub(crate) fn extension(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.to_ascii_lowercase())
        .ok_or_else(|| IoError::UnsupportedFormat(path.to_string_lossy().to_string()))?;
    if ext == "gz" {
        let stem = path
            .file_stem()
            .map(Path::new)
            .and_then(|stem| stem.extension())
            .and_then(|value| value.to_str())
            .map(|value| value.to_ascii_lowercase());
        if let Some(inner) = stem {
            return Ok(format!("{inner}.gz"));
        }
    }
    Ok(ext)
}

/// Rounds a floating array to a 3D integer volume.
pub(crate) fn to_volume(array: ArrayD<f32>) -> Result<Array3<i32>> {
    if array.ndim() != 3 {
        return Err(IoError::UnsupportedLayout(format!(
            "expected a 3D (depth, height, width) volume, found shape {:?}",
            array.shape()
        )));
    }
    let volume = array.into_dimensionality::<Ix3>()?;
    Ok(volume.mapv(|value| {
        if value.is_finite() {
            value.round() as i32
        } else {
            0
        }
    }))
}
