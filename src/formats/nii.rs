use std::path::Path;

use ndarray::{ArrayD, IxDyn};
use nifti::{NiftiObject, NiftiVolume, RandomAccessNiftiVolume, ReaderOptions};
use rayon::prelude::*;

use super::{IoError, Result};

const MAX_DIMS: usize = 7;

/// Reads a `.nii` / `.nii.gz` file with its axes reversed, so the on-disk
/// `[x, y, z, c]` order becomes `(c, z, y, x)`.
pub(crate) fn read_nifti(path: &Path) -> Result<ArrayD<f32>> {
    let object = ReaderOptions::new().read_file(path)?;
    let volume = object.into_volume();
    let dims = volume
        .dim()
        .iter()
        .map(|&dim| dim as usize)
        .collect::<Vec<_>>();
    if dims.is_empty() || dims.len() > MAX_DIMS {
        return Err(IoError::UnsupportedLayout(format!(
            "NIfTI volume with dimensions {dims:?}"
        )));
    }

    let count = dims.iter().product::<usize>();
    let values = (0..count)
        .into_par_iter()
        .map(|index| {
            let mut coords = [0u16; MAX_DIMS];
            let mut rest = index;
            for (coord, &dim) in coords.iter_mut().zip(&dims) {
                *coord = (rest % dim) as u16;
                rest /= dim;
            }
            volume
                .get_f64(&coords[..dims.len()])
                .map(|value| value as f32)
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let shape = dims.iter().rev().copied().collect::<Vec<_>>();
    Ok(ArrayD::from_shape_vec(IxDyn(&shape), values)?)
}
