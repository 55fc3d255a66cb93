use std::path::Path;

use ndarray::ArrayD;
use ndarray_npy::{ReadNpyError, ReadableElement, read_npy};

use super::{IoError, Result};

type Attempt = fn(&Path) -> std::result::Result<ArrayD<f32>, ReadNpyError>;

fn read_as<T: ReadableElement + Copy>(
    path: &Path,
    cast: fn(T) -> f32,
) -> std::result::Result<ArrayD<f32>, ReadNpyError> {
    let array: ArrayD<T> = read_npy(path)?;
    Ok(array.mapv(cast))
}

/// Reads any numeric `.npy` array as `f32`, trying dtypes in turn.
pub(crate) fn read_npy_array(path: &Path) -> Result<ArrayD<f32>> {
    let attempts: [Attempt; 9] = [
        |path| read_npy(path),
        |path| read_as::<f64>(path, |value| value as f32),
        |path| read_as::<i64>(path, |value| value as f32),
        |path| read_as::<i32>(path, |value| value as f32),
        |path| read_as::<i16>(path, f32::from),
        |path| read_as::<i8>(path, f32::from),
        |path| read_as::<u8>(path, f32::from),
        |path| read_as::<u16>(path, f32::from),
        |path| read_as::<bool>(path, |value| if value { 1.0 } else { 0.0 }),
    ];
    for attempt in attempts {
        match attempt(path) {
            Ok(array) => return Ok(array),
            Err(ReadNpyError::WrongDescriptor(_)) => continue,
            Err(error) => return Err(error.into()),
        }
    }
    Err(IoError::UnsupportedLayout(format!(
        "{}: unsupported NPY dtype",
        path.display()
    )))
}
