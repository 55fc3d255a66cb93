mod api;
mod codec;
mod error;
mod nii;
mod npy;
mod tiff;
mod util;


pub use api::{
    ArrayKind, ArraySummary, read_array, read_logits, read_volume, summarize, supported_formats,
};
pub use codec::{ArrayReader, DefaultReader, LogitsReader, VolumeReader};
pub use error::{IoError, Result};
