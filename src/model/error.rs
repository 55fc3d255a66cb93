use thiserror::Error;

pub type Result<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("{layer} shape {found:?} does not match volume shape {expected:?}")]
    ShapeMismatch {
        layer: &'static str,
        expected: [usize; 3],
        found: Vec<usize>,
    },

    #[error("invalid window [{min}, {max}]: lower bound must stay below upper bound")]
    InvalidWindow { min: i32, max: i32 },

    #[error("invalid threshold band [{low}, {high}]: low must stay below high")]
    InvalidThreshold { low: i32, high: i32 },

    #[error("palette has {entries} entries, not enough for background plus {classes} classes")]
    InsufficientPalette { classes: usize, entries: usize },

    #[error("class {class} out of range for {count} classes")]
    ClassOutOfRange { class: usize, count: usize },

    #[error("expected a 4D (C, D, H, W) array, found {ndim} dimensions with shape {shape:?}")]
    UnsupportedRank { ndim: usize, shape: Vec<usize> },

    #[error("segmentation labels must be non-negative, found {label}")]
    NegativeLabel { label: i32 },

    #[error("array with shape {shape:?} has an empty axis")]
    EmptyArray { shape: Vec<usize> },
}
