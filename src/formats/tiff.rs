use std::fs::File;
use std::path::Path;

use ndarray::{ArrayD, IxDyn};
use tiff::decoder::{Decoder, DecodingResult};

use super::{IoError, Result};

/// Reads a grayscale multi-page TIFF as a (pages, height, width) stack of raw
/// sample values.
pub(crate) fn read_tiff_stack(path: &Path) -> Result<ArrayD<f32>> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(file)?;
    let (width, height) = decoder.dimensions()?;
    let page_len = width as usize * height as usize;
    let mut values = Vec::new();
    let mut depth = 0;

    loop {
        let page = decode_page(&mut decoder, page_len)?;
        values.extend(page);
        depth += 1;
        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
        let (other_width, other_height) = decoder.dimensions()?;
        if other_width != width || other_height != height {
            return Err(IoError::UnsupportedLayout(
                "TIFF pages must have identical dimensions".into(),
            ));
        }
    }

    Ok(ArrayD::from_shape_vec(
        IxDyn(&[depth, height as usize, width as usize]),
        values,
    )?)
}

fn decode_page(decoder: &mut Decoder<File>, page_len: usize) -> Result<Vec<f32>> {
    let values = match decoder.read_image()? {
        DecodingResult::U8(buffer) => buffer.into_iter().map(f32::from).collect::<Vec<_>>(),
        DecodingResult::U16(buffer) => buffer.into_iter().map(f32::from).collect(),
        DecodingResult::U32(buffer) => buffer.into_iter().map(|value| value as f32).collect(),
        DecodingResult::I8(buffer) => buffer.into_iter().map(f32::from).collect(),
        DecodingResult::I16(buffer) => buffer.into_iter().map(f32::from).collect(),
        DecodingResult::I32(buffer) => buffer.into_iter().map(|value| value as f32).collect(),
        DecodingResult::F32(buffer) => buffer,
        DecodingResult::F64(buffer) => buffer.into_iter().map(|value| value as f32).collect(),
        other => {
            return Err(IoError::UnsupportedLayout(format!(
                "unsupported TIFF sample type: {other:?}"
            )));
        }
    };
    if values.len() != page_len {
        return Err(IoError::UnsupportedLayout(
            "TIFF RGB/alpha pages are not supported".into(),
        ));
    }
    Ok(values)
}
