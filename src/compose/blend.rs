use image::RgbImage;
use ndarray::{Array3, ArrayView2, ArrayView3, Axis, Zip};

use crate::model::ThresholdBand;

/// Normalized 8-bit slice as a (H, W, 3) gray image in [0, 1].
pub fn gray_base(slice: ArrayView2<'_, u8>) -> Array3<f32> {
    let (height, width) = slice.dim();
    let mut base = Array3::<f32>::zeros((height, width, 3));
    Zip::from(base.lanes_mut(Axis(2)))
        .and(&slice)
        .par_for_each(|mut pixel, &gray| pixel.fill(f32::from(gray) / 255.0));
    base
}

/// `base = base * opacity + color * (1 - opacity)` wherever the color is not
/// background (channel sum > 0).
pub fn blend_colored(base: &mut Array3<f32>, colors: ArrayView3<'_, u8>, opacity: f32) {
    Zip::from(base.lanes_mut(Axis(2)))
        .and(colors.lanes(Axis(2)))
        .par_for_each(|mut pixel, color| {
            if color.iter().map(|&channel| u32::from(channel)).sum::<u32>() == 0 {
                return;
            }
            for (value, &channel) in pixel.iter_mut().zip(color.iter()) {
                *value = *value * opacity + f32::from(channel) / 255.0 * (1.0 - opacity);
            }
        });
}

/// Same blend, restricted to pixels whose value lies inside `band`.
pub fn blend_masked(
    base: &mut Array3<f32>,
    colors: ArrayView3<'_, u8>,
    values: ArrayView2<'_, f32>,
    band: ThresholdBand,
    opacity: f32,
) {
    Zip::from(base.lanes_mut(Axis(2)))
        .and(colors.lanes(Axis(2)))
        .and(&values)
        .par_for_each(|mut pixel, color, &value| {
            if !band.contains(value) {
                return;
            }
            for (out, &channel) in pixel.iter_mut().zip(color.iter()) {
                *out = *out * opacity + f32::from(channel) / 255.0 * (1.0 - opacity);
            }
        });
}

pub fn to_rgb_image(image: &Array3<f32>) -> RgbImage {
    let (height, width, _) = image.dim();
    RgbImage::from_fn(width as u32, height as u32, |x, y| {
        let (row, col) = (y as usize, x as usize);
        image::Rgb(std::array::from_fn(|channel| {
            (image[(row, col, channel)].clamp(0.0, 1.0) * 255.0).round() as u8
        }))
    })
}
