use ndarray::{Array4, ArrayView3, Axis, Zip};
use serde::{Deserialize, Serialize};

use super::Palette;
use super::util::min_max;

/// Coloring applied to per-class logits volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    /// Min-max normalized continuous heatmap.
    #[default]
    Jet,
    /// Values cast to integer class ids and looked up in the palette.
    #[serde(rename = "none", alias = "discrete")]
    Discrete,
}

impl Colormap {
    pub const ALL: [Colormap; 2] = [Colormap::Jet, Colormap::Discrete];

    pub fn name(&self) -> &'static str {
        match self {
            Colormap::Jet => "JET",
            Colormap::Discrete => "NONE",
        }
    }

    /// Colors a whole (D, H, W) class volume into (D, H, W, 3).
    pub fn colorize(&self, values: ArrayView3<'_, f32>, palette: &Palette) -> Array4<u8> {
        let (depth, height, width) = values.dim();
        let mut rgb = Array4::<u8>::zeros((depth, height, width, 3));
        match self {
            Colormap::Jet => {
                let (min, max) = min_max(values.iter()).unwrap_or((0.0, 0.0));
                let span = max - min;
                let lut = jet_lut();
                Zip::from(rgb.lanes_mut(Axis(3)))
                    .and(values)
                    .par_for_each(|mut pixel, &value| {
                        let t = if span > f32::EPSILON {
                            ((value - min) / span).clamp(0.0, 1.0)
                        } else {
                            0.0
                        };
                        let color = lut[(t * 255.0) as usize];
                        pixel[0] = color[0];
                        pixel[1] = color[1];
                        pixel[2] = color[2];
                    });
            }
            Colormap::Discrete => {
                Zip::from(rgb.lanes_mut(Axis(3)))
                    .and(values)
                    .par_for_each(|mut pixel, &value| {
                        let color = palette.wrapped_class_color(i64::from(value as i16));
                        pixel[0] = color[0];
                        pixel[1] = color[1];
                        pixel[2] = color[2];
                    });
            }
        }
        rgb
    }
}

/// Jet heatmap: dark blue at 0 through cyan, yellow, to dark red at 1.
pub fn jet(t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let channel = |center: f32| ((1.5 - (4.0 * t - center).abs()).clamp(0.0, 1.0) * 255.0).round() as u8;
    [channel(3.0), channel(2.0), channel(1.0)]
}

fn jet_lut() -> [[u8; 3]; 256] {
    let mut lut = [[0u8; 3]; 256];
    for (index, entry) in lut.iter_mut().enumerate() {
        *entry = jet(index as f32 / 255.0);
    }
    lut
}
