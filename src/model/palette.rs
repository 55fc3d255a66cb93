use super::{ModelError, Result};

pub const BACKGROUND: [u8; 3] = [0, 0, 0];

/// Label colors. Entry 0 is the background and stays black.
pub static PALETTE: &[[u8; 3]] = &[
    [0, 0, 0],
    [180, 120, 120],
    [6, 230, 230],
    [80, 50, 50],
    [4, 200, 3],
    [120, 120, 80],
    [204, 5, 255],
    [4, 250, 7],
    [224, 5, 255],
    [235, 255, 7],
    [150, 5, 61],
    [120, 120, 70],
    [8, 255, 51],
    [255, 6, 82],
    [143, 255, 140],
    [204, 255, 4],
    [255, 51, 7],
    [204, 70, 3],
    [0, 102, 200],
    [61, 230, 250],
    [255, 6, 51],
    [11, 102, 255],
    [255, 7, 71],
    [255, 9, 224],
    [9, 7, 230],
    [255, 9, 92],
    [112, 9, 255],
    [8, 255, 214],
    [7, 255, 224],
    [255, 184, 6],
    [10, 255, 71],
    [255, 41, 10],
    [7, 255, 255],
    [224, 255, 8],
    [102, 8, 255],
    [255, 61, 6],
    [255, 194, 7],
    [255, 122, 8],
    [0, 255, 20],
    [255, 8, 41],
    [255, 5, 153],
    [6, 51, 255],
    [235, 12, 255],
    [160, 150, 20],
    [0, 163, 255],
    [140, 140, 140],
    [250, 10, 15],
    [20, 255, 0],
    [31, 255, 0],
    [255, 31, 0],
    [255, 224, 0],
    [153, 255, 0],
    [0, 0, 255],
    [255, 71, 0],
    [0, 235, 255],
    [0, 173, 255],
    [31, 0, 255],
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<[u8; 3]>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: PALETTE.to_vec(),
        }
    }
}

impl Palette {
    /// Builds a palette from class colors; the background entry is prepended.
    pub fn from_class_colors(colors: impl IntoIterator<Item = [u8; 3]>) -> Result<Self> {
        let colors = std::iter::once(BACKGROUND)
            .chain(colors)
            .collect::<Vec<_>>();
        if colors.len() < 2 {
            return Err(ModelError::InsufficientPalette {
                classes: 1,
                entries: colors.len(),
            });
        }
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    /// `classes` labels plus the background need `classes + 1` entries.
    pub fn ensure_classes(&self, classes: usize) -> Result<()> {
        if classes >= self.colors.len() {
            return Err(ModelError::InsufficientPalette {
                classes,
                entries: self.colors.len(),
            });
        }
        Ok(())
    }

    pub fn label_color(&self, label: usize) -> Option<[u8; 3]> {
        self.colors.get(label).copied()
    }

    /// Discrete-style lookup: class ids skip the background entry and wrap
    /// around the class colors, so negative or large ids still get a color.
    pub fn wrapped_class_color(&self, id: i64) -> [u8; 3] {
        let classes = (self.colors.len() - 1) as i64;
        self.colors[1 + id.rem_euclid(classes) as usize]
    }
}
