use image::RgbImage;

/// Left and right composites of one depth slice.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePair {
    pub slice: usize,
    pub left: RgbImage,
    pub right: RgbImage,
}

impl FramePair {
    pub fn width(&self) -> usize {
        self.left.width() as usize
    }

    pub fn height(&self) -> usize {
        self.left.height() as usize
    }

    pub fn is_symmetric(&self) -> bool {
        self.left == self.right
    }
}
