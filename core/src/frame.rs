/// # FrameBuffer
/// Row-major buffer of 0/1 pixel cells with toroidal addressing.
///
/// Dimensions are fixed at construction (canonically 64x32). Coordinates
/// passed to any accessor wrap modulo the dimensions, so sprites drawn past
/// an edge reappear on the opposite side. All mutation is via XOR or a full
/// clear; pixel values are always exactly 0 or 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "dimensions must be nonzero");
        FrameBuffer {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// The pixel at (x, y), wrapped modulo the dimensions.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[self.index(x, y)]
    }

    /// The raw row-major pixel cells, for rendering.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// XORs the pixel at (x, y) and reports whether a lit pixel was erased.
    pub(crate) fn flip(&mut self, x: usize, y: usize) -> bool {
        let index = self.index(x, y);
        self.pixels[index] ^= 1;
        self.pixels[index] == 0
    }

    pub(crate) fn clear(&mut self) {
        self.pixels.fill(0);
    }

    fn index(&self, x: usize, y: usize) -> usize {
        (y % self.height) * self.width + (x % self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_sets_then_erases() {
        let mut frame = FrameBuffer::new(64, 32);
        assert!(!frame.flip(3, 2));
        assert_eq!(frame.pixel(3, 2), 1);
        assert!(frame.flip(3, 2));
        assert_eq!(frame.pixel(3, 2), 0);
    }

    #[test]
    fn test_coordinates_wrap() {
        let mut frame = FrameBuffer::new(64, 32);
        frame.flip(64 + 1, 32 + 2);
        assert_eq!(frame.pixel(1, 2), 1);
        assert_eq!(frame.pixel(65, 34), 1);
    }

    #[test]
    fn test_clear_zeroes_every_pixel() {
        let mut frame = FrameBuffer::new(64, 32);
        frame.flip(0, 0);
        frame.flip(63, 31);
        frame.clear();
        assert!(frame.pixels().iter().all(|&pixel| pixel == 0));
    }

    #[test]
    fn test_pixels_are_row_major() {
        let mut frame = FrameBuffer::new(64, 32);
        frame.flip(2, 1);
        assert_eq!(frame.pixels()[64 + 2], 1);
    }
}
