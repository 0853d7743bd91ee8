//! Grayscale previews of scalar fields, stored as RGBA pixels.

/// A row-major RGBA image of a scalar field.
#[derive(Clone, Debug, PartialEq)]
pub struct PreviewImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Pixel data, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl PreviewImage {
    /// A black, opaque image.
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0; (width * height * 4) as usize];
        for alpha in pixels.iter_mut().skip(3).step_by(4) {
            *alpha = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Build an image from row-major values in `[0, 1]`, `0` black and `1` white.
    ///
    /// Values outside the range are clamped; non-finite values become black.
    /// Missing values (short input) stay black.
    pub fn from_unit_values(width: u32, height: u32, values: &[f64]) -> Self {
        let mut image = Self::new(width, height);
        for (i, v) in values
            .iter()
            .take((width * height) as usize)
            .enumerate()
        {
            let i = i as u32;
            image.set_gray(i % width, i / width, unit_to_byte(*v));
        }
        image
    }

    /// Set a pixel to an opaque gray level.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set_gray(&mut self, x: u32, y: u32, level: u8) {
        let idx = ((y * self.width + x) * 4) as usize;
        self.pixels[idx] = level;
        self.pixels[idx + 1] = level;
        self.pixels[idx + 2] = level;
        self.pixels[idx + 3] = 255;
    }

    /// Gray level of a pixel (the red channel).
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn gray(&self, x: u32, y: u32) -> u8 {
        self.pixels[((y * self.width + x) * 4) as usize]
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of distinct gray levels present.
    pub fn unique_gray_count(&self) -> usize {
        let mut seen = [false; 256];
        for chunk in self.pixels.chunks_exact(4) {
            seen[chunk[0] as usize] = true;
        }
        seen.iter().filter(|s| **s).count()
    }
}

fn unit_to_byte(v: f64) -> u8 {
    if v.is_finite() {
        (v.clamp(0.0, 1.0) * 255.0).round() as u8
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_is_opaque_black() {
        let image = PreviewImage::new(4, 2);
        assert_eq!(image.dimensions(), (4, 2));
        assert_eq!(image.pixels.len(), 4 * 2 * 4);
        for chunk in image.pixels.chunks_exact(4) {
            assert_eq!(chunk, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn test_unit_values_map_to_gray() {
        let image = PreviewImage::from_unit_values(3, 1, &[0.0, 0.5, 1.0]);
        assert_eq!(image.gray(0, 0), 0);
        assert_eq!(image.gray(1, 0), 128);
        assert_eq!(image.gray(2, 0), 255);
    }

    #[test]
    fn test_out_of_range_values_clamp() {
        let image = PreviewImage::from_unit_values(3, 1, &[-2.0, 7.0, f64::NAN]);
        assert_eq!(image.gray(0, 0), 0);
        assert_eq!(image.gray(1, 0), 255);
        assert_eq!(image.gray(2, 0), 0);
    }

    #[test]
    fn test_row_major_layout() {
        let image = PreviewImage::from_unit_values(2, 2, &[0.0, 0.0, 1.0, 0.0]);
        assert_eq!(image.gray(0, 1), 255);
        assert_eq!(image.gray(1, 0), 0);
    }

    #[test]
    fn test_unique_gray_count() {
        let image = PreviewImage::from_unit_values(4, 1, &[0.0, 1.0, 1.0, 0.5]);
        assert_eq!(image.unique_gray_count(), 3);
    }
}
