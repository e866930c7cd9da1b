//! Texture pixel data.

/// Raw texture data loaded from PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    /// Texture width in pixels.
    pub width: u32,
    /// Texture height in pixels (one frame).
    pub height: u32,
    /// RGBA8 pixel data (4 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl TextureData {
    /// Create a new texture from RGBA data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A texture filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self::new(width, height, pixels)
    }

    /// Create a placeholder texture (magenta/black checkerboard).
    pub fn placeholder() -> Self {
        let size = 16;
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);

        for y in 0..size {
            for x in 0..size {
                if ((x / 2) + (y / 2)) % 2 == 0 {
                    pixels.extend_from_slice(&[255, 0, 255, 255]);
                } else {
                    pixels.extend_from_slice(&[0, 0, 0, 255]);
                }
            }
        }

        Self::new(size, size, pixels)
    }

    /// Check if this texture has transparency.
    pub fn has_transparency(&self) -> bool {
        self.pixels.chunks(4).any(|pixel| pixel[3] < 255)
    }

    /// Get a pixel at (x, y).
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = ((y * self.width + x) * 4) as usize;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Whether the pixel at (x, y) is visible; out-of-bounds counts as transparent.
    pub fn is_opaque(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        let idx = ((y as u32 * self.width + x as u32) * 4 + 3) as usize;
        self.pixels.get(idx).copied().unwrap_or(0) > 0
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = ((y * self.width + x) * 4) as usize;
        self.pixels[idx..idx + 4].copy_from_slice(&rgba);
    }
}

/// Load a texture from PNG bytes.
///
/// Vertical strips (animations) keep only their first square frame.
pub fn load_texture_from_bytes(data: &[u8]) -> Result<TextureData, image::ImageError> {
    let img = image::load_from_memory(data)?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut pixels = rgba.into_raw();

    let is_animated = width > 0 && height > width && height % width == 0;
    let frame_height = if is_animated { width } else { height };
    pixels.truncate((width * frame_height * 4) as usize);

    Ok(TextureData::new(width, frame_height, pixels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_texture() {
        let tex = TextureData::placeholder();
        assert_eq!(tex.width, 16);
        assert_eq!(tex.height, 16);
        assert_eq!(tex.pixels.len(), 16 * 16 * 4);
        assert!(!tex.has_transparency());
    }

    #[test]
    fn test_get_pixel() {
        let tex = TextureData::new(2, 2, vec![255, 0, 0, 255, 0, 255, 0, 255, 0, 0, 255, 255, 255, 255, 255, 255]);

        assert_eq!(tex.get_pixel(0, 0), [255, 0, 0, 255]); // Red
        assert_eq!(tex.get_pixel(1, 0), [0, 255, 0, 255]); // Green
        assert_eq!(tex.get_pixel(0, 1), [0, 0, 255, 255]); // Blue
        assert_eq!(tex.get_pixel(1, 1), [255, 255, 255, 255]); // White
    }

    #[test]
    fn test_opacity_bounds() {
        let mut tex = TextureData::solid(2, 2, [0, 0, 0, 0]);
        tex.set_pixel(1, 0, [10, 20, 30, 255]);

        assert!(tex.is_opaque(1, 0));
        assert!(!tex.is_opaque(0, 0));
        assert!(!tex.is_opaque(-1, 0));
        assert!(!tex.is_opaque(2, 0));
        assert!(tex.has_transparency());
    }

    #[test]
    fn test_load_animated_strip_keeps_first_frame() {
        let mut strip = image::RgbaImage::new(2, 4);
        strip.put_pixel(0, 0, image::Rgba([1, 2, 3, 255]));
        let mut bytes = Vec::new();
        strip
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();

        let tex = load_texture_from_bytes(&bytes).unwrap();
        assert_eq!((tex.width, tex.height), (2, 2));
        assert_eq!(tex.get_pixel(0, 0), [1, 2, 3, 255]);
    }
}
