//! CPU-based pixel buffer renderer for headless snapshots
//!
//! One cell becomes one pixel. Grid y already grows downward, so rows map
//! straight onto image rows.

use std::path::Path;

use anyhow::Result;
use glam::IVec2;

use crate::world::World;

/// Background for empty cells
const BACKGROUND: [u8; 4] = [24, 24, 32, 255];
/// Tint blended over materials that are on fire
const BURN_TINT: [u8; 3] = [255, 120, 20];

/// CPU-based renderer that outputs to a pixel buffer
pub struct PixelRenderer {
    /// Width of the viewport in cells/pixels
    pub width: usize,
    /// Height of the viewport in cells/pixels
    pub height: usize,
    /// RGBA pixel buffer (4 bytes per pixel)
    pub buffer: Vec<u8>,
}

impl PixelRenderer {
    /// Create a new pixel renderer with given viewport size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            buffer: vec![0u8; width * height * 4],
        }
    }

    /// Render the viewport whose top-left cell is `origin`.
    /// Reads never allocate chunks.
    pub fn render(&mut self, world: &World, origin: IVec2) {
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&BACKGROUND);
        }

        for screen_y in 0..self.height {
            for screen_x in 0..self.width {
                let cell = origin + IVec2::new(screen_x as i32, screen_y as i32);
                let Some(material) = world.peek(cell.x, cell.y) else {
                    continue;
                };

                let mut color = material.color;
                if material.is_on_fire {
                    for (channel, tint) in color.iter_mut().zip(BURN_TINT) {
                        *channel = ((*channel as u16 + tint as u16) / 2) as u8;
                    }
                }

                let idx = (screen_y * self.width + screen_x) * 4;
                self.buffer[idx..idx + 3].copy_from_slice(&color[..3]);
                self.buffer[idx + 3] = 255;
            }
        }
    }

    /// Render a viewport centered on `center`
    pub fn render_centered(&mut self, world: &World, center: IVec2) {
        let half = IVec2::new(self.width as i32 / 2, self.height as i32 / 2);
        self.render(world, center - half);
    }

    /// Convert RGBA buffer to RGB (drop alpha channel)
    pub fn get_rgb_buffer(&self) -> Vec<u8> {
        self.buffer
            .chunks_exact(4)
            .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
            .collect()
    }

    /// RGBA color of one viewport pixel
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut rgba = [0u8; 4];
        rgba.copy_from_slice(&self.buffer[idx..idx + 4]);
        Some(rgba)
    }

    /// Save the buffer as a PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        use image::{ImageBuffer, Rgba};

        let img: ImageBuffer<Rgba<u8>, _> =
            ImageBuffer::from_raw(self.width as u32, self.height as u32, self.buffer.clone())
                .ok_or_else(|| anyhow::anyhow!("Failed to create image buffer"))?;

        img.save(path.as_ref())?;
        log::info!("Snapshot saved to {:?}", path.as_ref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Material, MaterialType};
    use crate::world::MaterialContext;

    #[test]
    fn test_pixel_renderer_creation() {
        let renderer = PixelRenderer::new(100, 50);
        assert_eq!(renderer.width, 100);
        assert_eq!(renderer.height, 50);
        assert_eq!(renderer.buffer.len(), 100 * 50 * 4);
    }

    #[test]
    fn test_rgb_buffer_conversion() {
        let mut renderer = PixelRenderer::new(2, 2);
        renderer.buffer = vec![
            255, 0, 0, 255, // Red
            0, 255, 0, 255, // Green
            0, 0, 255, 255, // Blue
            255, 255, 255, 255, // White
        ];

        let rgb = renderer.get_rgb_buffer();
        assert_eq!(rgb.len(), 12);
        assert_eq!(&rgb[0..3], &[255, 0, 0]);
        assert_eq!(&rgb[9..12], &[255, 255, 255]);
    }

    #[test]
    fn test_render_material_colors() {
        let mut world = World::new(8, 4);
        world.set(-2, -1, Some(Material::from_def(MaterialType::Stone, IVec2::ZERO)));
        let mut renderer = PixelRenderer::new(4, 4);

        renderer.render(&world, IVec2::new(-3, -2));

        assert_eq!(renderer.pixel(1, 1), Some(MaterialType::Stone.def().color));
        assert_eq!(renderer.pixel(0, 0), Some(BACKGROUND));
        assert_eq!(renderer.pixel(4, 0), None);
    }

    #[test]
    fn test_render_does_not_allocate_chunks() {
        let world = World::new(8, 4);
        let mut renderer = PixelRenderer::new(16, 16);

        renderer.render_centered(&world, IVec2::ZERO);

        assert_eq!(world.chunk_count(), 0);
    }

    #[test]
    fn test_burning_material_is_tinted() {
        let mut world = World::new(8, 4);
        let mut wood = Material::from_def(MaterialType::Wood, IVec2::ZERO);
        wood.is_on_fire = true;
        world.set(0, 0, Some(wood));
        let mut renderer = PixelRenderer::new(1, 1);

        renderer.render(&world, IVec2::ZERO);

        let pixel = renderer.pixel(0, 0).unwrap();
        assert_eq!(pixel[0], ((139u16 + 255) / 2) as u8);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.png");
        let renderer = PixelRenderer::new(3, 2);

        renderer.save_png(&path).unwrap();

        assert!(path.exists());
    }
}
