//! Glyph rasterization onto a scratch canvas
//!
//! Every font in the chain draws through [`GlyphRenderer`]: one character,
//! pen at (0, 0), ascender line at the canvas top, white ink with alpha =
//! coverage on a transparent square canvas.

use crate::error::{GlyphsheetError, Result};
use fontdue::{Font, FontSettings};
use image::{Rgba, RgbaImage};
use log::info;
use std::path::Path;

/// Foreground ink for rendered glyphs
pub const INK: [u8; 3] = [255, 255, 255];

/// Source of rendered glyphs
pub trait GlyphRenderer {
    /// Render `ch` onto a transparent `canvas_size` x `canvas_size` canvas
    ///
    /// Must be deterministic: the same character always yields the same pixels.
    fn render(&self, ch: char, canvas_size: u32) -> RgbaImage;
}

/// TTF pixel font rasterized with fontdue at a fixed pixel size
pub struct PixelFont {
    font: Font,
    /// Rasterize size (pixels per em)
    size: f32,
    /// Baseline distance from the canvas top
    baseline: i32,
    /// File name, for logs
    name: String,
}

impl PixelFont {
    /// Load a font file at the given pixel size
    pub fn load(path: &Path, size: f32) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| GlyphsheetError::io(path, e))?;
        let font = Font::from_bytes(
            data,
            FontSettings {
                scale: size,
                ..FontSettings::default()
            },
        )
        .map_err(|reason| GlyphsheetError::FontParse {
            path: path.to_path_buf(),
            reason,
        })?;

        let metrics = font
            .horizontal_line_metrics(size)
            .ok_or_else(|| GlyphsheetError::FontParse {
                path: path.to_path_buf(),
                reason: "no horizontal line metrics",
            })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        info!(
            "Font loaded: {} ({}px, ascent={:.1})",
            name, size, metrics.ascent
        );

        Ok(Self {
            font,
            size,
            baseline: metrics.ascent.round() as i32,
            name,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl GlyphRenderer for PixelFont {
    fn render(&self, ch: char, canvas_size: u32) -> RgbaImage {
        // Missing code points rasterize glyph 0 (.notdef), same as any other glyph
        let (metrics, bitmap) = self.font.rasterize(ch, self.size);
        let mut canvas = RgbaImage::new(canvas_size, canvas_size);

        let left = metrics.xmin;
        let top = self.baseline - (metrics.ymin + metrics.height as i32);
        let limit = canvas_size as i32;

        for y in 0..metrics.height {
            for x in 0..metrics.width {
                let coverage = bitmap[y * metrics.width + x];
                if coverage == 0 {
                    continue;
                }
                let px = left + x as i32;
                let py = top + y as i32;
                if px < 0 || py < 0 || px >= limit || py >= limit {
                    continue;
                }
                canvas.put_pixel(
                    px as u32,
                    py as u32,
                    Rgba([INK[0], INK[1], INK[2], coverage]),
                );
            }
        }

        canvas
    }
}

#[cfg(test)]
pub mod testing {
    //! In-memory bitmap fonts for composer tests

    use super::*;
    use std::collections::HashMap;

    /// Font defined by explicit pixel lists; unknown characters draw a hollow box
    pub struct BitmapFont {
        glyphs: HashMap<char, Vec<(u32, u32, u8)>>,
    }

    impl BitmapFont {
        pub fn new() -> Self {
            Self {
                glyphs: HashMap::new(),
            }
        }

        /// Glyph with the given (x, y, alpha) pixels
        pub fn with_glyph(mut self, ch: char, pixels: Vec<(u32, u32, u8)>) -> Self {
            self.glyphs.insert(ch, pixels);
            self
        }

        /// Glyph filling the rectangle at (x, y) of size w x h with `alpha`
        pub fn with_block(self, ch: char, x: u32, y: u32, w: u32, h: u32, alpha: u8) -> Self {
            let pixels = (y..y + h)
                .flat_map(|py| (x..x + w).map(move |px| (px, py, alpha)))
                .collect();
            self.with_glyph(ch, pixels)
        }

        fn tofu_pixels() -> Vec<(u32, u32, u8)> {
            let mut pixels = Vec::new();
            for i in 1..8 {
                pixels.push((i, 1, 255));
                pixels.push((i, 9, 255));
            }
            for i in 2..9 {
                pixels.push((1, i, 255));
                pixels.push((7, i, 255));
            }
            pixels
        }
    }

    impl GlyphRenderer for BitmapFont {
        fn render(&self, ch: char, canvas_size: u32) -> RgbaImage {
            let mut canvas = RgbaImage::new(canvas_size, canvas_size);
            let pixels = match self.glyphs.get(&ch) {
                Some(pixels) => pixels.clone(),
                None => Self::tofu_pixels(),
            };
            for (x, y, a) in pixels {
                if x < canvas_size && y < canvas_size {
                    canvas.put_pixel(x, y, Rgba([INK[0], INK[1], INK[2], a]));
                }
            }
            canvas
        }
    }

    #[test]
    fn test_bitmap_font_is_deterministic() {
        let font = BitmapFont::new().with_block('中', 0, 0, 9, 9, 255);
        assert_eq!(font.render('中', 20), font.render('中', 20));
        assert_eq!(font.render('x', 20), font.render('\u{FFFE}', 20));
    }
}
