//! Glyph atlas
//!
//! Composes the character list into one fixed-cell sprite sheet.
//! Cell i sits at row i / columns, column i % columns, regardless of which
//! font supplied the glyph. Characters no font covers leave a blank cell.

use super::cell::{self, GlyphCell};
use super::chain::{FontChain, GlyphTier};
use super::raster::GlyphRenderer;
use crate::error::{GlyphsheetError, Result};
use crate::utils::write_atomic;
use image::imageops;
use image::RgbaImage;
use log::{info, warn};
use std::path::Path;

/// Grid geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasLayout {
    pub cell_width: u32,
    pub cell_height: u32,
    pub columns: u32,
    pub gap: u32,
    pub margin: u32,
}

impl AtlasLayout {
    /// Rows needed for `count` characters
    pub fn rows(&self, count: usize) -> u32 {
        let columns = self.columns as usize;
        ((count + columns - 1) / columns) as u32
    }

    /// Image (width, height) for `count` characters
    pub fn dimensions(&self, count: usize) -> (u32, u32) {
        let width = self.margin + self.columns * (self.cell_width + self.gap);
        let height = self.margin + self.rows(count) * (self.cell_height + self.gap);
        (width, height)
    }

    /// Like `dimensions`, but None when the image size does not fit in u32
    pub fn checked_dimensions(&self, count: usize) -> Option<(u32, u32)> {
        let rows = u32::try_from(count.div_ceil(self.columns as usize)).ok()?;
        let width = (self.cell_width.checked_add(self.gap)?)
            .checked_mul(self.columns)?
            .checked_add(self.margin)?;
        let height = (self.cell_height.checked_add(self.gap)?)
            .checked_mul(rows)?
            .checked_add(self.margin)?;
        Some((width, height))
    }

    /// Top-left pixel of cell `index`
    pub fn cell_origin(&self, index: usize) -> (u32, u32) {
        let columns = self.columns as usize;
        let col = (index % columns) as u32;
        let row = (index / columns) as u32;
        (
            self.margin + col * (self.cell_width + self.gap),
            self.margin + row * (self.cell_height + self.gap),
        )
    }
}

/// Per-character routing, for the run summary only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositionReport {
    pub primary: Vec<char>,
    pub secondary: Vec<char>,
    pub generic: Vec<char>,
    pub missing: Vec<char>,
}

impl CompositionReport {
    fn record(&mut self, ch: char, tier: Option<GlyphTier>) {
        match tier {
            Some(GlyphTier::Primary) => self.primary.push(ch),
            Some(GlyphTier::Secondary) => self.secondary.push(ch),
            Some(GlyphTier::Generic) => self.generic.push(ch),
            None => self.missing.push(ch),
        }
    }

    pub fn total(&self) -> usize {
        self.primary.len() + self.secondary.len() + self.generic.len() + self.missing.len()
    }

    /// Human-readable summary lines
    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Characters using primary font: {}",
            self.primary.len()
        )];

        let buckets = [
            ("Characters using secondary fallback", &self.secondary),
            ("Characters using generic fallback", &self.generic),
        ];
        for (title, chars) in buckets {
            lines.push(format!("{}: {}", title, chars.len()));
            if !chars.is_empty() {
                lines.push(format!("  Chars: {}", chars.iter().collect::<String>()));
            }
        }

        if !self.missing.is_empty() {
            lines.push(format!(
                "Characters missing from all fonts: {}",
                self.missing.len()
            ));
            lines.push(format!(
                "  Chars: {}",
                self.missing.iter().collect::<String>()
            ));
        }

        lines
    }
}

/// Renders characters through the font chain into a grid image
pub struct AtlasComposer<'a, F> {
    chain: &'a FontChain<F>,
    layout: AtlasLayout,
    alpha_threshold: u8,
}

impl<'a, F: GlyphRenderer> AtlasComposer<'a, F> {
    pub fn new(chain: &'a FontChain<F>, layout: AtlasLayout, alpha_threshold: u8) -> Self {
        Self {
            chain,
            layout,
            alpha_threshold,
        }
    }

    /// Pick a font for `ch` and normalize its glyph into a cell
    ///
    /// The tier is None when every font only has a placeholder. A supported
    /// glyph with no ink still yields its tier with no cell.
    pub fn render_cell(&self, ch: char) -> (Option<GlyphTier>, Option<GlyphCell>) {
        let Some(selection) = self.chain.select(ch) else {
            return (None, None);
        };

        let tier = selection.entry.tier;
        let (w, h) = (self.layout.cell_width, self.layout.cell_height);

        let glyph = match tier {
            GlyphTier::Primary if cell::is_half_width(ch) => {
                cell::centered_cell(&selection.rendered, w, h)
            }
            GlyphTier::Primary => Some(cell::native_cell(selection.rendered)),
            GlyphTier::Secondary | GlyphTier::Generic => {
                let threshold = selection.entry.binarize.then_some(self.alpha_threshold);
                cell::scaled_cell(selection.rendered, w, h, threshold)
            }
        };

        (Some(tier), glyph)
    }

    /// Compose every character, in order, onto a transparent canvas
    pub fn compose(&self, chars: &[char]) -> (RgbaImage, CompositionReport) {
        let (width, height) = self.layout.dimensions(chars.len());
        info!(
            "Image size: {} x {} ({} rows)",
            width,
            height,
            self.layout.rows(chars.len())
        );

        let mut image = RgbaImage::new(width, height);
        let mut report = CompositionReport::default();

        for (i, &ch) in chars.iter().enumerate() {
            let (tier, glyph) = self.render_cell(ch);
            report.record(ch, tier);

            if tier.is_none() {
                warn!("'{}' (U+{:04X}) not found in any font", ch, ch as u32);
            }

            if let Some(glyph) = glyph {
                let (x, y) = self.layout.cell_origin(i);
                imageops::overlay(
                    &mut image,
                    &glyph.image,
                    x as i64 + glyph.offset_x,
                    y as i64 + glyph.offset_y,
                );
            }
        }

        (image, report)
    }
}

/// Encode as RGBA PNG and write atomically
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let mut data: Vec<u8> = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut data, image.width(), image.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let encode_err = |source| GlyphsheetError::Encode {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = encoder.write_header().map_err(encode_err)?;
        writer.write_image_data(image.as_raw()).map_err(encode_err)?;
        writer.finish().map_err(encode_err)?;
    }

    write_atomic(path, &data)?;
    info!("Font atlas saved to: {}", path.display());
    Ok(())
}
