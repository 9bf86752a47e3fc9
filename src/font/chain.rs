//! Fallback font chain and missing-glyph detection
//!
//! Font libraries draw a placeholder box ("tofu") for code points they do not
//! cover instead of failing. Each font's placeholder is captured once by
//! rendering a noncharacter; a character counts as supported only when its
//! rendering differs from that signature.

use super::raster::GlyphRenderer;
use crate::constants::TOFU_REFERENCE;
use image::RgbaImage;
use log::{debug, info};

/// Position of a font in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphTier {
    /// Compact pixel font sized to the cell
    Primary,
    /// Larger pixel font, scaled down
    Secondary,
    /// Smoothed CJK font, binarized and scaled down
    Generic,
}

impl GlyphTier {
    pub fn label(self) -> &'static str {
        match self {
            GlyphTier::Primary => "primary",
            GlyphTier::Secondary => "secondary",
            GlyphTier::Generic => "generic",
        }
    }
}

/// Pixel data of a font's placeholder glyph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TofuSignature(Vec<u8>);

impl TofuSignature {
    /// Render the reference code point and keep its pixels
    pub fn capture<F: GlyphRenderer>(font: &F, canvas_size: u32) -> Self {
        Self(font.render(TOFU_REFERENCE, canvas_size).into_raw())
    }

    /// True if `rendered` is the placeholder
    pub fn matches(&self, rendered: &RgbaImage) -> bool {
        rendered.as_raw() == &self.0
    }
}

/// One link of the chain
pub struct ChainEntry<F> {
    pub tier: GlyphTier,
    pub font: F,
    /// Strip smoothing before scaling
    pub binarize: bool,
    tofu: TofuSignature,
}

impl<F: GlyphRenderer> ChainEntry<F> {
    /// Render `ch` and report whether the font really has it
    pub fn try_render(&self, ch: char, canvas_size: u32) -> Option<RgbaImage> {
        let rendered = self.font.render(ch, canvas_size);
        if self.tofu.matches(&rendered) {
            None
        } else {
            Some(rendered)
        }
    }
}

#[cfg(test)]
impl<F: GlyphRenderer> ChainEntry<F> {
    pub fn supports(&self, ch: char, canvas_size: u32) -> bool {
        self.try_render(ch, canvas_size).is_some()
    }
}

/// Fixed-priority font chain: primary -> secondary -> generic
pub struct FontChain<F> {
    entries: Vec<ChainEntry<F>>,
    canvas_size: u32,
}

/// Winning font for a character, with the rendering that decided it
pub struct Selection<'a, F> {
    pub entry: &'a ChainEntry<F>,
    pub rendered: RgbaImage,
}

impl<F: GlyphRenderer> FontChain<F> {
    /// Build the chain and capture all three placeholder signatures up front
    pub fn new(primary: F, secondary: F, generic: F, canvas_size: u32) -> Self {
        let links = [
            (GlyphTier::Primary, primary, false),
            (GlyphTier::Secondary, secondary, false),
            (GlyphTier::Generic, generic, true),
        ];

        let entries = links
            .into_iter()
            .map(|(tier, font, binarize)| {
                let tofu = TofuSignature::capture(&font, canvas_size);
                ChainEntry {
                    tier,
                    font,
                    binarize,
                    tofu,
                }
            })
            .collect();

        info!("Tofu signatures computed for glyph detection");

        Self {
            entries,
            canvas_size,
        }
    }

    /// First font in priority order that has a real glyph for `ch`
    pub fn select(&self, ch: char) -> Option<Selection<'_, F>> {
        for entry in &self.entries {
            if let Some(rendered) = entry.try_render(ch, self.canvas_size) {
                debug!(
                    "U+{:04X} '{}' -> {} font",
                    ch as u32,
                    ch,
                    entry.tier.label()
                );
                return Some(Selection { entry, rendered });
            }
        }
        None
    }
}

#[cfg(test)]
impl<F> FontChain<F> {
    pub fn entries(&self) -> &[ChainEntry<F>] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::raster::testing::BitmapFont;

    fn chain() -> FontChain<BitmapFont> {
        FontChain::new(
            BitmapFont::new().with_block('A', 2, 3, 4, 6, 255),
            BitmapFont::new()
                .with_block('A', 0, 0, 5, 5, 255)
                .with_block('龘', 0, 0, 12, 12, 255),
            BitmapFont::new()
                .with_block('龘', 0, 0, 12, 12, 200)
                .with_block('𠀀', 1, 1, 11, 11, 90),
            20,
        )
    }

    #[test]
    fn test_tofu_classification_is_consistent() {
        let chain = chain();
        for entry in chain.entries() {
            for ch in ['A', '龘', '𠀀', '?'] {
                assert_eq!(entry.supports(ch, 20), entry.supports(ch, 20));
            }
        }
    }

    #[test]
    fn test_reference_character_is_never_supported() {
        let chain = chain();
        for entry in chain.entries() {
            assert!(!entry.supports(TOFU_REFERENCE, 20));
        }
    }

    #[test]
    fn test_priority_order() {
        let chain = chain();
        assert_eq!(chain.select('A').unwrap().entry.tier, GlyphTier::Primary);
        assert_eq!(chain.select('龘').unwrap().entry.tier, GlyphTier::Secondary);
        assert_eq!(chain.select('𠀀').unwrap().entry.tier, GlyphTier::Generic);
        assert!(chain.select('?').is_none());
    }

    #[test]
    fn test_only_generic_binarizes() {
        let chain = chain();
        let flags: Vec<(GlyphTier, bool)> = chain
            .entries()
            .iter()
            .map(|e| (e.tier, e.binarize))
            .collect();
        assert_eq!(
            flags,
            vec![
                (GlyphTier::Primary, false),
                (GlyphTier::Secondary, false),
                (GlyphTier::Generic, true)
            ]
        );
    }

    #[test]
    fn test_blank_glyph_is_supported() {
        let font = BitmapFont::new().with_glyph(' ', Vec::new());
        let chain = FontChain::new(font, BitmapFont::new(), BitmapFont::new(), 20);
        assert_eq!(chain.select(' ').unwrap().entry.tier, GlyphTier::Primary);
    }
}
