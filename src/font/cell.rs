//! Cell normalization
//!
//! Turns a glyph rendered on the scratch canvas into what gets composited
//! at a cell origin. Three paths:
//! - half-width primary: crop, center horizontally, keep vertical position
//! - full-width primary: whole canvas at native size
//! - fallback: crop, optionally binarize first, nearest-neighbor scale to the cell

use crate::constants::{HALF_WIDTH_MAX, PRIMARY_FULL_WIDTH_Y_NUDGE, PRIMARY_HALF_WIDTH_Y_NUDGE};
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Rendered cell content plus its offset from the cell origin
#[derive(Debug, Clone)]
pub struct GlyphCell {
    pub image: RgbaImage,
    pub offset_x: i64,
    pub offset_y: i64,
}

/// Tight box around non-transparent pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Half-width = code point in the ASCII range
pub fn is_half_width(ch: char) -> bool {
    ch as u32 <= HALF_WIDTH_MAX
}

/// Bounding box of pixels with non-zero alpha; None for a blank image
pub fn alpha_bbox(image: &RgbaImage) -> Option<BoundingBox> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    let mut any = false;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        any = true;
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    any.then(|| BoundingBox {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

/// Force every pixel to opaque ink or fully transparent
pub fn binarize(image: &mut RgbaImage, threshold: u8) {
    for pixel in image.pixels_mut() {
        *pixel = if pixel[3] >= threshold {
            Rgba([255, 255, 255, 255])
        } else {
            Rgba([0, 0, 0, 0])
        };
    }
}

fn crop(image: &RgbaImage, bbox: BoundingBox) -> RgbaImage {
    imageops::crop_imm(image, bbox.x, bbox.y, bbox.width, bbox.height).to_image()
}

/// Half-width primary glyph: centered horizontally, original top offset nudged up
///
/// Glyphs larger than the cell are squashed to fit on the offending axis.
pub fn centered_cell(rendered: &RgbaImage, cell_width: u32, cell_height: u32) -> Option<GlyphCell> {
    let bbox = alpha_bbox(rendered)?;
    let mut glyph = crop(rendered, bbox);

    let paste_x = ((cell_width as i64 - glyph.width() as i64) / 2).max(0);
    let paste_y = bbox.y as i64 + PRIMARY_HALF_WIDTH_Y_NUDGE;

    if glyph.width() > cell_width {
        glyph = imageops::resize(&glyph, cell_width, glyph.height(), FilterType::Nearest);
    }
    if glyph.height() > cell_height {
        glyph = imageops::resize(&glyph, glyph.width(), cell_height, FilterType::Nearest);
    }

    let mut image = RgbaImage::new(cell_width, cell_height);
    imageops::overlay(&mut image, &glyph, paste_x, paste_y);

    Some(GlyphCell {
        image,
        offset_x: 0,
        offset_y: 0,
    })
}

/// Full-width primary glyph: native size, drawn one pixel above the cell origin
pub fn native_cell(rendered: RgbaImage) -> GlyphCell {
    GlyphCell {
        image: rendered,
        offset_x: 0,
        offset_y: PRIMARY_FULL_WIDTH_Y_NUDGE,
    }
}

/// Fallback glyph: crop and scale to exactly the cell size
///
/// With `binarize_threshold`, smoothing is removed before cropping.
pub fn scaled_cell(
    mut rendered: RgbaImage,
    cell_width: u32,
    cell_height: u32,
    binarize_threshold: Option<u8>,
) -> Option<GlyphCell> {
    if let Some(threshold) = binarize_threshold {
        binarize(&mut rendered, threshold);
    }

    let bbox = alpha_bbox(&rendered)?;
    let cropped = crop(&rendered, bbox);
    let image = imageops::resize(&cropped, cell_width, cell_height, FilterType::Nearest);

    Some(GlyphCell {
        image,
        offset_x: 0,
        offset_y: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas_with_block(x: u32, y: u32, w: u32, h: u32, alpha: u8) -> RgbaImage {
        let mut img = RgbaImage::new(20, 20);
        for py in y..y + h {
            for px in x..x + w {
                img.put_pixel(px, py, Rgba([255, 255, 255, alpha]));
            }
        }
        img
    }

    fn opaque_bbox(img: &RgbaImage) -> Option<BoundingBox> {
        alpha_bbox(img)
    }

    #[test]
    fn test_half_width_range() {
        assert!(is_half_width('A'));
        assert!(is_half_width('~'));
        assert!(is_half_width('\u{7F}'));
        assert!(!is_half_width('：'));
        assert!(!is_half_width('é'));
    }

    #[test]
    fn test_alpha_bbox() {
        let img = canvas_with_block(3, 4, 5, 2, 10);
        assert_eq!(
            alpha_bbox(&img),
            Some(BoundingBox {
                x: 3,
                y: 4,
                width: 5,
                height: 2
            })
        );
        assert_eq!(alpha_bbox(&RgbaImage::new(20, 20)), None);
    }

    #[test]
    fn test_binarize_threshold() {
        let mut img = RgbaImage::new(3, 1);
        img.put_pixel(0, 0, Rgba([255, 255, 255, 127]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 128]));
        img.put_pixel(2, 0, Rgba([10, 20, 30, 255]));
        binarize(&mut img, 128);
        assert_eq!(img.get_pixel(0, 0), &Rgba([0, 0, 0, 0]));
        assert_eq!(img.get_pixel(1, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(2, 0), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_centered_cell_position() {
        // 3px wide glyph whose top sits at y=2 on the canvas
        let rendered = canvas_with_block(6, 2, 3, 6, 255);
        let cell = centered_cell(&rendered, 9, 9).unwrap();

        assert_eq!((cell.offset_x, cell.offset_y), (0, 0));
        assert_eq!(cell.image.dimensions(), (9, 9));
        assert_eq!(
            opaque_bbox(&cell.image),
            Some(BoundingBox {
                x: 3,
                y: 1,
                width: 3,
                height: 6
            })
        );
    }

    #[test]
    fn test_centered_cell_squashes_wide_glyph() {
        let rendered = canvas_with_block(0, 1, 12, 4, 255);
        let cell = centered_cell(&rendered, 9, 9).unwrap();
        let bbox = opaque_bbox(&cell.image).unwrap();
        assert_eq!((bbox.x, bbox.width), (0, 9));
        assert_eq!((bbox.y, bbox.height), (0, 4));
    }

    #[test]
    fn test_centered_cell_blank() {
        assert!(centered_cell(&RgbaImage::new(20, 20), 9, 9).is_none());
    }

    #[test]
    fn test_native_cell_nudged_up() {
        let cell = native_cell(canvas_with_block(0, 0, 10, 10, 255));
        assert_eq!((cell.offset_x, cell.offset_y), (0, -1));
        assert_eq!(cell.image.dimensions(), (20, 20));
    }

    #[test]
    fn test_scaled_cell_fills_cell() {
        let rendered = canvas_with_block(1, 1, 12, 12, 255);
        let cell = scaled_cell(rendered, 9, 9, None).unwrap();
        assert_eq!(cell.image.dimensions(), (9, 9));
        assert!(cell.image.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_scaled_cell_binarized_has_no_partial_alpha() {
        let mut rendered = canvas_with_block(0, 0, 12, 12, 200);
        // Smoothed edge that must disappear
        for y in 0..12 {
            rendered.put_pixel(12, y, Rgba([255, 255, 255, 60]));
        }
        let cell = scaled_cell(rendered, 9, 9, Some(128)).unwrap();
        assert!(cell.image.pixels().all(|p| p[3] == 0 || p[3] == 255));
        assert!(cell.image.pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_scaled_cell_fully_thresholded_away() {
        let rendered = canvas_with_block(0, 0, 4, 4, 50);
        assert!(scaled_cell(rendered, 9, 9, Some(128)).is_none());
    }
}
