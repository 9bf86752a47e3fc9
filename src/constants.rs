//! Global constants for glyphsheet
//!
//! Grid geometry, rendering thresholds and the fixed character baseline,
//! collected here to keep magic numbers out of the pipeline code.

// ============================================================================
// Grid Constants
// ============================================================================

/// Cell width in pixels
pub const CELL_WIDTH: u32 = 9;

/// Cell height in pixels
pub const CELL_HEIGHT: u32 = 9;

/// Cells per atlas row
pub const COLUMNS: u32 = 100;

/// Gap between neighboring cells
pub const GAP: u32 = 1;

/// Margin on the top and left edges (first cell starts at (1, 1))
pub const MARGIN: u32 = 1;

// ============================================================================
// Rendering Constants
// ============================================================================

/// Side of the square scratch canvas glyphs are drawn on before normalization
pub const WORKING_SIZE: u32 = 20;

/// Alpha at or above which a pixel survives binarization
pub const ALPHA_THRESHOLD: u8 = 128;

/// Noncharacter used to capture a font's missing-glyph placeholder
pub const TOFU_REFERENCE: char = '\u{FFFE}';

/// Highest code point treated as half-width
pub const HALF_WIDTH_MAX: u32 = 0x7F;

/// Vertical nudge for half-width glyphs from the primary font (negative = up)
pub const PRIMARY_HALF_WIDTH_Y_NUDGE: i64 = -1;

/// Vertical nudge for full-width glyphs from the primary font (negative = up)
pub const PRIMARY_FULL_WIDTH_Y_NUDGE: i64 = -1;

// ============================================================================
// Character Set Constants
// ============================================================================

/// Characters always present in the extracted set
pub const BASELINE_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789：";

/// Default source table extension
pub const TABLE_EXTENSION: &str = "csv";
