//! Font loading and glyph atlas composition
//!
//! Handles:
//! - TTF pixel font loading and rasterization (fontdue)
//! - Missing-glyph ("tofu") detection per font
//! - The fixed three-tier fallback chain
//! - Cell normalization and grid composition

pub mod atlas;
pub mod cell;
pub mod chain;
pub mod raster;

pub use atlas::{save_png, AtlasComposer, AtlasLayout};
pub use chain::FontChain;
pub use raster::PixelFont;
