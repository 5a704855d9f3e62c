//! doomfont: Doom engine bitmap font toolkit.
//!
//! Reads and writes the three lump formats used by ZDoom-family ports:
//! FON1 console fonts, FON2 big fonts and BMF byte-map fonts. Fonts can
//! be rendered to RGBA rasters and built from rendered images.

#[cfg(feature = "archive")]
pub mod archive;
pub mod bigfont;
pub mod bmf;
pub mod console;
pub mod convert;
mod cursor;
mod error;
mod font;
mod glyph;
pub mod import;
pub mod palette;
mod render;
pub mod rle;

pub use error::{FontError, Result};
pub use font::{Font, FontFormat, ValidatedFont, MAX_GLYPHS};
pub use glyph::{Axis, Glyph, GlyphMetrics};
pub use palette::{Palette, Rgb};
pub use render::{Raster, RenderOptions};

// Test utilities
pub mod test_support;
