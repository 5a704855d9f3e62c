//! Building fonts from rendered images: the inverse of [`crate::render`].
//!
//! The caller renders the characters (with whatever text engine it has)
//! into a [`Raster`] and describes where each one landed with a
//! [`GlyphBox`]. Every visible pixel inside a box is quantized into the
//! font palette:
//!
//! - exact matches reuse their slot,
//! - new colors are appended while the palette has room,
//! - once it is full, the perceptually nearest entry is used.
//!
//! Pure black is the background sentinel and never enters the palette.
use crate::{
    bigfont::{BigFont, BigFontSettings},
    bmf::{ByteMapFont, ByteMapSettings},
    console::ConsoleFont,
    font::{Font, FontFormat, ValidatedFont},
    glyph::{Glyph, GlyphMetrics},
    palette::{Palette, Rgb, PAL_MAX_SIZE},
    render::Raster,
    Result,
};

/// Where one character sits in the source raster.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphBox {
    pub code: u8,
    pub x: i32,
    pub y: i32,
    pub width: usize,
    pub height: usize,
    /// Byte-map placement; ignored by the other formats.
    pub metrics: Option<GlyphMetrics>,
}

impl GlyphBox {
    pub fn new(code: u8, x: i32, y: i32, width: usize, height: usize) -> Self {
        Self {
            code,
            x,
            y,
            width,
            height,
            metrics: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ImportOptions {
    /// Snap every visible pixel to the nearest of these colors first.
    pub palette_source: Option<Vec<Rgb>>,
    /// Multiply partially transparent pixels by their alpha (antialiased
    /// renders) instead of taking their color as is.
    pub flatten_alpha: bool,
}

/// Format-specific settings for [`build_font`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BuildSettings {
    Console,
    Big(BigFontSettings),
    ByteMap(ByteMapSettings),
}

impl BuildSettings {
    pub fn format(&self) -> FontFormat {
        match self {
            BuildSettings::Console => FontFormat::Console,
            BuildSettings::Big(_) => FontFormat::Big,
            BuildSettings::ByteMap(_) => FontFormat::ByteMap,
        }
    }
}

/// Quantized glyphs and the palette they index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportedGlyphs {
    pub palette: Palette,
    pub glyphs: Vec<Glyph>,
}

/// Quantize each box of `raster` into palette-indexed glyphs.
///
/// Slot 0 of the resulting palette is `transparent`, and the unused marker
/// color is appended last.
pub fn quantize(
    raster: &Raster,
    boxes: &[GlyphBox],
    transparent: Rgb,
    options: &ImportOptions,
) -> ImportedGlyphs {
    let mut palette = Palette::with_transparent(transparent, PAL_MAX_SIZE);
    let mut glyphs = Vec::with_capacity(boxes.len());
    for b in boxes {
        let mut glyph = Glyph::blank(b.code, b.width, b.height);
        glyph.metrics = b.metrics;
        for y in 0..b.height {
            for x in 0..b.width {
                let Some(rgba) = raster.get(b.x as i64 + x as i64, b.y as i64 + y as i64) else {
                    continue;
                };
                let Some(color) = visible_color(rgba, options) else {
                    continue;
                };
                glyph.set_pixel(x, y, palette.add_or_nearest(color));
            }
        }
        glyphs.push(glyph);
    }
    if palette.push_marker(Rgb::UNUSED).is_none() {
        log::warn!("palette full, unused marker color not appended");
    }
    log::debug!(
        "quantized {} glyphs into {} colors",
        glyphs.len(),
        palette.len()
    );
    ImportedGlyphs { palette, glyphs }
}

fn visible_color(rgba: [u8; 4], options: &ImportOptions) -> Option<Rgb> {
    let [r, g, b, a] = rgba;
    if a == 0 {
        return None;
    }
    let mut color = if options.flatten_alpha && a < 0xFF {
        let scale = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
        Rgb::new(scale(r), scale(g), scale(b))
    } else {
        Rgb::new(r, g, b)
    };
    if let Some(source) = options.palette_source.as_deref() {
        if let Some(snapped) = nearest_in(source, color) {
            color = snapped;
        }
    }
    (color != Rgb::BLACK).then_some(color)
}

fn nearest_in(colors: &[Rgb], color: Rgb) -> Option<Rgb> {
    colors.iter().copied().min_by_key(|c| color.distance(*c))
}

/// Quantize `raster` and assemble a validated font of the requested format.
pub fn build_font(
    raster: &Raster,
    boxes: &[GlyphBox],
    settings: &BuildSettings,
    options: &ImportOptions,
) -> Result<ValidatedFont> {
    let imported = quantize(raster, boxes, settings.format().transparent(), options);
    let font = match settings {
        BuildSettings::Console => Font::Console(ConsoleFont::from_import(imported)?),
        BuildSettings::Big(s) => Font::Big(BigFont::from_import(imported, s)?),
        BuildSettings::ByteMap(s) => Font::ByteMap(ByteMapFont::from_import(imported, s)?),
    };
    font.validate()
}
