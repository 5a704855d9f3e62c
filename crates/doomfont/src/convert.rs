//! Format conversion by rendering the montage and importing it again.
use crate::{
    bigfont::BigFontSettings,
    bmf::ByteMapSettings,
    font::{Font, FontFormat, ValidatedFont},
    glyph::Axis,
    import::{build_font, BuildSettings, GlyphBox, ImportOptions},
    render::RenderOptions,
    Result,
};

/// Re-express `font` in `target` format.
///
/// Colors pass through the importer, so pure black ink is dropped and the
/// palette is rebuilt in order of first use. Converting to BMF quantizes
/// the palette to 6 bits per channel once written.
pub fn convert(font: &ValidatedFont, target: FontFormat) -> Result<ValidatedFont> {
    let montage = font.render(&RenderOptions::transparent());
    let axis = font.format().axis();
    let boxes: Vec<GlyphBox> = font
        .glyphs()
        .iter()
        .flatten()
        .map(|g| {
            let (rel_x, rel_y) = g.metrics.map_or((0, 0), |m| (m.rel_x as i32, m.rel_y as i32));
            let (x, y) = match axis {
                Axis::Horizontal => (g.offset + rel_x, rel_y),
                Axis::Vertical => (rel_x, g.offset + rel_y),
            };
            GlyphBox {
                code: g.code,
                x,
                y,
                width: g.width(),
                height: g.height(),
                metrics: g.metrics,
            }
        })
        .collect();
    log::debug!(
        "converting {} glyphs from {} to {}",
        boxes.len(),
        font.format(),
        target
    );
    build_font(&montage, &boxes, &settings_for(font, target), &ImportOptions::default())
}

fn settings_for(font: &Font, target: FontFormat) -> BuildSettings {
    match target {
        FontFormat::Console => BuildSettings::Console,
        FontFormat::Big => BuildSettings::Big(BigFontSettings {
            constant_width: match font {
                Font::Console(_) => true,
                Font::Big(f) => f.is_constant_width(),
                Font::ByteMap(_) => false,
            },
            kerning: match font {
                Font::Big(f) => f.kerning(),
                other => Some(other.spacing() as i16).filter(|k| *k != 0),
            },
        }),
        FontFormat::ByteMap => {
            let mut settings = ByteMapSettings {
                add_space: font.spacing().clamp(i8::MIN as i32, i8::MAX as i32) as i8,
                line_height: Some(font.line_height().clamp(1, u8::MAX as i32) as u8),
                ..Default::default()
            };
            if let Font::ByteMap(f) = font {
                let h = f.header();
                settings.info = f.info().to_string();
                settings.line_height = Some(h.line_height);
                settings.size_over = h.size_over;
                settings.size_under = h.size_under;
                settings.size_inner = h.size_inner;
            }
            BuildSettings::ByteMap(settings)
        }
    }
}
