//! BMF byte-map fonts: raw index glyphs with per-glyph placement, 6-bit palette.
use crate::{
    cursor::{ByteReader, ByteWriter},
    error::{FontError, Result},
    font::{check_metrics, MAX_GLYPHS},
    glyph::{Glyph, GlyphMetrics},
    import::ImportedGlyphs,
    palette::{Palette, Rgb, PAL_HARD_CAP},
};

pub const BMF_MAGIC: &[u8; 4] = &[0xE1, 0xE6, 0xD5, 0x1A];
pub const BMF_VERSION: u8 = 0x11;

/// Fixed-size header fields following the magic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BmfHeader {
    pub version: u8,
    pub line_height: u8,
    pub size_over: i8,
    pub size_under: i8,
    /// Space added after every character.
    pub add_space: i8,
    /// Unknown purpose, carried through unchanged.
    pub size_inner: i8,
    /// Informational: count of used colors.
    pub colors: u8,
    /// Informational: highest used color index.
    pub highest_color: u8,
}

/// Font-wide options applied when building a byte-map font from an image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ByteMapSettings {
    pub info: String,
    pub add_space: i8,
    /// Defaults to the tallest glyph.
    pub line_height: Option<u8>,
    pub size_over: i8,
    pub size_under: i8,
    pub size_inner: i8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ByteMapFont {
    header: BmfHeader,
    info: String,
    palette: Palette,
    glyphs: Vec<Option<Glyph>>,
}

impl ByteMapFont {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);
        if r.bytes(4, "magic")? != BMF_MAGIC {
            return Err(FontError::UnrecognizedFormat);
        }
        let header = BmfHeader {
            version: r.u8("version")?,
            line_height: r.u8("line height")?,
            size_over: r.i8("size over")?,
            size_under: r.i8("size under")?,
            add_space: r.i8("add space")?,
            size_inner: r.i8("size inner")?,
            colors: r.u8("used colors")?,
            highest_color: r.u8("highest color")?,
        };
        r.skip(4, "reserved")?;
        let entry_count = r.u8("palette size")? as usize;
        let entries: Vec<Rgb> = r
            .bytes(entry_count * 3, "palette")?
            .chunks_exact(3)
            .map(|c| {
                Rgb::new(
                    Rgb::expand_6bit(c[0]),
                    Rgb::expand_6bit(c[1]),
                    Rgb::expand_6bit(c[2]),
                )
            })
            .collect();
        // On disk index 0 is transparent and not stored.
        let (palette, entry_map) = Palette::with_transparent(Rgb::TRANSPARENT, PAL_HARD_CAP)
            .dedup_entries(&entries, Some(Rgb::TRANSPARENT));
        let mut remap = Vec::with_capacity(entry_map.len() + 1);
        remap.push(0);
        remap.extend(entry_map);
        let identity = remap.iter().enumerate().all(|(i, &m)| i == m as usize);

        let info_len = r.u8("info length")? as usize;
        let info = r
            .bytes(info_len, "info")?
            .iter()
            .map(|&b| b as char)
            .collect::<String>();
        let count = r.u16_le("character count")? as usize;
        log::debug!(
            "BMF v{:#x} line height {}, {} colors, {count} chars, info {info:?}",
            header.version,
            header.line_height,
            palette.len()
        );
        if count > MAX_GLYPHS {
            check_metrics(header.line_height as i64, palette.len(), count)?;
        }

        let mut glyphs = Vec::with_capacity(count);
        for _ in 0..count {
            let code = r.u8("character code")?;
            let width = r.u8("character width")? as usize;
            let height = r.u8("character height")? as usize;
            let metrics = GlyphMetrics {
                rel_x: r.i8("relative x")?,
                rel_y: r.i8("relative y")?,
                shift: r.i8("shift")?,
            };
            let len = width * height;
            let remaining = r.remaining();
            let data = r
                .bytes(len, "character data")
                .map_err(|_| FontError::CharacterOverflow {
                    code,
                    run: len,
                    remaining,
                })?
                .to_vec();
            let mut glyph = Glyph::from_parts(code, width, height, data);
            glyph.metrics = Some(metrics);
            if !identity {
                glyph.remap(&remap);
            }
            glyphs.push(Some(glyph));
        }

        let mut font = Self {
            header,
            info,
            palette,
            glyphs,
        };
        font.layout();
        Ok(font)
    }

    /// Build from imported glyphs, kept in import order.
    pub fn from_import(imported: ImportedGlyphs, settings: &ByteMapSettings) -> Result<Self> {
        let ImportedGlyphs { palette, glyphs } = imported;
        if let Some(g) = glyphs.iter().find(|g| g.width() > 0xFF || g.height() > 0xFF) {
            return Err(FontError::GlyphTooLarge {
                width: g.width(),
                height: g.height(),
            });
        }
        let tallest = glyphs.iter().map(Glyph::height).max().unwrap_or(0) as u8;
        let top = palette.len().saturating_sub(1).min(0xFF) as u8;
        let header = BmfHeader {
            version: BMF_VERSION,
            line_height: settings.line_height.unwrap_or(tallest),
            size_over: settings.size_over,
            size_under: settings.size_under,
            add_space: settings.add_space,
            size_inner: settings.size_inner,
            colors: top,
            highest_color: top,
        };
        let glyphs = glyphs
            .into_iter()
            .map(|mut g| {
                if g.metrics.is_none() {
                    g.metrics = Some(GlyphMetrics {
                        rel_x: 0,
                        rel_y: 0,
                        shift: g.width().min(i8::MAX as usize) as i8,
                    });
                }
                Some(g)
            })
            .collect();
        let mut font = Self {
            header,
            info: settings.info.clone(),
            palette,
            glyphs,
        };
        font.layout();
        Ok(font)
    }

    fn layout(&mut self) {
        let add_space = self.header.add_space as i32;
        let mut offset = 0;
        for glyph in self.glyphs.iter_mut().flatten() {
            glyph.offset = offset;
            offset += glyph.width() as i32 + add_space;
        }
    }

    pub(crate) fn check(&self) -> Result<()> {
        check_metrics(
            self.header.line_height as i64,
            self.palette.len(),
            self.glyphs.len(),
        )
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let h = &self.header;
        let mut w = ByteWriter::new();
        w.bytes(BMF_MAGIC);
        w.u8(h.version);
        w.u8(h.line_height);
        w.i8(h.size_over);
        w.i8(h.size_under);
        w.i8(h.add_space);
        w.i8(h.size_inner);
        w.u8(h.colors);
        w.u8(h.highest_color);
        w.bytes(&[0; 4]);
        let stored = &self.palette.colors()[1.min(self.palette.len())..];
        let stored = &stored[..stored.len().min(0xFF)];
        w.u8(stored.len() as u8);
        for c in stored {
            w.bytes(&[c.r >> 2, c.g >> 2, c.b >> 2]);
        }
        let info: Vec<u8> = self
            .info
            .chars()
            .take(0xFF)
            .map(|c| u8::try_from(c).unwrap_or(b'?'))
            .collect();
        w.u8(info.len() as u8);
        w.bytes(&info);
        w.u16_le(self.glyphs.iter().flatten().count() as u16);
        for g in self.glyphs.iter().flatten() {
            let m = g.metrics.unwrap_or_default();
            w.u8(g.code);
            w.u8(g.width() as u8);
            w.u8(g.height() as u8);
            w.i8(m.rel_x);
            w.i8(m.rel_y);
            w.i8(m.shift);
            w.bytes(g.data());
        }
        w.into_inner()
    }

    pub fn header(&self) -> &BmfHeader {
        &self.header
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn glyphs(&self) -> &[Option<Glyph>] {
        &self.glyphs
    }

    pub fn transparent(&self) -> Rgb {
        Rgb::TRANSPARENT
    }

    pub fn add_space(&self) -> i32 {
        self.header.add_space as i32
    }

    pub fn total_width(&self) -> i32 {
        self.glyphs
            .iter()
            .flatten()
            .map(|g| g.width() as i32 + self.add_space())
            .sum()
    }

    pub fn max_height(&self) -> i32 {
        self.glyphs
            .iter()
            .flatten()
            .map(|g| g.height() as i32)
            .max()
            .unwrap_or(0)
    }
}
