//! FON2 big fonts: variable-width glyphs over an 8-bit RGB palette.
use crate::{
    cursor::{ByteReader, ByteWriter},
    error::{FontError, Result},
    font::check_metrics,
    glyph::Glyph,
    import::ImportedGlyphs,
    palette::{Palette, Rgb, PAL_HARD_CAP},
    rle,
};

pub const FON2_MAGIC: &[u8; 4] = b"FON2";

/// Font-wide options applied when building a big font from an image.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BigFontSettings {
    /// Store one shared width; narrower glyphs are padded.
    pub constant_width: bool,
    pub kerning: Option<i16>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BigFont {
    palette: Palette,
    first_char: u8,
    /// Slots for `first_char..=last_char`; `None` where the width is zero.
    glyphs: Vec<Option<Glyph>>,
    height: usize,
    constant_width: bool,
    shading: u8,
    kerning: Option<i16>,
}

impl BigFont {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);
        if r.bytes(4, "magic")? != FON2_MAGIC {
            return Err(FontError::UnrecognizedFormat);
        }
        let height = r.u16_le("font height")? as usize;
        let first_char = r.u8("first char")?;
        let last_char = r.u8("last char")?;
        let count = (last_char as i32 - first_char as i32 + 1).max(0) as usize;
        let constant_width = r.u8("constant width flag")? != 0;
        let shading = r.u8("shading type")?;
        // The last entry is the inactive color, hence the +1.
        let palette_len = r.u8("palette size")? as usize + 1;
        let uses_kerning = r.u8("kerning flag")? != 0;
        let kerning = if uses_kerning {
            Some(r.i16_le("kerning")?)
        } else {
            None
        };
        let widths: Vec<usize> = if constant_width {
            let width = r.u16_le("constant width")? as usize;
            vec![width; count]
        } else {
            (0..count)
                .map(|_| r.u16_le("character width").map(|w| w as usize))
                .collect::<Result<_>>()?
        };
        log::debug!(
            "FON2 height {height}, chars {first_char}..={last_char}, {palette_len} colors, \
             constant width {constant_width}"
        );

        let entries: Vec<Rgb> = r
            .bytes(palette_len * 3, "palette")?
            .chunks_exact(3)
            .map(|c| Rgb::new(c[0], c[1], c[2]))
            .collect();
        let (palette, remap) = Palette::new(PAL_HARD_CAP).dedup_entries(&entries, None);
        let identity = remap.iter().enumerate().all(|(i, &m)| i == m as usize);

        let mut glyphs = Vec::with_capacity(count);
        for (i, &width) in widths.iter().enumerate() {
            if width == 0 {
                glyphs.push(None);
                continue;
            }
            let code = first_char.wrapping_add(i as u8);
            let data = rle::decode(&mut r, width * height, code)?;
            let mut glyph = Glyph::from_parts(code, width, height, data);
            if !identity {
                glyph.remap(&remap);
            }
            glyphs.push(Some(glyph));
        }

        let mut font = Self {
            palette,
            first_char,
            glyphs,
            height,
            constant_width,
            shading,
            kerning,
        };
        font.layout();
        Ok(font)
    }

    /// Build from imported glyphs spanning the lowest to the highest code.
    pub fn from_import(imported: ImportedGlyphs, settings: &BigFontSettings) -> Result<Self> {
        let ImportedGlyphs { palette, glyphs } = imported;
        let height = glyphs.iter().map(Glyph::height).max().unwrap_or(0);
        let widest = glyphs.iter().map(Glyph::width).max().unwrap_or(0);
        if height > u16::MAX as usize || widest > u16::MAX as usize {
            return Err(FontError::GlyphTooLarge {
                width: widest,
                height,
            });
        }
        let first_char = glyphs.iter().map(|g| g.code).min().unwrap_or(0);
        let last_char = glyphs.iter().map(|g| g.code).max().unwrap_or(0);
        let span = if glyphs.is_empty() {
            0
        } else {
            (last_char - first_char) as usize + 1
        };
        let mut slots: Vec<Option<Glyph>> = vec![None; span];
        for glyph in glyphs {
            let slot = &mut slots[(glyph.code - first_char) as usize];
            if slot.is_some() {
                log::warn!("duplicate glyph for code {}, keeping the first", glyph.code);
                continue;
            }
            let width = if settings.constant_width {
                widest
            } else {
                glyph.width()
            };
            let mut cell = glyph.padded(width, height);
            cell.metrics = None;
            *slot = Some(cell);
        }
        if settings.constant_width {
            for (i, slot) in slots.iter_mut().enumerate() {
                if slot.is_none() {
                    *slot = Some(Glyph::blank(first_char + i as u8, widest, height));
                }
            }
        }
        let mut font = Self {
            palette,
            first_char,
            glyphs: slots,
            height,
            constant_width: settings.constant_width,
            shading: 0,
            kerning: settings.kerning,
        };
        font.layout();
        Ok(font)
    }

    fn layout(&mut self) {
        let mut offset = 0;
        for glyph in self.glyphs.iter_mut().flatten() {
            glyph.offset = offset;
            offset += glyph.width() as i32;
        }
    }

    pub(crate) fn check(&self) -> Result<()> {
        check_metrics(self.height as i64, self.palette.len(), self.glyphs.len())
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.bytes(FON2_MAGIC);
        w.u16_le(self.height as u16);
        w.u8(self.first_char);
        w.u8(self.last_char());
        w.u8(self.constant_width as u8);
        w.u8(self.shading);
        w.u8(self.palette.len().saturating_sub(1).min(0xFF) as u8);
        w.u8(self.kerning.is_some() as u8);
        if let Some(kerning) = self.kerning {
            w.i16_le(kerning);
        }
        let shared_width = self.shared_width();
        if self.constant_width {
            w.u16_le(shared_width as u16);
        } else {
            for slot in &self.glyphs {
                w.u16_le(slot.as_ref().map_or(0, |g| g.width() as u16));
            }
        }
        for color in self.palette.colors() {
            w.bytes(&[color.r, color.g, color.b]);
        }
        for slot in &self.glyphs {
            match slot {
                Some(g) if self.constant_width && g.width() != shared_width => {
                    w.bytes(&rle::pack(g.padded(shared_width, self.height).data()));
                }
                Some(g) => w.bytes(&rle::pack(g.data())),
                None if self.constant_width => {
                    w.bytes(&rle::pack(&vec![0; shared_width * self.height]));
                }
                None => {}
            }
        }
        w.into_inner()
    }

    fn shared_width(&self) -> usize {
        self.glyphs
            .iter()
            .flatten()
            .next()
            .map_or(0, Glyph::width)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn glyphs(&self) -> &[Option<Glyph>] {
        &self.glyphs
    }

    pub fn first_char(&self) -> u8 {
        self.first_char
    }

    pub fn last_char(&self) -> u8 {
        self.first_char
            .wrapping_add(self.glyphs.len().saturating_sub(1) as u8)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_constant_width(&self) -> bool {
        self.constant_width
    }

    pub fn kerning(&self) -> Option<i16> {
        self.kerning
    }

    /// Palette slot 0.
    pub fn transparent(&self) -> Rgb {
        self.palette.get(0).unwrap_or(Rgb::TRANSPARENT)
    }

    pub fn total_width(&self) -> i32 {
        self.glyphs.iter().flatten().map(|g| g.width() as i32).sum()
    }

    pub fn max_height(&self) -> i32 {
        self.height as i32
    }
}
