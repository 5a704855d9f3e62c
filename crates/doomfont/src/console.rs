//! FON1 console fonts: 256 fixed-size grayscale cells, RLE compressed.
use crate::{
    cursor::{ByteReader, ByteWriter},
    error::{FontError, Result},
    font::check_metrics,
    glyph::Glyph,
    import::ImportedGlyphs,
    palette::{Palette, Rgb, PAL_HARD_CAP},
    rle,
};

pub const FON1_MAGIC: &[u8; 4] = b"FON1";
pub const CONSOLE_GLYPH_COUNT: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleFont {
    palette: Palette,
    glyphs: Vec<Option<Glyph>>,
    cell_width: usize,
    cell_height: usize,
}

impl ConsoleFont {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);
        if r.bytes(4, "magic")? != FON1_MAGIC {
            return Err(FontError::UnrecognizedFormat);
        }
        let cell_width = r.u16_le("character width")? as usize;
        let cell_height = r.u16_le("character height")? as usize;
        log::debug!("FON1 {cell_width}x{cell_height}");

        // Black is the transparent key; every other gray gets its own slot.
        let mut palette = Palette::with_transparent(Rgb::BLACK, PAL_HARD_CAP);
        let mut glyphs = Vec::with_capacity(CONSOLE_GLYPH_COUNT);
        for code in 0..CONSOLE_GLYPH_COUNT {
            let code = code as u8;
            let gray = rle::decode(&mut r, cell_width * cell_height, code)?;
            let data = gray
                .into_iter()
                .map(|v| match Rgb::gray(v) {
                    Rgb::BLACK => 0,
                    color => palette.add(color).unwrap_or(0),
                })
                .collect();
            glyphs.push(Some(Glyph::from_parts(code, cell_width, cell_height, data)));
        }
        let mut font = Self {
            palette,
            glyphs,
            cell_width,
            cell_height,
        };
        font.layout();
        Ok(font)
    }

    /// Build from imported glyphs. Every glyph is padded to the largest
    /// cell; codes without a glyph become blank cells.
    pub fn from_import(imported: ImportedGlyphs) -> Result<Self> {
        let ImportedGlyphs { palette, glyphs } = imported;
        let cell_width = glyphs.iter().map(Glyph::width).max().unwrap_or(0);
        let cell_height = glyphs.iter().map(Glyph::height).max().unwrap_or(0);
        if cell_width > u16::MAX as usize || cell_height > u16::MAX as usize {
            return Err(FontError::GlyphTooLarge {
                width: cell_width,
                height: cell_height,
            });
        }
        let mut slots: Vec<Option<Glyph>> = vec![None; CONSOLE_GLYPH_COUNT];
        for glyph in glyphs {
            let slot = &mut slots[glyph.code as usize];
            if slot.is_some() {
                log::warn!("duplicate glyph for code {}, keeping the first", glyph.code);
                continue;
            }
            let mut cell = glyph.padded(cell_width, cell_height);
            cell.metrics = None;
            *slot = Some(cell);
        }
        let glyphs = slots
            .into_iter()
            .enumerate()
            .map(|(code, g)| {
                Some(g.unwrap_or_else(|| Glyph::blank(code as u8, cell_width, cell_height)))
            })
            .collect();
        let mut font = Self {
            palette,
            glyphs,
            cell_width,
            cell_height,
        };
        font.layout();
        Ok(font)
    }

    /// Console glyphs stack top to bottom.
    fn layout(&mut self) {
        let mut offset = 0;
        for glyph in self.glyphs.iter_mut().flatten() {
            glyph.offset = offset;
            offset += glyph.height() as i32;
        }
    }

    pub(crate) fn check(&self) -> Result<()> {
        check_metrics(self.max_height() as i64, self.palette.len(), self.glyphs.len())
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.bytes(FON1_MAGIC);
        w.u16_le(self.cell_width as u16);
        w.u16_le(self.cell_height as u16);
        let blank = vec![0u8; self.cell_width * self.cell_height];
        for code in 0..CONSOLE_GLYPH_COUNT {
            let indices = match self.glyphs.get(code).and_then(Option::as_ref) {
                Some(g) => g.data(),
                None => &blank,
            };
            let gray: Vec<u8> = indices
                .iter()
                .map(|&i| self.palette.get(i).map_or(0, Rgb::luma))
                .collect();
            w.bytes(&rle::pack(&gray));
        }
        w.into_inner()
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn glyphs(&self) -> &[Option<Glyph>] {
        &self.glyphs
    }

    pub fn cell_width(&self) -> usize {
        self.cell_width
    }

    pub fn cell_height(&self) -> usize {
        self.cell_height
    }

    pub fn transparent(&self) -> Rgb {
        Rgb::BLACK
    }

    pub fn total_width(&self) -> i32 {
        self.cell_width as i32
    }

    /// Height of all cells stacked.
    pub fn max_height(&self) -> i32 {
        self.glyphs.iter().flatten().map(|g| g.height() as i32).sum()
    }
}
