/// Byte-map placement extras: cursor-relative offsets and advance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphMetrics {
    pub rel_x: i8,
    pub rel_y: i8,
    /// Cursor advance after drawing, used instead of the width.
    pub shift: i8,
}

/// Which way glyphs are laid out in a font montage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// One character's palette-indexed raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
    /// Character code this glyph draws.
    pub code: u8,
    /// Position along the font's layout axis.
    pub offset: i32,
    /// Present for byte-map glyphs only.
    pub metrics: Option<GlyphMetrics>,
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Glyph {
    /// A fully transparent glyph.
    pub fn blank(code: u8, width: usize, height: usize) -> Self {
        Self::from_parts(code, width, height, vec![0; width * height])
    }

    /// Returns `None` unless `data.len() == width * height`.
    pub fn with_data(code: u8, width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == width * height).then(|| Self::from_parts(code, width, height, data))
    }

    pub(crate) fn from_parts(code: u8, width: usize, height: usize, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width * height);
        Self {
            code,
            offset: 0,
            metrics: None,
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u8> {
        (x < self.width && y < self.height).then(|| self.data[y * self.width + x])
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, index: u8) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = index;
        }
    }

    /// Horizontal cursor advance when typesetting.
    pub fn advance(&self) -> i32 {
        match self.metrics {
            Some(m) => m.shift as i32,
            None => self.width as i32,
        }
    }

    /// Copy into a larger transparent cell anchored at the top-left corner.
    pub fn padded(&self, width: usize, height: usize) -> Self {
        if width == self.width && height == self.height {
            return self.clone();
        }
        let mut out = Glyph::blank(self.code, width, height);
        out.offset = self.offset;
        out.metrics = self.metrics;
        for y in 0..self.height.min(height) {
            for x in 0..self.width.min(width) {
                out.data[y * width + x] = self.data[y * self.width + x];
            }
        }
        out
    }

    pub(crate) fn remap(&mut self, table: &[u8]) {
        for px in &mut self.data {
            if let Some(mapped) = table.get(*px as usize) {
                *px = *mapped;
            }
        }
    }
}
