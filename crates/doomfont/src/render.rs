//! Rasterizing fonts into RGBA pixel grids.
use crate::{
    font::ValidatedFont,
    glyph::{Axis, Glyph},
    palette::Rgb,
};

/// Empty border around every rendered image.
const MARGIN: usize = 2;

#[derive(Clone, Debug, Default)]
pub struct RenderOptions {
    /// Fill color behind the glyphs; `None` leaves the background transparent.
    pub background: Option<Rgb>,
}

impl RenderOptions {
    pub fn transparent() -> Self {
        Self::default()
    }

    pub fn opaque() -> Self {
        Self {
            background: Some(Rgb::BLACK),
        }
    }
}

/// A row-major RGBA image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<[u8; 4]>,
}

impl Raster {
    /// A fully transparent raster.
    pub fn new(width: usize, height: usize) -> Self {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![rgba; width * height],
        }
    }

    /// Wrap tightly packed RGBA bytes. `None` if the length does not match.
    pub fn from_rgba(width: usize, height: usize, bytes: &[u8]) -> Option<Self> {
        if bytes.len() != width * height * 4 {
            return None;
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2], p[3]])
            .collect();
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[[u8; 4]] {
        &self.pixels
    }

    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    pub fn get(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.pixels[y as usize * self.width + x as usize])
    }

    pub fn put(&mut self, x: usize, y: usize, rgba: [u8; 4]) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = rgba;
        }
    }

    pub fn put_color(&mut self, x: usize, y: usize, color: Rgb) {
        self.put(x, y, [color.r, color.g, color.b, 0xFF]);
    }

    /// Paint every transparent pixel lying within `width` (Chebyshev
    /// distance) of a visible pixel with `color`.
    pub fn outline(&mut self, width: usize, color: Rgb) {
        if width == 0 {
            return;
        }
        let source = self.clone();
        let reach = width as i64;
        for y in 0..self.height {
            for x in 0..self.width {
                if source.pixels[y * self.width + x][3] != 0 {
                    continue;
                }
                let (cx, cy) = (x as i64, y as i64);
                let touches = (cy - reach..=cy + reach).any(|sy| {
                    (cx - reach..=cx + reach)
                        .any(|sx| source.get(sx, sy).is_some_and(|p| p[3] != 0))
                });
                if touches {
                    self.put_color(x, y, color);
                }
            }
        }
    }

    fn for_render(width: i32, height: i32, options: &RenderOptions) -> Self {
        let width = width.max(0) as usize + MARGIN;
        let height = height.max(0) as usize + MARGIN;
        match options.background {
            Some(c) => Self::filled(width, height, [c.r, c.g, c.b, 0xFF]),
            None => Self::new(width, height),
        }
    }
}

impl ValidatedFont {
    /// Every glyph at its stored offset along the format's layout axis.
    pub fn render(&self, options: &RenderOptions) -> Raster {
        let (clip_w, clip_h) = (self.total_width(), self.max_height());
        let mut raster = Raster::for_render(clip_w, clip_h, options);
        let axis = self.format().axis();
        for glyph in self.glyphs().iter().flatten() {
            let origin = match axis {
                Axis::Horizontal => (glyph.offset, 0),
                Axis::Vertical => (0, glyph.offset),
            };
            self.paint(&mut raster, glyph, origin, (clip_w, clip_h));
        }
        raster
    }

    /// Typeset `text` left to right. Characters without a glyph are skipped.
    /// Returns `None` for empty text.
    pub fn render_text(&self, text: &str, options: &RenderOptions) -> Option<Raster> {
        if text.is_empty() {
            return None;
        }
        let spacing = self.spacing();
        let mut cursor = 0;
        let mut placed = Vec::with_capacity(text.len());
        for ch in text.chars() {
            if let Some(glyph) = self.glyph(ch) {
                placed.push((glyph, cursor));
                cursor += glyph.advance() + spacing;
            }
        }
        let (clip_w, clip_h) = (cursor, self.line_height());
        let mut raster = Raster::for_render(clip_w, clip_h, options);
        for (glyph, x) in placed {
            self.paint(&mut raster, glyph, (x, 0), (clip_w, clip_h));
        }
        Some(raster)
    }

    fn paint(&self, raster: &mut Raster, glyph: &Glyph, origin: (i32, i32), clip: (i32, i32)) {
        let palette = self.palette();
        let transparent = self.transparent();
        let (rel_x, rel_y) = glyph
            .metrics
            .map_or((0, 0), |m| (m.rel_x as i32, m.rel_y as i32));
        for y in 0..glyph.height() {
            for x in 0..glyph.width() {
                let Some(color) = glyph.pixel(x, y).and_then(|i| palette.get(i)) else {
                    continue;
                };
                if color == transparent {
                    continue;
                }
                let px = x as i32 + origin.0 + rel_x;
                let py = y as i32 + origin.1 + rel_y;
                if px >= 0 && px < clip.0 && py >= 0 && py < clip.1 {
                    raster.put_color(px as usize, py as usize, color);
                }
            }
        }
    }
}
