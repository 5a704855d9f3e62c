use std::path::Path;

use anyhow::{anyhow, Context, Result};
use doomfont::{import::GlyphBox, Raster};
use image::{imageops::FilterType, RgbaImage};

pub fn load(path: &Path) -> Result<Raster> {
    let img = image::open(path)
        .with_context(|| format!("failed to load image {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Raster::from_rgba(width as usize, height as usize, img.as_raw())
        .ok_or_else(|| anyhow!("unexpected pixel buffer size in {}", path.display()))
}

/// Write `raster` as PNG, enlarged `scale` times with nearest-neighbour sampling.
pub fn save(raster: &Raster, path: &Path, scale: u32) -> Result<()> {
    let (width, height) = (raster.width() as u32, raster.height() as u32);
    let mut img = RgbaImage::from_raw(width, height, raster.to_rgba_bytes())
        .ok_or_else(|| anyhow!("raster of {width}x{height} has a bad pixel buffer"))?;
    if scale > 1 {
        img = image::imageops::resize(&img, width * scale, height * scale, FilterType::Nearest);
    }
    img.save(path)
        .with_context(|| format!("failed to write {}", path.display()))
}

/// Fixed grid layout of a glyph sheet.
pub struct Grid {
    pub cell_width: usize,
    pub cell_height: usize,
    pub columns: usize,
    pub first_char: u8,
    pub count: Option<usize>,
    /// Shrink each box to the columns holding ink.
    pub trim: bool,
}

impl Grid {
    /// One box per cell, row-major, starting at `first_char`.
    pub fn boxes(&self, sheet: &Raster) -> Result<Vec<GlyphBox>> {
        if self.cell_width == 0 || self.cell_height == 0 || self.columns == 0 {
            return Err(anyhow!("cell size and column count must be positive"));
        }
        let columns = self.columns.min(sheet.width() / self.cell_width);
        let rows = sheet.height() / self.cell_height;
        let available = (columns * rows).min(256 - self.first_char as usize);
        let count = self.count.unwrap_or(available).min(available);
        log::debug!("grid {columns}x{rows}, taking {count} cells");

        let mut boxes = Vec::with_capacity(count);
        for i in 0..count {
            let x = (i % columns * self.cell_width) as i32;
            let y = (i / columns * self.cell_height) as i32;
            let mut b = GlyphBox::new(
                self.first_char + i as u8,
                x,
                y,
                self.cell_width,
                self.cell_height,
            );
            if self.trim {
                b.width = ink_width(sheet, &b).max(1);
            }
            boxes.push(b);
        }
        Ok(boxes)
    }
}

/// Columns up to and including the rightmost visible pixel in `b`.
fn ink_width(sheet: &Raster, b: &GlyphBox) -> usize {
    (0..b.width)
        .rev()
        .find(|&x| {
            (0..b.height).any(|y| {
                sheet
                    .get(b.x as i64 + x as i64, b.y as i64 + y as i64)
                    .is_some_and(|p| p[3] != 0 && p[..3] != [0, 0, 0])
            })
        })
        .map_or(0, |x| x + 1)
}
