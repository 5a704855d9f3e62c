//! Test support utilities for doomfont.
//!
//! Builders that lay out FON1/FON2/BMF bytes field by field, independent
//! of the encoders, plus small raster helpers. Not part of the stable API.

use crate::{palette::Rgb, render::Raster, rle};

/// FON1 with every glyph produced by `glyph(code)` (must be `width * height` bytes).
pub fn fon1_bytes(width: u16, height: u16, glyph: impl Fn(u8) -> Vec<u8>) -> Vec<u8> {
    let mut out = b"FON1".to_vec();
    out.extend(width.to_le_bytes());
    out.extend(height.to_le_bytes());
    for code in 0..=255u8 {
        out.extend(rle::pack(&glyph(code)));
    }
    out
}

/// One FON2 glyph: width and raw indices (`width * height` bytes).
pub struct Fon2Glyph {
    pub width: u16,
    pub data: Vec<u8>,
}

pub struct Fon2Spec {
    pub height: u16,
    pub first_char: u8,
    pub constant_width: bool,
    pub kerning: Option<i16>,
    /// Written verbatim; the count byte is `len - 1`.
    pub palette: Vec<Rgb>,
    pub glyphs: Vec<Fon2Glyph>,
}

pub fn fon2_bytes(spec: &Fon2Spec) -> Vec<u8> {
    let mut out = b"FON2".to_vec();
    out.extend(spec.height.to_le_bytes());
    out.push(spec.first_char);
    out.push(spec.first_char + spec.glyphs.len() as u8 - 1);
    out.push(spec.constant_width as u8);
    out.push(0);
    out.push((spec.palette.len() - 1) as u8);
    out.push(spec.kerning.is_some() as u8);
    if let Some(k) = spec.kerning {
        out.extend(k.to_le_bytes());
    }
    if spec.constant_width {
        out.extend(spec.glyphs[0].width.to_le_bytes());
    } else {
        for g in &spec.glyphs {
            out.extend(g.width.to_le_bytes());
        }
    }
    for c in &spec.palette {
        out.extend([c.r, c.g, c.b]);
    }
    for g in &spec.glyphs {
        if g.width > 0 {
            out.extend(rle::pack(&g.data));
        }
    }
    out
}

pub struct BmfGlyph {
    pub code: u8,
    pub width: u8,
    pub height: u8,
    pub rel_x: i8,
    pub rel_y: i8,
    pub shift: i8,
    pub data: Vec<u8>,
}

impl BmfGlyph {
    /// Solid glyph of one color index, advancing by its width.
    pub fn solid(code: u8, width: u8, height: u8, index: u8) -> Self {
        Self {
            code,
            width,
            height,
            rel_x: 0,
            rel_y: 0,
            shift: width as i8,
            data: vec![index; width as usize * height as usize],
        }
    }
}

pub struct BmfSpec {
    pub line_height: u8,
    pub add_space: i8,
    pub size_inner: i8,
    /// 6-bit channel values, as stored on disk.
    pub palette: Vec<[u8; 3]>,
    pub info: String,
    pub glyphs: Vec<BmfGlyph>,
}

pub fn bmf_bytes(spec: &BmfSpec) -> Vec<u8> {
    let mut out = vec![0xE1, 0xE6, 0xD5, 0x1A, 0x11];
    out.push(spec.line_height);
    out.push(-2i8 as u8);
    out.push(3);
    out.push(spec.add_space as u8);
    out.push(spec.size_inner as u8);
    out.push(spec.palette.len() as u8);
    out.push(spec.palette.len() as u8);
    out.extend([0; 4]);
    out.push(spec.palette.len() as u8);
    for c in &spec.palette {
        out.extend(c);
    }
    out.push(spec.info.len() as u8);
    out.extend(spec.info.bytes());
    out.extend((spec.glyphs.len() as u16).to_le_bytes());
    for g in &spec.glyphs {
        out.extend([
            g.code,
            g.width,
            g.height,
            g.rel_x as u8,
            g.rel_y as u8,
            g.shift as u8,
        ]);
        out.extend(&g.data);
    }
    out
}

/// Paint a solid rectangle into `raster`.
pub fn fill_rect(raster: &mut Raster, x: usize, y: usize, w: usize, h: usize, color: Rgb) {
    for py in y..y + h {
        for px in x..x + w {
            raster.put_color(px, py, color);
        }
    }
}

/// Read the visible pixels of `raster` as rows of `#` (ink) and `.` (empty).
pub fn ink_rows(raster: &Raster) -> Vec<String> {
    raster
        .pixels()
        .chunks(raster.width())
        .map(|row| {
            row.iter()
                .map(|p| if p[3] != 0 { '#' } else { '.' })
                .collect()
        })
        .collect()
}
