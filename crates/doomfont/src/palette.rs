//! Ordered, deduplicated color tables and nearest-color matching.
use once_cell::sync::Lazy;

/// Generic palette limit used by FON2 and by the image importer.
pub const PAL_MAX_SIZE: usize = 255;
/// Absolute limit: every index must fit in one byte.
pub const PAL_HARD_CAP: usize = 256;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// Transparent key shared by FON2 and BMF fonts built here.
    pub const TRANSPARENT: Rgb = Rgb::new(35, 0, 60);
    /// Trailing marker appended after an import; ZDoom rejects one-color palettes.
    pub const UNUSED: Rgb = Rgb::new(167, 107, 107);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: u8) -> Self {
        Self::new(v, v, v)
    }

    /// Perceptual distance `|299·ΔR + 587·ΔG + 114·ΔB|`.
    pub fn distance(self, other: Rgb) -> u32 {
        let d = 299 * (self.r as i32 - other.r as i32)
            + 587 * (self.g as i32 - other.g as i32)
            + 114 * (self.b as i32 - other.b as i32);
        d.unsigned_abs()
    }

    /// Rec. 709 luma, truncated. Grays map to themselves.
    pub fn luma(self) -> u8 {
        ((2126 * self.r as u32 + 7152 * self.g as u32 + 722 * self.b as u32) / 10_000) as u8
    }

    /// Expand a 6-bit channel to 8 bits: `(v << 2) | (v >> 4)`, clamped.
    pub fn expand_6bit(v: u8) -> u8 {
        (((v as u16) << 2) | ((v as u16) >> 4)).min(0xFF) as u8
    }
}

/// An ordered color table. Index = on-disk palette index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Rgb>,
    max: usize,
}

impl Palette {
    pub fn new(max: usize) -> Self {
        Self {
            colors: Vec::new(),
            max: max.min(PAL_HARD_CAP),
        }
    }

    /// Start a palette whose slot 0 is the reserved transparent color.
    pub fn with_transparent(transparent: Rgb, max: usize) -> Self {
        let mut palette = Self::new(max);
        palette.colors.push(transparent);
        palette
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn max(&self) -> usize {
        self.max
    }

    pub fn is_full(&self) -> bool {
        self.colors.len() >= self.max
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn get(&self, index: u8) -> Option<Rgb> {
        self.colors.get(index as usize).copied()
    }

    pub fn index_of(&self, color: Rgb) -> Option<u8> {
        self.colors.iter().position(|c| *c == color).map(|i| i as u8)
    }

    /// Insert `color` unless present. Returns its index, or `None` when the
    /// color is absent and the table is at capacity.
    pub fn add(&mut self, color: Rgb) -> Option<u8> {
        if let Some(index) = self.index_of(color) {
            return Some(index);
        }
        if self.is_full() {
            return None;
        }
        self.colors.push(color);
        Some((self.colors.len() - 1) as u8)
    }

    /// Index of the entry closest to `color`; ties go to the lowest index.
    pub fn nearest_index(&self, color: Rgb) -> Option<u8> {
        let mut best: Option<(usize, u32)> = None;
        for (i, c) in self.colors.iter().enumerate() {
            let d = color.distance(*c);
            if best.map_or(true, |(_, min)| d < min) {
                best = Some((i, d));
            }
        }
        best.map(|(i, _)| i as u8)
    }

    /// Exact index if present, a new slot if there is room, else the nearest entry.
    pub fn add_or_nearest(&mut self, color: Rgb) -> u8 {
        match self.add(color) {
            Some(index) => index,
            None => self.nearest_index(color).unwrap_or(0),
        }
    }

    /// Append a trailing marker color past the configured maximum (up to the
    /// hard cap), even if an equal color already exists.
    pub fn push_marker(&mut self, color: Rgb) -> Option<u8> {
        if self.colors.len() >= PAL_HARD_CAP {
            return None;
        }
        self.colors.push(color);
        Some((self.colors.len() - 1) as u8)
    }

    /// Build a palette from on-disk entries, dropping duplicates and any
    /// entry equal to `skip`. Returns, per entry, the index it now lives at.
    pub(crate) fn dedup_entries(
        mut self,
        entries: &[Rgb],
        skip: Option<Rgb>,
    ) -> (Self, Vec<u8>) {
        let base = self.len();
        let mut remap = Vec::with_capacity(entries.len());
        for (i, color) in entries.iter().enumerate() {
            let index = if Some(*color) == skip {
                0
            } else if let Some(existing) = self.index_of(*color) {
                log::warn!("duplicate palette entry {i} {color:?} merged into index {existing}");
                existing
            } else {
                match self.add(*color) {
                    Some(index) => index,
                    None => {
                        let nearest = self.nearest_index(*color).unwrap_or(0);
                        log::warn!(
                            "palette full, entry {i} {color:?} mapped to nearest index {nearest}"
                        );
                        nearest
                    }
                }
            };
            if index as usize != base + i {
                log::debug!("palette entry {i} {color:?} remapped to index {index}");
            }
            remap.push(index);
        }
        (self, remap)
    }
}

/// 64 colors, two bits per channel.
pub fn six_bit_rgb() -> &'static [Rgb] {
    static SIX_BIT: Lazy<Vec<Rgb>> = Lazy::new(|| {
        let level = |v: u8| v * 85;
        (0..64u8)
            .map(|i| Rgb::new(level(i >> 4 & 3), level(i >> 2 & 3), level(i & 3)))
            .collect()
    });
    &SIX_BIT
}

/// 256 colors, 3-3-2 bits per channel.
pub fn eight_bit_rgb() -> &'static [Rgb] {
    static EIGHT_BIT: Lazy<Vec<Rgb>> = Lazy::new(|| {
        (0..=255u8)
            .map(|i| {
                let r = (i >> 5 & 7) as u16 * 255 / 7;
                let g = (i >> 2 & 7) as u16 * 255 / 7;
                let b = (i & 3) as u16 * 255 / 3;
                Rgb::new(r as u8, g as u8, b as u8)
            })
            .collect()
    });
    &EIGHT_BIT
}
