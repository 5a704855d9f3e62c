use std::io::Read;
use std::ops::Deref;

use crate::{
    bigfont::{BigFont, FON2_MAGIC},
    bmf::{ByteMapFont, BMF_MAGIC},
    console::{ConsoleFont, FON1_MAGIC},
    glyph::{Axis, Glyph},
    palette::{Palette, Rgb},
    FontError, Result,
};

/// Upper bound on glyphs in any font.
pub const MAX_GLYPHS: usize = 256;

/// The three on-disk formats, identified by their 4-byte magic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontFormat {
    Console,
    Big,
    ByteMap,
}

impl FontFormat {
    /// Sniff the magic at offset 0.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        let magic = bytes.get(..4)?;
        [Self::Console, Self::Big, Self::ByteMap]
            .into_iter()
            .find(|f| f.magic() == magic)
    }

    pub fn magic(self) -> &'static [u8; 4] {
        match self {
            Self::Console => FON1_MAGIC,
            Self::Big => FON2_MAGIC,
            Self::ByteMap => BMF_MAGIC,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Console => "FON1",
            Self::Big => "FON2",
            Self::ByteMap => "BMF",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Console | Self::Big => "lmp",
            Self::ByteMap => "bmf",
        }
    }

    /// Layout axis of a font montage.
    pub fn axis(self) -> Axis {
        match self {
            Self::Console => Axis::Vertical,
            Self::Big | Self::ByteMap => Axis::Horizontal,
        }
    }

    /// The color that marks "no ink" in fonts built for this format.
    pub fn transparent(self) -> Rgb {
        match self {
            Self::Console => Rgb::BLACK,
            Self::Big | Self::ByteMap => Rgb::TRANSPARENT,
        }
    }
}

impl std::str::FromStr for FontFormat {
    type Err = FontError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "fon1" | "console" => Ok(Self::Console),
            "fon2" | "big" | "bigfont" => Ok(Self::Big),
            "bmf" | "bytemap" => Ok(Self::ByteMap),
            _ => Err(FontError::UnrecognizedFormat),
        }
    }
}

impl std::fmt::Display for FontFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A decoded or imported font that has not been validated yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Font {
    Console(ConsoleFont),
    Big(BigFont),
    ByteMap(ByteMapFont),
}

impl Font {
    /// Decode without validating. Use [`Font::load`] for the checked path.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        match FontFormat::detect(bytes) {
            Some(FontFormat::Console) => ConsoleFont::from_bytes(bytes).map(Font::Console),
            Some(FontFormat::Big) => BigFont::from_bytes(bytes).map(Font::Big),
            Some(FontFormat::ByteMap) => ByteMapFont::from_bytes(bytes).map(Font::ByteMap),
            None => Err(FontError::UnrecognizedFormat),
        }
    }

    /// Detect the format, decode and validate.
    pub fn load(bytes: &[u8]) -> Result<ValidatedFont> {
        Self::decode(bytes)?.validate()
    }

    pub fn read<R: Read>(mut reader: R) -> Result<ValidatedFont> {
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf)?;
        Self::load(&buf)
    }

    pub fn format(&self) -> FontFormat {
        match self {
            Font::Console(_) => FontFormat::Console,
            Font::Big(_) => FontFormat::Big,
            Font::ByteMap(_) => FontFormat::ByteMap,
        }
    }

    pub fn palette(&self) -> &Palette {
        match self {
            Font::Console(f) => f.palette(),
            Font::Big(f) => f.palette(),
            Font::ByteMap(f) => f.palette(),
        }
    }

    /// Glyph slots in file order; `None` marks an undefined code.
    pub fn glyphs(&self) -> &[Option<Glyph>] {
        match self {
            Font::Console(f) => f.glyphs(),
            Font::Big(f) => f.glyphs(),
            Font::ByteMap(f) => f.glyphs(),
        }
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs().iter().flatten().count()
    }

    /// First glyph drawing `ch`.
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        let code = u8::try_from(ch).ok()?;
        self.glyphs().iter().flatten().find(|g| g.code == code)
    }

    pub fn has_char(&self, ch: char) -> bool {
        self.glyph(ch).is_some()
    }

    pub fn transparent(&self) -> Rgb {
        match self {
            Font::Console(f) => f.transparent(),
            Font::Big(f) => f.transparent(),
            Font::ByteMap(f) => f.transparent(),
        }
    }

    /// Extent of the montage along x.
    pub fn total_width(&self) -> i32 {
        match self {
            Font::Console(f) => f.total_width(),
            Font::Big(f) => f.total_width(),
            Font::ByteMap(f) => f.total_width(),
        }
    }

    /// Extent of the montage along y.
    pub fn max_height(&self) -> i32 {
        match self {
            Font::Console(f) => f.max_height(),
            Font::Big(f) => f.max_height(),
            Font::ByteMap(f) => f.max_height(),
        }
    }

    /// Height of one line of typeset text.
    pub fn line_height(&self) -> i32 {
        match self {
            Font::Console(f) => f.cell_height() as i32,
            Font::Big(f) => f.max_height(),
            Font::ByteMap(f) => f.max_height(),
        }
    }

    /// Extra space between typeset characters.
    pub fn spacing(&self) -> i32 {
        match self {
            Font::Console(_) => 0,
            Font::Big(f) => f.kerning().unwrap_or(0) as i32,
            Font::ByteMap(f) => f.add_space(),
        }
    }

    /// The reason this font is unusable, if any.
    pub fn check(&self) -> Result<()> {
        match self {
            Font::Console(f) => f.check(),
            Font::Big(f) => f.check(),
            Font::ByteMap(f) => f.check(),
        }
    }

    pub fn validate(self) -> Result<ValidatedFont> {
        self.check()?;
        Ok(ValidatedFont(self))
    }
}

/// A font that passed [`Font::check`]. Only validated fonts are encoded or rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedFont(Font);

impl ValidatedFont {
    pub fn into_inner(self) -> Font {
        self.0
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        match &self.0 {
            Font::Console(f) => f.to_bytes(),
            Font::Big(f) => f.to_bytes(),
            Font::ByteMap(f) => f.to_bytes(),
        }
    }
}

impl Deref for ValidatedFont {
    type Target = Font;

    fn deref(&self) -> &Font {
        &self.0
    }
}

pub(crate) fn check_metrics(height: i64, colors: usize, glyphs: usize) -> Result<()> {
    if height <= 0 {
        Err(FontError::InvalidNonPositiveDimension)
    } else if colors == 0 {
        Err(FontError::EmptyPalette)
    } else if glyphs == 0 {
        Err(FontError::EmptyGlyphSet)
    } else if glyphs > MAX_GLYPHS {
        Err(FontError::TooManyGlyphs(glyphs))
    } else {
        Ok(())
    }
}
