use thiserror::Error;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("unrecognized font format")]
    UnrecognizedFormat,
    #[error("negative or zero font height")]
    InvalidNonPositiveDimension,
    #[error("font has no colors")]
    EmptyPalette,
    #[error("font has no characters")]
    EmptyGlyphSet,
    #[error("font has over 256 characters ({0})")]
    TooManyGlyphs(usize),
    #[error("character overflow in glyph {code}: run of {run} exceeds {remaining} pixels left")]
    CharacterOverflow {
        code: u8,
        run: usize,
        remaining: usize,
    },
    #[error("glyph of {width}x{height} does not fit the format")]
    GlyphTooLarge { width: usize, height: usize },
    #[error("truncated data: {what} at offset {offset}")]
    Truncated { what: &'static str, offset: usize },
    #[error("archive error: {0}")]
    Archive(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FontError>;
