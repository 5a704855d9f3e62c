//! Packbits-style run-length coding shared by FON1 and FON2 glyph data.
//!
//! A signed control byte `n` precedes each run:
//! - `0..=127`: `n + 1` literal bytes follow.
//! - `-127..=-1`: the next byte is repeated `1 - n` times.
//! - `-128`: no-op.
use crate::cursor::ByteReader;
use crate::error::{FontError, Result};

const MAX_RUN: usize = 128;

/// Decode exactly `len` bytes of glyph `code` from `reader`.
///
/// A run longer than the bytes still owed to the glyph is corruption and
/// yields [`FontError::CharacterOverflow`].
pub(crate) fn decode(reader: &mut ByteReader<'_>, len: usize, code: u8) -> Result<Vec<u8>> {
    // Each control byte yields at most MAX_RUN bytes; do not trust `len` alone.
    let mut out = Vec::with_capacity(len.min(reader.remaining().saturating_mul(MAX_RUN)));
    while out.len() < len {
        let remaining = len - out.len();
        let ctrl = reader.i8("rle control byte")?;
        if ctrl >= 0 {
            let run = ctrl as usize + 1;
            if run > remaining {
                return Err(FontError::CharacterOverflow {
                    code,
                    run,
                    remaining,
                });
            }
            out.extend_from_slice(reader.bytes(run, "rle literal run")?);
        } else if ctrl != -128 {
            let run = (-(ctrl as isize)) as usize + 1;
            if run > remaining {
                return Err(FontError::CharacterOverflow {
                    code,
                    run,
                    remaining,
                });
            }
            let value = reader.u8("rle repeat value")?;
            out.resize(out.len() + run, value);
        }
    }
    Ok(out)
}

/// Decode a standalone buffer holding one compressed glyph of `len` bytes.
pub fn unpack(data: &[u8], len: usize) -> Result<Vec<u8>> {
    decode(&mut ByteReader::new(data), len, 0)
}

/// Compress `data`, greedily preferring repeat runs of two or more equal bytes.
pub fn pack(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / MAX_RUN + 1);
    let mut i = 0;
    while i < data.len() {
        let run = repeat_len(data, i);
        if run >= 2 {
            out.push((1 - run as isize) as i8 as u8);
            out.push(data[i]);
            i += run;
            continue;
        }
        let start = i;
        while i < data.len() && i - start < MAX_RUN && repeat_len(data, i) < 2 {
            i += 1;
        }
        out.push((i - start - 1) as u8);
        out.extend_from_slice(&data[start..i]);
    }
    out
}

fn repeat_len(data: &[u8], start: usize) -> usize {
    let value = data[start];
    data[start..]
        .iter()
        .take(MAX_RUN)
        .take_while(|&&b| b == value)
        .count()
}
