//! Fonts stored inside zip/pk3 packages.
use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::{font::ValidatedFont, Font, FontError, Result};

/// Declared entry sizes are untrusted; larger entries grow the buffer as read.
const MAX_PREALLOC: u64 = 1 << 20;

/// A font found in a package together with its entry path.
#[derive(Clone, Debug)]
pub struct PackedFont {
    pub name: String,
    pub font: ValidatedFont,
}

fn is_font_entry(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".lmp") || lower.ends_with(".bmf")
}

/// Decode every `.lmp`/`.bmf` entry of a package. Entries that are not
/// valid fonts are skipped.
pub fn load_fonts(bytes: &[u8]) -> Result<Vec<PackedFont>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| FontError::Archive(format!("zip open error: {e}")))?;
    let mut fonts = Vec::new();
    for i in 0..archive.len() {
        let mut file = archive
            .by_index(i)
            .map_err(|e| FontError::Archive(format!("zip entry error: {e}")))?;
        if !file.is_file() || !is_font_entry(file.name()) {
            continue;
        }
        let name = file.name().to_string();
        let mut buf = Vec::with_capacity(file.size().min(MAX_PREALLOC) as usize);
        file.read_to_end(&mut buf)?;
        match Font::load(&buf) {
            Ok(font) => fonts.push(PackedFont { name, font }),
            Err(e) => log::warn!("skipping {name}: {e}"),
        }
    }
    Ok(fonts)
}
