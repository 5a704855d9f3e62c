use doomfont::{
    convert::convert,
    test_support::{fon2_bytes, Fon2Glyph, Fon2Spec},
    Font, FontFormat, RenderOptions, Rgb,
};

fn main() {
    // Build a tiny FON2 font in memory
    let bytes = fon2_bytes(&Fon2Spec {
        height: 3,
        first_char: b'H',
        constant_width: false,
        kerning: Some(1),
        palette: vec![Rgb::TRANSPARENT, Rgb::new(220, 180, 40)],
        glyphs: vec![
            Fon2Glyph {
                width: 3,
                data: vec![1, 0, 1, 1, 1, 1, 1, 0, 1],
            },
            Fon2Glyph {
                width: 1,
                data: vec![1, 1, 1],
            },
        ],
    });
    let font = Font::load(&bytes).unwrap();
    println!(
        "{}: {} glyphs, {} colors",
        font.format(),
        font.glyph_count(),
        font.palette().len()
    );

    let text = font.render_text("HI", &RenderOptions::opaque()).unwrap();
    for row in text.pixels().chunks(text.width()) {
        let line: String = row
            .iter()
            .map(|p| if p[..3] == [0, 0, 0] { ' ' } else { '#' })
            .collect();
        println!("{line}");
    }

    // Same glyphs as a byte-map font
    let bmf = convert(&font, FontFormat::ByteMap).unwrap();
    let encoded = bmf.to_bytes();
    let reloaded = Font::load(&encoded).unwrap();
    println!("\nBMF: {} bytes, reloads as {}", encoded.len(), reloaded.format());
}
