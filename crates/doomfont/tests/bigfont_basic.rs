use doomfont::{
    import::{build_font, BuildSettings, GlyphBox, ImportOptions},
    bigfont::BigFontSettings,
    test_support::{fill_rect, fon2_bytes, Fon2Glyph, Fon2Spec},
    Font, FontError, Raster, Rgb,
};
use pretty_assertions::assert_eq;

const RED: Rgb = Rgb::new(255, 0, 0);
const GREEN: Rgb = Rgb::new(0, 255, 0);

fn abc_spec() -> Fon2Spec {
    Fon2Spec {
        height: 2,
        first_char: b'A',
        constant_width: false,
        kerning: None,
        palette: vec![Rgb::TRANSPARENT, RED, GREEN],
        glyphs: vec![
            Fon2Glyph {
                width: 3,
                data: vec![1, 1, 1, 0, 2, 0],
            },
            Fon2Glyph {
                width: 0,
                data: Vec::new(),
            },
            Fon2Glyph {
                width: 2,
                data: vec![2, 2, 1, 1],
            },
        ],
    }
}

#[test]
fn zero_width_slots_are_holes() {
    let font = Font::load(&fon2_bytes(&abc_spec())).unwrap();
    let Font::Big(big) = &*font else {
        panic!("expected a big font");
    };
    assert_eq!(big.first_char(), b'A');
    assert_eq!(big.last_char(), b'C');
    assert_eq!(font.glyphs().len(), 3);
    assert!(font.glyphs()[1].is_none());
    assert!(!font.has_char('B'));
    assert_eq!(font.glyph('A').unwrap().offset, 0);
    assert_eq!(font.glyph('C').unwrap().offset, 3);
    assert_eq!(font.total_width(), 5);
    assert_eq!(font.max_height(), 2);
    assert_eq!(font.transparent(), Rgb::TRANSPARENT);
}

#[test]
fn kerning_is_signed() {
    let mut spec = abc_spec();
    spec.kerning = Some(-2);
    let font = Font::load(&fon2_bytes(&spec)).unwrap();
    let Font::Big(big) = &*font else {
        panic!("expected a big font");
    };
    assert_eq!(big.kerning(), Some(-2));
    assert_eq!(font.spacing(), -2);
}

#[test]
fn big_font_round_trip_is_byte_identical() {
    let mut spec = abc_spec();
    spec.kerning = Some(1);
    let bytes = fon2_bytes(&spec);
    assert_eq!(Font::load(&bytes).unwrap().to_bytes(), bytes);
}

#[test]
fn literal_run_past_glyph_overflows() {
    let mut bytes = b"FON2".to_vec();
    bytes.extend(1u16.to_le_bytes());
    bytes.extend([b'A', b'A', 0, 0, 0, 0]);
    bytes.extend(2u16.to_le_bytes());
    bytes.extend([0, 0, 0]);
    bytes.extend([5, 1, 1, 1, 1, 1, 1]);
    let err = Font::load(&bytes).unwrap_err();
    assert!(matches!(
        err,
        FontError::CharacterOverflow {
            code: b'A',
            run: 6,
            remaining: 2
        }
    ));
}

#[test]
fn last_before_first_means_no_glyphs() {
    let mut bytes = b"FON2".to_vec();
    bytes.extend(4u16.to_le_bytes());
    bytes.extend([b'B', b'A', 0, 0, 0, 0]);
    bytes.extend([0, 0, 0]);
    let font = Font::decode(&bytes).unwrap();
    assert_eq!(font.glyphs().len(), 0);
    assert!(matches!(font.validate(), Err(FontError::EmptyGlyphSet)));
}

#[test]
fn zero_height_big_font_is_rejected() {
    let spec = Fon2Spec {
        height: 0,
        first_char: b'a',
        constant_width: false,
        kerning: None,
        palette: vec![Rgb::TRANSPARENT],
        glyphs: vec![Fon2Glyph {
            width: 4,
            data: Vec::new(),
        }],
    };
    assert!(matches!(
        Font::load(&fon2_bytes(&spec)),
        Err(FontError::InvalidNonPositiveDimension)
    ));
}

#[test]
fn constant_width_applies_to_every_glyph() {
    let spec = Fon2Spec {
        height: 1,
        first_char: b'0',
        constant_width: true,
        kerning: None,
        palette: vec![Rgb::TRANSPARENT, RED],
        glyphs: (0..3)
            .map(|i| Fon2Glyph {
                width: 4,
                data: vec![1, 0, i, 0],
            })
            .collect(),
    };
    let bytes = fon2_bytes(&spec);
    let font = Font::load(&bytes).unwrap();
    assert_eq!(font.glyph_count(), 3);
    assert!(font.glyphs().iter().flatten().all(|g| g.width() == 4));
    assert_eq!(font.glyph('2').unwrap().offset, 8);
    assert_eq!(font.to_bytes(), bytes);
}

#[test]
fn duplicate_palette_entries_are_merged() {
    let spec = Fon2Spec {
        height: 1,
        first_char: b'x',
        constant_width: false,
        kerning: None,
        palette: vec![Rgb::TRANSPARENT, RED, RED, GREEN],
        glyphs: vec![Fon2Glyph {
            width: 4,
            data: vec![0, 1, 2, 3],
        }],
    };
    let font = Font::load(&fon2_bytes(&spec)).unwrap();
    assert_eq!(font.palette().colors(), &[Rgb::TRANSPARENT, RED, GREEN]);
    assert_eq!(font.glyph('x').unwrap().data(), &[0, 1, 1, 2]);
}

#[test]
fn constant_width_import_writes_one_width() {
    let mut raster = Raster::new(24, 8);
    let mut boxes = Vec::new();
    for i in 0..4 {
        fill_rect(&mut raster, i * 6 + 1, 1, 4, 5, RED);
        boxes.push(GlyphBox::new(b'a' + i as u8, i as i32 * 6, 0, 6, 8));
    }
    let settings = BuildSettings::Big(BigFontSettings {
        constant_width: true,
        kerning: None,
    });
    let font = build_font(&raster, &boxes, &settings, &ImportOptions::default()).unwrap();
    let bytes = font.to_bytes();
    assert_eq!(&bytes[..4], b"FON2");
    assert_eq!(bytes[8], 1);
    // kerning flag clear, so the shared width follows immediately
    assert_eq!(bytes[11], 0);
    assert_eq!(&bytes[12..14], &[6, 0]);
    let reloaded = Font::load(&bytes).unwrap();
    assert_eq!(reloaded.glyph_count(), 4);
    assert_eq!(reloaded.glyph('d').unwrap().offset, 18);
}

#[test]
fn constant_width_import_pads_narrow_glyphs() {
    let mut raster = Raster::new(10, 4);
    fill_rect(&mut raster, 0, 0, 5, 4, GREEN);
    fill_rect(&mut raster, 6, 0, 2, 2, GREEN);
    let boxes = [
        GlyphBox::new(b'W', 0, 0, 5, 4),
        GlyphBox::new(b'Y', 6, 0, 2, 2),
    ];
    let settings = BuildSettings::Big(BigFontSettings {
        constant_width: true,
        kerning: Some(3),
    });
    let font = build_font(&raster, &boxes, &settings, &ImportOptions::default()).unwrap();
    // 'X' fills the hole between W and Y
    assert_eq!(font.glyphs().len(), 3);
    let x = font.glyph('X').unwrap();
    assert_eq!((x.width(), x.height()), (5, 4));
    assert!(x.data().iter().all(|&p| p == 0));
    let y = font.glyph('Y').unwrap();
    assert_eq!((y.width(), y.height()), (5, 4));
    assert_eq!(y.pixel(1, 1), Some(1));
    assert_eq!(y.pixel(2, 0), Some(0));
    assert_eq!(font.spacing(), 3);
}

#[test]
fn huge_declared_glyph_with_tiny_payload_is_truncated() {
    let mut bytes = b"FON2".to_vec();
    bytes.extend(u16::MAX.to_le_bytes());
    bytes.extend([b'A', b'A', 0, 0, 0, 0]);
    bytes.extend(u16::MAX.to_le_bytes());
    bytes.extend([0, 0, 0]);
    // literal run of 128 with no bytes behind it
    bytes.push(0x7F);
    assert_eq!(bytes.len(), 18);
    assert!(matches!(
        Font::load(&bytes),
        Err(FontError::Truncated { .. })
    ));
}
