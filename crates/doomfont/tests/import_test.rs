use doomfont::{
    bmf::ByteMapSettings,
    import::{build_font, quantize, BuildSettings, GlyphBox, ImportOptions},
    palette::PAL_HARD_CAP,
    test_support::{fill_rect, ink_rows},
    Font, FontError, GlyphMetrics, Raster, Rgb,
};
use pretty_assertions::assert_eq;

const RED: Rgb = Rgb::new(255, 0, 0);
const BLUE: Rgb = Rgb::new(0, 0, 255);

#[test]
fn two_color_sheet_for_three_glyphs() {
    // foreground on an opaque black background
    let mut raster = Raster::filled(9, 3, [0, 0, 0, 255]);
    fill_rect(&mut raster, 0, 0, 2, 3, RED);
    fill_rect(&mut raster, 3, 1, 3, 1, RED);
    fill_rect(&mut raster, 7, 0, 1, 3, RED);
    let boxes = [
        GlyphBox::new(b'A', 0, 0, 3, 3),
        GlyphBox::new(b'B', 3, 0, 3, 3),
        GlyphBox::new(b'C', 6, 0, 3, 3),
    ];
    let imported = quantize(&raster, &boxes, Rgb::TRANSPARENT, &ImportOptions::default());
    assert_eq!(
        imported.palette.colors(),
        &[Rgb::TRANSPARENT, RED, Rgb::UNUSED]
    );
    assert_eq!(imported.glyphs.len(), 3);
    assert!(imported
        .glyphs
        .iter()
        .all(|g| g.data().iter().all(|&i| i <= 1)));
    assert_eq!(imported.glyphs[0].data(), &[1, 1, 0, 1, 1, 0, 1, 1, 0]);
    assert_eq!(imported.glyphs[1].data(), &[0, 0, 0, 1, 1, 1, 0, 0, 0]);
    assert_eq!(imported.glyphs[2].data(), &[0, 1, 0, 0, 1, 0, 0, 1, 0]);
}

#[test]
fn black_and_invisible_pixels_are_skipped() {
    let mut raster = Raster::new(3, 1);
    raster.put_color(0, 0, Rgb::BLACK);
    raster.put(1, 0, [255, 0, 0, 0]);
    let imported = quantize(
        &raster,
        &[GlyphBox::new(b'.', 0, 0, 3, 1)],
        Rgb::TRANSPARENT,
        &ImportOptions::default(),
    );
    assert_eq!(imported.glyphs[0].data(), &[0, 0, 0]);
    assert_eq!(imported.palette.colors(), &[Rgb::TRANSPARENT, Rgb::UNUSED]);
}

#[test]
fn boxes_outside_the_raster_stay_blank() {
    let raster = Raster::filled(2, 2, [9, 9, 9, 255]);
    let imported = quantize(
        &raster,
        &[GlyphBox::new(b'q', 1, -1, 2, 2)],
        Rgb::TRANSPARENT,
        &ImportOptions::default(),
    );
    assert_eq!(imported.glyphs[0].data(), &[0, 0, 1, 0]);
}

#[test]
fn palette_overflow_uses_nearest_color() {
    let mut raster = Raster::new(300, 1);
    for i in 0..300 {
        raster.put_color(i, 0, Rgb::new((i % 250) as u8 + 1, (i / 250) as u8 + 1, 7));
    }
    let imported = quantize(
        &raster,
        &[GlyphBox::new(b'#', 0, 0, 300, 1)],
        Rgb::TRANSPARENT,
        &ImportOptions::default(),
    );
    assert_eq!(imported.palette.len(), PAL_HARD_CAP);
    assert_eq!(imported.palette.get(255), Some(Rgb::UNUSED));
    let glyph = &imported.glyphs[0];
    // 254 colors fit after the transparent slot
    for x in 0..254 {
        assert_eq!(glyph.pixel(x, 0), Some(x as u8 + 1));
    }
    assert!(glyph.data().iter().all(|&i| i < 255));
    let late = glyph.pixel(299, 0).unwrap();
    let wanted = Rgb::new(50, 2, 7);
    assert_eq!(
        imported.palette.get(late),
        imported.palette.colors()[..255]
            .iter()
            .copied()
            .min_by_key(|c| wanted.distance(*c))
    );
}

#[test]
fn palette_source_snaps_colors() {
    let mut raster = Raster::new(2, 1);
    raster.put_color(0, 0, Rgb::new(250, 10, 10));
    raster.put_color(1, 0, Rgb::new(5, 5, 240));
    let options = ImportOptions {
        palette_source: Some(vec![RED, BLUE]),
        ..Default::default()
    };
    let imported = quantize(
        &raster,
        &[GlyphBox::new(b'a', 0, 0, 2, 1)],
        Rgb::TRANSPARENT,
        &options,
    );
    assert_eq!(
        imported.palette.colors(),
        &[Rgb::TRANSPARENT, RED, BLUE, Rgb::UNUSED]
    );
}

#[test]
fn flatten_alpha_scales_partial_pixels() {
    let mut raster = Raster::new(1, 1);
    raster.put(0, 0, [200, 200, 200, 128]);
    let boxes = [GlyphBox::new(b'a', 0, 0, 1, 1)];
    let flat = quantize(
        &raster,
        &boxes,
        Rgb::TRANSPARENT,
        &ImportOptions {
            flatten_alpha: true,
            ..Default::default()
        },
    );
    assert_eq!(flat.palette.get(1), Some(Rgb::gray(100)));
    let raw = quantize(&raster, &boxes, Rgb::TRANSPARENT, &ImportOptions::default());
    assert_eq!(raw.palette.get(1), Some(Rgb::gray(200)));
}

#[test]
fn console_build_stores_luma() {
    let mut raster = Raster::new(3, 2);
    fill_rect(&mut raster, 0, 0, 2, 2, Rgb::new(200, 100, 50));
    raster.put_color(2, 0, Rgb::new(200, 100, 50));
    let boxes = [
        GlyphBox::new(b'A', 0, 0, 2, 2),
        GlyphBox::new(b'B', 2, 0, 1, 1),
    ];
    let font = build_font(
        &raster,
        &boxes,
        &BuildSettings::Console,
        &ImportOptions::default(),
    )
    .unwrap();
    assert_eq!(font.glyph_count(), 256);
    let b = font.glyph('B').unwrap();
    assert_eq!((b.width(), b.height()), (2, 2));
    assert_eq!(b.data(), &[1, 0, 0, 0]);

    let reloaded = Font::load(&font.to_bytes()).unwrap();
    let a = reloaded.glyph('A').unwrap();
    let index = a.pixel(0, 0).unwrap();
    assert_eq!(reloaded.palette().get(index), Some(Rgb::gray(117)));
    assert!(reloaded.glyph('Z').unwrap().data().iter().all(|&p| p == 0));
}

#[test]
fn bmf_build_defaults_metrics() {
    let mut raster = Raster::new(8, 6);
    fill_rect(&mut raster, 0, 0, 3, 5, BLUE);
    fill_rect(&mut raster, 4, 0, 2, 6, RED);
    let mut tall = GlyphBox::new(b'j', 4, 0, 2, 6);
    tall.metrics = Some(GlyphMetrics {
        rel_x: -1,
        rel_y: 2,
        shift: 1,
    });
    let boxes = [GlyphBox::new(b'i', 0, 0, 3, 5), tall];
    let settings = BuildSettings::ByteMap(ByteMapSettings {
        info: "made here".to_string(),
        add_space: 2,
        ..Default::default()
    });
    let font = build_font(&raster, &boxes, &settings, &ImportOptions::default()).unwrap();
    let Font::ByteMap(bmf) = &*font else {
        panic!("expected a byte-map font");
    };
    assert_eq!(bmf.header().line_height, 6);
    assert_eq!(bmf.header().colors, 3);
    assert_eq!(bmf.info(), "made here");
    assert_eq!(
        font.glyph('i').unwrap().metrics,
        Some(GlyphMetrics {
            rel_x: 0,
            rel_y: 0,
            shift: 3
        })
    );
    assert_eq!(font.glyph('j').unwrap().metrics.unwrap().rel_y, 2);
    assert_eq!(font.glyph('j').unwrap().offset, 5);

    let reloaded = Font::load(&font.to_bytes()).unwrap();
    assert_eq!(reloaded.glyph_count(), 2);
    assert_eq!(reloaded.palette().get(1), Some(BLUE));
}

#[test]
fn oversized_bmf_glyph_is_rejected() {
    let raster = Raster::new(1, 1);
    let settings = BuildSettings::ByteMap(ByteMapSettings::default());
    let err = build_font(
        &raster,
        &[GlyphBox::new(b'w', 0, 0, 300, 1)],
        &settings,
        &ImportOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        FontError::GlyphTooLarge {
            width: 300,
            height: 1
        }
    ));
}

#[test]
fn no_boxes_means_no_font() {
    let raster = Raster::new(4, 4);
    let err = build_font(
        &raster,
        &[],
        &BuildSettings::ByteMap(ByteMapSettings {
            line_height: Some(4),
            ..Default::default()
        }),
        &ImportOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, FontError::EmptyGlyphSet));
}

#[test]
fn outline_surrounds_ink() {
    let mut raster = Raster::new(5, 5);
    raster.put_color(2, 2, RED);
    raster.outline(1, BLUE);
    assert_eq!(
        ink_rows(&raster),
        vec![".....", ".###.", ".###.", ".###.", "....."]
    );
    assert_eq!(raster.get(2, 2), Some([255, 0, 0, 255]));
    assert_eq!(raster.get(1, 1), Some([0, 0, 255, 255]));
}
