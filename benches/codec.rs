//! Codec throughput: RLE packing plus full decode/encode of synthetic fonts.
//!
//! Fonts are built in memory with the test support builders, so no data
//! files are needed.

use criterion::{criterion_group, criterion_main, Criterion};
use doomfont::{
    convert::convert,
    rle,
    test_support::{bmf_bytes, fon1_bytes, fon2_bytes, BmfGlyph, BmfSpec, Fon2Glyph, Fon2Spec},
    Font, FontFormat, RenderOptions, Rgb,
};
use std::hint::black_box;

/// Glyph rows with short runs, roughly what antialiased text looks like.
fn glyph_pixels(code: u8, len: usize) -> Vec<u8> {
    (0..len)
        .map(|i| {
            if (i / 3 + code as usize) % 4 == 0 {
                0
            } else {
                (code as usize + i / 5) as u8 % 16 + 1
            }
        })
        .collect()
}

fn big_font_bytes() -> Vec<u8> {
    let height = 24;
    let palette = (0..17u8)
        .map(|i| if i == 0 { Rgb::TRANSPARENT } else { Rgb::gray(i * 15) })
        .collect();
    let glyphs = (0..95u8)
        .map(|i| {
            let width = 8 + (i % 9) as u16;
            Fon2Glyph {
                width,
                data: glyph_pixels(i, width as usize * height),
            }
        })
        .collect();
    fon2_bytes(&Fon2Spec {
        height: height as u16,
        first_char: b' ',
        constant_width: false,
        kerning: Some(1),
        palette,
        glyphs,
    })
}

fn bmf_font_bytes() -> Vec<u8> {
    let glyphs = (0..95u8)
        .map(|i| {
            let (width, height) = (6 + i % 7, 12);
            BmfGlyph {
                data: glyph_pixels(i, width as usize * height as usize),
                ..BmfGlyph::solid(b' ' + i, width, height, 1)
            }
        })
        .collect();
    bmf_bytes(&BmfSpec {
        line_height: 14,
        add_space: 1,
        size_inner: 0,
        palette: (1..17u8).map(|i| [i * 3, i * 2, 63 - i]).collect(),
        info: "bench".to_string(),
        glyphs,
    })
}

fn bench_rle(c: &mut Criterion) {
    let data = glyph_pixels(7, 64 * 1024);
    let packed = rle::pack(&data);
    c.bench_function("rle_pack_64k", |b| b.iter(|| rle::pack(black_box(&data))));
    c.bench_function("rle_unpack_64k", |b| {
        b.iter(|| rle::unpack(black_box(&packed), data.len()))
    });
}

fn bench_fonts(c: &mut Criterion) {
    let console = fon1_bytes(8, 8, |code| glyph_pixels(code, 64));
    let big = big_font_bytes();
    let bmf = bmf_font_bytes();

    for (name, bytes) in [("fon1", &console), ("fon2", &big), ("bmf", &bmf)] {
        c.bench_function(&format!("load_{name}"), |b| {
            b.iter(|| Font::load(black_box(bytes)))
        });
        let Ok(font) = Font::load(bytes) else {
            panic!("{name} sample does not load");
        };
        c.bench_function(&format!("encode_{name}"), |b| {
            b.iter(|| black_box(font.to_bytes()))
        });
        c.bench_function(&format!("render_{name}"), |b| {
            b.iter(|| black_box(font.render(&RenderOptions::transparent())))
        });
    }

    if let Ok(font) = Font::load(&big) {
        c.bench_function("convert_fon2_to_bmf", |b| {
            b.iter(|| convert(black_box(&font), FontFormat::ByteMap))
        });
    }
}

criterion_group!(benches, bench_rle, bench_fonts);
criterion_main!(benches);
