use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use doomfont::{
    archive::load_fonts,
    bigfont::BigFontSettings,
    bmf::ByteMapSettings,
    convert::convert,
    import::{build_font, BuildSettings, ImportOptions},
    palette::{eight_bit_rgb, six_bit_rgb},
    Font, FontFormat, RenderOptions, Rgb, ValidatedFont,
};
use std::{
    fs,
    path::{Path, PathBuf},
};

mod png;

#[derive(Parser)]
#[command(name = "doomfont", about = "Doom engine bitmap font toolkit CLI")]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Inspect font metadata
    Inspect {
        #[arg(short, long)]
        font: PathBuf,
    },
    /// Render the glyph montage or a line of text to PNG
    Render {
        #[arg(short, long)]
        font: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        text: Option<String>,
        /// Fill the background instead of leaving it transparent
        #[arg(long)]
        opaque: bool,
        /// Background color as RRGGBB (implies --opaque)
        #[arg(long, value_parser = parse_rgb)]
        background: Option<Rgb>,
        #[arg(long, default_value_t = 1)]
        scale: u32,
    },
    /// Convert a font to another format
    Convert {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// fon1, fon2 or bmf
        #[arg(long)]
        to: FontFormat,
    },
    /// Build a font from a PNG glyph sheet laid out on a fixed grid
    Import {
        #[arg(short, long)]
        image: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        /// fon1, fon2 or bmf
        #[arg(long, default_value = "fon2")]
        format: FontFormat,
        #[arg(long)]
        cell_width: usize,
        #[arg(long)]
        cell_height: usize,
        #[arg(long, default_value_t = 16)]
        columns: usize,
        #[arg(long, default_value_t = 32)]
        first_char: u8,
        /// Number of cells to read; defaults to every full cell
        #[arg(long)]
        count: Option<usize>,
        /// Shrink each cell to its inked columns
        #[arg(long)]
        trim: bool,
        #[arg(long)]
        constant_width: bool,
        #[arg(long, allow_hyphen_values = true)]
        kerning: Option<i16>,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        add_space: i8,
        #[arg(long)]
        line_height: Option<u8>,
        #[arg(long, default_value = "")]
        info: String,
        /// Snap colors to a fixed palette first
        #[arg(long, value_enum)]
        palette: Option<PaletteSource>,
        /// Multiply partially transparent pixels by their alpha
        #[arg(long)]
        flatten_alpha: bool,
        /// Outline width in pixels
        #[arg(long)]
        outline: Option<usize>,
        #[arg(long, value_parser = parse_rgb, default_value = "202020")]
        outline_color: Rgb,
    },
    /// List the fonts inside a zip/pk3 package
    Pack {
        #[arg(short, long)]
        package: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaletteSource {
    SixBit,
    EightBit,
}

fn parse_rgb(s: &str) -> std::result::Result<Rgb, String> {
    let hex = s.trim_start_matches('#');
    if hex.len() != 6 {
        return Err(format!("expected RRGGBB, got {s:?}"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("bad color {s:?}: {e}"))
    };
    Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
}

fn load_font(path: &Path) -> Result<ValidatedFont> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Font::load(&bytes).with_context(|| format!("failed to load font {}", path.display()))
}

fn print_info(font: &Font) {
    println!("{} font", font.format());
    println!("  Characters: {}", font.glyph_count());
    let codes: Vec<u8> = font.glyphs().iter().flatten().map(|g| g.code).collect();
    if let (Some(lo), Some(hi)) = (codes.iter().min(), codes.iter().max()) {
        println!("  Codes: {lo}..={hi}");
    }
    match font {
        Font::Console(f) => println!("  Cell: {}x{}", f.cell_width(), f.cell_height()),
        Font::Big(f) => {
            println!("  Height: {}", f.height());
            if f.is_constant_width() {
                println!("  Constant width");
            }
            if let Some(k) = f.kerning() {
                println!("  Kerning: {k}");
            }
        }
        Font::ByteMap(f) => {
            let h = f.header();
            println!("  Version: {:#x}", h.version);
            println!("  Line height: {}", h.line_height);
            println!("  Add space: {}", h.add_space);
            if !f.info().is_empty() {
                println!("  Info: {}", f.info());
            }
        }
    }
    println!("  Palette: {} colors", font.palette().len());
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .try_init();

    match cli.command {
        Cmd::Inspect { font } => {
            let bytes = fs::read(&font)?;
            let decoded = Font::decode(&bytes)
                .with_context(|| format!("failed to decode {}", font.display()))?;
            print_info(&decoded);
            if let Err(e) = decoded.check() {
                println!("  Invalid: {e}");
            }
        }
        Cmd::Render {
            font,
            output,
            text,
            opaque,
            background,
            scale,
        } => {
            let f = load_font(&font)?;
            let options = RenderOptions {
                background: background.or(opaque.then_some(Rgb::BLACK)),
            };
            let raster = match text {
                Some(text) => f
                    .render_text(&text, &options)
                    .ok_or_else(|| anyhow!("nothing to render for empty text"))?,
                None => f.render(&options),
            };
            png::save(&raster, &output, scale.max(1))?;
            eprintln!(
                "Rendered {}x{} -> {}",
                raster.width(),
                raster.height(),
                output.display()
            );
        }
        Cmd::Convert { input, output, to } => {
            let source = load_font(&input)?;
            let from = source.format();
            let converted = convert(&source, to)?;
            fs::write(&output, converted.to_bytes())?;
            eprintln!("Converted {from} -> {to} -> {}", output.display());
        }
        Cmd::Import {
            image,
            output,
            format,
            cell_width,
            cell_height,
            columns,
            first_char,
            count,
            trim,
            constant_width,
            kerning,
            add_space,
            line_height,
            info,
            palette,
            flatten_alpha,
            outline,
            outline_color,
        } => {
            let mut sheet = png::load(&image)?;
            if let Some(width) = outline {
                sheet.outline(width, outline_color);
            }
            let grid = png::Grid {
                cell_width,
                cell_height,
                columns,
                first_char,
                count,
                trim,
            };
            let boxes = grid.boxes(&sheet)?;
            let settings = match format {
                FontFormat::Console => BuildSettings::Console,
                FontFormat::Big => BuildSettings::Big(BigFontSettings {
                    constant_width,
                    kerning,
                }),
                FontFormat::ByteMap => BuildSettings::ByteMap(ByteMapSettings {
                    info,
                    add_space,
                    line_height,
                    ..Default::default()
                }),
            };
            let options = ImportOptions {
                palette_source: palette.map(|p| match p {
                    PaletteSource::SixBit => six_bit_rgb().to_vec(),
                    PaletteSource::EightBit => eight_bit_rgb().to_vec(),
                }),
                flatten_alpha,
            };
            let font = build_font(&sheet, &boxes, &settings, &options)
                .with_context(|| format!("failed to build font from {}", image.display()))?;
            fs::write(&output, font.to_bytes())?;
            eprintln!(
                "Built {} font with {} characters -> {}",
                font.format(),
                font.glyph_count(),
                output.display()
            );
        }
        Cmd::Pack { package } => {
            let bytes = fs::read(&package)?;
            let fonts = load_fonts(&bytes)?;
            if fonts.is_empty() {
                println!("No fonts in {}", package.display());
            }
            for packed in &fonts {
                println!(
                    "{}: {} ({} characters)",
                    packed.name,
                    packed.font.format(),
                    packed.font.glyph_count()
                );
            }
        }
    }
    Ok(())
}
