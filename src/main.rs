//! glyphsheet - bitmap font atlas builder
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  Source tables (*.csv)                   │
//! │            ↓  extract                    │
//! │  Character list (sorted, unique)         │
//! │            ↓  compose                    │
//! │  Font chain: 10px → 12px → generic CJK   │
//! │            ↓                             │
//! │  Atlas PNG (9x9 cells, 100 per row)      │
//! └──────────────────────────────────────────┘
//! ```

mod charset;
mod config;
mod constants;
mod error;
mod font;
mod utils;

use anyhow::{anyhow, Context, Result};
use config::Config;
use error::GlyphsheetError;
use font::{AtlasComposer, FontChain, PixelFont};
use log::info;
use std::path::PathBuf;

/// Default target of --init-config
const DEFAULT_INIT_CONFIG_PATH: &str = "glyphsheet.toml";

fn print_help() {
    println!(
        r#"glyphsheet {} - bitmap font atlas builder

USAGE:
    glyphsheet [OPTIONS] <COMMAND>

COMMANDS:
    extract                 Collect unique characters from source tables
    compose                 Render the character list into the atlas image

OPTIONS:
    -h, --help              Print this help message
    -V, --version           Print version information
    -c, --config <PATH>     Use the given config file
    --init-config[=PATH]    Write the default config (default: glyphsheet.toml)
    -f, --force             Overwrite an existing config file

ENVIRONMENT:
    GLYPHSHEET_CONFIG       Config file path (when --config is not given)
    RUST_LOG                Log filter (default: info)

EXAMPLES:
    glyphsheet extract
    glyphsheet compose
    glyphsheet --config assets/glyphsheet.toml compose
    glyphsheet --init-config=assets/glyphsheet.toml --force
"#,
        env!("CARGO_PKG_VERSION")
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Extract,
    Compose,
}

/// Parsed command line
#[derive(Debug, Default, PartialEq)]
struct Args {
    help: bool,
    version: bool,
    force: bool,
    config: Option<PathBuf>,
    init_config: Option<PathBuf>,
    command: Option<Command>,
}

fn parse_args<I>(args: I) -> Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            "-V" | "--version" => parsed.version = true,
            "-f" | "--force" => parsed.force = true,
            "-c" | "--config" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow!("{} requires a path", arg))?;
                parsed.config = Some(PathBuf::from(path));
            }
            "--init-config" => {
                parsed.init_config = Some(PathBuf::from(DEFAULT_INIT_CONFIG_PATH));
            }
            "extract" | "compose" if parsed.command.is_some() => {
                return Err(anyhow!("only one command may be given"));
            }
            "extract" => parsed.command = Some(Command::Extract),
            "compose" => parsed.command = Some(Command::Compose),
            other => {
                if let Some(path) = other.strip_prefix("--config=") {
                    parsed.config = Some(PathBuf::from(path));
                } else if let Some(path) = other.strip_prefix("--init-config=") {
                    parsed.init_config = Some(PathBuf::from(path));
                } else {
                    return Err(anyhow!("unknown argument: {} (see --help)", other));
                }
            }
        }
    }

    Ok(parsed)
}

/// Step 1: source tables -> character list
fn run_extract(config: &Config) -> Result<()> {
    let output = config.charset_path();
    let set = charset::run_extraction(
        &config.paths.resources_dir,
        &config.paths.table_extension,
        &output,
    )?;

    println!("Successfully extracted {} unique characters", set.len());
    println!("Saved to: {}", output.display());
    Ok(())
}

/// Step 2: character list -> atlas image
fn run_compose(config: &Config) -> Result<()> {
    let charset_path = config.charset_path();
    let chars = charset::read_char_list(&charset_path)
        .with_context(|| "Cannot read character list (run `glyphsheet extract` first?)")?;
    info!("Total characters: {}", chars.len());

    let layout = config.grid.layout();
    if layout.checked_dimensions(chars.len()).is_none() {
        return Err(GlyphsheetError::InvalidConfig(format!(
            "{} characters do not fit in one image with this grid",
            chars.len()
        ))
        .into());
    }

    let fonts = &config.fonts;
    let primary = PixelFont::load(&config.resource(&fonts.primary), fonts.primary_size)?;
    let secondary = PixelFont::load(&config.resource(&fonts.secondary), fonts.secondary_size)?;
    let generic = PixelFont::load(&config.resource(&fonts.generic), fonts.generic_size)?;
    info!(
        "Font chain: {} -> {} -> {}",
        primary.name(),
        secondary.name(),
        generic.name()
    );

    let chain = FontChain::new(primary, secondary, generic, config.render.working_size);
    let composer = AtlasComposer::new(&chain, layout, config.render.alpha_threshold);
    let (image, report) = composer.compose(&chars);

    let output = config.output_path();
    font::save_png(&image, &output)?;

    println!("Total characters: {}", report.total());
    println!("Image size: {} x {}", image.width(), image.height());
    for line in report.summary() {
        println!("{}", line);
    }
    println!("Font atlas saved to: {}", output.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args(std::env::args().skip(1))?;

    // --help
    if args.help {
        print_help();
        return Ok(());
    }

    // --version
    if args.version {
        println!("glyphsheet {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Config file generation mode
    if let Some(path) = &args.init_config {
        Config::write_default_config(path, args.force)?;
        println!("Config file written: {}", path.display());
        return Ok(());
    }

    let Some(command) = args.command else {
        print_help();
        return Err(anyhow!("no command given"));
    };

    let config = Config::load(args.config.as_deref())?;

    match command {
        Command::Extract => run_extract(&config),
        Command::Compose => run_compose(&config),
    }
}
