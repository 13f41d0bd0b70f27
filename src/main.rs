use anyhow::{Context, Result, anyhow, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use vectorpaint::config::{Config, MAX_CANVAS_SIDE};
use vectorpaint::document::{DocumentOptions, LoadedDocument, load_document};
use vectorpaint::draw::color::parse_color;
use vectorpaint::draw::{Color, Frame, Point, RenderOptions, Surface, Texture, render_frame};
use vectorpaint::fill::{FillSource, flood_fill};

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VECTORPAINT_GIT_HASH"),
    ", ",
    env!("VECTORPAINT_BUILD_PROFILE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "vectorpaint")]
#[command(
    version,
    long_version = LONG_VERSION,
    about = "Rasterize, fill and clip 2D vector drawings"
)]
struct Cli {
    /// Use this config file instead of ~/.config/vectorpaint/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a document to a PNG image
    Render {
        /// Document to render
        document: PathBuf,
        #[command(flatten)]
        canvas: CanvasArgs,
        /// Draw every outline antialiased
        #[arg(long, action = ArgAction::SetTrue)]
        antialias: bool,
        /// Draw vertex and edge-midpoint handles
        #[arg(long, action = ArgAction::SetTrue)]
        handles: bool,
    },

    /// Render a document, then flood-fill the region under a seed pixel
    Fill {
        /// Document to render
        document: PathBuf,
        /// Seed pixel as X,Y
        #[arg(long, value_parser = parse_seed)]
        seed: Point,
        /// Fill color (#rrggbb or a palette name)
        #[arg(
            long,
            value_parser = parse_fill_color,
            conflicts_with = "texture",
            required_unless_present = "texture"
        )]
        color: Option<Color>,
        /// Image tiled across the filled region
        #[arg(long, value_name = "IMAGE")]
        texture: Option<PathBuf>,
        #[command(flatten)]
        canvas: CanvasArgs,
    },

    /// Clip shape SOURCE against convex shape CLIP and print the visible segments
    Clip {
        /// Document holding both shapes
        document: PathBuf,
        /// 0-based index of the line or polygon to clip
        #[arg(long)]
        source: usize,
        /// 0-based index of the convex clip polygon or rectangle
        #[arg(long)]
        clip: usize,
        /// Print segments as JSON
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },

    /// Validate a document and report malformed lines
    Check {
        /// Document to validate
        document: PathBuf,
    },

    /// Write the commented example config to the config directory
    InitConfig,
}

#[derive(Args, Debug)]
struct CanvasArgs {
    /// Output PNG path
    #[arg(short, long, value_name = "PNG")]
    output: PathBuf,
    /// Canvas width (defaults to the configured width, at most 16384)
    #[arg(long)]
    width: Option<u32>,
    /// Canvas height (defaults to the configured height, at most 16384)
    #[arg(long)]
    height: Option<u32>,
}

fn parse_seed(text: &str) -> Result<Point, String> {
    let (x, y) = text
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{text}'"))?;
    let x = x.trim().parse().map_err(|_| format!("invalid x '{x}'"))?;
    let y = y.trim().parse().map_err(|_| format!("invalid y '{y}'"))?;
    Ok(Point::new(x, y))
}

fn parse_fill_color(text: &str) -> Result<Color, String> {
    parse_color(text).ok_or_else(|| format!("unknown color '{text}'"))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::get_config_path()?,
    };

    let config = match cli.command {
        Command::InitConfig => Config::default(),
        _ => Config::load_from(&config_path)?,
    };

    match cli.command {
        Command::InitConfig => {
            Config::create_default_file(&config_path)?;
            println!("Wrote default config to {}", config_path.display());
        }
        Command::Render {
            document,
            canvas,
            antialias,
            handles,
        } => {
            let mut frame = load_frame(&document, &config)?;
            if antialias {
                frame.set_antialiasing_all(true);
            }
            let mut options = RenderOptions::from_config(&config);
            options.show_handles |= handles;

            let surface = render_to_surface(&frame, &canvas, &config, &options);
            surface.save_png(&canvas.output)?;
            println!(
                "Rendered {} shapes to {}",
                frame.len(),
                canvas.output.display()
            );
        }
        Command::Fill {
            document,
            seed,
            color,
            texture,
            canvas,
        } => {
            let frame = load_frame(&document, &config)?;
            let mut surface =
                render_to_surface(&frame, &canvas, &config, &RenderOptions::from_config(&config));

            let texture = texture.map(Texture::load).transpose()?;
            let source = match (&texture, color) {
                (Some(texture), _) => FillSource::Texture(texture),
                (None, Some(color)) => FillSource::Solid(color),
                (None, None) => bail!("either --color or --texture is required"),
            };

            match flood_fill(&mut surface, seed, source) {
                Some(painted) => println!("Filled {} pixels from ({},{})", painted, seed.x, seed.y),
                None => log::warn!(
                    "Seed ({},{}) is outside the {}x{} canvas; nothing filled",
                    seed.x,
                    seed.y,
                    surface.width(),
                    surface.height()
                ),
            }
            surface.save_png(&canvas.output)?;
        }
        Command::Clip {
            document,
            source,
            clip,
            json,
        } => {
            let mut frame = load_frame(&document, &config)?;
            let source_id = frame
                .id_at(source)
                .ok_or_else(|| anyhow!("document has no shape at index {source}"))?;
            let clip_id = frame
                .id_at(clip)
                .ok_or_else(|| anyhow!("document has no shape at index {clip}"))?;
            frame
                .add_clip_pair(source_id, clip_id)
                .with_context(|| format!("cannot clip shape {source} against shape {clip}"))?;

            let segments: Vec<(Point, Point)> = frame.clipped_segments().collect();
            if json {
                let payload = serde_json::json!({
                    "source": source,
                    "clip": clip,
                    "segments": segments,
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else if segments.is_empty() {
                println!("No visible segments");
            } else {
                for (start, end) in segments {
                    println!("({},{}) -> ({},{})", start.x, start.y, end.x, end.y);
                }
            }
        }
        Command::Check { document } => {
            let loaded = read_document(&document, &config)?;
            println!("{} shapes", loaded.shapes.len());
            if loaded.compressed {
                println!("compressed: yes");
            }
            if loaded.truncated > 0 {
                println!("{} shapes beyond the limit were dropped", loaded.truncated);
            }
            if !loaded.skipped_lines.is_empty() {
                let lines: Vec<String> = loaded
                    .skipped_lines
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                println!(
                    "{} malformed lines skipped: {}",
                    lines.len(),
                    lines.join(", ")
                );
            }
        }
    }

    Ok(())
}

fn read_document(path: &Path, config: &Config) -> Result<LoadedDocument> {
    let options = DocumentOptions::from_config(&config.document);
    load_document(path, &options)?
        .ok_or_else(|| anyhow!("document {} exceeds the size limit", path.display()))
}

/// Loads a document into a frame, applying the configured thickness and antialiasing.
fn load_frame(path: &Path, config: &Config) -> Result<Frame> {
    let loaded = read_document(path, config)?;
    for line in &loaded.skipped_lines {
        log::warn!("{}:{}: skipped malformed shape", path.display(), line);
    }

    let mut frame = Frame::with_clipping(config.clipping_manager());
    for mut shape in loaded.shapes {
        let style = shape.style_mut();
        style.thickness = config.drawing.default_thickness;
        style.antialiasing = config.drawing.antialiasing;
        frame.add_shape(shape);
    }
    Ok(frame)
}

fn render_to_surface(
    frame: &Frame,
    canvas: &CanvasArgs,
    config: &Config,
    options: &RenderOptions,
) -> Surface {
    let width = canvas_side("width", canvas.width.unwrap_or(config.canvas.width));
    let height = canvas_side("height", canvas.height.unwrap_or(config.canvas.height));
    let mut surface = Surface::new(width, height, options.background);
    render_frame(frame, &mut surface, options);
    surface
}

fn canvas_side(name: &str, side: u32) -> u32 {
    if !(1..=MAX_CANVAS_SIDE).contains(&side) {
        log::warn!(
            "Canvas {} {} is out of range, clamping to 1-{}",
            name,
            side,
            MAX_CANVAS_SIDE
        );
    }
    side.clamp(1, MAX_CANVAS_SIDE)
}
