use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use painterly::brush::{scaled_stencil, soft_stencil};
use painterly::io::{read_image, write_image, write_scalar_map};
use painterly::pipeline::{self, Painting};
use painterly::{Image, PaintConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};

#[derive(Parser)]
struct Args {
    target: PathBuf,

    /// Brush stencil image; a soft elongated stroke is used when omitted.
    #[clap(short, long)]
    texture: Option<PathBuf>,

    #[clap(short, long, value_enum, default_value = "oriented")]
    mode: Mode,

    #[clap(short = 'n', long, default_value = "10000")]
    strokes: usize,

    #[clap(short, long, default_value = "50")]
    size: usize,

    #[clap(long, default_value = "0.3")]
    noise: f32,

    #[clap(long, default_value = "36")]
    angles: usize,

    /// Seed for reproducible output.
    #[clap(long)]
    seed: Option<u64>,

    /// Defaults to generated_images/<stem>_<mode>.png
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Show the result in a window (needs the `preview` feature).
    #[clap(long)]
    preview: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    Single,
    Painterly,
    SingleOriented,
    Oriented,
    Angles,
    BrushTest,
}

impl Mode {
    fn suffix(self) -> &'static str {
        match self {
            Mode::Single => "single_scale",
            Mode::Painterly => "painterly",
            Mode::SingleOriented => "single_scale_oriented",
            Mode::Oriented => "oriented",
            Mode::Angles => "angles",
            Mode::BrushTest => "brush_test",
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let target = read_image(&args.target)
        .with_context(|| format!("couldn't load {}", args.target.display()))?;
    let texture = match &args.texture {
        Some(path) => read_image(path)
            .with_context(|| format!("couldn't load brush {}", path.display()))?,
        None => soft_stencil(150, 50, 0.4),
    };

    let config = PaintConfig {
        stroke_size: args.size,
        stroke_count: args.strokes,
        color_noise: args.noise,
        n_angles: args.angles,
        ..Default::default()
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    log::info!(
        "painting {} ({}x{}) in {:?} mode",
        args.target.display(),
        target.width,
        target.height,
        args.mode
    );

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output(&args.target, args.mode));

    let result = match args.mode {
        Mode::Single => report(pipeline::single_scale(&target, &texture, &config, &mut rng)?),
        Mode::Painterly => report(pipeline::painterly(&target, &texture, &config, &mut rng)?),
        Mode::SingleOriented => report(pipeline::single_scale_oriented(
            &target, &texture, &config, &mut rng,
        )?),
        Mode::Oriented => report(pipeline::oriented_paint(&target, &texture, &config, &mut rng)?),
        Mode::Angles => {
            let angles = pipeline::angle_visualization(&target, config.tensor)?;
            write_scalar_map(&angles, &output)?;
            if args.preview {
                preview(&angles.to_image(3))?;
            }
            return Ok(());
        }
        Mode::BrushTest => {
            // stamp the first plane so a colored brush file still reads as a mask
            let stencil = texture.channel(0).to_image(1);
            let white = vec![1.0; target.channels];
            let (canvas, _) = pipeline::brush_test(
                target.width,
                target.height,
                &scaled_stencil(&stencil, config.stroke_size),
                config.stroke_count,
                &white,
                &mut rng,
            )?;
            canvas
        }
    };

    write_image(&result, &output)
        .with_context(|| format!("couldn't save {}", output.display()))?;
    println!("Saved painting to: {}", output.display());

    if args.preview {
        preview(&result)?;
    }
    Ok(())
}

fn report(painting: Painting) -> Image {
    for (i, stats) in painting.passes.iter().enumerate() {
        log::info!(
            "pass {i}: {}/{} successful strokes ({} attempts)",
            stats.drawn,
            stats.accepted,
            stats.attempts
        );
    }
    painting.canvas
}

fn default_output(target: &Path, mode: Mode) -> PathBuf {
    let stem = target
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("painting");
    Path::new("generated_images").join(format!("{stem}_{}.png", mode.suffix()))
}

// ============================================================================
// PREVIEW WINDOW
// ============================================================================

#[cfg(feature = "preview")]
fn preview(image: &Image) -> Result<()> {
    use minifb::{Key, Window, WindowOptions};

    let rgb = image.to_rgb8()?;
    let canvas: Vec<u32> = rgb
        .pixels()
        .map(|p| u32::from_be_bytes([0, p.0[0], p.0[1], p.0[2]]))
        .collect();

    let mut window = Window::new(
        "painterly - press Escape to close",
        image.width,
        image.height,
        WindowOptions::default(),
    )?;
    // Keep window open until escape is pressed
    while window.is_open() && !window.is_key_down(Key::Escape) {
        window.update_with_buffer(&canvas, image.width, image.height)?;
    }
    Ok(())
}

#[cfg(not(feature = "preview"))]
fn preview(_image: &Image) -> Result<()> {
    log::warn!("built without the `preview` feature, not opening a window");
    Ok(())
}
