//! `nextweek`: render a built-in scene to a PPM or PNG image.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use nw_renderer::{build_scene, render, ImageBuffer, SceneKind, SceneOptions};

#[derive(Parser, Debug)]
#[command(about = "Offline CPU path tracer")]
struct CliArguments {
    /// Scene to render
    #[arg(long, default_value_t = SceneKind::default())]
    scene: SceneKind,

    /// Image width; the height follows the scene's aspect ratio
    #[arg(long)]
    width: Option<u32>,

    /// Samples per pixel
    #[arg(long)]
    samples: Option<u32>,

    /// Maximum bounces per path
    #[arg(long)]
    max_depth: Option<u32>,

    /// Seed for scene layout and sampling
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Worker threads (defaults to one per core)
    #[arg(long)]
    threads: Option<usize>,

    /// Directory holding texture images
    #[arg(long, default_value = "assets")]
    texture_dir: PathBuf,

    /// Write linear values without gamma correction
    #[arg(long)]
    no_gamma: bool,

    /// Output file: `.png` writes PNG, anything else PPM, `-` is stdout
    #[arg(short, long, default_value = "-")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = CliArguments::parse();

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the render thread pool")?;
    }

    let options = SceneOptions {
        texture_dir: args.texture_dir.clone(),
        seed: args.seed,
        width: args.width,
    };
    let scene = build_scene(args.scene, &options);

    let mut config = scene.config.clone();
    if let Some(samples) = args.samples {
        config.samples_per_pixel = samples.max(1);
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }
    config.gamma = !args.no_gamma;

    let image = render(&scene.camera, &scene.world, &config);
    write_image(&image, &args.output, config.gamma)?;

    if args.output != Path::new("-") {
        log::info!("Wrote {}", args.output.display());
    }
    Ok(())
}

fn write_image(image: &ImageBuffer, output: &Path, gamma: bool) -> Result<()> {
    if output == Path::new("-") {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        image
            .write_ppm(&mut out, gamma)
            .and_then(|()| out.flush())
            .context("Failed to write image to stdout")?;
        return Ok(());
    }

    let is_png = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));

    if is_png {
        image
            .save_png(output, gamma)
            .with_context(|| format!("Failed to write {}", output.display()))?;
    } else {
        let file = File::create(output)
            .with_context(|| format!("Failed to create {}", output.display()))?;
        let mut out = BufWriter::new(file);
        image
            .write_ppm(&mut out, gamma)
            .and_then(|()| out.flush())
            .with_context(|| format!("Failed to write {}", output.display()))?;
    }
    Ok(())
}
