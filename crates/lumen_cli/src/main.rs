mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use lumen_renderer::render;
use lumen_scene::BUILTIN_SCENES;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();

    if args.list {
        for name in BUILTIN_SCENES {
            println!("{name}");
        }
        return Ok(());
    }

    if let Some(threads) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("Failed to configure the worker pool")?;
        log::info!("Using {threads} worker threads");
    }

    let mut scene = lumen_scene::resolve(&args.scene)
        .with_context(|| format!("Failed to load scene '{}'", args.scene))?;
    args.apply_overrides(&mut scene);

    let image = render(&scene.camera, &scene.world, &scene.config)
        .with_context(|| format!("Failed to render scene '{}'", args.scene))?;

    image
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output))?;

    Ok(())
}
