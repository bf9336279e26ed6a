use clap::Parser;
use lumen_renderer::AntiAlias;
use lumen_scene::Scene;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "An offline path tracer for still images")]
pub struct Args {
    /// Built-in scene name or path to a JSON scene file
    #[arg(default_value = "random-spheres")]
    pub scene: String,

    /// Output file path (.ppm written directly, other extensions by format)
    #[arg(short, long, default_value = "output.ppm")]
    pub output: String,

    /// Image width in pixels, keeping the scene's aspect ratio
    #[arg(long)]
    pub width: Option<u32>,

    /// Jittered samples per pixel, replacing the scene's sampling pattern
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// Maximum number of bounces per path
    #[arg(long)]
    pub depth: Option<u32>,

    /// Seed for a reproducible render
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads (defaults to one per core)
    #[arg(long, short = 'j')]
    pub threads: Option<usize>,

    /// List the built-in scenes and exit
    #[arg(long)]
    pub list: bool,
}

impl Args {
    /// Apply command line overrides on top of the scene's own settings.
    pub fn apply_overrides(&self, scene: &mut Scene) {
        if let Some(width) = self.width {
            scene.camera = scene.camera.clone().with_image_width(width);
        }
        if let Some(samples) = self.samples {
            scene.config.anti_alias = AntiAlias::Random(samples);
        }
        if let Some(depth) = self.depth {
            scene.config.max_depth = depth;
        }
        if let Some(seed) = self.seed {
            scene.config.seed = Some(seed);
        }
    }
}
