//! Headless gymplan host.
//!
//! Opens the stored plan, replays an optional input script (taps, drags,
//! wheel steps and dialog answers), then rasterises the final frame to PNG.
//!
//! ```text
//! RUST_LOG=debug gymplan-snapshot --script monday.txt --out monday.png --inspect
//! ```

mod config;
mod script;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use gymplan_core::{RenderBackend, Viewport};
use gymplan_devtools::{Inspector, Metrics as HudMetrics};
use gymplan_model::{FileStore, IdGen, PlanStore};
use gymplan_render_soft::SoftBackend;
use gymplan_ui::{Planner, PlannerOptions};

use crate::config::GymplanConfig;

#[derive(Debug, Parser)]
#[command(name = "gymplan-snapshot", about = "Replay input against a gym plan and save the frame")]
struct Args {
    /// Config file; `./gymplan.toml` is used when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Plan directory, overriding `[storage] dir`.
    #[arg(long)]
    store: Option<PathBuf>,

    /// Week tab to open (0-based).
    #[arg(long, default_value_t = 0)]
    week: usize,

    #[arg(long, default_value_t = 420)]
    width: u32,

    #[arg(long, default_value_t = 900)]
    height: u32,

    /// Device pixels per logical pixel.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,

    /// Input script to replay before rendering.
    #[arg(long)]
    script: Option<PathBuf>,

    #[arg(long, default_value = "gymplan.png")]
    out: PathBuf,

    /// Overlay frame stats and hit-region outlines.
    #[arg(long)]
    inspect: bool,

    /// TrueType font to use instead of the system sans-serif.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Seed for new item ids, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// How long to wait for image jobs after each step.
    #[arg(long = "settle-ms", default_value_t = 2000)]
    settle_ms: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let cfg = GymplanConfig::load(args.config.as_deref())?;
    let files = match &args.store {
        Some(dir) => FileStore::new(dir),
        None => cfg.file_store()?,
    };
    log::info!("plan directory: {}", files.dir().display());

    let viewport = Viewport::new(args.width as f32, args.height as f32, args.scale);
    let opts = PlannerOptions {
        metrics: cfg.metrics,
        theme: cfg.theme,
        viewport,
        ids: args.seed.map(IdGen::seeded).unwrap_or_else(IdGen::from_entropy),
        ..PlannerOptions::default()
    };
    let mut planner = Planner::with_options(PlanStore::new(files), opts);
    planner.select_week(args.week);

    let settle = Duration::from_millis(args.settle_ms);
    if let Some(path) = &args.script {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        let commands = script::parse(&source)?;
        log::info!("replaying {} steps from {}", commands.len(), path.display());
        script::replay(&mut planner, &commands, settle)?;
    }
    planner.settle_images(settle);
    if let Some(prompt) = planner.prompt() {
        log::warn!("script ended with an open dialog: {:?}", prompt.message);
    }

    let started = Instant::now();
    planner.render();
    let paint_ms = started.elapsed().as_secs_f32() * 1000.0;

    let mut scene = planner.scene().clone();
    if args.inspect {
        let mut inspector = Inspector::new();
        inspector.hud.toggle_inspector();
        inspector.hud.metrics = Some(HudMetrics {
            paint_ms,
            scene_nodes: scene.len(),
            hit_regions: planner.hits().len(),
        });
        inspector.frame(&mut scene, planner.hits());
    }

    let vp = planner.viewport();
    let (w, h) = (vp.width.round() as u32, vp.height.round() as u32);
    let mut backend = match &args.font {
        Some(font) => SoftBackend::without_text(w, h).with_font_file(font)?,
        None => SoftBackend::new(w, h),
    };
    backend.frame(&scene);
    backend.save_png(&args.out)?;
    log::info!(
        "wrote {} ({}x{}, {} nodes, frame {})",
        args.out.display(),
        w,
        h,
        scene.len(),
        planner.frames()
    );
    Ok(())
}
