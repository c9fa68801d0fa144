use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use splitcube_common::Timestamp;
use splitcube_input::{Controller, HitOutcome, InteractionMode, PointerEvent};
use splitcube_kernel::{EngineConfig, SubdivisionEngine};
use splitcube_render::{Camera, CpuSceneAdapter, DebugTextRenderer, Renderer};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// One animation frame at 60 Hz.
const FRAME: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(name = "splitcube-cli", about = "CLI driver for the splitcube engine")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON engine configuration; missing fields use defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Drive a controller with pseudo-random pointer input
    Simulate {
        /// RNG seed for the engine and the pointer script
        #[arg(short, long, default_value = "42")]
        seed: u64,
        /// Interaction mode: click, hover or motion
        #[arg(short, long, default_value = "click")]
        mode: InteractionMode,
        /// Number of pointer gestures to send
        #[arg(short, long, default_value = "50")]
        events: usize,
        /// Animation frames between gestures
        #[arg(short, long, default_value = "6")]
        frames: u64,
        /// Volumes to list in the final dump
        #[arg(long, default_value = "16")]
        list: usize,
    },
    /// Split every leaf until all volumes are terminal
    Saturate {
        /// RNG seed for the engine
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
    /// Print the effective configuration as JSON
    Config,
}

#[derive(Debug, Default)]
struct Tally {
    ignored: usize,
    misses: usize,
    debounced: usize,
    splits: usize,
    terminal: usize,
    stale: usize,
}

impl Tally {
    fn record(&mut self, outcome: HitOutcome) {
        match outcome {
            HitOutcome::Ignored => self.ignored += 1,
            HitOutcome::Miss => self.misses += 1,
            HitOutcome::Debounced(_) => self.debounced += 1,
            HitOutcome::Split { .. } => self.splits += 1,
            HitOutcome::Terminal(_) => self.terminal += 1,
            HitOutcome::NotActive(_) => self.stale += 1,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("splitcube-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", splitcube_render::crate_info());
            println!("input: {}", splitcube_input::crate_info());
            println!(
                "config: base_size={} max_generation={} debounce={:?}",
                config.base_size,
                config.max_generation,
                config.debounce_window()
            );
        }
        Commands::Simulate {
            seed,
            mode,
            events,
            frames,
            list,
        } => {
            println!("Simulate: seed={seed}, mode={mode}, events={events}");

            let engine = SubdivisionEngine::with_seed(config, seed)?;
            let camera = Camera::default();
            let mut controller = Controller::new(engine, CpuSceneAdapter::new(camera));
            controller.set_mode_kind(mode);

            let mut pointer = StdRng::seed_from_u64(seed.rotate_left(17));
            let mut tally = Tally::default();
            let mut now = Timestamp::ZERO;

            for _ in 0..events {
                // Aim near the middle of the viewport where the cube is.
                let x = camera.viewport.x * pointer.random_range(0.25..0.75);
                let y = camera.viewport.y * pointer.random_range(0.25..0.75);
                match mode {
                    InteractionMode::Click => {
                        tally.record(controller.handle_pointer(PointerEvent::Down { x, y }, now));
                        tally.record(controller.handle_pointer(PointerEvent::Up { x, y }, now));
                    }
                    InteractionMode::Hover | InteractionMode::Motion => {
                        tally.record(controller.handle_pointer(PointerEvent::Move { x, y }, now));
                    }
                }
                for _ in 0..frames {
                    now = now.plus(FRAME);
                    controller.tick(now);
                }
            }

            tracing::info!(?tally, elapsed_ms = now.as_millis(), "simulation finished");
            println!(
                "Outcomes: splits={} debounced={} terminal={} misses={} stale={} ignored={}",
                tally.splits,
                tally.debounced,
                tally.terminal,
                tally.misses,
                tally.stale,
                tally.ignored
            );
            print!(
                "{}",
                DebugTextRenderer::with_max_lines(list)
                    .render(controller.engine().volumes(), &controller.adapter().camera)
            );
        }
        Commands::Saturate { seed } => {
            let max_generation = config.max_generation;
            let mut engine = SubdivisionEngine::with_seed(config, seed)?;
            let mut round = 0;
            loop {
                let splits = engine.split_all(Timestamp(round));
                if splits == 0 {
                    break;
                }
                round += 1;
                println!(
                    "Round {round}: {splits} splits, {} volumes",
                    engine.volume_count()
                );
            }

            let histogram = engine.volumes().generation_histogram();
            println!("Generations: {histogram:?}");
            let expected = 8usize.checked_pow(max_generation);
            println!(
                "Leaves: {} (expected {}), terminal={}",
                engine.volume_count(),
                expected.map_or_else(|| "overflow".to_string(), |n| n.to_string()),
                engine.volumes().terminal_count(engine.config())
            );
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
