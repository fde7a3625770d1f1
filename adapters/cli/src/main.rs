#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that opens the arena in a macroquad window.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use robotron_rendering::{Color, Presentation, RenderingBackend, Scene};
use robotron_rendering_macroquad::MacroquadBackend;
use robotron_simulation::Simulation;
use robotron_system_scoring::STARTING_LIVES;
use robotron_system_spawning::WaveTable;
use robotron_world::{AxisLock, Config};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info";

/// Presentation synchronisation requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum VsyncMode {
    /// Wait for the display refresh.
    On,
    /// Present frames as soon as they are drawn.
    Off,
}

#[derive(Debug, Parser)]
#[command(name = "robotron")]
#[command(about = "Twin-stick arena shooter: survive the waves and save the last human family")]
struct Args {
    /// Seed for every random decision; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Wave table to load instead of the bundled one
    #[arg(long)]
    waves: Option<PathBuf>,
    /// Sprite-sheet manifest; actors are drawn as coloured rectangles without one
    #[arg(long)]
    sprite_manifest: Option<PathBuf>,
    /// Synchronise presentation with the display refresh rate
    #[arg(long, value_enum)]
    vsync: Option<VsyncMode>,
    /// Print frame timing once per second
    #[arg(long)]
    show_fps: bool,
    /// Tracing filter directives, overriding RUST_LOG
    #[arg(long)]
    log_filter: Option<String>,
    /// Lives at the start of a game
    #[arg(long, default_value_t = STARTING_LIVES)]
    starting_lives: u32,
    /// Axis every hulk starts walking on (`x` or `y`); random per hulk when omitted
    #[arg(long)]
    hulk_axis: Option<String>,
}

impl Args {
    fn world_config(&self, seed: u64) -> Config {
        let hulk_axis = self
            .hulk_axis
            .as_deref()
            .map_or(AxisLock::Free, AxisLock::from_name);
        Config::new(seed)
            .with_starting_lives(self.starting_lives)
            .with_hulk_axis(hulk_axis)
    }
}

/// Entry point for the arena command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_filter.as_deref())?;

    let table = load_waves(args.waves.as_deref())?;
    table
        .validate(1)
        .context("wave table cannot populate the first wave")?;

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, lives = args.starting_lives, "starting arena");
    let config = args.world_config(seed);
    let mut simulation = Simulation::new(config, table);

    let mut backend = MacroquadBackend::new()
        .with_show_fps(args.show_fps)
        .with_sprite_manifest(args.sprite_manifest);
    if let Some(vsync) = args.vsync {
        backend = backend.with_vsync(vsync == VsyncMode::On);
    }

    let presentation = Presentation::new("Robotron", Color::BLACK, Scene::new());
    backend.run(presentation, move |frame_dt, input, scene| {
        let _ = simulation
            .advance(frame_dt, input.controls())
            .context("simulation stopped")?;
        simulation.populate_scene(scene);
        Ok(())
    })
}

fn init_tracing(directives: Option<&str>) -> Result<()> {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn load_waves(path: Option<&Path>) -> Result<WaveTable> {
    match path {
        Some(path) => WaveTable::load(path)
            .with_context(|| format!("failed to load wave table from {}", path.display())),
        None => WaveTable::bundled().context("bundled wave table is invalid"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn arguments_are_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_leave_optional_settings_unset() {
        let args = Args::try_parse_from(["robotron"]).expect("no arguments are required");

        assert_eq!(args.seed, None);
        assert_eq!(args.vsync, None);
        assert!(!args.show_fps);
        assert_eq!(args.starting_lives, STARTING_LIVES);
    }

    #[test]
    fn every_flag_is_accepted() {
        let args = Args::try_parse_from([
            "robotron",
            "--seed",
            "42",
            "--waves",
            "custom.toml",
            "--sprite-manifest",
            "sprites.toml",
            "--vsync",
            "off",
            "--show-fps",
            "--log-filter",
            "robotron_world=debug",
            "--starting-lives",
            "5",
            "--hulk-axis",
            "y",
        ])
        .expect("flags parse");

        assert_eq!(args.seed, Some(42));
        assert_eq!(args.waves, Some(PathBuf::from("custom.toml")));
        assert_eq!(args.sprite_manifest, Some(PathBuf::from("sprites.toml")));
        assert_eq!(args.vsync, Some(VsyncMode::Off));
        assert!(args.show_fps);
        assert_eq!(args.log_filter.as_deref(), Some("robotron_world=debug"));
        assert_eq!(args.starting_lives, 5);
        assert_eq!(args.hulk_axis.as_deref(), Some("y"));
    }

    #[test]
    fn hulk_axis_names_reach_the_world_config() {
        let parse = |extra: &[&str]| {
            let args = Args::try_parse_from(["robotron"].into_iter().chain(extra.iter().copied()))
                .expect("flags parse");
            args.world_config(9)
        };

        assert_eq!(parse(&[]), Config::new(9));
        assert_eq!(
            parse(&["--hulk-axis", "x"]),
            Config::new(9).with_hulk_axis(AxisLock::Horizontal)
        );
        assert_eq!(
            parse(&["--hulk-axis", "diagonal"]),
            Config::new(9),
            "unrecognized axes fall back to a random axis per hulk"
        );
    }

    #[test]
    fn unknown_vsync_mode_is_rejected() {
        assert!(Args::try_parse_from(["robotron", "--vsync", "maybe"]).is_err());
    }

    #[test]
    fn bundled_waves_load_without_a_path() {
        let table = load_waves(None).expect("bundled table parses");
        assert!(table.validate(40).is_ok());
    }
}
