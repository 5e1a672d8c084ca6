#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that opens a Ray Arena map in the preview runtime.

mod map_file;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use ray_arena_rendering::{Presentation, RenderingBackend};
use ray_arena_rendering_macroquad::MacroquadBackend;
use ray_arena_session::PreviewLoop;
use ray_arena_system_movement::PlayerTuning;

use self::map_file::{build_setup, load_map, load_menu, load_tuning, MediaResolver};

/// Command-line arguments accepted by the preview binary.
#[derive(Debug, Parser)]
#[command(name = "ray-arena")]
#[command(about = "First-person preview of a grid level authored in the editor")]
struct Cli {
    /// Map file saved by the editor. Without one an empty 20x20 arena is used.
    #[arg(long)]
    map: Option<PathBuf>,

    /// Main menu file that replaces the menu settings stored in the map.
    #[arg(long)]
    menu: Option<PathBuf>,

    /// TOML file overriding player movement tuning.
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Directory searched first for textures, models and sounds.
    #[arg(long, default_value = "media")]
    media_dir: PathBuf,

    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long, overrides_with = "no_vsync")]
    vsync: bool,

    /// Render as fast as possible.
    #[arg(long, overrides_with = "vsync")]
    no_vsync: bool,

    /// Enable debug logging.
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    fn vsync(&self) -> Option<bool> {
        match (self.vsync, self.no_vsync) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

/// Entry point for the Ray Arena command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let map = cli.map.as_deref().map(load_map).transpose()?;
    let menu = cli.menu.as_deref().map(load_menu).transpose()?;
    let tuning = match cli.tuning.as_deref() {
        Some(path) => load_tuning(path)?,
        None => PlayerTuning::default(),
    };
    let media = MediaResolver::new(&cli.media_dir);
    let setup = build_setup(map, menu, tuning, &media)?;

    log::info!(
        "opening {:?} ({}x{} grid, {} assets requested)",
        setup.config.window_title(),
        setup.config.grid.columns(),
        setup.config.grid.rows(),
        setup.assets.len()
    );

    let presentation = Presentation::new(setup.config.window_title(), setup.assets);
    let mut session = PreviewLoop::new(setup.config);

    let mut backend = MacroquadBackend::new().with_show_fps(cli.show_fps);
    if let Some(enabled) = cli.vsync() {
        backend = backend.with_vsync(enabled);
    }

    backend.run(presentation, move |context| session.frame(context))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vsync_flags_override_each_other() {
        let cli = Cli::parse_from(["ray-arena", "--vsync", "--no-vsync"]);
        assert_eq!(cli.vsync(), Some(false));

        let cli = Cli::parse_from(["ray-arena", "--no-vsync", "--vsync"]);
        assert_eq!(cli.vsync(), Some(true));

        let cli = Cli::parse_from(["ray-arena"]);
        assert_eq!(cli.vsync(), None);
    }

    #[test]
    fn media_dir_defaults_to_media() {
        let cli = Cli::parse_from(["ray-arena", "--map", "level.json", "--show-fps"]);

        assert_eq!(cli.media_dir, PathBuf::from("media"));
        assert_eq!(cli.map, Some(PathBuf::from("level.json")));
        assert!(cli.show_fps);
        assert!(!cli.verbose);
    }
}
