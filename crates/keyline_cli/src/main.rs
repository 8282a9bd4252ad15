//! Keyline CLI
//!
//! Runs the demo scene headlessly, exports edited tracks as builder source,
//! renders one editor frame, manages the saved key data and prints the
//! effective configuration.

mod config;
mod demo;
mod store;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use keyline_animation::{FrameScheduler, Timeline};
use keyline_editor::Editor;
use keyline_paint::{PaintCommand, PaintContext};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::KeylineConfig;
use crate::store::JsonFileStore;

/// Keyframe timeline tools
#[derive(Parser, Debug)]
#[command(name = "keyline")]
#[command(about = "Drive, edit and export keyframe timelines")]
#[command(version)]
struct Cli {
    /// Config file, or a directory containing keyline.toml
    #[arg(short, long, default_value = ".")]
    config: PathBuf,

    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play the demo scene headlessly and log sampled values
    Demo {
        /// Simulated seconds to run; defaults to playback.duration
        #[arg(long)]
        seconds: Option<f64>,
    },
    /// Print builder source for the demo scene with saved edits applied
    Export,
    /// Render one editor frame and summarize the draw calls
    Render,
    /// Forget saved key data
    Clear,
    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = KeylineConfig::load(&cli.config)?;

    match cli.command {
        Command::Demo { seconds } => cmd_demo(&config, seconds.unwrap_or(config.playback.duration)),
        Command::Export => cmd_export(&config),
        Command::Render => cmd_render(&config),
        Command::Clear => cmd_clear(&config),
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn lock_global() -> Result<std::sync::MutexGuard<'static, Timeline>> {
    demo::global_timeline()
        .lock()
        .map_err(|_| anyhow::anyhow!("global timeline lock poisoned"))
}

fn open_editor(config: &KeylineConfig, timeline: &mut Timeline) -> Result<Editor<JsonFileStore>> {
    let store = JsonFileStore::open(&config.store.path)
        .with_context(|| format!("Failed to open store {}", config.store.path.display()))?;
    Ok(Editor::new(config.editor.clone(), store, timeline))
}

fn cmd_demo(config: &KeylineConfig, seconds: f64) -> Result<()> {
    let mut timeline = lock_global()?;
    let target = demo::build_scene(&mut timeline, &config.scene)?;
    timeline.set_fps(config.playback.fps);
    timeline.loop_mode(config.playback.loop_mode);

    info!(
        seconds,
        fps = config.playback.fps,
        loop_mode = config.playback.loop_mode,
        "running demo"
    );

    let start = Instant::now();
    let mut scheduler = FrameScheduler::new(timeline.fps(), start);
    let end = Duration::from_secs_f64(seconds.max(0.0));
    let mut elapsed = Duration::ZERO;
    while elapsed <= end {
        if scheduler.drive(&mut timeline, start + elapsed) && scheduler.frames() % 10 == 0 {
            let values: Vec<String> = demo::scene_properties()
                .filter_map(|name| {
                    timeline
                        .property(target, name)
                        .map(|value| format!("{name}={value}"))
                })
                .collect();
            info!(
                frame = scheduler.frames(),
                time = %format_args!("{:.3}", timeline.time()),
                "{}",
                values.join(" ")
            );
        }
        elapsed += Duration::from_millis(1);
    }

    info!(
        frames = scheduler.frames(),
        loops = timeline.loop_count(),
        remaining = timeline.animations().len(),
        "demo finished"
    );
    Ok(())
}

fn cmd_export(config: &KeylineConfig) -> Result<()> {
    let mut timeline = lock_global()?;
    demo::build_scene(&mut timeline, &config.scene)?;
    let editor = open_editor(config, &mut timeline)?;
    print!("{}", editor.export(&timeline));
    Ok(())
}

fn cmd_render(config: &KeylineConfig) -> Result<()> {
    let mut timeline = lock_global()?;
    demo::build_scene(&mut timeline, &config.scene)?;
    let mut editor = open_editor(config, &mut timeline)?;

    let mut surface = PaintContext::new(config.surface.width as f32, config.surface.height as f32);
    editor.render(&timeline, &mut surface);

    let (mut rects, mut lines, mut paths, mut texts) = (0, 0, 0, 0);
    for command in surface.commands() {
        match command {
            PaintCommand::FillRect { .. } => rects += 1,
            PaintCommand::Line { .. } => lines += 1,
            PaintCommand::FillPath { .. } | PaintCommand::StrokePath { .. } => paths += 1,
            PaintCommand::Text { .. } => texts += 1,
            _ => {}
        }
    }
    println!(
        "{} commands: {rects} rects, {lines} lines, {paths} paths, {texts} texts",
        surface.commands().len()
    );
    println!("labels: {}", surface.texts().collect::<Vec<_>>().join(", "));
    Ok(())
}

fn cmd_clear(config: &KeylineConfig) -> Result<()> {
    let mut timeline = lock_global()?;
    let mut editor = open_editor(config, &mut timeline)?;
    editor.clear_saved().context("Failed to clear saved keys")?;
    info!(path = %editor.store().path().display(), "cleared saved keys");
    Ok(())
}
