//! # Louhos Engine
//!
//! Headless entry point for Louhos.
//!
//! Loads `louhos.toml` (or the path given as the first argument), then runs
//! the player controller through a scripted play-through and logs what
//! happened.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod audio;
mod config;
mod demo;
mod timing;

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{EngineConfig, CONFIG_FILE};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("louhos=info".parse()?))
        .init();

    info!("Louhos starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let config = EngineConfig::load_from(&path);
    if !path.exists() {
        config.save_to(&path)?;
    }

    let summary = demo::run(&config);

    let mut events: Vec<_> = summary.events.iter().collect();
    events.sort();
    for (name, count) in events {
        info!("{name}: {count}");
    }
    info!(
        tiles_broken = summary.tiles_broken,
        sounds = summary.sounds,
        stamina = summary.stamina,
        intoxication = summary.intoxication,
        x = summary.position.x,
        y = summary.position.y,
        depth = summary.depth,
        "Run summary"
    );
    if let Some(cause) = &summary.session_end {
        info!("Session ended: {cause}");
    }

    info!("Louhos shutdown complete");
    Ok(())
}
