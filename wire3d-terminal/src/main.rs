//! Wire3D Terminal Demo - a grid of wireframe cubes
//!
//! Usage: wire3d-terminal [config.toml]
//!
//! Controls:
//!   - W/S: Move the observer forward / back
//!   - Arrow Keys: Move the observer sideways
//!   - P: Toggle the scripted camera path
//!   - Q/ESC: Quit

use anyhow::Context;
use std::env;
use tracing_subscriber::EnvFilter;
use wire3d_core::RenderConfig;
use wire3d_terminal::{demo_scene, TerminalApp, TERMINAL_SCALE};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; redirect it to keep the screen clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match env::args().nth(1) {
        Some(path) => RenderConfig::load(&path)
            .with_context(|| format!("Failed to load config {path}"))?,
        None => RenderConfig {
            scale: TERMINAL_SCALE,
            ..RenderConfig::default()
        },
    };

    println!("Wire3D Terminal Renderer - Loading...");
    let scene = demo_scene(config);

    println!("Starting terminal renderer (press Q to quit)...");
    std::thread::sleep(std::time::Duration::from_secs(1));

    let mut app = TerminalApp::new(scene)?;
    app.run()?;

    println!("Thank you for using Wire3D Terminal Renderer!");
    Ok(())
}
