//! # Link directory page renderer
//!
//! Reads a JSON5 link configuration and writes the static page the
//! browser controller runs on.
//!
//! - First argument: path to the configuration file (defaults to "config.json5")
//! - Second argument: output path (defaults to "index.html")
//!
//! ```bash
//! cargo run
//! cargo run my-links.json5 public/index.html
//! ```
//!
//! Log levels are controlled through the `RUST_LOG` environment variable.

use linkdeck::config::{Config, CONFIG_FILE};
use linkdeck::error::LinkDeckError;
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() -> Result<(), LinkDeckError> {
    linkdeck::init_tracing();

    let config_path = env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let output_path = env::args()
        .nth(2)
        .map_or_else(|| PathBuf::from("index.html"), PathBuf::from);

    tracing::info!("Loading configuration from {}", config_path.display());
    let config = Config::load(&config_path)?;
    tracing::debug!(
        "Loaded {} links in {} categories",
        config.link_count(),
        config.categories.len()
    );

    let html = linkdeck::render::render_page(&config)?;
    fs::write(&output_path, html)?;

    tracing::info!("Wrote {}", output_path.display());
    Ok(())
}
