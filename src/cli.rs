//! Command-line argument parsing for the panel demo
//!
//! Supports:
//! - Choosing where panel positions are stored (or not storing them)
//! - Clearing saved positions on startup
//! - Overriding the initial window size

use clap::Parser;
use std::path::PathBuf;

use crate::config::PanelDragConfig;

/// Floating panels that remember where you left them
#[derive(Parser, Debug)]
#[command(name = "panel-drag", version, about = "Floating draggable panels")]
pub struct CliArgs {
    /// Forget saved panel positions before starting
    #[arg(long)]
    pub reset_positions: bool,

    /// Keep positions in memory only
    #[arg(long, conflicts_with = "store")]
    pub no_persist: bool,

    /// Position store file (defaults to ~/.config/panel-drag/positions.json)
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Initial window width in logical pixels
    #[arg(long, value_name = "PX")]
    pub width: Option<u32>,

    /// Initial window height in logical pixels
    #[arg(long, value_name = "PX")]
    pub height: Option<u32>,
}

/// Where panel positions are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    /// The positions file in the user config directory
    Default,
    File(PathBuf),
}

/// Configuration derived from CLI arguments and the config file
#[derive(Debug, Clone)]
pub struct StartupConfig {
    pub store: StoreLocation,
    pub reset_positions: bool,
    pub window_size: (u32, u32),
}

impl CliArgs {
    /// Merge CLI arguments over the loaded config
    pub fn into_config(self, config: &PanelDragConfig) -> Result<StartupConfig, String> {
        let width = self.width.unwrap_or(config.window_width);
        let height = self.height.unwrap_or(config.window_height);
        if width == 0 || height == 0 {
            return Err(format!("Invalid window size {}x{}", width, height));
        }

        let store = if self.no_persist || !config.persist_positions {
            StoreLocation::Memory
        } else if let Some(path) = self.store {
            StoreLocation::File(path)
        } else {
            StoreLocation::Default
        };

        Ok(StartupConfig {
            store,
            reset_positions: self.reset_positions,
            window_size: (width, height),
        })
    }
}
