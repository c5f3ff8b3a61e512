//! panel-drag - two floating panels in a native window
//!
//! Drag a panel by its title strip. Positions are remembered between runs.

mod runtime;

use anyhow::Result;
use clap::Parser;
use winit::event_loop::EventLoop;

use panel_drag::cli::CliArgs;
use panel_drag::config::PanelDragConfig;

use runtime::App;

fn main() -> Result<()> {
    panel_drag::tracing::init();

    let config = PanelDragConfig::load();
    let startup = CliArgs::parse()
        .into_config(&config)
        .map_err(anyhow::Error::msg)?;

    let event_loop = EventLoop::new()?;
    let mut app = App::new(startup, config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
