mod app;
mod config;
mod galaxy;
mod util;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Optional JSON configuration file; compiled-in defaults otherwise.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = config::load_config(args.config.as_deref())?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "galaxy-graph",
        options,
        Box::new(move |cc| Ok(Box::new(app::GalaxyApp::new(cc, config)))),
    )
    .map_err(|error| anyhow::anyhow!("{error}"))
}
