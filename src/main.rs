mod api;
mod app;
mod cache;
mod config;
mod coordinator;
mod event;
mod logging;
mod ui;

use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "txview")]
#[command(about = "A terminal UI for browsing and approving transactions")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/txview/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Serve the bundled sample data instead of talking to an API
  #[arg(long)]
  demo: bool,

  /// Page size for the demo data
  #[arg(long, requires = "demo")]
  page_size: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let _log_guard = logging::init()?;

  // Load configuration
  let mut config = config::Config::load(args.config.as_deref())?;

  // Override demo page size if specified on command line
  if let Some(page_size) = args.page_size {
    config.demo.page_size = page_size.max(1);
  }

  tracing::info!(version = env!("CARGO_PKG_VERSION"), demo = args.demo, "starting");

  // Initialize and run the app
  let mut app = app::App::new(config, args.demo)?;
  app.run().await?;

  tracing::info!("exiting");
  Ok(())
}
