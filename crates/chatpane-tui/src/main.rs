use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use chatpane_core::transcript;
use chatpane_tui::{app::App, config::Config, handler, logging, sample, tui, ui};

#[derive(Parser)]
#[command(name = "chatpane")]
#[command(about = "View a chat transcript with markdown and math rendering")]
struct Cli {
    /// JSON file holding an array of {role, content} messages
    transcript: Option<PathBuf>,
    /// Start with the loading indicator shown
    #[arg(long)]
    loading: bool,
    /// Start with the thinking indicator shown
    #[arg(long)]
    thinking: bool,
    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Log file (overrides the config)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config errors are reported once logging is up
    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    let (config, config_error) = match loaded {
        Ok(config) => (config, None),
        Err(err) => (Config::new(), Some(err)),
    };

    let log_path = match &cli.log_file {
        Some(path) => path.clone(),
        None => config.log_path()?,
    };
    logging::init(&log_path)?;
    if let Some(err) = config_error {
        warn!(error = %format!("{:#}", err), "Falling back to default config");
    }

    let messages = match &cli.transcript {
        Some(path) => transcript::load(path)?,
        None => sample::conversation(),
    };
    info!(messages = messages.len(), "Starting chatpane");

    let tick_rate = Duration::from_millis(config.tick_ms.max(16));
    let mut app = App::new(messages, config);
    app.is_loading = cli.loading;
    app.is_thinking = cli.thinking;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new(tick_rate);

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    info!("Exiting chatpane");
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App, events: &mut tui::EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }
    Ok(())
}
