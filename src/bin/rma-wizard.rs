use clap::Parser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use rma_wizard::app::WizardApp;
use rma_wizard::error::{Result, WizardError};
use rma_wizard::event::{Event, EventHandler};
use rma_wizard::rma::WizardConfig;
use std::io::stdout;
use std::panic;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rma-wizard")]
#[command(author, version, about = "Guided hardware repair wizard against a simulated device")]
struct Args {
    /// Path to wizard config file (default: ~/.config/rma-wizard/wizard.toml, then /etc/rma-wizard/wizard.toml)
    #[arg(long)]
    config: Option<String>,

    /// Log file path (logging disabled if not specified)
    #[arg(long)]
    log_file: Option<String>,
}

type Term = Terminal<CrosstermBackend<std::io::Stdout>>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging only if log file is specified
    if let Some(ref log_path) = args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .ok();

        if let Some(file) = file {
            let filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();

            info!("Starting rma-wizard");
        }
    }

    let config = match args.config.as_deref() {
        Some(path) => WizardConfig::load_from(path)?,
        None => WizardConfig::load().unwrap_or_default(),
    };

    // Set up panic handler to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let result = run_wizard(&mut terminal, config).await;
    restore_terminal()?;

    if let Err(ref e) = result {
        error!("Wizard error: {}", e);
    }

    result
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode().map_err(|e| WizardError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| WizardError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(|e| WizardError::Terminal(e.to_string()))
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| WizardError::Terminal(e.to_string()))?;
    execute!(stdout(), LeaveAlternateScreen).map_err(|e| WizardError::Terminal(e.to_string()))?;
    Ok(())
}

fn draw(terminal: &mut Term, app: &WizardApp) -> Result<()> {
    terminal
        .draw(|frame| rma_wizard::ui::draw(frame, app))
        .map_err(|e| WizardError::Terminal(e.to_string()))?;
    Ok(())
}

async fn run_wizard(terminal: &mut Term, config: WizardConfig) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));
    let mut app = WizardApp::new(config)?;

    loop {
        draw(terminal, &app)?;

        tokio::select! {
            event = events.next() => match event {
                Some(Event::Key(key)) => app.handle_key(key)?,
                Some(Event::Resize) | Some(Event::Tick) => {}
                None => break,
            },
            Some(inbound) = app.orchestrator.next_inbound() => app.handle_inbound(inbound)?,
        }

        if app.should_exit {
            if let Some(outcome) = app.orchestrator.outcome() {
                info!("Wizard finished with {:?}", outcome);
                // Leave the final message on screen briefly
                draw(terminal, &app)?;
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            break;
        }
    }

    Ok(())
}
