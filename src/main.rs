mod app;
mod domain;
mod export;
mod input;
mod logging;
mod persistence;
mod ticker;
mod ui;
mod undo;

use anyhow::{Context, Result};
use app::{AppState, LoadedState};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::CalendarDate;
use export::{ExportFormat, ExportRequest, ExportScope};
use input::{command_for_key, handle_command, Command};
use log::{error, info, warn};
use persistence::{export_dir, Saver, Store};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use ticker::Ticker;
use ui::Theme;

#[derive(Parser)]
#[command(name = "tasklog")]
#[command(about = "A calendar-centred terminal task tracker with an activity timeline", long_about = None)]
struct Cli {
    /// Data file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Theme for this session (ultraviolet, terminal, minimal, nord)
    #[arg(long, value_name = "NAME")]
    theme: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export tasks and timeline without starting the UI
    Export {
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Markdown)]
        format: ExportFormat,
        #[arg(short, long, value_enum, default_value_t = ExportScope::Day)]
        scope: ExportScope,
        /// Anchor date (YYYY-MM-DD format). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
        /// Output file path. Defaults to the export directory.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the data file location
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is best-effort; the app still runs without a log file
    let _logger = match persistence::files::app_dir()
        .and_then(|dir| logging::init_logging(&dir).map_err(anyhow::Error::from))
    {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Logging disabled: {:#}", err);
            None
        }
    };

    let store = Store::open(cli.data_file.as_deref()).context("Could not locate data file")?;

    match cli.command {
        Some(Commands::Path) => {
            println!("{}", store.path().display());
            Ok(())
        }
        Some(Commands::Export {
            format,
            scope,
            date,
            output,
        }) => run_export(&store, format, scope, date, output),
        None => run_tui(store, cli.theme),
    }
}

fn run_export(
    store: &Store,
    format: ExportFormat,
    scope: ExportScope,
    date: Option<String>,
    output: Option<PathBuf>,
) -> Result<()> {
    let anchor = match date {
        Some(date_str) => date_str
            .parse::<CalendarDate>()
            .map_err(|e| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e))?,
        None => CalendarDate::today(),
    };

    let schema = store.load_or_default();
    let request = ExportRequest {
        format,
        scope,
        anchor,
    };

    let path = match output {
        Some(path) => {
            export::export_to_file(&schema.tasks, &schema.timeline, &request, &path)?;
            path
        }
        None => export::export_to_dir(&schema.tasks, &schema.timeline, &request, &export_dir()?)?,
    };
    println!("Exported {} to {}", request.scope.label().to_lowercase(), path.display());
    Ok(())
}

fn run_tui(store: Store, theme_override: Option<String>) -> Result<()> {
    info!("Using data file {}", store.path().display());

    let mut loaded = LoadedState::from(store.load_or_default());
    if let Some(name) = theme_override {
        match Theme::by_name(&name) {
            Some(theme) => loaded.theme = theme,
            None => warn!("Unknown theme {:?}, keeping {}", name, loaded.theme.name),
        }
    }

    let mut app = AppState::new(LoadedState::default());
    handle_command(&mut app, Command::Loaded(Box::new(loaded)));

    let saver = Saver::spawn(Store::new(store.path()))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app, &saver);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Drain the saver, then write synchronously if anything is still unsaved
    for outcome in saver.shutdown() {
        app.on_saved(outcome);
    }
    if app.is_dirty() {
        if let Err(e) = store.save(&app.schema()) {
            error!("Final save failed: {}", e);
            eprintln!("Error saving state: {}", e);
        }
    }

    if let Err(err) = result {
        error!("Event loop failed: {:#}", err);
        eprintln!("Error: {:#}", err);
    }

    info!("Exiting");
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    saver: &Saver,
) -> Result<()> {
    let mut ticker = Ticker::new(ticker::tick_duration(), Instant::now());

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(ticker.timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = command_for_key(app, key) {
                    if handle_command(app, command) {
                        return Ok(());
                    }
                }
            }
        }

        if ticker.is_due(Instant::now()) {
            handle_command(app, Command::Tick);
        }

        // Hand new revisions to the saver and route finished saves back in
        if let Some(request) = app.take_save_request() {
            if !saver.submit(request) {
                error!("Saver thread is gone, changes will be written on exit");
            }
        }
        while let Some(outcome) = saver.try_recv() {
            handle_command(app, Command::Saved(outcome));
        }

        if let Some(request) = app.take_export_request() {
            let result = export_dir()
                .and_then(|dir| export::export_to_dir(&app.tasks, &app.timeline, &request, &dir))
                .map_err(|err| format!("{:#}", err));
            handle_command(app, Command::Exported(result));
        }
    }
}
