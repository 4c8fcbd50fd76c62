mod app;
mod domain;
mod input;
mod logging;
mod persistence;
mod timer;
mod ui;

use anyhow::Result;
use app::AppState;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use domain::format_hms;
use persistence::{
    archive_file, config_file, ensure_data_dir, init_local_dir, load_config, save_config,
    AppConfig, DayArchive, JsonFileStore, DATE_FORMAT,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "chronolog")]
#[command(about = "A terminal daily task timer with per-day history", long_about = None)]
struct Cli {
    /// Data directory to use instead of .chronolog / ~/.chronolog
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .chronolog directory in the current directory
    Init,
    /// List recorded days, newest first
    Days,
    /// Print the tasks recorded for a day
    Show {
        /// Date to show (YYYY-MM-DD format). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let dir = init_local_dir(&std::env::current_dir()?)?;
            save_config(config_file(&dir), &AppConfig::default())?;
            println!("Initialized chronolog directory: {}", dir.display());
            println!();
            println!("Run 'chronolog' here to start tracking tasks.");
            Ok(())
        }
        Some(Commands::Days) => {
            let archive = open_archive(cli.dir)?;
            if archive.is_empty() {
                println!("No days recorded yet.");
            }
            for date in archive.dates() {
                let count = archive.restore(date).map_or(0, |tasks| tasks.len());
                println!(
                    "{}  {}  {} task(s)",
                    date.format(DATE_FORMAT),
                    format_hms(archive.day_total(date)),
                    count
                );
            }
            Ok(())
        }
        Some(Commands::Show { date }) => {
            let date = match date {
                Some(date_str) => NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
                    .map_err(|e| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e))?,
                None => chrono::Local::now().date_naive(),
            };
            let archive = open_archive(cli.dir)?;
            print_day(&archive, date);
            Ok(())
        }
        None => run_tui(cli.dir),
    }
}

/// Load the archive from the resolved data directory
fn open_archive(dir: Option<PathBuf>) -> Result<DayArchive> {
    let dir = ensure_data_dir(dir.as_deref())?;
    Ok(DayArchive::load(&JsonFileStore::new(archive_file(&dir))))
}

fn print_day(archive: &DayArchive, date: NaiveDate) {
    let Some(tasks) = archive.restore(date) else {
        println!("No tasks recorded for {}.", date.format(DATE_FORMAT));
        return;
    };

    println!("Tasks for {}", date.format(DATE_FORMAT));
    for task in &tasks {
        let edited = if task.edited { "  (edited)" } else { "" };
        println!("  {}  {}{}", format_hms(task.time_spent), task.name, edited);
        for previous in &task.previous_names {
            println!("              was: {}", previous);
        }
    }
    println!("  {}  total", format_hms(archive.day_total(date)));
}

fn run_tui(dir: Option<PathBuf>) -> Result<()> {
    let data_dir = ensure_data_dir(dir.as_deref())?;
    let config = load_config(config_file(&data_dir))?;
    logging::init(&data_dir, &config)?;

    eprintln!("Using chronolog directory: {}", data_dir.display());

    let store = JsonFileStore::new(archive_file(&data_dir));
    let today = chrono::Local::now().date_naive();
    let mut app = AppState::new(Box::new(store), today, config.tick_interval());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Freeze the running task so its time is kept
    app.shutdown();
    if let Err(e) = app.save() {
        tracing::error!(error = %e, "Failed to save on exit");
        eprintln!("Error saving state: {}", e);
    }

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    config: &AppConfig,
) -> Result<()> {
    let poll_interval = config.poll_interval();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Wake up in time for the next timer tick
        let timeout = app
            .until_next_tick(Instant::now())
            .map_or(poll_interval, |until| until.min(poll_interval));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key) {
                    return Ok(());
                }
            }
        }

        app.tick();

        // Autosave if needed
        if app.needs_save {
            app.save()?;
        }
    }
}
