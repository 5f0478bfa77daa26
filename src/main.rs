mod app;
mod domain;
mod error;
mod input;
mod logging;
mod persistence;
mod store;
mod ticker;
mod ui;
mod watchers;

use anyhow::Result;
use app::AppState;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use domain::{checkbox, priority_badge, Filter, Priority, Task};
use persistence::{
    ensure_data_dir, init_local_data_dir, load_filter, FileStorage, MemoryStorage,
    Storage, TASKS_KEY,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use store::TodoStore;
use ticker::SystemClock;
use watchers::{connectivity::DEFAULT_PROBE_ADDR, ProbeConfig};

#[derive(Parser)]
#[command(name = "ticklist")]
#[command(
    about = "A small terminal to-do list with priorities, search and persistent storage",
    long_about = None
)]
struct Cli {
    /// Use this data directory instead of the discovered one
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// host:port probed for the online badge, or "off"
    #[arg(long, global = true, default_value = DEFAULT_PROBE_ADDR)]
    offline_check: String,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Keep tasks in memory only; nothing is loaded or saved
    #[arg(long, global = true)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .ticklist directory in the current directory
    Init,
    /// Print tasks in display order
    List {
        /// all, active or completed. Defaults to the last filter used in the app.
        #[arg(short, long, value_parser = parse_filter)]
        filter: Option<Filter>,
        /// Only tasks containing this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a task
    Add {
        /// Task text (up to 100 characters)
        text: String,
        /// low, medium or high
        #[arg(short, long, value_parser = parse_priority, default_value = "low")]
        priority: Priority,
    },
    /// Print totals and completion rate
    Stats,
}

fn parse_filter(value: &str) -> std::result::Result<Filter, String> {
    Filter::from_tag(value).ok_or_else(|| format!("unknown filter '{}'", value))
}

fn parse_priority(value: &str) -> std::result::Result<Priority, String> {
    Priority::from_tag(value).ok_or_else(|| format!("unknown priority '{}'", value))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Init) => {
            // Initialize local .ticklist directory
            let data_dir = init_local_data_dir(&std::env::current_dir()?)?;
            println!("Initialized ticklist directory: {}", data_dir.display());
            println!();
            println!("ticklist will now keep tasks in this local directory.");
            println!("Run 'ticklist' to open your list.");
            Ok(())
        }
        Some(Commands::List { filter, search }) => {
            logging::init_stderr_logging(cli.verbose)?;
            let store = open_store(&cli)?;
            let filter = filter.unwrap_or_else(|| load_filter(store.storage()));
            let view = store.view(filter, search.as_deref().unwrap_or(""));

            if view.is_empty() {
                println!("No tasks.");
            }
            for task in view.iter() {
                println!("{}", format_task_row(task));
            }
            Ok(())
        }
        Some(Commands::Add { text, priority }) => {
            logging::init_stderr_logging(cli.verbose)?;
            let mut store = open_store(&cli)?;
            let id = store.add(text, *priority)?;
            if !store.last_save_ok() {
                anyhow::bail!("Task was not saved");
            }
            if let Some(task) = store.get(id) {
                println!("Added: {}", format_task_row(task));
            }
            Ok(())
        }
        Some(Commands::Stats) => {
            logging::init_stderr_logging(cli.verbose)?;
            let store = open_store(&cli)?;
            let stats = store.stats();
            println!("Total:      {}", stats.total);
            println!("Active:     {}", stats.active);
            println!("Completed:  {}", stats.completed);
            println!("Completion: {}%", stats.completion_rate);
            Ok(())
        }
        None => {
            // Run the normal TUI application
            run_tui(&cli)
        }
    }
}

/// Storage for this run: the data directory, or memory with `--ephemeral`
fn open_storage(cli: &Cli) -> Result<Box<dyn Storage>> {
    if cli.ephemeral {
        return Ok(Box::new(MemoryStorage::new()));
    }
    let data_dir = ensure_data_dir(cli.data_dir.as_deref())?;
    Ok(Box::new(FileStorage::new(data_dir)))
}

fn open_store(cli: &Cli) -> Result<TodoStore> {
    let storage = open_storage(cli)?;
    Ok(TodoStore::open(storage, Box::new(SystemClock), TASKS_KEY))
}

/// One task as a plain text row
fn format_task_row(task: &Task) -> String {
    format!(
        "{} {}  {}  #{}  {}",
        checkbox(task.completed),
        priority_badge(task.priority),
        task.created_label(),
        task.id,
        task.text
    )
}

/// Terminal title showing how many tasks are still open
fn window_title(tasks: &[Task]) -> String {
    let active = tasks.iter().filter(|t| !t.completed).count();
    if active == 0 {
        "ticklist".to_string()
    } else {
        format!("ticklist ({} active)", active)
    }
}

fn set_window_title(tasks: &[Task]) {
    if let Err(e) = execute!(io::stdout(), SetTitle(window_title(tasks))) {
        tracing::debug!(error = %e, "could not set terminal title");
    }
}

fn run_tui(cli: &Cli) -> Result<()> {
    // Ensure data directory exists; the log lives there even with --ephemeral
    let data_dir = ensure_data_dir(cli.data_dir.as_deref())?;
    logging::init_file_logging(&data_dir, cli.verbose)?;
    tracing::info!(dir = %data_dir.display(), ephemeral = cli.ephemeral, "starting");

    let mut store = open_store(cli)?;
    let filter = load_filter(store.storage());

    // Terminal title follows the active count
    set_window_title(store.tasks());
    let title_subscription = store.subscribe(|_, tasks| set_window_title(tasks));

    // Create app state
    let mut app = AppState::new(store, filter);
    app.start_watchers(&ProbeConfig::parse(&cli.offline_check));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Teardown watchers and listeners before the terminal goes back
    app.stop_watchers();
    app.store.unsubscribe(title_subscription);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, SetTitle(""))?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "exited with error");
    }
    tracing::info!("stopped");

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press && input::handle_key(app, key) {
                    return Ok(());
                }
            }
        }

        // Clock, connectivity and search debounce
        app.tick(Instant::now());
    }
}
