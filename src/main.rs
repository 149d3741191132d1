mod api;
mod app;
mod catalog;
mod config;
mod fetch;
mod logging;
mod route;
mod ui;

use api::Source;
use app::{App, InputMode};
use clap::{Parser, Subcommand};
use config::{Config, ConfigOverrides};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use fetch::Recommenders;
use fetch::messages::{self, FetchReceiver, FetchSender};
use route::Route;
use std::path::PathBuf;

/// TUI client for the collaborative and content-based item recommenders
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (JSON). Defaults to the platform config directory.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the recommender API
    #[arg(long, env = "RECOMMENDER_API_URL")]
    api_url: Option<String>,

    /// Per-request timeout in seconds (none by default)
    #[arg(long)]
    timeout: Option<u64>,

    /// Where to write the diagnostic log
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TUI (default)
    Run {
        /// Path of the page to open first
        #[arg(short, long)]
        route: Option<String>,

        /// Preselect an item id on the recommender page
        #[arg(short, long)]
        item: Option<String>,
    },
    /// Fetch recommendations for one item and print them
    Recommend {
        /// Item id from the catalog
        item: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the item ids the recommenders know about
    Items,
}

/// What key handlers need to start a fetch cycle.
struct FetchContext {
    recommenders: Recommenders,
    tx: FetchSender,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Commands::Run {
        route: None,
        item: None,
    });

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply(ConfigOverrides {
        api_base_url: cli.api_url,
        request_timeout_secs: cli.timeout,
        initial_route: match &command {
            Commands::Run { route, .. } => route.clone(),
            _ => None,
        },
        log_file: cli.log_file,
    });

    match config.log_path() {
        Ok(path) => {
            if let Err(e) = logging::init(&path) {
                eprintln!("Warning: logging disabled ({}): {e}", path.display());
            }
        }
        Err(e) => eprintln!("Warning: logging disabled: {e}"),
    }
    tracing::info!(api = %config.api_base_url, timeout = ?config.request_timeout(), "starting");

    let recommenders = Recommenders::from_config(&config)?;

    match command {
        Commands::Items => {
            for id in catalog::VALID_ITEM_IDS {
                println!("{id}");
            }
        }
        Commands::Recommend { item, json } => {
            if !catalog::is_valid(&item) {
                eprintln!("Error: unknown item id: {item} (see `items`)");
                std::process::exit(1);
            }
            match recommenders.fetch(&item).await {
                Ok(results) => print_results(&item, &results, json)?,
                Err(e) => {
                    tracing::error!(item_id = %item, error = %e, "error fetching recommendations");
                    eprintln!("Error: {}", e.user_message());
                    std::process::exit(1);
                }
            }
        }
        Commands::Run { item, .. } => {
            let mut app = App::new(Route::parse(&config.initial_route));
            if let Some(item) = item {
                if !app.recommender.select(&item) {
                    eprintln!("Error: unknown item id: {item} (see `items`)");
                    std::process::exit(1);
                }
            }

            let (tx, mut rx) = messages::channel();
            let ctx = FetchContext { recommenders, tx };

            // Init terminal
            let mut terminal = ratatui::init();

            // Main loop
            let result = run_app(&mut terminal, &mut app, &ctx, &mut rx).await;

            // Restore terminal
            ratatui::restore();

            if let Err(e) = result {
                tracing::error!(error = %e, "terminal loop failed");
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }

    tracing::info!("exiting");
    Ok(())
}

fn print_results(
    item_id: &str,
    results: &api::RecommendationSet,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let mut body = serde_json::Map::new();
        body.insert("itemId".to_string(), item_id.into());
        for source in Source::ALL {
            body.insert(source.key().to_string(), results.get(source).into());
        }
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    for source in Source::ALL {
        println!("{}", source.title());
        let items = results.get(source);
        if items.is_empty() {
            println!("  No recommendations yet.");
        }
        for (i, item) in items.iter().enumerate() {
            println!("  {:>2}. {item}", i + 1);
        }
    }
    Ok(())
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    ctx: &FetchContext,
    rx: &mut FetchReceiver,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        for result in messages::drain(rx) {
            app.apply_fetch(result);
        }

        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Poll for events with a 250ms timeout
        if crossterm::event::poll(std::time::Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key(app, ctx, key);
            }
        }
    }
}

fn handle_key(app: &mut App, ctx: &FetchContext, key: KeyEvent) {
    // Help toggle (global)
    if key.code == KeyCode::Char('?') && app.input_mode == InputMode::Normal {
        app.show_help = !app.show_help;
        return;
    }

    // If help is showing, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    if app.input_mode == InputMode::Editing {
        handle_path_input(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
        }
        KeyCode::Tab => {
            let next = app.route.next();
            app.go_to(next);
        }
        KeyCode::BackTab => {
            let prev = app.route.prev();
            app.go_to(prev);
        }
        KeyCode::Char(':') => {
            app.start_path_prompt();
        }
        KeyCode::Esc => {
            app.go_to(Route::Home);
        }
        _ if app.route == Route::Recommender => handle_recommender_key(app, ctx, key),
        _ => {}
    }
}

fn handle_path_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.submit_path_prompt();
        }
        KeyCode::Esc => {
            app.cancel_path_prompt();
        }
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        KeyCode::Char(c) => {
            app.path_input.push(c);
        }
        _ => {}
    }
}

fn handle_recommender_key(app: &mut App, ctx: &FetchContext, key: KeyEvent) {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            app.recommender.cursor_next();
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.recommender.cursor_prev();
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            app.recommender.commit_cursor();
        }
        KeyCode::Char('r') => {
            if let Some((generation, item_id)) = app.request_recommendations() {
                fetch::spawn_cycle(ctx.recommenders.clone(), generation, item_id, ctx.tx.clone());
            }
        }
        _ => {}
    }
}
