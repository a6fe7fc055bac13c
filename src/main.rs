mod app;
mod components;
mod draw;
mod keys;
mod state;
mod ui;

use crate::app::App;
use crate::state::app_settings::AppSettings;
use crate::state::messages::{NetworkRequest, NetworkResponse, UiEvent};
use crate::state::network::{LoadingState, NetworkWorker};
use crate::state::refresher::PeriodicRefresher;
use crossterm::event::{self as crossterm_event, Event};
use crossterm::{cursor, execute, terminal};
use log::error;
use sheet_api::catalog;
use sheet_api::client::{SheetApi, advisory};
use sheet_api::markup::{KioskPage, kiosk_page};
use std::io::Stdout;
use std::sync::Arc;
use std::{io, panic};
use tokio::sync::{Mutex, mpsc};
use tokio::time::Duration;
use tui::{Terminal, backend::CrosstermBackend};

enum Mode {
    Kiosk,
    Html,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(mode) = handle_cli_args() else {
        return Ok(());
    };

    let settings = AppSettings::load();
    let client = SheetApi::new()
        .with_base_url(settings.base_url.clone())
        .with_timeout(settings.timeout);

    if let Mode::Html = mode {
        return print_html(&client, &settings).await;
    }

    better_panic::install();

    let backend = CrosstermBackend::new(io::stdout());
    let terminal = Terminal::new(backend)?;

    setup_panic_hook();
    setup_terminal()?;

    tui_logger::init_logger(log::LevelFilter::Trace)?;
    tui_logger::set_default_level(log::LevelFilter::Info);

    let refresh_every = settings.refresh_every;
    let sheet = settings.sheet.clone();
    let app = Arc::new(Mutex::new(App::new(settings)));

    let (ui_event_tx, ui_event_rx) = mpsc::channel::<UiEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input handler thread
    let input_handler = tokio::spawn(input_handler_task(ui_event_tx.clone()));

    // Network thread
    let network_worker = NetworkWorker::new(client, sheet, network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    // Periodic sheet refresh thread
    let periodic_task = refresh_every.map(|every| {
        let refresher = PeriodicRefresher::new(network_req_tx.clone(), every);
        tokio::spawn(refresher.run())
    });

    // Clock tick thread: header clock and ticket age
    let clock_tx = ui_event_tx.clone();
    let clock_task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            if clock_tx.send(UiEvent::ClockTick).await.is_err() {
                break;
            }
        }
    });

    // Trigger library load on startup
    let _ = ui_event_tx.send(UiEvent::AppStarted).await;

    main_ui_loop(terminal, app, ui_event_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();
    if let Some(task) = periodic_task {
        task.abort();
    }
    clock_task.abort();

    Ok(())
}

fn handle_cli_args() -> Option<Mode> {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return Some(Mode::Kiosk);
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            None
        }
        "-V" | "--version" => {
            println!("kickoff-kiosk {}", env!("CARGO_PKG_VERSION"));
            None
        }
        "--html" => Some(Mode::Html),
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "kickoff-kiosk - game library kiosk backed by a published Google Sheet

Usage:
  kickoff-kiosk            run the terminal kiosk
  kickoff-kiosk --html     fetch once and print a static kiosk page to stdout
  kickoff-kiosk --help
  kickoff-kiosk --version

Environment:
  KIOSK_SHEET_ID       Spreadsheet document id
  KIOSK_GAMES_TAB      Games tab name (default Games)
  KIOSK_GAMES_GID      Games tab numeric id, tried when the name fails
  KIOSK_STATIONS_TAB   Stations tab name (default Stations, empty disables)
  KIOSK_STATIONS_GID   Stations tab numeric id
  KIOSK_FORMAT         json (default) or csv export
  KIOSK_REFRESH_SECS   Auto refresh period, 0 disables (default 300)
  KIOSK_TIMEOUT_SECS   Request timeout (default 10)
  KIOSK_LOG_LEVEL      error|warn|info|debug|trace
  KIOSK_TITLE          Header title
  KIOSK_BASE_URL       Override https://docs.google.com"
}

/// One-shot export for signage screens that only show a browser.
async fn print_html(client: &SheetApi, settings: &AppSettings) -> anyhow::Result<()> {
    let library = match client.fetch_library(&settings.sheet).await {
        Ok(library) => library,
        Err(err) => {
            eprintln!("{}", advisory(&err));
            std::process::exit(1);
        }
    };

    let games = catalog::visible_games(&library.games, &catalog::Query::default());
    let featured = catalog::featured_games(&library.games);
    let platforms = catalog::platform_options(&library.games);
    let genres = catalog::genre_options(&library.games);
    let updated = library
        .fetched_at
        .map(|t| t.format("%b %-d, %-I:%M %p").to_string())
        .unwrap_or_default();

    for issue in &library.issues {
        let problems: Vec<&str> = issue.problems.iter().map(|p| p.label()).collect();
        eprintln!("row {}: {}", issue.row, problems.join(", "));
    }

    print!(
        "{}",
        kiosk_page(&KioskPage {
            title: &settings.kiosk_title,
            games: &games,
            featured: &featured,
            stations: &library.stations,
            platforms: &platforms,
            genres: &genres,
            updated: &updated,
        })
    );
    Ok(())
}

async fn main_ui_loop(
    mut terminal: Terminal<CrosstermBackend<Stdout>>,
    app: Arc<Mutex<App>>,
    mut ui_events: mpsc::Receiver<UiEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut loading = LoadingState::default();

    loop {
        tokio::select! {
            Some(ui_event) = ui_events.recv() => {
                let should_redraw = handle_ui_event(ui_event, &app, &network_requests).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }

            Some(response) = network_responses.recv() => {
                let should_redraw = handle_network_response(response, &app, &mut loading).await;
                if should_redraw {
                    let mut app_guard = app.lock().await;
                    draw::draw(&mut terminal, &mut app_guard, loading);
                }
            }
        }
    }
}

async fn handle_ui_event(
    ui_event: UiEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) -> bool {
    match ui_event {
        UiEvent::AppStarted => {
            app.lock().await.tick_clock();
            let _ = network_requests.send(NetworkRequest::Refresh).await;
            true
        }
        UiEvent::KeyPressed(key_event) => {
            keys::handle_key_bindings(key_event, app, network_requests).await;
            true
        }
        UiEvent::Resize => true,
        UiEvent::ClockTick => {
            app.lock().await.tick_clock();
            true
        }
    }
}

async fn handle_network_response(
    response: NetworkResponse,
    app: &Arc<Mutex<App>>,
    loading: &mut LoadingState,
) -> bool {
    match response {
        NetworkResponse::LoadingStateChanged { loading_state } => {
            *loading = loading_state;
        }
        NetworkResponse::LibraryLoaded { library } => {
            let mut guard = app.lock().await;
            guard.on_library_loaded(library);
        }
        NetworkResponse::Error { message } => {
            error!("Network error: {message}");
            let mut guard = app.lock().await;
            guard.on_error(message);
        }
    }
    true
}

async fn input_handler_task(ui_events: mpsc::Sender<UiEvent>) {
    loop {
        if let Ok(event) = crossterm_event::read() {
            let ui_event = match event {
                Event::Key(key_event) => Some(UiEvent::KeyPressed(key_event)),
                Event::Resize(_, _) => Some(UiEvent::Resize),
                _ => None,
            };

            if let Some(ui_event) = ui_event
                && ui_events.send(ui_event).await.is_err()
            {
                break;
            }
        }
    }
}

fn setup_terminal() -> io::Result<()> {
    execute!(
        io::stdout(),
        cursor::Hide,
        terminal::EnterAlternateScreen,
        terminal::Clear(terminal::ClearType::All)
    )?;
    terminal::enable_raw_mode()
}

/// Restore the shell's screen. Safe to call more than once.
pub fn cleanup_terminal() {
    let _ = terminal::disable_raw_mode();
    let _ = execute!(
        io::stdout(),
        cursor::MoveTo(0, 0),
        terminal::Clear(terminal::ClearType::All),
        terminal::LeaveAlternateScreen,
        cursor::Show
    );
}

fn setup_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        cleanup_terminal();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));
}
