use crate::app::{App, MenuItem};
use crate::state::messages::NetworkRequest;
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

pub async fn handle_key_bindings(
    key_event: KeyEvent,
    app: &Arc<Mutex<App>>,
    network_requests: &mpsc::Sender<NetworkRequest>,
) {
    let mut guard = app.lock().await;

    if let (Char('c'), KeyModifiers::CONTROL) = (key_event.code, key_event.modifiers) {
        quit();
    }

    // Search box captures everything typed until Enter or Esc.
    if guard.state.catalog.editing_search {
        match key_event.code {
            KeyCode::Enter => guard.finish_search(),
            KeyCode::Esc => guard.cancel_search(),
            KeyCode::Backspace => guard.state.catalog.pop_search_char(),
            Char(c) => guard.state.catalog.push_search_char(c),
            _ => {}
        }
        return;
    }

    // The trailer modal sits on top of every view.
    if guard.state.trailer.is_some() {
        match key_event.code {
            KeyCode::Esc | KeyCode::Enter | Char('t') | Char('x') => guard.close_trailer(),
            Char('q') => quit(),
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) => quit(),

        // View switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Games),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Appointments),
        (_, Char('3'), _) => guard.update_tab(MenuItem::Featured),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Manual refresh
        (_, Char('r'), _) | (_, KeyCode::F(5), _) => {
            guard.on_refresh_requested();
            drop(guard);
            let _ = network_requests.send(NetworkRequest::Refresh).await;
            return;
        }

        // Search and filters
        (MenuItem::Games, Char('/'), _) | (MenuItem::Games, Char('s'), _) => guard.start_search(),
        (MenuItem::Games, Char('p'), _) => guard.state.catalog.cycle_platform(true),
        (MenuItem::Games, Char('P'), _) => guard.state.catalog.cycle_platform(false),
        (MenuItem::Games, Char('g'), _) => guard.state.catalog.cycle_genre(true),
        (MenuItem::Games, Char('G'), _) => guard.state.catalog.cycle_genre(false),
        (MenuItem::Games, Char('o'), _) => guard.state.catalog.cycle_sort(),
        (MenuItem::Games, Char('c'), _) | (MenuItem::Games, KeyCode::Esc, _) => {
            guard.state.catalog.clear_filters()
        }

        // Card navigation
        (MenuItem::Games | MenuItem::Featured, Char('l') | KeyCode::Right, _) => guard.move_selection(1),
        (MenuItem::Games | MenuItem::Featured, Char('h') | KeyCode::Left, _) => guard.move_selection(-1),
        (MenuItem::Games | MenuItem::Featured, Char('j') | KeyCode::Down, _) => guard.move_row(1),
        (MenuItem::Games | MenuItem::Featured, Char('k') | KeyCode::Up, _) => guard.move_row(-1),
        (MenuItem::Games | MenuItem::Featured, KeyCode::Enter | Char('t'), _) => guard.open_trailer(),
        (MenuItem::Games | MenuItem::Featured, Char('b'), _) => guard.book_selected(),

        // Queue tickets
        (MenuItem::Appointments, KeyCode::Enter | Char('n'), _) => guard.issue_ticket(None),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('v'), _) => guard.toggle_show_issues(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}

fn quit() -> ! {
    crate::cleanup_terminal();
    std::process::exit(0);
}
