use crate::state::network::LoadingState;
use crossterm::event::KeyEvent;
use sheet_api::Library;

#[derive(Debug, Clone)]
pub enum NetworkRequest {
    /// Fetch the games tab, then the optional stations tab.
    Refresh,
}

#[derive(Debug)]
pub enum NetworkResponse {
    LoadingStateChanged { loading_state: LoadingState },
    LibraryLoaded { library: Library },
    /// Advisory text for the status line; the previous library stays on screen.
    Error { message: String },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    /// Once a second, keeps the clock and ticket age current.
    ClockTick,
}
