use crate::state::messages::{NetworkRequest, NetworkResponse};
use log::{debug, error};
use sheet_api::client::{ApiError, SheetApi, SheetConfig, advisory};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
const SPINNER_PERIOD: Duration = Duration::from_millis(80);
pub const ERROR_CHAR: char = '!';

/// What the corner spinner shows. Sent to the UI loop on every frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self::finished(true)
    }
}

impl LoadingState {
    /// Frame `n` of the busy animation, wrapping around.
    pub fn busy(n: usize) -> Self {
        Self { is_loading: true, spinner_char: SPINNER_FRAMES[n % SPINNER_FRAMES.len()] }
    }

    /// Blank after success, `!` after a failed refresh until the next one starts.
    pub fn finished(ok: bool) -> Self {
        Self { is_loading: false, spinner_char: if ok { ' ' } else { ERROR_CHAR } }
    }
}

/// Background task pushing spinner frames until stopped.
struct Spinner {
    task: JoinHandle<()>,
    responses: mpsc::Sender<NetworkResponse>,
}

impl Spinner {
    fn start(responses: mpsc::Sender<NetworkResponse>) -> Self {
        let frames = responses.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(SPINNER_PERIOD);
            for n in 0.. {
                ticker.tick().await;
                let frame = NetworkResponse::LoadingStateChanged { loading_state: LoadingState::busy(n) };
                if frames.send(frame).await.is_err() {
                    break;
                }
            }
        });
        Self { task, responses }
    }

    async fn stop(self, ok: bool) {
        self.task.abort();
        let _ = self.task.await;
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state: LoadingState::finished(ok) })
            .await;
    }
}

/// Owns the sheet client. Requests are handled one at a time, so two
/// refreshes never overlap and the last one to finish wins.
pub struct NetworkWorker {
    client: SheetApi,
    sheet: SheetConfig,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
}

impl NetworkWorker {
    pub fn new(
        client: SheetApi,
        sheet: SheetConfig,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self { client, sheet, requests, responses }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            let spinner = Spinner::start(self.responses.clone());

            let result = match request {
                NetworkRequest::Refresh => self.handle_refresh().await,
            };
            spinner.stop(result.is_ok()).await;

            let response = match result {
                Ok(response) => response,
                Err(err) => {
                    let cause = if err.is_network() { "sheet unreachable" } else { "sheet unreadable" };
                    error!("refresh failed, {cause}: {err}");
                    NetworkResponse::Error { message: advisory(&err) }
                }
            };
            if self.responses.send(response).await.is_err() {
                debug!("ui loop gone, stopping network worker");
                break;
            }
        }
    }

    async fn handle_refresh(&self) -> Result<NetworkResponse, ApiError> {
        debug!("refreshing game library from sheet {}", self.sheet.sheet_id);
        let library = self.client.fetch_library(&self.sheet).await?;
        Ok(NetworkResponse::LibraryLoaded { library })
    }
}
