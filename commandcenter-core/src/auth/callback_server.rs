//! Local HTTP listener that catches the OAuth redirect
//! (`GET /callback?code=..&state=..` or `?error=..`).

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
};
use axum_server::Handle;
use parking_lot::Mutex;
use serde::Deserialize;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::Error;

/// What the browser brought back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    Code { code: String, state: Option<String> },
    /// The operator declined, or Twitch rejected the request.
    Denied(String),
}

#[derive(Debug, Deserialize)]
struct RedirectParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

#[derive(Clone)]
struct ListenerState {
    outcome_tx: Arc<Mutex<Option<oneshot::Sender<CallbackOutcome>>>>,
}

/// A bound callback listener. Dropping it stops the server.
pub struct CallbackListener {
    addr: SocketAddr,
    outcome_rx: oneshot::Receiver<CallbackOutcome>,
    handle: Handle,
}

impl CallbackListener {
    /// Binds 127.0.0.1:`port` (0 picks a free port) and starts serving.
    pub fn bind(port: u16) -> Result<Self, Error> {
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], port)))
            .map_err(|e| Error::Auth(format!("Port {} not available: {}", port, e)))?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;

        let (outcome_tx, outcome_rx) = oneshot::channel();
        let state = ListenerState {
            outcome_tx: Arc::new(Mutex::new(Some(outcome_tx))),
        };
        let app = Router::new()
            .route("/callback", get(on_redirect))
            .with_state(state)
            .layer(TraceLayer::new_for_http());

        let handle = Handle::new();
        let server = axum_server::from_tcp(listener)
            .handle(handle.clone())
            .serve(app.into_make_service());
        tokio::spawn(async move {
            if let Err(e) = server.await {
                error!("Callback listener error: {}", e);
            }
        });
        info!("OAuth callback listener on http://{}", addr);

        Ok(Self { addr, outcome_rx, handle })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Waits for the first redirect, then shuts the listener down.
    pub async fn wait(mut self, timeout: Duration) -> Result<CallbackOutcome, Error> {
        let result = tokio::time::timeout(timeout, &mut self.outcome_rx).await;
        self.handle.graceful_shutdown(Some(Duration::from_secs(1)));

        match result {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(_)) => Err(Error::Auth("Callback listener closed before a redirect arrived".into())),
            Err(_) => Err(Error::Auth(format!("No OAuth callback within {} s", timeout.as_secs()))),
        }
    }
}

impl Drop for CallbackListener {
    fn drop(&mut self) {
        self.handle.shutdown();
    }
}

async fn on_redirect(
    State(state): State<ListenerState>,
    Query(params): Query<RedirectParams>,
) -> (StatusCode, Html<String>) {
    let (outcome, page) = match (params.code, params.error) {
        (_, Some(err)) => {
            let desc = params.error_description.unwrap_or_default();
            let page = format!("<h2>Authorization failed</h2><p>{}</p><p>{}</p>", err, desc);
            (CallbackOutcome::Denied(format!("{} {}", err, desc).trim().to_string()), page)
        }
        (Some(code), None) => (
            CallbackOutcome::Code { code, state: params.state },
            "<h2>Authorization received</h2><p>Return to the terminal to copy the refresh token.</p>"
                .to_string(),
        ),
        (None, None) => {
            return (
                StatusCode::BAD_REQUEST,
                Html("<h2>Missing 'code' query parameter</h2>".to_string()),
            );
        }
    };

    if let Some(tx) = state.outcome_tx.lock().take() {
        let _ = tx.send(outcome);
    }
    (StatusCode::OK, Html(page))
}
