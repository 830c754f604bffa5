//! Development server with live reload and redirects.
//!
//! Vanity paths from `[[redirects]]` are answered with a real `308` (or `307`)
//! before the static file service is consulted.

use std::{path::Path, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::{self, Next},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::get,
};
use folio_core::RedirectTable;
use tokio::sync::broadcast;
use tokio_stream::{StreamExt, wrappers::BroadcastStream};
use tower_http::services::ServeDir;

/// Live reload message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadMessage {
    /// Full page reload.
    Reload,
}

/// Server state shared by every handler.
#[derive(Clone)]
pub struct ServerState {
    /// Broadcast channel for live reload events.
    pub reload_tx: broadcast::Sender<ReloadMessage>,

    /// Vanity redirects.
    pub redirects: RedirectTable,
}

impl ServerState {
    /// Create a new server state.
    pub fn new(redirects: RedirectTable) -> Self {
        let (reload_tx, _) = broadcast::channel(16);
        Self {
            reload_tx,
            redirects,
        }
    }

    /// Send a reload notification to all connected clients.
    pub fn notify_reload(&self) {
        let _ = self.reload_tx.send(ReloadMessage::Reload);
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new(RedirectTable::default())
    }
}

/// Create the development server router.
pub fn create_router(output_dir: &Path, state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/__livereload", get(livereload_handler))
        .fallback_service(ServeDir::new(output_dir))
        .layer(middleware::from_fn_with_state(state.clone(), redirect_middleware))
        .with_state(state)
}

/// Answer configured vanity paths with an HTTP redirect.
async fn redirect_middleware(
    State(state): State<Arc<ServerState>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(rule) = state.redirects.resolve(request.uri().path()) else {
        return next.run(request).await;
    };

    let status = StatusCode::from_u16(rule.status_code()).unwrap_or(StatusCode::PERMANENT_REDIRECT);
    match HeaderValue::from_str(&rule.destination) {
        Ok(location) => {
            tracing::debug!(
                source = %rule.source,
                destination = %rule.destination,
                status = status.as_u16(),
                "redirecting"
            );
            (status, [(header::LOCATION, location)]).into_response()
        }
        Err(e) => {
            tracing::warn!(destination = %rule.destination, error = %e, "invalid redirect destination");
            next.run(request).await
        }
    }
}

/// Server-Sent Events handler for live reload.
async fn livereload_handler(
    State(state): State<Arc<ServerState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>> {
    let rx = state.reload_tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(ReloadMessage::Reload) => Some(Ok(Event::default().data("reload"))),
        // Lagged receivers just wait for the next build.
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(30)).text("ping"))
}

/// JavaScript snippet injected into served pages for live reload.
pub const LIVERELOAD_SCRIPT: &str = r#"
<script data-livereload>
(function() {
    const source = new EventSource('/__livereload');
    source.onmessage = function(event) {
        if (event.data === 'reload') {
            window.location.reload();
        }
    };
    source.onerror = function() {
        console.log('[livereload] Connection lost, retrying...');
    };
})();
</script>
"#;
