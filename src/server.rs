//! HTTP front of the forwarder
//!
//! `GET /` answers with a greeting so the service can be probed from a
//! browser, `POST` requests carry the events to forward.

use crate::{normalize, Error, Forwarder, Mode, Relay, Result};
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Largest request body accepted
pub const BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Creates the router serving `forwarder`
///
/// In [`Mode::Managed`] events are accepted on every path, in [`Mode::Raw`]
/// only on `/`.
pub fn router<R>(forwarder: Arc<Forwarder<R>>, mode: Mode) -> Router
where
    R: Relay,
{
    let service = forwarder.name().to_owned();
    let trace = TraceLayer::new_for_http().make_span_with(move |request: &Request| {
        tracing::info_span!(
            "request",
            service = %service,
            method = %request.method(),
            uri = %request.uri()
        )
    });

    let router = Router::new().route("/", get(greet::<R>).post(receive::<R>));

    let router = match mode {
        Mode::Managed => router.route("/{*path}", post(receive::<R>)),
        Mode::Raw => router,
    };

    router.layer(trace).with_state(forwarder)
}

/// Serves `forwarder` on `addr` until Ctrl-C or SIGTERM
pub async fn serve<R>(forwarder: Forwarder<R>, mode: Mode, addr: SocketAddr) -> Result<()>
where
    R: Relay,
{
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(addr = %listener.local_addr()?, ?mode, "Listening for events");

    axum::serve(listener, router(Arc::new(forwarder), mode))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Stopped forwarding");

    Ok(())
}

async fn greet<R>(State(forwarder): State<Arc<Forwarder<R>>>) -> String
where
    R: Relay,
{
    tracing::debug!("Handling GET");

    format!("Hello from {}\n", forwarder.name())
}

async fn receive<R>(State(forwarder): State<Arc<Forwarder<R>>>, request: Request) -> Response
where
    R: Relay,
{
    match handle(&forwarder, request).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => error.into_response(),
    }
}

async fn handle<R>(forwarder: &Forwarder<R>, request: Request) -> Result<()>
where
    R: Relay,
{
    let (parts, body) = request.into_parts();
    let body = read_body(body).await?;

    let event = normalize(&parts.headers, &body)?;
    let _ = forwarder.forward(event).await?;

    Ok(())
}

async fn read_body(body: Body) -> Result<bytes::Bytes> {
    to_bytes(body, BODY_LIMIT)
        .await
        .map_err(|error| Error::BodyRead(error.to_string()))
}

impl Error {
    /// HTTP status reported to the sender of the event
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::BodyRead(_) => StatusCode::BAD_REQUEST,
            error if error.is_delivery() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match self {
            Self::BodyRead(ref error) => {
                tracing::error!(%error, "Error reading body");
                "can't read body".to_owned()
            }
            ref error if error.is_delivery() => {
                tracing::error!(%error, "Failed to forward event");
                format!("failed to forward event: {}", error)
            }
            ref error => {
                tracing::error!(%error, "Couldn't accept event");
                error.to_string()
            }
        };

        let mut headers = HeaderMap::new();
        let _ = headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );

        (status, headers, format!("{}\n", message)).into_response()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(ref error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "Couldn't listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                let _ = signal.recv().await;
            }
            Err(ref error) => tracing::error!(%error, "Couldn't listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down");
}
