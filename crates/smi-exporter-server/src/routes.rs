use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, Response},
    response::IntoResponse,
    routing::get,
    Router,
};
use smi_exporter_services::Exporter;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{panic_response, AppError, WRONG_ROUTE_MESSAGE};

pub fn router(exporter: Arc<Exporter>) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    Router::new()
        .route(
            "/metrics",
            // axum answers HEAD with the GET handler unless HEAD is routed
            get(metrics).head(wrong_route).fallback(wrong_route),
        )
        .fallback(wrong_route)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(trace_layer)
        .with_state(exporter)
}

async fn metrics(State(exporter): State<Arc<Exporter>>) -> Result<impl IntoResponse, AppError> {
    let body = exporter.scrape().await?;
    Ok(([(header::CONTENT_TYPE, exporter.content_type())], body))
}

async fn wrong_route() -> AppError {
    AppError::BadRequest(WRONG_ROUTE_MESSAGE.to_string())
}
