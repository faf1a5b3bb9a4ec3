//! Route handlers.
//!
//! Each handler is a stateless transform from request to response that
//! opens a child span for its own operation under the request's server
//! span and emits log records while that span's context is current.

use std::time::Duration;

use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use opentelemetry::trace::{FutureExt, Span, Status, TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};
use rand::Rng;

use crate::http::server::AppState;

/// GET /rolldice/ and /rolldice/{player}
///
/// Rolls a six-sided die and reports the result as "{roll}\n".
pub async fn rolldice(
    State(state): State<AppState>,
    Extension(parent_cx): Extension<Context>,
    player: Option<Path<String>>,
) -> Response {
    let tracer = state.telemetry.tracer();
    let span = tracer
        .span_builder("roll")
        .start_with_context(tracer, &parent_cx);
    let cx = parent_cx.with_span(span);
    // Attach so the log record below is correlated with the roll span.
    let _guard = cx.clone().attach();

    let roll = rand::thread_rng().gen_range(1..=6);

    match &player {
        Some(Path(player)) => {
            tracing::info!(result = roll, "{player} is rolling the dice");
        }
        None => {
            tracing::info!(result = roll, "Anonymous player is rolling the dice");
        }
    }

    cx.span().end();
    (StatusCode::OK, format!("{roll}\n")).into_response()
}

/// GET /api1
///
/// Calls /api2 through the instrumented client and summarizes the peer's
/// status. Outbound failures are recorded on the span and converted to a
/// 500 response; they never propagate past this handler.
pub async fn api1(
    State(state): State<AppState>,
    Extension(parent_cx): Extension<Context>,
) -> Response {
    let tracer = state.telemetry.tracer();
    let mut span = tracer
        .span_builder("api1")
        .start_with_context(tracer, &parent_cx);
    span.set_attribute(KeyValue::new("event", "api1 called"));
    let cx = parent_cx.with_span(span);

    let url = format!("{}/api2", state.peer_base.trim_end_matches('/'));
    match state.client.get(&cx, &url).await {
        Ok(response) => {
            let status = response.status();
            let span = cx.span();
            span.set_attribute(KeyValue::new(
                "api2.status_code",
                i64::from(status.as_u16()),
            ));
            span.end();
            (
                StatusCode::OK,
                format!("api1 called api2, response status: {}\n", status.as_u16()),
            )
                .into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "Call to api2 failed");
            let span = cx.span();
            span.record_error(&err);
            span.set_status(Status::error("call to api2 failed"));
            span.end();
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to call api2\n").into_response()
        }
    }
}

/// GET /api2
///
/// Simulates work with a fixed delay, then greets.
pub async fn api2(
    State(state): State<AppState>,
    Extension(parent_cx): Extension<Context>,
) -> Response {
    let tracer = state.telemetry.tracer();
    let mut span = tracer
        .span_builder("api2")
        .start_with_context(tracer, &parent_cx);
    span.set_attribute(KeyValue::new("event", "api2 called"));
    let cx = parent_cx.with_span(span);

    // Simulate some work.
    tokio::time::sleep(Duration::from_millis(100))
        .with_context(cx.clone())
        .await;

    cx.span().end();
    (StatusCode::OK, "Hello from api2!\n").into_response()
}
