//! Request trace instrumentation.
//!
//! # Responsibilities
//! - Start a server span for every inbound request
//! - Name spans by the matched route pattern, not the raw path, so
//!   `/rolldice/{player}` collapses to one name for every player
//! - Record standard HTTP attributes (method, route, status code)
//! - Make the active trace context available to handlers and keep it
//!   current while the handler future is polled
//!
//! # Design Decisions
//! - Remote parents are honored: the W3C `traceparent` header, when
//!   present, makes the server span a child of the caller's span
//! - The span is ended explicitly on the response path; if the connection
//!   is aborted mid-request the span still ends when its context drops

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use opentelemetry::trace::{FutureExt, SpanKind, Status, TraceContextExt, Tracer};
use opentelemetry::KeyValue;
use opentelemetry_semantic_conventions::attribute::{
    HTTP_REQUEST_METHOD, HTTP_RESPONSE_STATUS_CODE, HTTP_ROUTE,
};

use crate::http::server::AppState;

/// Outer middleware wrapping the full route table.
pub async fn trace_requests(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let parent_cx = state.telemetry.extract_context(request.headers());

    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_owned());
    let span_name = match &route {
        Some(route) => format!("{} {}", request.method(), route),
        None => request.method().to_string(),
    };

    let mut attributes = vec![KeyValue::new(
        HTTP_REQUEST_METHOD,
        request.method().to_string(),
    )];
    if let Some(route) = route {
        attributes.push(KeyValue::new(HTTP_ROUTE, route));
    }

    let tracer = state.telemetry.tracer();
    let span = tracer
        .span_builder(span_name)
        .with_kind(SpanKind::Server)
        .with_attributes(attributes)
        .start_with_context(tracer, &parent_cx);
    let cx = parent_cx.with_span(span);

    // Handlers retrieve the context from request extensions; the
    // with_context wrapper additionally makes it current for anything that
    // reads Context::current(), such as the log bridge.
    request.extensions_mut().insert(cx.clone());
    let response = next.run(request).with_context(cx.clone()).await;

    let span = cx.span();
    span.set_attribute(KeyValue::new(
        HTTP_RESPONSE_STATUS_CODE,
        i64::from(response.status().as_u16()),
    ));
    if response.status().is_server_error() {
        span.set_status(Status::error(response.status().to_string()));
    }
    span.end();

    response
}
