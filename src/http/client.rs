//! Outbound instrumented HTTP client.
//!
//! Every outbound call carries the active trace context as W3C headers, so
//! the receiving side reconstructs the parent-child span relationship.
//! This is applied uniformly; there is no un-instrumented escape hatch.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use hyper::body::Incoming;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use opentelemetry::trace::{FutureExt, SpanKind, Status, TraceContextExt, Tracer};
use opentelemetry::{Context, KeyValue};
use opentelemetry_semantic_conventions::attribute::{
    HTTP_REQUEST_METHOD, HTTP_RESPONSE_STATUS_CODE, URL_FULL,
};
use thiserror::Error;

use crate::telemetry::Telemetry;

/// Error type for outbound calls.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build outbound request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("outbound request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),
}

/// HTTP client that propagates trace context on every call.
#[derive(Clone)]
pub struct PeerClient {
    inner: Client<HttpConnector, Body>,
    telemetry: Arc<Telemetry>,
}

impl PeerClient {
    pub fn new(telemetry: Arc<Telemetry>) -> Self {
        let inner = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { inner, telemetry }
    }

    /// Issue a GET to `url` as a client span under `parent_cx`, injecting
    /// the context into the request headers.
    pub async fn get(
        &self,
        parent_cx: &Context,
        url: &str,
    ) -> Result<Response<Incoming>, ClientError> {
        let mut request = Request::builder()
            .method(Method::GET)
            .uri(url)
            .body(Body::empty())?;

        let tracer = self.telemetry.tracer();
        let span = tracer
            .span_builder(format!("GET {}", request.uri().path()))
            .with_kind(SpanKind::Client)
            .with_attributes([
                KeyValue::new(HTTP_REQUEST_METHOD, "GET"),
                KeyValue::new(URL_FULL, request.uri().to_string()),
            ])
            .start_with_context(tracer, parent_cx);
        let cx = parent_cx.with_span(span);

        self.telemetry.inject_context(&cx, request.headers_mut());

        match self.inner.request(request).with_context(cx.clone()).await {
            Ok(response) => {
                let span = cx.span();
                span.set_attribute(KeyValue::new(
                    HTTP_RESPONSE_STATUS_CODE,
                    i64::from(response.status().as_u16()),
                ));
                span.end();
                Ok(response)
            }
            Err(err) => {
                let span = cx.span();
                span.set_status(Status::error(err.to_string()));
                span.end();
                Err(ClientError::Transport(err))
            }
        }
    }
}
