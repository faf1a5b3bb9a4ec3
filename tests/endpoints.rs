//! Endpoint behavior and span lineage tests.

use std::sync::Arc;

use opentelemetry::trace::{SpanKind, Status};
use opentelemetry_sdk::trace::SpanData;

use dice_server::config::ServiceConfig;
use dice_server::telemetry::Telemetry;

mod common;

fn find_span<'a>(spans: &'a [SpanData], name: &str) -> &'a SpanData {
    spans
        .iter()
        .find(|span| span.name.as_ref() == name)
        .unwrap_or_else(|| {
            let names: Vec<_> = spans.iter().map(|s| s.name.as_ref()).collect();
            panic!("no span named '{name}', got {names:?}")
        })
}

#[tokio::test]
async fn rolldice_returns_value_in_range() {
    let svc = common::start_service(ServiceConfig::default()).await;
    let client = common::client();

    let response = client
        .get(format!("http://{}/rolldice/alice", svc.addr))
        .send()
        .await
        .expect("service unreachable");
    assert_eq!(response.status(), 200);

    let body = response.text().await.expect("read body");
    assert!(body.ends_with('\n'), "body must end with a newline: {body:?}");
    let roll: i64 = body.trim().parse().expect("body should be an integer");
    assert!((1..=6).contains(&roll), "roll {roll} out of range");

    svc.shutdown.trigger();
}

#[tokio::test]
async fn rolldice_span_is_named_by_route_pattern() {
    let svc = common::start_service(ServiceConfig::default()).await;
    let client = common::client();

    for player in ["alice", "bob"] {
        client
            .get(format!("http://{}/rolldice/{player}", svc.addr))
            .send()
            .await
            .expect("service unreachable");
    }

    let spans = svc.spans.get_finished_spans().expect("finished spans");
    let server_spans: Vec<_> = spans
        .iter()
        .filter(|span| span.name.as_ref() == "GET /rolldice/{player}")
        .collect();
    assert_eq!(
        server_spans.len(),
        2,
        "both requests must collapse to the route-pattern span name"
    );

    // Each request carries its own "roll" child under its own server span.
    let rolls: Vec<_> = spans
        .iter()
        .filter(|span| span.name.as_ref() == "roll")
        .collect();
    assert_eq!(rolls.len(), 2);
    for roll in &rolls {
        assert!(
            server_spans
                .iter()
                .any(|server| server.span_context.span_id() == roll.parent_span_id),
            "roll span must be a child of a server span"
        );
    }

    svc.shutdown.trigger();
}

#[tokio::test]
async fn rolldice_without_player_uses_same_contract() {
    let svc = common::start_service(ServiceConfig::default()).await;
    let client = common::client();

    let body = client
        .get(format!("http://{}/rolldice/", svc.addr))
        .send()
        .await
        .expect("service unreachable")
        .text()
        .await
        .expect("read body");

    let roll: i64 = body.trim().parse().expect("body should be an integer");
    assert!((1..=6).contains(&roll), "roll {roll} out of range");

    let spans = svc.spans.get_finished_spans().expect("finished spans");
    find_span(&spans, "GET /rolldice/");
    find_span(&spans, "roll");

    svc.shutdown.trigger();
}

#[tokio::test]
async fn api1_calls_api2_and_joins_one_trace() {
    let svc = common::start_service(ServiceConfig::default()).await;
    let client = common::client();

    let response = client
        .get(format!("http://{}/api1", svc.addr))
        .send()
        .await
        .expect("service unreachable");
    assert_eq!(response.status(), 200);

    let body = response.text().await.expect("read body");
    assert!(
        body.contains("response status: 200"),
        "body must summarize the peer status: {body:?}"
    );

    let spans = svc.spans.get_finished_spans().expect("finished spans");
    let api1 = find_span(&spans, "api1");
    let api2 = find_span(&spans, "api2");
    assert_eq!(
        api1.span_context.trace_id(),
        api2.span_context.trace_id(),
        "api2 must join api1's trace"
    );

    // Lineage across the wire: api1 → client span → api2 server span → api2.
    let client_span = spans
        .iter()
        .find(|span| span.span_kind == SpanKind::Client && span.name.as_ref() == "GET /api2")
        .expect("outbound client span");
    let api2_server = spans
        .iter()
        .find(|span| span.span_kind == SpanKind::Server && span.name.as_ref() == "GET /api2")
        .expect("api2 server span");

    assert_eq!(client_span.parent_span_id, api1.span_context.span_id());
    assert_eq!(
        api2_server.parent_span_id,
        client_span.span_context.span_id(),
        "propagated headers must parent the api2 server span under the client span"
    );
    assert_eq!(api2.parent_span_id, api2_server.span_context.span_id());

    svc.shutdown.trigger();
}

#[tokio::test]
async fn api1_returns_500_when_api2_is_unreachable() {
    let mut config = ServiceConfig::default();
    // Nothing listens here; the outbound call fails at connect.
    config.peer.base_url = Some("http://127.0.0.1:9".to_string());

    let svc = common::start_service(config).await;
    let client = common::client();

    let response = client
        .get(format!("http://{}/api1", svc.addr))
        .send()
        .await
        .expect("service unreachable");
    assert_eq!(response.status(), 500);

    let body = response.text().await.expect("read body");
    assert!(
        body.contains("Failed to call api2"),
        "body must indicate the failure: {body:?}"
    );

    let spans = svc.spans.get_finished_spans().expect("finished spans");
    let api1 = find_span(&spans, "api1");
    assert!(
        matches!(api1.status, Status::Error { .. }),
        "api1 span must carry an error status"
    );
    assert!(
        api1.events.iter().any(|event| event.name == "exception"),
        "api1 span must record the error"
    );

    svc.shutdown.trigger();
}

#[tokio::test]
async fn exporter_failure_does_not_block_rolling() {
    let mut config = ServiceConfig::default();
    // Not a valid OTLP endpoint; exporter construction fails and the
    // service must start anyway.
    config.telemetry.otlp_endpoint = Some("not a valid endpoint".to_string());

    let telemetry = Arc::new(Telemetry::init(&config.telemetry));
    let (addr, shutdown) = common::start_with_telemetry(config, telemetry).await;

    let body = common::client()
        .get(format!("http://{addr}/rolldice/"))
        .send()
        .await
        .expect("service must serve despite exporter failure")
        .text()
        .await
        .expect("read body");

    let roll: i64 = body.trim().parse().expect("body should be an integer");
    assert!((1..=6).contains(&roll), "roll {roll} out of range");

    shutdown.trigger();
}
