//! Graceful shutdown behavior.

use std::time::Duration;

use dice_server::config::ServiceConfig;

mod common;

#[tokio::test]
async fn inflight_request_completes_during_drain() {
    let svc = common::start_service(ServiceConfig::default()).await;

    // /api2 sleeps 100ms, so this request is still in flight when the
    // shutdown signal arrives.
    let url = format!("http://{}/api2", svc.addr);
    let inflight = tokio::spawn(async move { common::client().get(url).send().await });
    tokio::time::sleep(Duration::from_millis(30)).await;

    svc.shutdown.trigger();

    let response = inflight
        .await
        .expect("request task must not panic")
        .expect("in-flight request must complete during drain");
    assert_eq!(response.status(), 200);
    assert_eq!(
        response.text().await.expect("read body"),
        "Hello from api2!\n"
    );

    // Once drained, the listener is gone: new connections are refused.
    tokio::time::sleep(Duration::from_millis(200)).await;
    let refused = common::client()
        .get(format!("http://{}/rolldice/", svc.addr))
        .send()
        .await;
    assert!(
        refused.is_err(),
        "no new connections may be accepted after shutdown"
    );
}

#[tokio::test]
async fn idle_server_stops_promptly_on_trigger() {
    let svc = common::start_service(ServiceConfig::default()).await;

    svc.shutdown.trigger();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let refused = common::client()
        .get(format!("http://{}/rolldice/", svc.addr))
        .send()
        .await;
    assert!(refused.is_err(), "listener should be closed after shutdown");
}
