//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use opentelemetry_sdk::logs::SdkLoggerProvider;
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};
use tokio::net::{TcpListener, TcpStream};

use dice_server::config::ServiceConfig;
use dice_server::http::HttpServer;
use dice_server::lifecycle::Shutdown;
use dice_server::telemetry::Telemetry;

/// A running service instance wired to an in-memory span exporter.
#[allow(dead_code)]
pub struct TestService {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub spans: InMemorySpanExporter,
}

/// Start the service on an ephemeral port, capturing spans in memory.
///
/// The simple (synchronous) span processor is used so every span is visible
/// to assertions as soon as the response is received.
#[allow(dead_code)]
pub async fn start_service(config: ServiceConfig) -> TestService {
    let spans = InMemorySpanExporter::default();
    let tracer_provider = SdkTracerProvider::builder()
        .with_simple_exporter(spans.clone())
        .build();
    let logger_provider = SdkLoggerProvider::builder().build();
    let telemetry = Arc::new(Telemetry::from_parts(tracer_provider, logger_provider));

    let (addr, shutdown) = start_with_telemetry(config, telemetry).await;
    TestService {
        addr,
        shutdown,
        spans,
    }
}

/// Start the service with a caller-provided telemetry handle.
#[allow(dead_code)]
pub async fn start_with_telemetry(
    config: ServiceConfig,
    telemetry: Arc<Telemetry>,
) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    let server = HttpServer::new(config, telemetry);
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    wait_until_accepting(addr).await;
    (addr, shutdown)
}

/// Poll until the listener accepts connections.
async fn wait_until_accepting(addr: SocketAddr) {
    for _ in 0..100 {
        if TcpStream::connect(addr).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("service at {addr} never became ready");
}

/// Test HTTP client that bypasses proxies and connection pooling.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .expect("build test client")
}
