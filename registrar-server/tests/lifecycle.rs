use std::time::{Duration, Instant};

use httpmock::prelude::*;
use registrar::config::{Config, EnvMsDuration};
use registrar::identity::InstanceIdentity;
use registrar::server::serve;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

fn config(eureka_server: &str, renewal_interval: Duration) -> Config {
    Config {
        host: "127.0.0.1".to_owned(),
        service_name: Some("svcA".to_owned()),
        service_port: Some("0".to_owned()),
        eureka_server: Some(eureka_server.to_owned()),
        registration_retry_delay: EnvMsDuration(Duration::from_millis(100)),
        renewal_interval: EnvMsDuration(renewal_interval),
        request_timeout: EnvMsDuration(Duration::from_secs(2)),
        export_prometheus: false,
    }
}

struct TestServer {
    base: String,
    stop: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), registrar::error::ServeError>>,
}

impl TestServer {
    async fn start(config: Config) -> Self {
        let listener = TcpListener::bind(config.bind().unwrap()).await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let (stop, stopped) = oneshot::channel::<()>();

        let handle = tokio::spawn(serve(config, listener, async move {
            stopped.await.ok();
        }));

        Self { base, stop, handle }
    }

    async fn shutdown(self) {
        self.stop.send(()).unwrap();
        self.handle
            .await
            .expect("server task panicked")
            .expect("server failed");
    }
}

#[tokio::test]
async fn health_is_served_while_registry_is_unreachable() {
    // Nothing listens on the discard port, so registration keeps retrying.
    let server = TestServer::start(config(
        "http://127.0.0.1:9/eureka/",
        Duration::from_secs(30),
    ))
    .await;

    let started = Instant::now();
    let response = reqwest::get(format!("{}/health", server.base))
        .await
        .expect("health request failed");

    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), r#"{"status":"UP"}"#);
    assert!(started.elapsed() < Duration::from_secs(2));

    let ping = reqwest::get(format!("{}/v1/ping", server.base))
        .await
        .unwrap();
    assert_eq!(ping.text().await.unwrap(), r#"{"message":"hello"}"#);

    server.shutdown().await;
}

#[tokio::test]
async fn registers_once_and_keeps_renewing() {
    let registry = MockServer::start_async().await;
    let config = config(&registry.url("/eureka/"), Duration::from_millis(200));

    let identity = InstanceIdentity::resolve(&config).unwrap();
    let instance_path = format!("/eureka/apps/svcA/{}", identity.instance_id());

    let register = registry
        .mock_async(|when, then| {
            when.method(POST)
                .path("/eureka/apps/svcA")
                .header("content-type", "application/xml")
                .body_contains(format!("<instanceId>{}</instanceId>", identity.instance_id()));
            then.status(500);
        })
        .await;
    let renew = registry
        .mock_async(|when, then| {
            when.method(PUT).path(instance_path);
            then.status(200);
        })
        .await;

    let server = TestServer::start(config).await;

    let deadline = Instant::now() + Duration::from_secs(5);
    while renew.hits_async().await < 3 {
        assert!(Instant::now() < deadline, "renewal did not keep heartbeating");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    // A 500 still ends the registration attempt.
    assert_eq!(register.hits_async().await, 1);

    server.shutdown().await;
}
