//! Common test utilities for usage-meter integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use axum::Router;
use axum_test::TestServer;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use usage_meter_service::{create_router, AppState, ServiceConfig};

/// Test harness: the service under test wired to a mock upstream.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The mock upstream Copilot API.
    pub upstream: MockServer,
}

impl TestHarness {
    /// Create a new harness with a fresh mock upstream.
    pub async fn new() -> Self {
        let upstream = MockServer::start().await;

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            upstream_base_url: upstream.uri(),
            upstream_timeout_seconds: 5,
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(config);
        let router: Router = create_router(state);
        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, upstream }
    }

    /// Stub the upstream message list for the current period.
    pub async fn stub_messages(&self, messages: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/messages/current-period"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "messages": messages })),
            )
            .mount(&self.upstream)
            .await;
    }

    /// Stub a report the upstream knows about.
    pub async fn stub_report(&self, id: u64, name: &str, credit_cost: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/reports/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "name": name,
                "credit_cost": credit_cost
            })))
            .mount(&self.upstream)
            .await;
    }

    /// Stub a report id the upstream does not know about.
    pub async fn stub_missing_report(&self, id: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/reports/{id}")))
            .respond_with(ResponseTemplate::new(404))
            .mount(&self.upstream)
            .await;
    }
}
