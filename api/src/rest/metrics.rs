// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Request accounting exposed in the Prometheus text format.

use axum::Router;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::get;
use metrics::Label;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Name of the counter that tracks all requests.
pub(crate) const REQUESTS_COUNTER: &str = "webapimetric";

/// Process-wide recorder, which can only be installed once.
static HANDLE: OnceLock<Result<PrometheusHandle, String>> = OnceLock::new();

/// Installs the global metrics recorder if not yet done and returns a handle to it.
pub(crate) fn install_recorder() -> Result<PrometheusHandle, String> {
    HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .map_err(|e| format!("Cannot install metrics recorder: {}", e))?;
            metrics::describe_counter!(REQUESTS_COUNTER, "Contador de requests");
            Ok(handle)
        })
        .clone()
}

/// Middleware that counts every request once it has been answered.
///
/// The `status` label reflects the response produced by the inner service, including any
/// rejections from extractors.
pub(crate) async fn count_requests(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let endpoint = request.uri().path().to_owned();

    let response = next.run(request).await;

    let labels = vec![
        Label::new("method", method),
        Label::new("endpoint", endpoint),
        Label::new("status", response.status().as_u16().to_string()),
    ];
    metrics::counter!(REQUESTS_COUNTER, labels).increment(1);
    response
}

/// API handler to render all metrics.
async fn handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}

/// Creates the router that serves the metrics under `/metrics`.
pub(crate) fn router(handle: PrometheusHandle) -> Router {
    Router::new().route("/metrics", get(handler)).with_state(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::testutils::request_count;
    use axum::http;
    use axum::middleware;
    use regiao_core::rest::testutils::*;

    fn sample_app() -> Router {
        Router::new()
            .route("/sample/:name", get(|| async { http::StatusCode::IM_A_TEAPOT }))
            .layer(middleware::from_fn(count_requests))
    }

    #[test]
    fn test_install_recorder_is_idempotent() {
        let handle1 = install_recorder().unwrap();
        metrics::counter!(
            REQUESTS_COUNTER,
            "method" => "GET",
            "endpoint" => "/sample/idempotent",
            "status" => "200"
        )
        .increment(1);
        assert_eq!(1, request_count(&handle1, "GET", "/sample/idempotent", 200));

        let handle2 = install_recorder().unwrap();
        assert_eq!(1, request_count(&handle2, "GET", "/sample/idempotent", 200));
    }

    #[tokio::test]
    async fn test_count_requests_uses_final_status() {
        let handle = install_recorder().unwrap();

        OneShotBuilder::new(sample_app(), (http::Method::GET, "/sample/final-status"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::IM_A_TEAPOT)
            .expect_empty()
            .await;

        assert_eq!(1, request_count(&handle, "GET", "/sample/final-status", 418));
        assert_eq!(0, request_count(&handle, "GET", "/sample/final-status", 200));
    }

    #[tokio::test]
    async fn test_count_requests_once_per_request() {
        let handle = install_recorder().unwrap();

        for _ in 0..3 {
            OneShotBuilder::new(sample_app(), (http::Method::DELETE, "/sample/repeated"))
                .send_empty()
                .await
                .expect_status(http::StatusCode::METHOD_NOT_ALLOWED)
                .expect_empty()
                .await;
        }

        assert_eq!(3, request_count(&handle, "DELETE", "/sample/repeated", 405));
    }

    #[tokio::test]
    async fn test_handler_renders_description() {
        let handle = install_recorder().unwrap();

        OneShotBuilder::new(sample_app(), (http::Method::GET, "/sample/described"))
            .send_empty()
            .await
            .expect_status(http::StatusCode::IM_A_TEAPOT)
            .expect_empty()
            .await;

        OneShotBuilder::new(router(handle), (http::Method::GET, "/metrics"))
            .send_empty()
            .await
            .expect_text("# HELP webapimetric Contador de requests")
            .await;
    }
}
