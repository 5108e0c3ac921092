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

//! Entry point to the REST server.

use crate::driver::Driver;
use axum::Router;
use axum::middleware;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;

pub(crate) mod metrics;
mod region_delete;
mod region_get;
mod region_put;
mod regions_get;
mod regions_post;
#[cfg(test)]
mod testutils;

/// Contents of the requests that create or modify a region.
///
/// Any `id` in the payload is ignored: new regions get their identifier from the store and
/// existing regions are identified by the request path.
#[derive(Deserialize)]
#[cfg_attr(test, derive(serde::Serialize))]
pub(crate) struct RegionRequest {
    /// Name to give to the region.
    pub(crate) name: String,
}

/// Creates the router for the application.
///
/// All requests are accounted for in the request counter, including those for unknown paths.
/// The metrics API itself is not.
pub(crate) fn app(driver: Driver, metrics_handle: PrometheusHandle) -> Router {
    use axum::http::StatusCode;
    use axum::routing::get;
    let api = Router::new()
        .route("/regiao", get(regions_get::handler).post(regions_post::handler))
        .route(
            "/regiao/:id",
            get(region_get::handler).put(region_put::handler).delete(region_delete::handler),
        )
        .fallback(|| async { StatusCode::NOT_FOUND })
        .with_state(driver)
        .layer(middleware::from_fn(metrics::count_requests));
    api.merge(metrics::router(metrics_handle))
}
