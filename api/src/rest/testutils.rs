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

//! Test utilities for the REST API.

use crate::db::RegionStore;
use crate::db::memory::MemoryRegionStore;
use crate::driver::Driver;
use crate::model::{Region, RegionId};
use crate::rest::app;
use crate::rest::metrics::{REQUESTS_COUNTER, install_recorder};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use regiao_events::driver::testutils::RecorderPublisher;
use std::sync::Arc;

/// Names of the regions that `TestContext::setup` creates, in identifier order.
pub(crate) const SEED_NAMES: [&str; 3] = ["Região 1", "Região 2", "Região 3"];

/// Returns how many requests for `method` and `endpoint` completed with `status` according to
/// the metrics rendered by `handle`.
pub(crate) fn request_count(
    handle: &PrometheusHandle,
    method: &str,
    endpoint: &str,
    status: u16,
) -> u64 {
    let exp_labels = [
        format!("method=\"{}\"", method),
        format!("endpoint=\"{}\"", endpoint),
        format!("status=\"{}\"", status),
    ];
    for line in handle.render().lines() {
        let Some(rest) = line.strip_prefix(REQUESTS_COUNTER) else {
            continue;
        };
        if rest.starts_with('{') && exp_labels.iter().all(|label| rest.contains(label.as_str())) {
            let value = rest.rsplit(' ').next().unwrap();
            return value.parse::<u64>().unwrap();
        }
    }
    0
}

/// State required to run a REST test against in-memory collaborators.
pub(crate) struct TestContext {
    /// The store backing the app, for direct access to its contents.
    store: Arc<MemoryRegionStore>,

    /// The publisher backing the app, to inspect the events it received.
    publisher: RecorderPublisher<Region>,

    /// Handle to the process-wide metrics.
    metrics: PrometheusHandle,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Creates a context with no regions.
    pub(crate) async fn setup_empty() -> Self {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let store = Arc::new(MemoryRegionStore::default());
        let publisher = RecorderPublisher::default();
        let metrics = install_recorder().unwrap();
        let driver = Driver::new(store.clone(), Arc::new(publisher.clone()));
        let app = app(driver, metrics.clone());
        Self { store, publisher, metrics, app }
    }

    /// Creates a context with the regions in `SEED_NAMES`, which get identifiers 1 to 3.
    pub(crate) async fn setup() -> Self {
        let context = Self::setup_empty().await;
        for name in SEED_NAMES {
            context.store.insert(name).await.unwrap();
        }
        context
    }

    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    pub(crate) fn publisher(&self) -> &RecorderPublisher<Region> {
        &self.publisher
    }

    pub(crate) fn metrics(&self) -> &PrometheusHandle {
        &self.metrics
    }

    /// Makes all subsequent store writes fail with `error`.
    pub(crate) async fn inject_store_error(&self, error: &str) {
        self.store.inject_write_error(error).await;
    }

    pub(crate) async fn get_region(&self, id: i32) -> Option<Region> {
        self.store.find_by_id(RegionId::new(id)).await.unwrap()
    }

    pub(crate) async fn get_regions(&self) -> Vec<Region> {
        self.store.list_all().await.unwrap()
    }
}
