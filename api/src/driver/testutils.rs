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

//! Test utilities for the business layer.

use crate::db::RegionStore;
use crate::db::memory::MemoryRegionStore;
use crate::driver::Driver;
use crate::model::{Region, RegionId};
use regiao_events::driver::testutils::RecorderPublisher;
use std::sync::Arc;

/// State required to run a driver test against in-memory collaborators.
pub(crate) struct TestContext {
    /// The store backing the driver, for direct access to its contents.
    store: Arc<MemoryRegionStore>,

    /// The publisher backing the driver, to inspect the events it received.
    publisher: RecorderPublisher<Region>,

    /// The driver under test.
    driver: Driver,
}

impl TestContext {
    pub(crate) fn setup() -> Self {
        let _can_fail = env_logger::builder().is_test(true).try_init();

        let store = Arc::new(MemoryRegionStore::default());
        let publisher = RecorderPublisher::default();
        let driver = Driver::new(store.clone(), Arc::new(publisher.clone()));
        Self { store, publisher, driver }
    }

    pub(crate) fn driver(&self) -> Driver {
        self.driver.clone()
    }

    pub(crate) fn publisher(&self) -> &RecorderPublisher<Region> {
        &self.publisher
    }

    /// Creates a region bypassing the driver, so no events are published.
    pub(crate) async fn insert(&self, name: &str) -> Region {
        self.store.insert(name).await.unwrap()
    }

    pub(crate) async fn get(&self, id: RegionId) -> Option<Region> {
        self.store.find_by_id(id).await.unwrap()
    }
}
