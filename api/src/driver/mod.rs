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

//! Business logic for the service.

use crate::db::RegionStore;
use crate::model::Region;
use log::warn;
use regiao_events::driver::Publisher;
use regiao_events::model::{EventType, Message};
use std::sync::Arc;

mod region;
mod regions;
#[cfg(test)]
pub(crate) mod testutils;

/// Business logic.
///
/// The public operations exposed by the driver consume it to make it harder for callers to chain
/// unrelated operations on the same instance.
#[derive(Clone)]
pub(crate) struct Driver {
    /// The store that the driver uses for persistence.
    store: Arc<dyn RegionStore + Send + Sync>,

    /// Destination of the events generated by successful mutations.
    publisher: Arc<dyn Publisher<Region> + Send + Sync>,
}

impl Driver {
    /// Creates a new driver backed by the given injected components.
    pub(crate) fn new(
        store: Arc<dyn RegionStore + Send + Sync>,
        publisher: Arc<dyn Publisher<Region> + Send + Sync>,
    ) -> Self {
        Self { store, publisher }
    }

    /// Publishes an `event_type` event about `region`.
    ///
    /// The mutation that triggered the event has already been persisted by the time we get here,
    /// so publishing failures are logged and otherwise ignored.
    async fn notify(&self, event_type: EventType, region: Region) {
        let id = *region.id();
        if let Err(e) = self.publisher.publish(Message::new(event_type, region)).await {
            warn!("Failed to publish {:?} event for region {}: {}", event_type, id, e);
        }
    }
}
