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

//! Operations on one region.

use crate::driver::Driver;
use crate::model::{Region, RegionId};
use regiao_core::driver::{DriverError, DriverResult};
use regiao_events::model::EventType;

impl Driver {
    /// Gets the region identified by `id`, failing if it does not exist.
    async fn find_region(&self, id: RegionId) -> DriverResult<Region> {
        match self.store.find_by_id(id).await? {
            Some(region) => Ok(region),
            None => Err(DriverError::NotFound(format!("Region {} not found", id))),
        }
    }

    /// Gets the region identified by `id`.
    pub(crate) async fn get_region(self, id: RegionId) -> DriverResult<Region> {
        self.find_region(id).await
    }

    /// Renames the existing region identified by `id` to `name` and announces the change.
    pub(crate) async fn update_region(self, id: RegionId, name: String) -> DriverResult<Region> {
        let region = self.find_region(id).await?.with_name(name);
        self.store.update(&region).await?;
        self.notify(EventType::Update, region.clone()).await;
        Ok(region)
    }

    /// Deletes the existing region identified by `id` and announces its removal.
    pub(crate) async fn delete_region(self, id: RegionId) -> DriverResult<()> {
        let region = self.find_region(id).await?;
        self.store.remove(&region).await?;
        self.notify(EventType::Delete, region).await;
        Ok(())
    }
}
