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

//! Operations on the collection of regions.

use crate::driver::Driver;
use crate::model::Region;
use regiao_core::driver::DriverResult;
use regiao_events::model::EventType;

impl Driver {
    /// Gets all existing regions.
    pub(crate) async fn get_regions(self) -> DriverResult<Vec<Region>> {
        Ok(self.store.list_all().await?)
    }

    /// Creates a new region named `name` and announces it.
    pub(crate) async fn create_region(self, name: String) -> DriverResult<Region> {
        let region = self.store.insert(&name).await?;
        self.notify(EventType::Create, region.clone()).await;
        Ok(region)
    }
}
