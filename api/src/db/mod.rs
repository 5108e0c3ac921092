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

//! Database abstraction in terms of the operations needed by the server.

use crate::model::{Region, RegionId};
use async_trait::async_trait;
use regiao_core::db::DbResult;

#[cfg(test)]
pub(crate) mod memory;
mod sql;
pub(crate) use sql::SqlRegionStore;
#[cfg(test)]
mod tests;

/// Operations to persist regions.
///
/// The store owns the lifetime of the rows: callers get copies of the data and must not assume
/// that a region they fetched still exists by the time they act on it.
#[async_trait]
pub(crate) trait RegionStore {
    /// Gets all existing regions.
    async fn list_all(&self) -> DbResult<Vec<Region>>;

    /// Gets the region identified by `id`, or `None` if it does not exist.
    async fn find_by_id(&self, id: RegionId) -> DbResult<Option<Region>>;

    /// Persists a new region called `name` and returns it with its newly-assigned identifier.
    async fn insert(&self, name: &str) -> DbResult<Region>;

    /// Persists the new name of an existing `region`.
    async fn update(&self, region: &Region) -> DbResult<()>;

    /// Deletes an existing `region`.
    async fn remove(&self, region: &Region) -> DbResult<()>;
}
