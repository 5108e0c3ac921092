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

//! In-memory implementation of the region store for tests.

use crate::db::RegionStore;
use crate::model::{Region, RegionId};
use async_trait::async_trait;
use futures::lock::Mutex;
use regiao_core::db::{DbError, DbResult};
use std::collections::BTreeMap;

/// Contents of a `MemoryRegionStore`.
#[derive(Default)]
struct MemoryState {
    /// Names of the existing regions keyed by their identifier.
    regions: BTreeMap<RegionId, String>,

    /// Last identifier handed out.  Identifiers are never reused, even after deletions.
    last_id: i32,

    /// Error to return from every write, if any.
    write_error: Option<String>,
}

impl MemoryState {
    /// Fails if writes have been configured to fail.
    fn check_writable(&self) -> DbResult<()> {
        match self.write_error.as_ref() {
            Some(error) => Err(DbError::BackendError(error.clone())),
            None => Ok(()),
        }
    }
}

/// Region store that keeps all data in memory.
#[derive(Default)]
pub(crate) struct MemoryRegionStore {
    /// Store contents, serialized across concurrent requests.
    state: Mutex<MemoryState>,
}

impl MemoryRegionStore {
    /// Makes all subsequent inserts, updates and removals fail with `error`.  Reads still work.
    pub(crate) async fn inject_write_error<E: Into<String>>(&self, error: E) {
        let mut state = self.state.lock().await;
        state.write_error = Some(error.into());
    }
}

#[async_trait]
impl RegionStore for MemoryRegionStore {
    async fn list_all(&self) -> DbResult<Vec<Region>> {
        let state = self.state.lock().await;
        Ok(state.regions.iter().map(|(id, name)| Region::new(*id, name.clone())).collect())
    }

    async fn find_by_id(&self, id: RegionId) -> DbResult<Option<Region>> {
        let state = self.state.lock().await;
        Ok(state.regions.get(&id).map(|name| Region::new(id, name.clone())))
    }

    async fn insert(&self, name: &str) -> DbResult<Region> {
        let mut state = self.state.lock().await;
        state.check_writable()?;
        let id = state
            .last_id
            .checked_add(1)
            .ok_or_else(|| DbError::BackendError("Ran out of region identifiers".to_owned()))?;
        state.last_id = id;

        let id = RegionId::new(id);
        state.regions.insert(id, name.to_owned());
        Ok(Region::new(id, name.to_owned()))
    }

    async fn update(&self, region: &Region) -> DbResult<()> {
        let mut state = self.state.lock().await;
        state.check_writable()?;
        match state.regions.get_mut(region.id()) {
            Some(name) => {
                name.clone_from(region.name());
                Ok(())
            }
            None => Err(DbError::NotFound),
        }
    }

    async fn remove(&self, region: &Region) -> DbResult<()> {
        let mut state = self.state.lock().await;
        state.check_writable()?;
        match state.regions.remove(region.id()) {
            Some(_) => Ok(()),
            None => Err(DbError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inject_write_error() {
        let store = MemoryRegionStore::default();
        let region = store.insert("first").await.unwrap();

        store.inject_write_error("Disk full").await;
        let exp_error = DbError::BackendError("Disk full".to_owned());
        assert_eq!(exp_error, store.insert("second").await.unwrap_err());
        let renamed = region.clone().with_name("renamed".to_owned());
        assert_eq!(exp_error, store.update(&renamed).await.unwrap_err());
        assert_eq!(exp_error, store.remove(&region).await.unwrap_err());

        assert_eq!(vec![region.clone()], store.list_all().await.unwrap());
        assert_eq!(Some(region.clone()), store.find_by_id(*region.id()).await.unwrap());
    }
}
