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

//! Store tests shared by all implementations.

use crate::db::RegionStore;
use crate::model::{Region, RegionId};
use regiao_core::db::DbError;

pub(crate) async fn test_empty<S: RegionStore>(store: S) {
    assert_eq!(Vec::<Region>::new(), store.list_all().await.unwrap());
    assert_eq!(None, store.find_by_id(RegionId::new(1)).await.unwrap());
}

pub(crate) async fn test_insert_and_find<S: RegionStore>(store: S) {
    let first = store.insert("Região 1").await.unwrap();
    let second = store.insert("Região 2").await.unwrap();
    assert_eq!("Região 1", first.name());
    assert_eq!("Região 2", second.name());
    assert!(first.id() < second.id());

    assert_eq!(Some(first.clone()), store.find_by_id(*first.id()).await.unwrap());
    assert_eq!(Some(second.clone()), store.find_by_id(*second.id()).await.unwrap());
    assert_eq!(vec![first, second], store.list_all().await.unwrap());
}

pub(crate) async fn test_insert_empty_name<S: RegionStore>(store: S) {
    let region = store.insert("").await.unwrap();
    assert_eq!(Some(region), store.find_by_id(RegionId::new(1)).await.unwrap());
}

pub(crate) async fn test_update<S: RegionStore>(store: S) {
    let first = store.insert("first").await.unwrap();
    let second = store.insert("second").await.unwrap();

    let first = first.with_name("renamed".to_owned());
    store.update(&first).await.unwrap();

    assert_eq!(Some(first.clone()), store.find_by_id(*first.id()).await.unwrap());
    assert_eq!(Some(second.clone()), store.find_by_id(*second.id()).await.unwrap());
    assert_eq!(vec![first, second], store.list_all().await.unwrap());
}

pub(crate) async fn test_update_missing<S: RegionStore>(store: S) {
    store.insert("first").await.unwrap();

    let missing = Region::new(RegionId::new(500), "ghost".to_owned());
    assert_eq!(DbError::NotFound, store.update(&missing).await.unwrap_err());
    assert_eq!(None, store.find_by_id(RegionId::new(500)).await.unwrap());
}

pub(crate) async fn test_remove<S: RegionStore>(store: S) {
    let first = store.insert("first").await.unwrap();
    let second = store.insert("second").await.unwrap();

    store.remove(&first).await.unwrap();
    assert_eq!(None, store.find_by_id(*first.id()).await.unwrap());
    assert_eq!(vec![second], store.list_all().await.unwrap());

    assert_eq!(DbError::NotFound, store.remove(&first).await.unwrap_err());
}

pub(crate) async fn test_ids_are_not_reused<S: RegionStore>(store: S) {
    let first = store.insert("first").await.unwrap();
    store.remove(&first).await.unwrap();

    let second = store.insert("second").await.unwrap();
    assert!(first.id() < second.id());
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        regiao_core::db::testutils::generate_tests!(
            $(#[$extra],)?
            $setup,
            $crate::db::tests,
            test_empty,
            test_insert_and_find,
            test_insert_empty_name,
            test_update,
            test_update_missing,
            test_remove,
            test_ids_are_not_reused
        );
    }
];

mod memory {
    use crate::db::memory::MemoryRegionStore;

    generate_db_tests!(MemoryRegionStore::default());
}

#[cfg(feature = "postgres")]
mod postgres {
    use crate::db::SqlRegionStore;
    use regiao_core::db::postgres::testutils;
    use std::sync::Arc;

    async fn setup() -> SqlRegionStore {
        let store = SqlRegionStore::new(Arc::new(testutils::setup().await));
        store.init_schema().await.unwrap();
        store
    }

    generate_db_tests!(
        setup().await,
        #[ignore = "Requires environment configuration and is expensive"]
    );
}

mod sqlite {
    use crate::db::SqlRegionStore;
    use regiao_core::db::sqlite::testutils;
    use std::sync::Arc;

    async fn setup() -> SqlRegionStore {
        let store = SqlRegionStore::new(Arc::new(testutils::setup().await));
        store.init_schema().await.unwrap();
        store
    }

    generate_db_tests!(setup().await);
}
