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

//! Implementation of the region store on top of the relational databases supported by
//! `regiao_core`.

use crate::db::RegionStore;
use crate::model::{Region, RegionId};
use async_trait::async_trait;
#[cfg(feature = "postgres")]
use regiao_core::db::postgres;
#[cfg(any(feature = "sqlite", test))]
use regiao_core::db::sqlite;
use regiao_core::db::{Db, DbResult, Executor, ensure_one_row};
use sqlx::Row;
use std::sync::Arc;

/// Initializes the database schema.
pub(crate) async fn init_schema(ex: &mut Executor) -> DbResult<()> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => postgres::run_schema(ex, include_str!("postgres.sql")).await,

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => sqlite::run_schema(ex, include_str!("sqlite.sql")).await,

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Gets all regions ordered by their identifier.
async fn get_regions(ex: &mut Executor) -> DbResult<Vec<Region>> {
    let query_str = "SELECT id, name FROM regioes ORDER BY id";
    let mut regions = vec![];
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            for row in rows {
                let id: i32 = row.try_get("id").map_err(postgres::map_sqlx_error)?;
                let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
                regions.push(Region::new(RegionId::new(id), name));
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let rows = sqlx::query(query_str)
                .fetch_all(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            for row in rows {
                let id: i64 = row.try_get("id").map_err(sqlite::map_sqlx_error)?;
                let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
                regions.push(Region::new(RegionId::new(sqlite::rowid_as_i32(id)?), name));
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
    Ok(regions)
}

/// Gets the region identified by `id`, if it exists.
async fn get_region(ex: &mut Executor, id: RegionId) -> DbResult<Option<Region>> {
    match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "SELECT name FROM regioes WHERE id = $1";
            let row = sqlx::query(query_str)
                .bind(id.as_i32())
                .fetch_optional(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            match row {
                None => Ok(None),
                Some(row) => {
                    let name: String = row.try_get("name").map_err(postgres::map_sqlx_error)?;
                    Ok(Some(Region::new(id, name)))
                }
            }
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "SELECT name FROM regioes WHERE id = ?";
            let row = sqlx::query(query_str)
                .bind(id.as_i32())
                .fetch_optional(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            match row {
                None => Ok(None),
                Some(row) => {
                    let name: String = row.try_get("name").map_err(sqlite::map_sqlx_error)?;
                    Ok(Some(Region::new(id, name)))
                }
            }
        }

        #[allow(unused)]
        _ => unreachable!(),
    }
}

/// Creates a new region named `name` and returns it with its assigned identifier.
async fn put_region(ex: &mut Executor, name: &str) -> DbResult<Region> {
    let id: i32 = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "INSERT INTO regioes (name) VALUES ($1) RETURNING id";
            let row = sqlx::query(query_str)
                .bind(name)
                .fetch_one(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?;
            row.try_get("id").map_err(postgres::map_sqlx_error)?
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "INSERT INTO regioes (name) VALUES (?)";
            let done = sqlx::query(query_str)
                .bind(name)
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?;
            sqlite::rowid_as_i32(done.last_insert_rowid())?
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    Ok(Region::new(RegionId::new(id), name.to_owned()))
}

/// Replaces the name of the existing `region`.
async fn update_region(ex: &mut Executor, region: &Region) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "UPDATE regioes SET name = $1 WHERE id = $2";
            sqlx::query(query_str)
                .bind(region.name())
                .bind(region.id().as_i32())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "UPDATE regioes SET name = ? WHERE id = ?";
            sqlx::query(query_str)
                .bind(region.name())
                .bind(region.id().as_i32())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(rows_affected)
}

/// Deletes the existing `region`.
async fn delete_region(ex: &mut Executor, region: &Region) -> DbResult<()> {
    let rows_affected = match ex {
        #[cfg(feature = "postgres")]
        Executor::Postgres(ex) => {
            let query_str = "DELETE FROM regioes WHERE id = $1";
            sqlx::query(query_str)
                .bind(region.id().as_i32())
                .execute(ex.conn())
                .await
                .map_err(postgres::map_sqlx_error)?
                .rows_affected()
        }

        #[cfg(any(feature = "sqlite", test))]
        Executor::Sqlite(ex) => {
            let query_str = "DELETE FROM regioes WHERE id = ?";
            sqlx::query(query_str)
                .bind(region.id().as_i32())
                .execute(ex.conn())
                .await
                .map_err(sqlite::map_sqlx_error)?
                .rows_affected()
        }

        #[allow(unused)]
        _ => unreachable!(),
    };
    ensure_one_row(rows_affected)
}

/// Region store backed by a relational database.
#[derive(Clone)]
pub(crate) struct SqlRegionStore {
    /// The database that holds the `regioes` table.
    db: Arc<dyn Db + Send + Sync>,
}

impl SqlRegionStore {
    /// Creates a new store backed by `db`.
    pub(crate) fn new(db: Arc<dyn Db + Send + Sync>) -> Self {
        Self { db }
    }

    /// Creates the tables used by this store if they do not exist yet.
    pub(crate) async fn init_schema(&self) -> DbResult<()> {
        init_schema(&mut self.db.ex().await?).await
    }
}

#[async_trait]
impl RegionStore for SqlRegionStore {
    async fn list_all(&self) -> DbResult<Vec<Region>> {
        get_regions(&mut self.db.ex().await?).await
    }

    async fn find_by_id(&self, id: RegionId) -> DbResult<Option<Region>> {
        get_region(&mut self.db.ex().await?, id).await
    }

    async fn insert(&self, name: &str) -> DbResult<Region> {
        put_region(&mut self.db.ex().await?, name).await
    }

    async fn update(&self, region: &Region) -> DbResult<()> {
        update_region(&mut self.db.ex().await?, region).await
    }

    async fn remove(&self, region: &Region) -> DbResult<()> {
        delete_region(&mut self.db.ex().await?, region).await
    }
}
