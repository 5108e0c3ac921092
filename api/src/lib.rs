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

//! REST service to manage regions.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use regiao_core::env::get_optional_var;
#[cfg(feature = "postgres")]
use {
    crate::db::SqlRegionStore,
    crate::driver::Driver,
    crate::rest::app,
    crate::rest::metrics::install_recorder,
    log::{info, warn},
    regiao_core::db::Db,
    regiao_core::db::postgres::{PostgresDb, PostgresOptions},
    regiao_events::driver::{RabbitMqOptions, RabbitMqPublisher},
    std::error::Error,
    std::net::SocketAddr,
    std::sync::Arc,
};

pub(crate) mod db;
pub(crate) mod driver;
pub(crate) mod model;
mod rest;

/// Default TCP port to listen on.
const DEFAULT_PORT: u16 = 3000;

/// Default name of the queue that receives the region events.
const DEFAULT_QUEUE: &str = "regiao.updated";

/// Settings of the service itself, as opposed to those of its collaborators.
#[derive(Debug, PartialEq)]
pub struct ServiceOptions {
    /// TCP port to listen on.
    pub port: u16,

    /// Name of the queue that receives the region events.
    pub queue: String,
}

impl ServiceOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_PORT` and `<prefix>_QUEUE`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        Ok(Self {
            port: get_optional_var::<u16>(prefix, "PORT")?.unwrap_or(DEFAULT_PORT),
            queue: get_optional_var::<String>(prefix, "QUEUE")?
                .unwrap_or_else(|| DEFAULT_QUEUE.to_owned()),
        })
    }
}

/// Waits until the process is asked to terminate.
#[cfg(feature = "postgres")]
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received termination request"),
        Err(e) => {
            warn!("Cannot listen for termination requests: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

/// Instantiates all resources to serve the application on `bind_addr`.
///
/// While it'd be nice to push this responsibility to `main`, doing so would force us to expose many
/// crate-internal types to the public, which in turn would make dead code detection harder.
#[cfg(feature = "postgres")]
pub async fn serve(
    bind_addr: impl Into<SocketAddr>,
    db_opts: PostgresOptions,
    rabbitmq_opts: RabbitMqOptions,
    queue: String,
) -> Result<(), Box<dyn Error>> {
    let metrics_handle = install_recorder()?;

    let db = Arc::new(PostgresDb::connect(db_opts)?);
    let store = SqlRegionStore::new(db.clone());
    store.init_schema().await?;

    let publisher = RabbitMqPublisher::new(rabbitmq_opts, queue)?;

    let driver = Driver::new(Arc::new(store), Arc::new(publisher));
    let app = app(driver, metrics_handle);

    let listener = tokio::net::TcpListener::bind(bind_addr.into()).await?;
    info!("Listening on {}", listener.local_addr()?);
    let result = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;

    db.close().await;
    info!("Server stopped");
    result?;
    Ok(())
}
