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

//! Entry point to the service.

// Keep these in sync with other top-level files.
#![warn(anonymous_parameters, bad_style, clippy::missing_docs_in_private_items, missing_docs)]
#![warn(unused, unused_extern_crates, unused_import_braces, unused_qualifications)]
#![warn(unsafe_code)]

use regiao_api::{ServiceOptions, serve};
use regiao_core::db::postgres::PostgresOptions;
use regiao_events::driver::RabbitMqOptions;
use std::error::Error;
use std::net::Ipv4Addr;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let service_opts = ServiceOptions::from_env("REGIAO")?;
    let db_opts = PostgresOptions::from_env("PGSQL_PROD")?;
    let rabbitmq_opts = RabbitMqOptions::from_env("RABBITMQ")?;

    let addr = (Ipv4Addr::UNSPECIFIED, service_opts.port);
    serve(addr, db_opts, rabbitmq_opts, service_opts.queue).await
}
