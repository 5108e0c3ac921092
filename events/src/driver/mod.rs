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

//! Utilities to publish event messages.

use crate::model::Message;
use async_trait::async_trait;
use derivative::Derivative;
use log::debug;
use regiao_core::driver::{DriverError, DriverResult};
use regiao_core::env::{get_optional_var, get_required_var};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

/// Virtual host to publish to when none is configured.
const DEFAULT_VHOST: &str = "/";

/// Maximum time to wait for the broker to accept a message.
const PUBLISH_TIMEOUT_SECS: u64 = 10;

/// Trait to abstract the integration with the message broker.
#[async_trait]
pub trait Publisher<T: Send + Sync + 'static> {
    /// Hands `message` over to the broker.
    ///
    /// Returning successfully only means that the broker accepted the message.  There is no
    /// confirmation that any consumer received it.
    async fn publish(&self, message: Message<T>) -> DriverResult<()>;
}

/// Options to connect to the RabbitMQ management API.
#[derive(Derivative)]
#[derivative(Debug)]
#[cfg_attr(test, derivative(PartialEq))]
pub struct RabbitMqOptions {
    /// Base URL of the management API, such as `http://localhost:15672`.
    pub api_url: Url,

    /// Username for logging into the management API.
    pub username: String,

    /// Password for logging into the management API.
    #[derivative(Debug = "ignore")]
    pub password: String,

    /// Virtual host that owns the target queue.
    pub vhost: String,
}

impl RabbitMqOptions {
    /// Initializes a set of options from environment variables whose name is prefixed with the
    /// given `prefix`.
    ///
    /// This will use variables such as `<prefix>_API_URL`, `<prefix>_USERNAME`,
    /// `<prefix>_PASSWORD` and `<prefix>_VHOST`.
    pub fn from_env(prefix: &str) -> Result<Self, String> {
        let raw_url = get_required_var::<String>(prefix, "API_URL")?;
        let api_url = Url::parse(&raw_url)
            .map_err(|e| format!("Invalid URL in environment variable {}_API_URL: {}", prefix, e))?;
        if api_url.cannot_be_a_base() {
            return Err(format!("URL in environment variable {}_API_URL is not a base", prefix));
        }

        Ok(Self {
            api_url,
            username: get_required_var::<String>(prefix, "USERNAME")?,
            password: get_required_var::<String>(prefix, "PASSWORD")?,
            vhost: get_optional_var::<String>(prefix, "VHOST")?
                .unwrap_or_else(|| DEFAULT_VHOST.to_owned()),
        })
    }
}

/// Properties attached to every message we publish.
#[derive(Serialize)]
struct MessageProperties {
    /// MIME type of the payload.
    content_type: &'static str,

    /// 2 asks the broker to persist the message.
    delivery_mode: u8,
}

/// Request body of the management API's publish endpoint.
#[derive(Serialize)]
struct PublishRequest<'a> {
    /// Properties of the message.
    properties: MessageProperties,

    /// Name of the queue to deliver to via the default exchange.
    routing_key: &'a str,

    /// Serialized message.
    payload: String,

    /// How `payload` is encoded.
    payload_encoding: &'static str,
}

/// Response body of the management API's publish endpoint.
#[derive(Deserialize)]
struct PublishResponse {
    /// Whether the message reached at least one queue.
    routed: bool,
}

/// Publisher backed by the RabbitMQ management HTTP API.
///
/// Messages go through the default exchange, which routes them to the queue whose name matches
/// the routing key.
#[derive(Clone)]
pub struct RabbitMqPublisher {
    /// Asynchronous HTTP client with which to issue the API requests.
    client: Client,

    /// Fully-resolved URL of the publish endpoint.
    publish_url: Url,

    /// Username for logging into the management API.
    username: String,

    /// Password for logging into the management API.
    password: String,

    /// Name of the queue that receives the messages.
    queue: String,
}

impl RabbitMqPublisher {
    /// Creates a new publisher that sends messages to `queue` using `opts` for configuration.
    pub fn new<Q: Into<String>>(opts: RabbitMqOptions, queue: Q) -> Result<Self, String> {
        let mut publish_url = opts.api_url.clone();
        publish_url
            .path_segments_mut()
            .map_err(|()| format!("Cannot append a path to {}", opts.api_url))?
            .pop_if_empty()
            .extend(["api", "exchanges", opts.vhost.as_str(), "amq.default", "publish"]);

        let client = Client::builder()
            .timeout(Duration::from_secs(PUBLISH_TIMEOUT_SECS))
            .build()
            .map_err(|e| format!("Cannot create HTTP client: {}", e))?;

        Ok(Self {
            client,
            publish_url,
            username: opts.username,
            password: opts.password,
            queue: queue.into(),
        })
    }
}

#[async_trait]
impl<T> Publisher<T> for RabbitMqPublisher
where
    T: Serialize + Send + Sync + 'static,
{
    async fn publish(&self, message: Message<T>) -> DriverResult<()> {
        let payload = serde_json::to_string(&message)
            .map_err(|e| DriverError::BackendError(format!("Cannot serialize message: {}", e)))?;
        let request = PublishRequest {
            properties: MessageProperties { content_type: "application/json", delivery_mode: 2 },
            routing_key: &self.queue,
            payload,
            payload_encoding: "string",
        };
        let body = serde_json::to_vec(&request)
            .map_err(|e| DriverError::BackendError(format!("Cannot serialize request: {}", e)))?;

        let response = self
            .client
            .post(self.publish_url.clone())
            .basic_auth(&self.username, Some(&self.password))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| DriverError::BackendError(format!("RabbitMQ request failed: {}", e)))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            DriverError::BackendError(format!("Cannot read RabbitMQ response: {}", e))
        })?;
        if status != StatusCode::OK {
            return Err(DriverError::BackendError(format!(
                "RabbitMQ returned status {} with text '{}'",
                status,
                String::from_utf8_lossy(&bytes)
            )));
        }

        let response: PublishResponse = serde_json::from_slice(&bytes).map_err(|e| {
            DriverError::BackendError(format!("Invalid RabbitMQ response: {}", e))
        })?;
        if !response.routed {
            return Err(DriverError::BackendError(format!(
                "Message not routed to queue {}",
                self.queue
            )));
        }

        debug!("Published {:?} message to queue {}", message.event_type(), self.queue);
        Ok(())
    }
}
