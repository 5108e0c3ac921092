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

//! Test utilities for event publishing.

use crate::driver::Publisher;
use crate::model::Message;
use async_trait::async_trait;
use derivative::Derivative;
use futures::lock::Mutex;
use regiao_core::driver::{DriverError, DriverResult};
use std::sync::Arc;

/// Publisher that captures outgoing messages.
#[derive(Derivative)]
#[derivative(Clone(bound = ""), Default(bound = ""))]
pub struct RecorderPublisher<T> {
    /// Storage for captured messages, in publication order.
    pub messages: Arc<Mutex<Vec<Message<T>>>>,

    /// Error to return from every publish attempt, if any.
    error: Arc<Mutex<Option<String>>>,
}

impl<T: Clone> RecorderPublisher<T> {
    /// Makes all subsequent publish attempts fail with `error`.
    pub async fn inject_error<E: Into<String>>(&self, error: E) {
        let mut guard = self.error.lock().await;
        *guard = Some(error.into());
    }

    /// Expects that no messages were published.
    pub async fn expect_no_messages(&self) {
        let messages = self.messages.lock().await;
        assert_eq!(0, messages.len(), "Expected to find no messages");
    }

    /// Expects that exactly one message was published and returns it.
    pub async fn expect_one_message(&self) -> Message<T> {
        let messages = self.messages.lock().await;
        assert_eq!(1, messages.len(), "Expected to find just one message");
        messages[0].clone()
    }
}

#[async_trait]
impl<T> Publisher<T> for RecorderPublisher<T>
where
    T: Send + Sync + 'static,
{
    async fn publish(&self, message: Message<T>) -> DriverResult<()> {
        {
            let error = self.error.lock().await;
            if let Some(error) = error.as_ref() {
                return Err(DriverError::BackendError(error.clone()));
            }
        }

        let mut messages = self.messages.lock().await;
        messages.push(message);
        Ok(())
    }
}
