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

//! Data types that describe the events we publish.

use derive_getters::Getters;
use derive_more::Constructor;
use serde::{Deserialize, Serialize};

/// The kind of mutation that an event describes.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    /// A new entity was created.
    Create,

    /// An existing entity was modified.
    Update,

    /// An existing entity was deleted.
    Delete,
}

/// Envelope for an event about an entity of type `T`.
///
/// For creations and updates, the payload carries the state of the entity after the mutation.
/// For deletions, it carries the last state the entity had before it was removed.
#[derive(Clone, Constructor, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub struct Message<T> {
    /// What happened to the entity.
    event_type: EventType,

    /// The entity itself.
    payload: T,
}
