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

//! High-level data types.

use derive_getters::Getters;
use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};

/// Identifier of a region, assigned by the store when the region is first persisted.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub(crate) struct RegionId(i32);

impl RegionId {
    /// Creates a new identifier from its raw database representation.
    pub(crate) fn new(id: i32) -> Self {
        Self(id)
    }

    /// Returns the identifier as stored in the database.
    pub(crate) fn as_i32(self) -> i32 {
        self.0
    }
}

/// A region as exposed by the API and as stored in the database.
#[derive(Clone, Constructor, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub(crate) struct Region {
    /// Unique identifier of the region.
    id: RegionId,

    /// Human-readable name of the region.  Any string is accepted, including the empty one.
    name: String,
}

impl Region {
    /// Consumes the region and returns a copy with the same identifier but a new `name`.
    pub(crate) fn with_name(self, name: String) -> Self {
        Self { id: self.id, name }
    }
}
