// Copyright 2025 RISC Zero, Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core data types shared by the resolvers and the score redistributor.

use std::{
    collections::{HashMap, HashSet},
    fmt,
    str::FromStr,
};

use alloy::{
    primitives::{Address, B256},
    rpc::types::BlockId,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::DelegationError;

/// Identifier of a governance space, e.g. `cvx.eth`.
///
/// The empty space is the base tier: a delegation under it applies to every space that has no
/// delegation of its own.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Space(String);

impl Space {
    /// Create a [Space], checking that its name fits in a `bytes32` registry key.
    pub fn new(name: impl Into<String>) -> Result<Self, DelegationError> {
        let name = name.into();
        // A terminating zero byte must fit after the name.
        if name.len() >= 32 {
            return Err(DelegationError::InvalidSpace(name));
        }
        Ok(Self(name))
    }

    /// The base tier.
    pub fn base() -> Self {
        Self(String::new())
    }

    pub fn is_base(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Registry key of the space: the UTF-8 name right-padded with zeros to 32 bytes.
    pub fn id(&self) -> B256 {
        let mut id = B256::ZERO;
        id.0[..self.0.len()].copy_from_slice(self.0.as_bytes());
        id
    }
}

impl FromStr for Space {
    type Err = DelegationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Space {
    type Error = DelegationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Space> for String {
    fn from(space: Space) -> Self {
        space.0
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Point in chain history at which every read of one resolution is evaluated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Snapshot {
    #[default]
    Latest,
    Block(u64),
}

impl Snapshot {
    pub fn block_number(&self) -> Option<u64> {
        match self {
            Self::Latest => None,
            Self::Block(number) => Some(*number),
        }
    }
}

impl FromStr for Snapshot {
    type Err = DelegationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("latest") {
            return Ok(Self::Latest);
        }
        s.parse::<u64>().map(Self::Block).map_err(|_| DelegationError::InvalidSnapshot(s.into()))
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str("latest"),
            Self::Block(number) => write!(f, "{number}"),
        }
    }
}

impl From<Snapshot> for BlockId {
    fn from(snapshot: Snapshot) -> Self {
        match snapshot {
            Snapshot::Latest => BlockId::latest(),
            Snapshot::Block(number) => BlockId::number(number),
        }
    }
}

// On the wire a snapshot is either the block number or the string "latest".
impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Latest => serializer.serialize_str("latest"),
            Self::Block(number) => serializer.serialize_u64(*number),
        }
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(u64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(number) => Ok(Self::Block(number)),
            Repr::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Resolved delegations of a single address within a space.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelegationRecord {
    /// Addresses currently delegating to this address.
    #[serde(rename = "in")]
    pub delegators: Vec<Address>,
    /// Address this address delegates to, if any.
    #[serde(rename = "out")]
    pub delegate: Option<Address>,
}

/// Delegation edge as recorded by the delegation index.
///
/// Index entries are derived from historical events and may have been superseded on-chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedDelegation {
    pub delegator: Address,
    pub delegate: Address,
    /// Space name; `None` and `""` both denote the base tier.
    #[serde(default)]
    pub space: Option<String>,
}

impl IndexedDelegation {
    pub fn is_base(&self) -> bool {
        self.space.as_deref().unwrap_or_default().is_empty()
    }

    pub fn is_for(&self, space: &Space) -> bool {
        self.space.as_deref().unwrap_or_default() == space.as_str()
    }
}

/// Voting strategy forwarded opaquely to the scoring service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub params: serde_json::Value,
    /// Any other fields of the strategy object.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Result returned by the scoring service.
///
/// Score table keys are parsed as addresses, so they are re-encoded when the result is
/// serialized again, and a table keyed by anything other than addresses is rejected.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// One score table per requested strategy, in request order.
    #[serde(default)]
    pub scores: Vec<HashMap<Address, f64>>,
    /// Any other fields of the result, passed through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Remove repeated addresses, keeping the first occurrence of each.
pub fn dedup_addresses(addresses: &[Address]) -> Vec<Address> {
    let mut seen = HashSet::with_capacity(addresses.len());
    addresses.iter().copied().filter(|address| seen.insert(*address)).collect()
}
