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

//! In-memory stand-ins for the delegate registry, the delegation index and the score API.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use alloy::primitives::{address, Address, B256};
use async_trait::async_trait;
use space_delegation::{
    DelegationCall, DelegationError, DelegationIndex, DelegationReader, IndexQuery,
    IndexedDelegation, ScoreOracle, ScoreRequest, ScoreResult, Snapshot, Space,
};

pub const ALICE: Address = address!("0x00000000000000000000000000000000000a11ce");
pub const BOB: Address = address!("0x0000000000000000000000000000000000000b0b");
pub const CAROL: Address = address!("0x00000000000000000000000000000000000ca201");
pub const DAVE: Address = address!("0x000000000000000000000000000000000000da7e");
pub const ERIN: Address = address!("0x00000000000000000000000000000000000e4117");

pub fn space() -> Space {
    Space::new("cvx.eth").unwrap()
}

#[derive(Default)]
struct RegistryState {
    entries: HashMap<(Address, B256), Address>,
    batches: Vec<(Vec<DelegationCall>, Snapshot)>,
    fail: bool,
}

/// Delegate registry backed by a map of (delegator, space id) to delegate.
#[derive(Clone, Default)]
pub struct FakeRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl FakeRegistry {
    pub fn set(&self, delegator: Address, space: &Space, delegate: Address) -> &Self {
        self.state.lock().unwrap().entries.insert((delegator, space.id()), delegate);
        self
    }

    pub fn fail(&self) {
        self.state.lock().unwrap().fail = true;
    }

    /// Every batch received so far, with the snapshot it was pinned to.
    pub fn batches(&self) -> Vec<(Vec<DelegationCall>, Snapshot)> {
        self.state.lock().unwrap().batches.clone()
    }
}

#[async_trait]
impl DelegationReader for FakeRegistry {
    async fn read_delegations(
        &self,
        calls: &[DelegationCall],
        snapshot: Snapshot,
    ) -> Result<Vec<Address>, DelegationError> {
        let mut state = self.state.lock().unwrap();
        state.batches.push((calls.to_vec(), snapshot));
        if state.fail {
            return Err(DelegationError::Read("execution reverted".into()));
        }
        Ok(calls
            .iter()
            .map(|call| {
                state.entries.get(&(call.delegator, call.id)).copied().unwrap_or(Address::ZERO)
            })
            .collect())
    }
}

#[derive(Default)]
struct IndexState {
    edges: Vec<IndexedDelegation>,
    queries: Vec<IndexQuery>,
    fail: bool,
}

/// Delegation index that filters and paginates a fixed, ordered list of edges the way the
/// subgraph does.
#[derive(Clone, Default)]
pub struct FakeIndex {
    state: Arc<Mutex<IndexState>>,
}

impl FakeIndex {
    pub fn push(&self, delegator: Address, delegate: Address, space: &str) -> &Self {
        self.state.lock().unwrap().edges.push(IndexedDelegation {
            delegator,
            delegate,
            space: Some(space.into()),
        });
        self
    }

    pub fn fail(&self) {
        self.state.lock().unwrap().fail = true;
    }

    pub fn queries(&self) -> Vec<IndexQuery> {
        self.state.lock().unwrap().queries.clone()
    }
}

#[async_trait]
impl DelegationIndex for FakeIndex {
    async fn delegations(
        &self,
        query: &IndexQuery,
    ) -> Result<Vec<IndexedDelegation>, DelegationError> {
        let mut state = self.state.lock().unwrap();
        state.queries.push(query.clone());
        if state.fail {
            return Err(DelegationError::IndexQuery("indexing_error".into()));
        }
        Ok(state
            .edges
            .iter()
            .filter(|edge| query.delegates.contains(&edge.delegate))
            .filter(|edge| edge.is_base() || edge.is_for(&query.space))
            .skip(query.skip)
            .take(query.first)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct OracleState {
    scores: Vec<HashMap<Address, f64>>,
    requests: Vec<ScoreRequest>,
    fail: bool,
}

/// Score API returning fixed raw scores, restricted to the requested addresses.
#[derive(Clone, Default)]
pub struct FakeOracle {
    state: Arc<Mutex<OracleState>>,
}

impl FakeOracle {
    pub fn with_scores(scores: Vec<HashMap<Address, f64>>) -> Self {
        let oracle = Self::default();
        oracle.state.lock().unwrap().scores = scores;
        oracle
    }

    pub fn fail(&self) {
        self.state.lock().unwrap().fail = true;
    }

    pub fn requests(&self) -> Vec<ScoreRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl ScoreOracle for FakeOracle {
    async fn scores(&self, request: &ScoreRequest) -> Result<ScoreResult, DelegationError> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());
        if state.fail {
            return Err(DelegationError::ScoreApi("rate limited".into()));
        }

        let scores = state
            .scores
            .iter()
            .map(|table| {
                request
                    .addresses
                    .iter()
                    .filter_map(|address| table.get(address).map(|score| (*address, *score)))
                    .collect()
            })
            .collect();
        let mut extra = serde_json::Map::new();
        extra.insert("state".into(), "final".into());
        Ok(ScoreResult { scores, extra })
    }
}
