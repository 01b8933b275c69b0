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

//! Delegation resolution and score redistribution for governance spaces.
//!
//! Delegations live in two places: the delegate registry contract, which holds the current
//! delegate of every delegator (per space, with the empty space acting as the base tier), and an
//! event-derived subgraph index, which is the only way to find who delegates *to* an address.
//! [DelegationResolver] reconciles the two, and [ScoreRedistributor] uses the result to move
//! voting power from delegators to their delegates.

pub mod contracts;
pub mod deployments;
pub mod error;
pub mod index;
pub mod oracle;
pub mod reader;
pub mod resolver;
pub mod scores;
pub mod types;

pub use deployments::Deployment;
pub use error::DelegationError;
pub use index::{DelegationIndex, IndexQuery, SubgraphIndex};
pub use oracle::{ScoreApiClient, ScoreOracle, ScoreRequest};
pub use reader::{DelegationCall, DelegationReader, MulticallReader};
pub use resolver::{
    DelegationResolver, InboundDelegations, OutboundDelegations, ResolverConfig,
    ResolverConfigBuilder,
};
pub use scores::{redistribute_scores, score_query_addresses, ScoreRedistributor};
pub use types::{
    dedup_addresses, DelegationRecord, IndexedDelegation, ScoreResult, Snapshot, Space, Strategy,
};

/// Default number of edges requested per page from the delegation index.
pub const DEFAULT_PAGE_SIZE: usize = 1000;
/// Default number of registry reads packed into one multicall round trip.
pub const DEFAULT_MULTICALL_CHUNK_SIZE: usize = 500;
/// Default endpoint of the scoring service.
pub const DEFAULT_SCORE_API_URL: &str = "https://score.snapshot.org/api/scores";
