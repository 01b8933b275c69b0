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

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DelegationError {
    #[error("Invalid space {0:?}: encoded name must be shorter than 32 bytes")]
    InvalidSpace(String),

    #[error("Invalid snapshot {0:?}: expected a block number or \"latest\"")]
    InvalidSnapshot(String),

    #[error("Delegate registry read failed: {0}")]
    Read(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Delegate registry returned {actual} results for {expected} calls")]
    ReadShape { expected: usize, actual: usize },

    #[error("Delegation index request failed: {0}")]
    IndexTransport(#[source] reqwest::Error),

    #[error("Delegation index query failed: {0}")]
    IndexQuery(String),

    #[error("Score API request failed: {0}")]
    ScoreTransport(#[source] reqwest::Error),

    #[error("Score API returned an error: {0}")]
    ScoreApi(String),

    #[error("Score API returned {actual} score tables for {expected} strategies")]
    ScoreShape { expected: usize, actual: usize },
}
