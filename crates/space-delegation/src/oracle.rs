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

//! Client for the external scoring service.

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use crate::{DelegationError, ScoreResult, Snapshot, Space, Strategy};

/// Parameters of a scoring request.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScoreRequest {
    pub space: Space,
    pub network: String,
    pub snapshot: Snapshot,
    pub strategies: Vec<Strategy>,
    pub addresses: Vec<Address>,
}

/// Computes raw, delegation-unaware voting power per strategy.
#[async_trait]
pub trait ScoreOracle: Send + Sync {
    async fn scores(&self, request: &ScoreRequest) -> Result<ScoreResult, DelegationError>;
}

/// [ScoreOracle] that POSTs to a score API such as `https://score.snapshot.org/api/scores`.
#[derive(Clone, Debug)]
pub struct ScoreApiClient {
    client: reqwest::Client,
    url: Url,
}

impl ScoreApiClient {
    pub fn new(url: Url) -> Self {
        Self { client: reqwest::Client::new(), url }
    }

    pub fn with_client(self, client: reqwest::Client) -> Self {
        Self { client, ..self }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[derive(Debug, Deserialize)]
struct ScoreApiResponse {
    #[serde(default)]
    result: Option<ScoreResult>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[async_trait]
impl ScoreOracle for ScoreApiClient {
    async fn scores(&self, request: &ScoreRequest) -> Result<ScoreResult, DelegationError> {
        tracing::debug!(
            "Requesting scores for {} addresses and {} strategies from {}",
            request.addresses.len(),
            request.strategies.len(),
            self.url
        );

        let response = self
            .client
            .post(self.url.clone())
            .json(&json!({ "params": request }))
            .send()
            .await
            .map_err(DelegationError::ScoreTransport)?;
        let status = response.status();
        let text = response.text().await.map_err(DelegationError::ScoreTransport)?;

        let body: ScoreApiResponse = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(DelegationError::ScoreApi(format!("status {status}: {text}")))
            }
            Err(err) => {
                return Err(DelegationError::ScoreApi(format!("invalid response body: {err}")))
            }
        };

        if let Some(error) = body.error {
            return Err(DelegationError::ScoreApi(error.to_string()));
        }
        if !status.is_success() {
            return Err(DelegationError::ScoreApi(format!("status {status}")));
        }
        body.result.ok_or_else(|| DelegationError::ScoreApi("response has no result".into()))
    }
}
