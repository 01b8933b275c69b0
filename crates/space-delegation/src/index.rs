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

//! Paginated queries against the event-derived delegation index.

use alloy::primitives::Address;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::{DelegationError, IndexedDelegation, Snapshot, Space};

/// One page of edges whose delegate is in `delegates` and whose space is either `space` or the
/// base tier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexQuery {
    pub space: Space,
    pub delegates: Vec<Address>,
    pub first: usize,
    pub skip: usize,
    pub snapshot: Snapshot,
}

/// Bulk access to indexed delegation edges.
#[async_trait]
pub trait DelegationIndex: Send + Sync {
    /// Fetch a single page. An empty or malformed page is returned as no edges.
    async fn delegations(
        &self,
        query: &IndexQuery,
    ) -> Result<Vec<IndexedDelegation>, DelegationError>;
}

/// [DelegationIndex] served by a GraphQL endpoint exposing a `delegations` entity, such as the
/// Snapshot delegation subgraph or a self-hosted graph node.
#[derive(Clone, Debug)]
pub struct SubgraphIndex {
    client: reqwest::Client,
    url: Url,
    api_key: Option<String>,
}

impl SubgraphIndex {
    pub fn new(url: Url) -> Self {
        Self { client: reqwest::Client::new(), url, api_key: None }
    }

    pub fn with_client(self, client: reqwest::Client) -> Self {
        Self { client, ..self }
    }

    /// Send `key` as a bearer token, as required by gateway-hosted subgraphs.
    pub fn with_api_key(self, key: impl Into<String>) -> Self {
        Self { api_key: Some(key.into()), ..self }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<DelegationsData>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct DelegationsData {
    #[serde(default)]
    delegations: Option<Vec<IndexedDelegation>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[async_trait]
impl DelegationIndex for SubgraphIndex {
    async fn delegations(
        &self,
        query: &IndexQuery,
    ) -> Result<Vec<IndexedDelegation>, DelegationError> {
        let body = json!({ "query": graphql_query(query) });

        let mut request = self.client.post(self.url.clone()).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }
        let response: GraphQlResponse = request
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(DelegationError::IndexTransport)?
            .json()
            .await
            .map_err(DelegationError::IndexTransport)?;

        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            let messages: Vec<String> = errors.into_iter().map(|err| err.message).collect();
            return Err(DelegationError::IndexQuery(messages.join("; ")));
        }

        Ok(response.data.and_then(|data| data.delegations).unwrap_or_default())
    }
}

/// Render the `delegations` query for one page. The `block` argument is omitted for `latest`.
fn graphql_query(query: &IndexQuery) -> String {
    // JSON string literals are valid GraphQL string literals.
    let spaces = format!(
        "[{}, {}]",
        serde_json::Value::from(""),
        serde_json::Value::from(query.space.as_str())
    );
    let delegates = query
        .delegates
        .iter()
        .map(|delegate| format!("\"{delegate:#x}\""))
        .collect::<Vec<_>>()
        .join(", ");
    let block = match query.snapshot.block_number() {
        Some(number) => format!("block: {{ number: {number} }}, "),
        None => String::new(),
    };

    format!(
        "query {{ delegations(first: {}, skip: {}, {block}where: {{ space_in: {spaces}, delegate_in: [{delegates}] }}) {{ delegator delegate space }} }}",
        query.first, query.skip
    )
}
