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

//! Common configuration options for commands in the space delegation CLI.

use std::{future::Future, num::ParseIntError, str::FromStr, time::Duration};

use alloy::{
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
};
use anyhow::{Context, Result};
use clap::Args;
use space_delegation::{
    Deployment, DelegationResolver, MulticallReader, ResolverConfig, ScoreApiClient,
    ScoreRedistributor, SubgraphIndex, DEFAULT_SCORE_API_URL,
};
use tracing::level_filters::LevelFilter;
use url::Url;

/// Resolver reading the registry over RPC and the index over GraphQL.
pub type Resolver = DelegationResolver<MulticallReader<DynProvider>, SubgraphIndex>;

/// Score redistributor backed by [Resolver] and the score API.
pub type Redistributor =
    ScoreRedistributor<MulticallReader<DynProvider>, SubgraphIndex, ScoreApiClient>;

/// Common configuration options for all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalConfig {
    /// URL of the Ethereum RPC endpoint
    #[clap(short, long, env = "RPC_URL", global = true)]
    pub rpc_url: Option<Url>,

    /// Chain ID of the network the delegations and scores are read on.
    #[clap(long, env = "NETWORK", global = true, default_value_t = 1)]
    pub network: u64,

    /// Log level (error, warn, info, debug, trace)
    #[clap(long, env = "LOG_LEVEL", global = true, default_value = "info")]
    pub log_level: LevelFilter,

    /// Deadline for the whole command, in seconds.
    #[clap(long, env = "TIMEOUT", global = true, value_parser = |arg: &str| -> Result<Duration, ParseIntError> {Ok(Duration::from_secs(arg.parse()?))})]
    pub timeout: Option<Duration>,

    /// URL of the score API.
    #[clap(long, env = "SCORE_API_URL", global = true, default_value = DEFAULT_SCORE_API_URL)]
    pub score_api_url: Url,

    /// API key for gateway-hosted delegation subgraphs.
    #[clap(long, env = "SUBGRAPH_API_KEY", global = true, hide_env_values = true)]
    pub subgraph_api_key: Option<String>,

    /// Overrides for the delegation sources of the network.
    #[clap(flatten, next_help_heading = "Delegation Deployment")]
    pub deployment: Option<Deployment>,

    #[clap(flatten, next_help_heading = "Delegation Index")]
    pub resolver: ResolverConfig,
}

impl GlobalConfig {
    /// Access [Self::rpc_url] or return an error that can be shown to the user.
    pub fn require_rpc_url(&self) -> Result<Url> {
        self.rpc_url
            .clone()
            .context("Blockchain RPC URL not provided; please set --rpc-url or the RPC_URL env var")
    }

    /// The explicitly configured [Deployment], or the known one for [Self::network].
    pub fn deployment(&self) -> Result<Deployment> {
        self.deployment.clone().or_else(|| Deployment::from_chain_id(self.network)).with_context(
            || {
                format!(
                    "no known delegation deployment for network {}; please specify deployment explicitly",
                    self.network
                )
            },
        )
    }

    /// Build a [Resolver] for the configured network.
    ///
    /// Requires [Self::rpc_url] to be set. No connection is made until the first read.
    pub fn build_resolver(&self) -> Result<Resolver> {
        let rpc_url = self.require_rpc_url()?;
        let deployment = self.deployment()?;
        tracing::debug!("Using deployment: {:?}", deployment);

        let provider = ProviderBuilder::new().connect_http(rpc_url).erased();
        let reader = MulticallReader::new(provider, deployment.delegate_registry_address);

        let subgraph_url = Url::parse(&deployment.delegation_subgraph_url).with_context(|| {
            format!("invalid delegation subgraph URL {}", deployment.delegation_subgraph_url)
        })?;
        let mut index = SubgraphIndex::new(subgraph_url);
        if let Some(api_key) = &self.subgraph_api_key {
            index = index.with_api_key(api_key.clone());
        }

        Ok(DelegationResolver::new(reader, index).with_config(self.resolver.clone()))
    }

    /// Build a [Redistributor] for the configured network.
    pub fn build_redistributor(&self) -> Result<Redistributor> {
        let oracle = ScoreApiClient::new(self.score_api_url.clone());
        Ok(ScoreRedistributor::new(self.build_resolver()?, oracle, self.network.to_string()))
    }

    /// Run `fut` under [Self::timeout], if set.
    pub async fn with_timeout<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, fut)
                .await
                .with_context(|| format!("command timed out after {}s", timeout.as_secs()))?,
            None => fut.await,
        }
    }
}

/// Parse an address given on the command line.
///
/// Single-case hex is accepted as is. Mixed-case hex must carry a valid EIP-55 checksum.
pub fn parse_address(value: &str) -> Result<Address, String> {
    let hex = value.strip_prefix("0x").unwrap_or(value);
    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        Address::parse_checksummed(value, None)
            .map_err(|err| format!("invalid checksummed address {value}: {err}"))
    } else {
        Address::from_str(value).map_err(|err| format!("invalid address {value}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    const REGISTRY: Address = address!("0x469788fE6E9E9681C6ebF3bF78e7Fd26Fc015446");

    #[test]
    fn test_parse_address_single_case() {
        assert_eq!(parse_address("0x469788fe6e9e9681c6ebf3bf78e7fd26fc015446").unwrap(), REGISTRY);
        assert_eq!(parse_address("0x469788FE6E9E9681C6EBF3BF78E7FD26FC015446").unwrap(), REGISTRY);
        assert_eq!(parse_address("469788fe6e9e9681c6ebf3bf78e7fd26fc015446").unwrap(), REGISTRY);
    }

    #[test]
    fn test_parse_address_checksum() {
        assert_eq!(parse_address("0x469788fE6E9E9681C6ebF3bF78e7Fd26Fc015446").unwrap(), REGISTRY);
        assert!(parse_address("0x469788fe6E9E9681C6ebF3bF78e7Fd26Fc015446").is_err());
    }

    #[test]
    fn test_parse_address_malformed() {
        assert!(parse_address("0x1234").is_err());
        assert!(parse_address("vitalik.eth").is_err());
    }
}
