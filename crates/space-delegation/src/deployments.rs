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

use std::borrow::Cow;

use alloy::primitives::{address, Address};
use clap::Args;
use derive_builder::Builder;

pub use alloy_chains::NamedChain;

/// Address of the delegate registry. The registry is deployed at the same address on every
/// supported chain.
pub const DELEGATE_REGISTRY_ADDRESS: Address =
    address!("0x469788fE6E9E9681C6ebF3bF78e7Fd26Fc015446");

/// Where the delegation sources of one network live.
// NOTE: See https://github.com/clap-rs/clap/issues/5092#issuecomment-1703980717 about clap usage.
#[non_exhaustive]
#[derive(Clone, Debug, Builder, Args)]
#[group(requires = "delegate_registry_address", requires = "delegation_subgraph_url")]
pub struct Deployment {
    /// EIP-155 chain ID of the network.
    #[clap(skip)]
    #[builder(setter(into, strip_option), default)]
    pub chain_id: Option<u64>,

    /// Address of the [IDelegateRegistry] contract.
    ///
    /// [IDelegateRegistry]: crate::contracts::IDelegateRegistry
    #[clap(long, env, required = false, long_help = "Address of the delegate registry contract")]
    #[builder(setter(into), default = "DELEGATE_REGISTRY_ADDRESS")]
    pub delegate_registry_address: Address,

    /// URL of the GraphQL endpoint indexing delegation events.
    #[clap(long, env, required = false, long_help = "URL of the delegation subgraph")]
    #[builder(setter(into))]
    pub delegation_subgraph_url: Cow<'static, str>,
}

impl Deployment {
    /// Create a new [DeploymentBuilder].
    pub fn builder() -> DeploymentBuilder {
        Default::default()
    }

    /// Lookup the [Deployment] for a named chain.
    pub const fn from_chain(chain: NamedChain) -> Option<Deployment> {
        match chain {
            NamedChain::Mainnet => Some(MAINNET),
            NamedChain::Sepolia => Some(SEPOLIA),
            NamedChain::Optimism => Some(OPTIMISM),
            NamedChain::BinanceSmartChain => Some(BSC),
            NamedChain::Gnosis => Some(GNOSIS),
            NamedChain::Polygon => Some(POLYGON),
            NamedChain::Fantom => Some(FANTOM),
            NamedChain::Base => Some(BASE),
            NamedChain::Arbitrum => Some(ARBITRUM),
            _ => None,
        }
    }

    /// Lookup the [Deployment] by chain ID.
    pub fn from_chain_id(chain_id: impl Into<u64>) -> Option<Deployment> {
        let chain = NamedChain::try_from(chain_id.into()).ok()?;
        Self::from_chain(chain)
    }
}

const fn deployment(chain: NamedChain, subgraph_url: &'static str) -> Deployment {
    Deployment {
        chain_id: Some(chain as u64),
        delegate_registry_address: DELEGATE_REGISTRY_ADDRESS,
        delegation_subgraph_url: Cow::Borrowed(subgraph_url),
    }
}

/// [Deployment] for Ethereum mainnet.
pub const MAINNET: Deployment =
    deployment(NamedChain::Mainnet, "https://subgrapher.snapshot.org/delegation/1");

/// [Deployment] for the Sepolia testnet.
pub const SEPOLIA: Deployment =
    deployment(NamedChain::Sepolia, "https://subgrapher.snapshot.org/delegation/11155111");

/// [Deployment] for OP mainnet.
pub const OPTIMISM: Deployment =
    deployment(NamedChain::Optimism, "https://subgrapher.snapshot.org/delegation/10");

/// [Deployment] for BNB Smart Chain.
pub const BSC: Deployment =
    deployment(NamedChain::BinanceSmartChain, "https://subgrapher.snapshot.org/delegation/56");

/// [Deployment] for Gnosis chain.
pub const GNOSIS: Deployment =
    deployment(NamedChain::Gnosis, "https://subgrapher.snapshot.org/delegation/100");

/// [Deployment] for Polygon PoS.
pub const POLYGON: Deployment =
    deployment(NamedChain::Polygon, "https://subgrapher.snapshot.org/delegation/137");

/// [Deployment] for Fantom Opera.
pub const FANTOM: Deployment =
    deployment(NamedChain::Fantom, "https://subgrapher.snapshot.org/delegation/250");

/// [Deployment] for the Base mainnet.
pub const BASE: Deployment =
    deployment(NamedChain::Base, "https://subgrapher.snapshot.org/delegation/8453");

/// [Deployment] for Arbitrum One.
pub const ARBITRUM: Deployment =
    deployment(NamedChain::Arbitrum, "https://subgrapher.snapshot.org/delegation/42161");
