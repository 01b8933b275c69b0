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

//! Resolution of outgoing and incoming delegations within a space.

use std::collections::HashMap;

use alloy::primitives::Address;
use clap::Args;
use derive_builder::Builder;

use crate::{
    dedup_addresses, DelegationCall, DelegationError, DelegationIndex, DelegationReader,
    DelegationRecord, IndexQuery, IndexedDelegation, Snapshot, Space, DEFAULT_PAGE_SIZE,
};

/// Effective delegate of each address, `None` when it delegates to no one.
pub type OutboundDelegations = HashMap<Address, Option<Address>>;
/// Current delegators of each address.
pub type InboundDelegations = HashMap<Address, Vec<Address>>;

/// Tunables of a [DelegationResolver].
#[non_exhaustive]
#[derive(Clone, Debug, Builder, Args)]
pub struct ResolverConfig {
    /// Number of edges requested per delegation index page.
    #[clap(long, env = "INDEX_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    #[builder(default = "DEFAULT_PAGE_SIZE")]
    pub page_size: usize,

    /// Registry value that means "no delegate".
    #[clap(skip)]
    #[builder(setter(into), default)]
    pub null_delegate: Address,
}

impl ResolverConfig {
    /// Create a new [ResolverConfigBuilder].
    pub fn builder() -> ResolverConfigBuilder {
        Default::default()
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE, null_delegate: Address::ZERO }
    }
}

/// Resolves delegations by combining the delegate registry (authoritative, current state, point
/// reads) with the delegation index (historical, bulk reads).
///
/// Delegation is resolved one level deep: a delegate that itself delegates elsewhere is not
/// followed.
#[derive(Clone, Debug)]
pub struct DelegationResolver<R, I> {
    reader: R,
    index: I,
    config: ResolverConfig,
}

impl<R: DelegationReader, I: DelegationIndex> DelegationResolver<R, I> {
    pub fn new(reader: R, index: I) -> Self {
        Self { reader, index, config: ResolverConfig::default() }
    }

    pub fn with_config(self, config: ResolverConfig) -> Self {
        Self { config, ..self }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the delegate of every address in `space`.
    ///
    /// A space-specific delegation takes precedence over a base delegation.
    pub async fn resolve_outbound(
        &self,
        space: &Space,
        addresses: &[Address],
        snapshot: Snapshot,
    ) -> Result<OutboundDelegations, DelegationError> {
        let addresses = dedup_addresses(addresses);
        if addresses.is_empty() {
            return Ok(OutboundDelegations::new());
        }

        let base_id = Space::base().id();
        let space_id = space.id();
        let calls: Vec<DelegationCall> = addresses
            .iter()
            .flat_map(|&delegator| {
                [DelegationCall { delegator, id: base_id }, DelegationCall { delegator, id: space_id }]
            })
            .collect();

        let results = self.reader.read_delegations(&calls, snapshot).await?;
        if results.len() != calls.len() {
            return Err(DelegationError::ReadShape { expected: calls.len(), actual: results.len() });
        }

        let outbound: OutboundDelegations = addresses
            .iter()
            .zip(results.chunks_exact(2))
            .map(|(&address, tiers)| {
                (address, effective_delegate(tiers[0], tiers[1], self.config.null_delegate))
            })
            .collect();

        tracing::debug!(
            "Resolved outbound delegations for {} addresses in {:?}: {} delegating",
            addresses.len(),
            space.as_str(),
            outbound.values().filter(|delegate| delegate.is_some()).count()
        );
        Ok(outbound)
    }

    /// Resolve the current delegators of every address in `space`.
    ///
    /// Space edges from the index are taken as-is. Base edges are only kept when the registry
    /// confirms that the delegator's effective delegate is still the indexed one.
    pub async fn resolve_inbound(
        &self,
        space: &Space,
        addresses: &[Address],
        snapshot: Snapshot,
    ) -> Result<InboundDelegations, DelegationError> {
        let addresses = dedup_addresses(addresses);
        let mut inbound: InboundDelegations =
            addresses.iter().map(|&address| (address, Vec::new())).collect();
        if addresses.is_empty() {
            return Ok(inbound);
        }

        let edges = self.fetch_indexed_delegations(space, &addresses, snapshot).await?;
        let pending = partition_edges(space, edges, &mut inbound);
        if pending.is_empty() {
            return Ok(inbound);
        }

        let current = self.resolve_outbound(space, pending.delegators(), snapshot).await?;
        let dropped = pending.confirm(&current, &mut inbound);
        if dropped > 0 {
            tracing::debug!("Dropped {} superseded base delegations in {:?}", dropped, space.as_str());
        }
        Ok(inbound)
    }

    /// Resolve both directions for every address, querying the registry and the index
    /// concurrently.
    pub async fn resolve_delegations(
        &self,
        space: &Space,
        addresses: &[Address],
        snapshot: Snapshot,
    ) -> Result<HashMap<Address, DelegationRecord>, DelegationError> {
        let addresses = dedup_addresses(addresses);
        let (mut inbound, mut outbound) = tokio::try_join!(
            self.resolve_inbound(space, &addresses, snapshot),
            self.resolve_outbound(space, &addresses, snapshot)
        )?;

        tracing::info!(
            "Resolved delegations for {} addresses in {:?} at {}",
            addresses.len(),
            space.as_str(),
            snapshot
        );
        Ok(addresses
            .into_iter()
            .map(|address| {
                let record = DelegationRecord {
                    delegators: inbound.remove(&address).unwrap_or_default(),
                    delegate: outbound.remove(&address).flatten(),
                };
                (address, record)
            })
            .collect())
    }

    /// Page through the index until a short page is returned.
    async fn fetch_indexed_delegations(
        &self,
        space: &Space,
        delegates: &[Address],
        snapshot: Snapshot,
    ) -> Result<Vec<IndexedDelegation>, DelegationError> {
        let page_size = self.config.page_size.max(1);
        let mut query = IndexQuery {
            space: space.clone(),
            delegates: delegates.to_vec(),
            first: page_size,
            skip: 0,
            snapshot,
        };

        let mut edges = Vec::new();
        loop {
            let page = self.index.delegations(&query).await?;
            let page_len = page.len();
            tracing::debug!("Fetched {} indexed delegations at offset {}", page_len, query.skip);
            edges.extend(page);
            if page_len < page_size {
                break;
            }
            query.skip += page_size;
        }
        Ok(edges)
    }
}

/// The space tier wins over the base tier; `null` marks an unset tier.
fn effective_delegate(base: Address, space: Address, null: Address) -> Option<Address> {
    if space != null {
        Some(space)
    } else if base != null {
        Some(base)
    } else {
        None
    }
}

fn push_unique(delegators: &mut Vec<Address>, delegator: Address) {
    if !delegators.contains(&delegator) {
        delegators.push(delegator);
    }
}

/// Base edges found in the index, keyed by delegator. The latest edge of a delegator wins.
#[derive(Debug, Default)]
struct PendingBaseDelegations {
    delegators: Vec<Address>,
    delegates: HashMap<Address, Address>,
}

impl PendingBaseDelegations {
    fn insert(&mut self, delegator: Address, delegate: Address) {
        if self.delegates.insert(delegator, delegate).is_none() {
            self.delegators.push(delegator);
        }
    }

    fn is_empty(&self) -> bool {
        self.delegators.is_empty()
    }

    fn delegators(&self) -> &[Address] {
        &self.delegators
    }

    /// Add every delegator whose current delegate matches its indexed base delegate. Returns the
    /// number of edges dropped as stale.
    fn confirm(self, current: &OutboundDelegations, inbound: &mut InboundDelegations) -> usize {
        let mut dropped = 0;
        for delegator in self.delegators {
            let Some(&indexed) = self.delegates.get(&delegator) else {
                continue;
            };
            match (current.get(&delegator).copied().flatten(), inbound.get_mut(&indexed)) {
                (Some(delegate), Some(delegators)) if delegate == indexed => {
                    push_unique(delegators, delegator)
                }
                _ => dropped += 1,
            }
        }
        dropped
    }
}

/// Append space edges to `inbound` and collect base edges for confirmation.
fn partition_edges(
    space: &Space,
    edges: Vec<IndexedDelegation>,
    inbound: &mut InboundDelegations,
) -> PendingBaseDelegations {
    let mut pending = PendingBaseDelegations::default();
    for edge in edges {
        if edge.is_base() {
            pending.insert(edge.delegator, edge.delegate);
        } else if edge.is_for(space) {
            match inbound.get_mut(&edge.delegate) {
                Some(delegators) => push_unique(delegators, edge.delegator),
                None => tracing::warn!(
                    "Ignoring indexed delegation from {} to unrequested address {}",
                    edge.delegator,
                    edge.delegate
                ),
            }
        } else {
            tracing::warn!("Ignoring indexed delegation for unrequested space {:?}", edge.space);
        }
    }
    pending
}
