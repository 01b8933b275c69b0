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

//! Delegation-aware score computation.

use std::collections::HashMap;

use alloy::primitives::Address;

use crate::{
    dedup_addresses, DelegationError, DelegationIndex, DelegationReader, DelegationRecord,
    DelegationResolver, ScoreOracle, ScoreRequest, ScoreResult, Snapshot, Space, Strategy,
};

/// Fetches raw scores from a [ScoreOracle] and, when delegation is enabled, moves the power of
/// every delegator to its delegate.
#[derive(Clone, Debug)]
pub struct ScoreRedistributor<R, I, O> {
    resolver: DelegationResolver<R, I>,
    oracle: O,
    network: String,
}

impl<R, I, O> ScoreRedistributor<R, I, O>
where
    R: DelegationReader,
    I: DelegationIndex,
    O: ScoreOracle,
{
    pub fn new(resolver: DelegationResolver<R, I>, oracle: O, network: impl Into<String>) -> Self {
        Self { resolver, oracle, network: network.into() }
    }

    pub fn resolver(&self) -> &DelegationResolver<R, I> {
        &self.resolver
    }

    /// Compute scores of `addresses` for each strategy.
    ///
    /// Without delegation the scoring result is returned as parsed, see [ScoreResult]. With
    /// delegation, each score table holds, for every requested address, its own score (unless it
    /// delegates) plus the scores of its delegators; addresses left with zero are omitted.
    pub async fn compute_scores(
        &self,
        space: &Space,
        strategies: &[Strategy],
        addresses: &[Address],
        snapshot: Snapshot,
        delegation: bool,
    ) -> Result<ScoreResult, DelegationError> {
        if !delegation {
            return self.oracle.scores(&self.request(space, strategies, addresses, snapshot)).await;
        }

        let addresses = dedup_addresses(addresses);
        let delegations = self.resolver.resolve_delegations(space, &addresses, snapshot).await?;
        let query_addresses = score_query_addresses(&addresses, &delegations);
        tracing::debug!(
            "Scoring {} addresses to redistribute power of {} requested",
            query_addresses.len(),
            addresses.len()
        );

        let mut result =
            self.oracle.scores(&self.request(space, strategies, &query_addresses, snapshot)).await?;
        if result.scores.len() != strategies.len() {
            return Err(DelegationError::ScoreShape {
                expected: strategies.len(),
                actual: result.scores.len(),
            });
        }

        result.scores = redistribute_scores(&addresses, &delegations, &result.scores);
        Ok(result)
    }

    fn request(
        &self,
        space: &Space,
        strategies: &[Strategy],
        addresses: &[Address],
        snapshot: Snapshot,
    ) -> ScoreRequest {
        ScoreRequest {
            space: space.clone(),
            network: self.network.clone(),
            snapshot,
            strategies: strategies.to_vec(),
            addresses: addresses.to_vec(),
        }
    }
}

/// Addresses whose raw scores are needed: every address that does not delegate, plus every
/// delegator of a requested address.
pub fn score_query_addresses(
    addresses: &[Address],
    delegations: &HashMap<Address, DelegationRecord>,
) -> Vec<Address> {
    let mut query = Vec::with_capacity(addresses.len());
    for address in addresses {
        let Some(record) = delegations.get(address) else {
            query.push(*address);
            continue;
        };
        if record.delegate.is_none() {
            query.push(*address);
        }
        query.extend_from_slice(&record.delegators);
    }
    dedup_addresses(&query)
}

/// Redistribute each raw score table along the resolved delegations.
pub fn redistribute_scores(
    addresses: &[Address],
    delegations: &HashMap<Address, DelegationRecord>,
    raw_scores: &[HashMap<Address, f64>],
) -> Vec<HashMap<Address, f64>> {
    let no_delegation = DelegationRecord::default();
    raw_scores
        .iter()
        .map(|raw| {
            let score_of = |address: &Address| raw.get(address).copied().unwrap_or_default();
            addresses
                .iter()
                .filter_map(|address| {
                    let record = delegations.get(address).unwrap_or(&no_delegation);
                    let own = if record.delegate.is_none() { score_of(address) } else { 0.0 };
                    let delegated: f64 = record.delegators.iter().map(score_of).sum();
                    let score = own + delegated;
                    (score != 0.0).then_some((*address, score))
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    const A: Address = address!("0x000000000000000000000000000000000000000a");
    const B: Address = address!("0x000000000000000000000000000000000000000b");
    const C: Address = address!("0x000000000000000000000000000000000000000c");
    const D: Address = address!("0x000000000000000000000000000000000000000d");

    fn record(delegators: &[Address], delegate: Option<Address>) -> DelegationRecord {
        DelegationRecord { delegators: delegators.to_vec(), delegate }
    }

    #[test]
    fn test_query_addresses() {
        // A -> B, C -> B (C not requested), D has no delegation.
        let delegations: HashMap<_, _> =
            [(A, record(&[], Some(B))), (B, record(&[A, C], None)), (D, record(&[], None))]
                .into_iter()
                .collect();

        assert_eq!(score_query_addresses(&[A, B, D], &delegations), vec![B, A, C, D]);
    }

    #[test]
    fn test_redistribute_single_delegation() {
        let delegations: HashMap<_, _> =
            [(A, record(&[], Some(B))), (B, record(&[A], None))].into_iter().collect();
        let raw: HashMap<_, _> = [(A, 10.0), (B, 5.0)].into_iter().collect();

        let scores = redistribute_scores(&[A, B], &delegations, &[raw]);

        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].get(&A), None);
        assert_eq!(scores[0][&B], 15.0);
    }

    #[test]
    fn test_redistribute_drops_zero_and_defaults_missing() {
        // C has no raw score and no delegators; D delegates away to an unrequested address.
        let delegations: HashMap<_, _> = [
            (B, record(&[A], None)),
            (C, record(&[], None)),
            (D, record(&[], Some(A))),
        ]
        .into_iter()
        .collect();
        let first: HashMap<_, _> = [(A, 2.5), (D, 7.0)].into_iter().collect();
        let second: HashMap<_, _> = [(B, 1.0)].into_iter().collect();

        let scores = redistribute_scores(&[B, C, D], &delegations, &[first, second]);

        assert_eq!(scores[0], [(B, 2.5)].into_iter().collect());
        assert_eq!(scores[1], [(B, 1.0)].into_iter().collect());
    }

    #[test]
    fn test_redistribute_delegate_who_delegates() {
        // B delegates to C but still receives A's power: only one level is resolved.
        let delegations: HashMap<_, _> = [(B, record(&[A], Some(C)))].into_iter().collect();
        let raw: HashMap<_, _> = [(A, 3.0), (B, 4.0)].into_iter().collect();

        let scores = redistribute_scores(&[B], &delegations, &[raw]);

        assert_eq!(scores[0], [(B, 3.0)].into_iter().collect());
    }
}
