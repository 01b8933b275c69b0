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

//! Batched point reads of the delegate registry.

use alloy::{
    primitives::{Address, B256},
    providers::Provider,
    rpc::types::BlockId,
};
use async_trait::async_trait;

use crate::{
    contracts::IDelegateRegistry, DelegationError, Snapshot, DEFAULT_MULTICALL_CHUNK_SIZE,
};

/// A single `delegation(delegator, id)` read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DelegationCall {
    pub delegator: Address,
    pub id: B256,
}

/// Reads the current delegate registry state for many (delegator, space id) pairs at once.
#[async_trait]
pub trait DelegationReader: Send + Sync {
    /// Returns one registry value per call, in call order. Unset entries are the zero address.
    ///
    /// Either every read succeeds or the whole batch fails.
    async fn read_delegations(
        &self,
        calls: &[DelegationCall],
        snapshot: Snapshot,
    ) -> Result<Vec<Address>, DelegationError>;
}

/// [DelegationReader] backed by Multicall3 aggregation over an RPC provider.
#[derive(Clone, Debug)]
pub struct MulticallReader<P> {
    provider: P,
    registry_address: Address,
    chunk_size: usize,
}

impl<P: Provider> MulticallReader<P> {
    pub fn new(provider: P, registry_address: Address) -> Self {
        Self { provider, registry_address, chunk_size: DEFAULT_MULTICALL_CHUNK_SIZE }
    }

    /// Limit the number of reads sent in one multicall.
    ///
    /// Every chunk is pinned to the same block. For [Snapshot::Latest] with more than one chunk,
    /// the current block number is fetched once and used for all of them.
    pub fn with_chunk_size(self, chunk_size: usize) -> Self {
        Self { chunk_size: chunk_size.max(1), ..self }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

#[async_trait]
impl<P: Provider> DelegationReader for MulticallReader<P> {
    async fn read_delegations(
        &self,
        calls: &[DelegationCall],
        snapshot: Snapshot,
    ) -> Result<Vec<Address>, DelegationError> {
        let registry = IDelegateRegistry::new(self.registry_address, &self.provider);
        let block = match snapshot {
            Snapshot::Latest if calls.len() > self.chunk_size => {
                let number = self
                    .provider
                    .get_block_number()
                    .await
                    .map_err(|err| DelegationError::Read(Box::new(err)))?;
                tracing::debug!("Pinned latest snapshot to block {}", number);
                BlockId::number(number)
            }
            _ => BlockId::from(snapshot),
        };
        let mut delegates = Vec::with_capacity(calls.len());

        for chunk in calls.chunks(self.chunk_size) {
            tracing::debug!(
                "Reading {} registry entries at {} from {}",
                chunk.len(),
                snapshot,
                self.registry_address
            );
            let mut multicall =
                self.provider.multicall().dynamic::<IDelegateRegistry::delegationCall>();
            for call in chunk {
                multicall = multicall.add_dynamic(registry.delegation(call.delegator, call.id));
            }

            let results: Vec<Address> = multicall
                .block(block)
                .aggregate()
                .await
                .map_err(|err| DelegationError::Read(Box::new(err)))?;
            delegates.extend(results);
        }

        if delegates.len() != calls.len() {
            return Err(DelegationError::ReadShape {
                expected: calls.len(),
                actual: delegates.len(),
            });
        }
        Ok(delegates)
    }
}
