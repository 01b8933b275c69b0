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

use anyhow::Context;
use clap::Args;

use super::{print_json, QueryArgs};
use crate::config::GlobalConfig;

/// Command to resolve the current delegators of each address.
#[non_exhaustive]
#[derive(Args, Clone, Debug)]
pub struct ResolveInbound {
    #[clap(flatten)]
    pub query: QueryArgs,
}

impl ResolveInbound {
    /// Run the [ResolveInbound] command.
    pub async fn run(&self, global_config: &GlobalConfig) -> anyhow::Result<()> {
        let resolver = global_config.build_resolver()?;
        let QueryArgs { space, snapshot, addresses } = &self.query;

        let inbound = global_config
            .with_timeout(async {
                resolver
                    .resolve_inbound(space, addresses, *snapshot)
                    .await
                    .context("failed to resolve inbound delegations")
            })
            .await?;
        tracing::info!(
            "Found {} delegators for {} addresses",
            inbound.values().map(Vec::len).sum::<usize>(),
            inbound.len()
        );

        print_json(&inbound)
    }
}
