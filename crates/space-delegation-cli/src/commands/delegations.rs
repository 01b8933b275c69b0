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

/// Command to resolve both directions of delegation for each address.
///
/// Prints an object keyed by address, each entry holding `in` (delegators) and `out` (delegate or
/// `null`).
#[non_exhaustive]
#[derive(Args, Clone, Debug)]
pub struct ResolveDelegations {
    #[clap(flatten)]
    pub query: QueryArgs,
}

impl ResolveDelegations {
    /// Run the [ResolveDelegations] command.
    pub async fn run(&self, global_config: &GlobalConfig) -> anyhow::Result<()> {
        let resolver = global_config.build_resolver()?;
        let QueryArgs { space, snapshot, addresses } = &self.query;

        let delegations = global_config
            .with_timeout(async {
                resolver
                    .resolve_delegations(space, addresses, *snapshot)
                    .await
                    .context("failed to resolve delegations")
            })
            .await?;

        print_json(&delegations)
    }
}
