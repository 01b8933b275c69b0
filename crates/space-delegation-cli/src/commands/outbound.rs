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

/// Command to resolve the delegate of each address.
#[non_exhaustive]
#[derive(Args, Clone, Debug)]
pub struct ResolveOutbound {
    #[clap(flatten)]
    pub query: QueryArgs,
}

impl ResolveOutbound {
    /// Run the [ResolveOutbound] command.
    pub async fn run(&self, global_config: &GlobalConfig) -> anyhow::Result<()> {
        let resolver = global_config.build_resolver()?;
        let QueryArgs { space, snapshot, addresses } = &self.query;

        let outbound = global_config
            .with_timeout(async {
                resolver
                    .resolve_outbound(space, addresses, *snapshot)
                    .await
                    .context("failed to resolve outbound delegations")
            })
            .await?;

        print_json(&outbound)
    }
}
