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

use anyhow::Context;
use clap::Args;
use space_delegation::Strategy;

use super::{print_json, QueryArgs};
use crate::config::GlobalConfig;

/// Command to compute the voting power of each address.
#[non_exhaustive]
#[derive(Args, Clone, Debug)]
pub struct ComputeScores {
    #[clap(flatten)]
    pub query: QueryArgs,

    /// Scoring strategies, as a JSON array or `@path` to a file holding one.
    #[clap(long)]
    pub strategies: String,

    /// Move the voting power of delegators to their delegates.
    #[clap(long)]
    pub delegation: bool,
}

impl ComputeScores {
    /// Run the [ComputeScores] command.
    pub async fn run(&self, global_config: &GlobalConfig) -> anyhow::Result<()> {
        let strategies = load_strategies(&self.strategies)?;
        let redistributor = global_config.build_redistributor()?;
        let QueryArgs { space, snapshot, addresses } = &self.query;

        let result = global_config
            .with_timeout(async {
                redistributor
                    .compute_scores(space, &strategies, addresses, *snapshot, self.delegation)
                    .await
                    .context("failed to compute scores")
            })
            .await?;

        print_json(&result)
    }
}

fn load_strategies(arg: &str) -> anyhow::Result<Vec<Strategy>> {
    let json = match arg.strip_prefix('@') {
        Some(path) => Cow::Owned(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read strategies from {path}"))?,
        ),
        None => Cow::Borrowed(arg),
    };
    serde_json::from_str(&json).context("strategies must be a JSON array of strategy objects")
}
