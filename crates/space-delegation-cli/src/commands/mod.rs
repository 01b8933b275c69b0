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

//! Commands of the space delegation CLI.

mod delegations;
mod inbound;
mod outbound;
mod scores;

pub use delegations::ResolveDelegations;
pub use inbound::ResolveInbound;
pub use outbound::ResolveOutbound;
pub use scores::ComputeScores;

use alloy::primitives::Address;
use clap::{Args, Subcommand};
use serde::Serialize;
use space_delegation::{Snapshot, Space};

use crate::config::{parse_address, GlobalConfig};

/// Commands for delegation queries.
#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Print the effective delegate of each address.
    Outbound(ResolveOutbound),
    /// Print the current delegators of each address.
    Inbound(ResolveInbound),
    /// Print both the delegate and the delegators of each address.
    Delegations(ResolveDelegations),
    /// Print the voting power of each address for each strategy.
    Scores(ComputeScores),
}

impl Command {
    /// Run the command.
    pub async fn run(&self, global_config: &GlobalConfig) -> anyhow::Result<()> {
        match self {
            Self::Outbound(cmd) => cmd.run(global_config).await,
            Self::Inbound(cmd) => cmd.run(global_config).await,
            Self::Delegations(cmd) => cmd.run(global_config).await,
            Self::Scores(cmd) => cmd.run(global_config).await,
        }
    }
}

/// Space, snapshot and addresses shared by every query.
#[derive(Args, Clone, Debug)]
pub struct QueryArgs {
    /// Name of the space, e.g. `cvx.eth`.
    #[clap(long)]
    pub space: Space,

    /// Block number to resolve at, or `latest`.
    #[clap(long, default_value = "latest")]
    pub snapshot: Snapshot,

    /// Addresses to query.
    #[clap(value_parser = parse_address)]
    pub addresses: Vec<Address>,
}

/// Write `value` to stdout as pretty JSON.
fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
