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

//! Integration tests for the CLI commands against mocked subgraph and score API endpoints.

use std::{collections::HashMap, io::Write};

use alloy::primitives::{address, Address};
use assert_cmd::Command;
use predicates::str::contains;
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, body_string_contains, method, path},
    Mock, MockServer, ResponseTemplate,
};

const ALICE: Address = address!("0x00000000000000000000000000000000000a11ce");
const BOB: Address = address!("0x0000000000000000000000000000000000000b0b");

// Nothing listens here; commands that reach the registry fail.
const UNUSED_RPC_URL: &str = "http://127.0.0.1:1";

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("space-delegation").unwrap();
    cmd.env_remove("NETWORK")
        .env("RPC_URL", UNUSED_RPC_URL)
        .env("NO_COLOR", "1")
        .env("RUST_LOG", "space_delegation=debug,info");
    cmd
}

#[tokio::test(flavor = "multi_thread")]
async fn test_inbound_space_delegations() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/delegation/1"))
        .and(body_string_contains("block: { number: 14780000 }"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "delegations": [
                    { "delegator": format!("{ALICE:#x}"), "delegate": format!("{BOB:#x}"), "space": "cvx.eth" },
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = cli()
        .args(["inbound", "--space", "cvx.eth", "--snapshot", "14780000", &format!("{BOB:#x}")])
        .env("DELEGATE_REGISTRY_ADDRESS", format!("{:#x}", Address::repeat_byte(0x42)))
        .env("DELEGATION_SUBGRAPH_URL", format!("{}/delegation/1", server.uri()))
        .assert()
        .success()
        .stderr(contains("Found 1 delegators for 1 addresses"))
        .get_output()
        .stdout
        .clone();

    let inbound: HashMap<Address, Vec<Address>> = serde_json::from_slice(&output)?;
    assert_eq!(inbound, HashMap::from([(BOB, vec![ALICE])]));

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_scores_without_delegation() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/scores"))
        .and(body_partial_json(json!({
            "params": { "space": "cvx.eth", "network": "10", "snapshot": "latest" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "scores": [{ format!("{ALICE:#x}"): 12.5 }],
                "state": "pending",
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut strategies = tempfile::NamedTempFile::new()?;
    write!(strategies, r#"[{{"name": "erc20-balance-of", "params": {{"decimals": 18}}}}]"#)?;

    let output = cli()
        .args([
            "--network",
            "10",
            "scores",
            "--space",
            "cvx.eth",
            "--strategies",
            &format!("@{}", strategies.path().display()),
            &format!("{ALICE:#x}"),
        ])
        .env("SCORE_API_URL", format!("{}/api/scores", server.uri()))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let result: Value = serde_json::from_slice(&output)?;
    assert_eq!(result["state"], "pending");
    let scores: Vec<HashMap<Address, f64>> = serde_json::from_value(result["scores"].clone())?;
    assert_eq!(scores, vec![HashMap::from([(ALICE, 12.5)])]);

    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_subgraph_failure_is_reported() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "indexing_error" }]
        })))
        .mount(&server)
        .await;

    cli()
        .args(["delegations", "--space", "cvx.eth", &format!("{BOB:#x}")])
        .env("DELEGATE_REGISTRY_ADDRESS", format!("{:#x}", Address::repeat_byte(0x42)))
        .env("DELEGATION_SUBGRAPH_URL", server.uri())
        .assert()
        .failure()
        .stderr(contains("failed to resolve delegations"));

    Ok(())
}

#[test]
fn test_unknown_network_requires_deployment() {
    cli()
        .args(["--network", "31337", "outbound", "--space", "cvx.eth", &format!("{BOB:#x}")])
        .assert()
        .failure()
        .stderr(contains("no known delegation deployment for network 31337"));
}

#[test]
fn test_rejects_bad_checksum() {
    cli()
        .args(["outbound", "--space", "cvx.eth", "0x469788fe6E9E9681C6ebF3bF78e7Fd26Fc015446"])
        .assert()
        .failure()
        .stderr(contains("invalid checksummed address"));
}
