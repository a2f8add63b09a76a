//! End-to-end tests for the RFQ harness
//!
//! These tests stand up a mock quote service and a mock market maker webhook
//! and verify that:
//! 1. Both built-in suites pass against a well behaved maker
//! 2. Misbehaving or slow makers are reported as failures, not crashes
//! 3. YAML scenarios capture values between steps and sign fills

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;

use base64::prelude::*;
use httpmock::prelude::*;
use serde_json::json;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::message::{Message, VersionedMessage};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::VersionedTransaction;

use rfq_check::api::SIMULATE_REJECTION_REQUEST_ID;
use rfq_check::common::config::{USDC_MINT, WSOL_MINT};
use rfq_check::testing::suites::{
    SAMPLE_QUOTE_ID, SAMPLE_REQUEST_ID, SAMPLE_TAKER, UNSUPPORTED_MINT,
};
use rfq_check::testing::{self, Case, Suite, SuiteContext};
use rfq_check::{Config, TakerKeypair};

const AMOUNT: u64 = 1_000_000;
const WEBHOOK_ID: &str = "mm-test";
const MAKER: &str = "4xFtvDmPLXMsd5Rp8hSrXCg5XUuVHyD5LmbCYrmHxfBN";

/// Taker wallet written to a temporary keypair file
struct Taker {
    keypair: TakerKeypair,
    file: tempfile::NamedTempFile,
}

impl Taker {
    fn new() -> Self {
        let keypair = TakerKeypair::generate();
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create keypair file");
        let bytes = keypair.to_bytes().to_vec();
        file.write_all(serde_json::to_string(&bytes).unwrap().as_bytes())
            .expect("Failed to write keypair file");
        Self { keypair, file }
    }

    fn path(&self) -> String {
        self.file.path().display().to_string()
    }
}

fn config(server: &MockServer, taker: &Taker) -> Config {
    let mut config = Config::default();
    config.service.quote_service_url = server.base_url();
    config.service.webhook_url = server.base_url();
    config.service.webhook_id = Some(WEBHOOK_ID.to_string());
    config.swap.amount = AMOUNT;
    config.swap.mint_a = Some(USDC_MINT.to_string());
    config.swap.mint_b = Some(WSOL_MINT.to_string());
    config.taker.keypair = taker.path();
    config.timeouts.request_secs = 5;
    config
}

/// Base64 fill with the maker as fee payer and the taker as second signer
fn unsigned_fill(taker: &Pubkey) -> String {
    let maker = Pubkey::new_unique();
    let instruction = Instruction::new_with_bytes(
        Pubkey::new_unique(),
        &[7, 7, 7],
        vec![AccountMeta::new(maker, true), AccountMeta::new(*taker, true)],
    );
    let message = Message::new_with_blockhash(&[instruction], Some(&maker), &Hash::default());
    let transaction = VersionedTransaction {
        signatures: vec![Signature::default(); 2],
        message: VersionedMessage::Legacy(message),
    };
    BASE64_STANDARD.encode(bincode::serialize(&transaction).unwrap())
}

/// A maker that quotes USDC/WSOL and answers sample fills with `fill_state`
fn mock_webhook(server: &MockServer, fill_state: &str) {
    // ExactIn: pay WSOL, receive USDC
    server.mock(|when, then| {
        when.method(POST)
            .path("/quote")
            .json_body_partial(json!({ "tokenOut": USDC_MINT, "quoteType": "exactIn" }).to_string());
        then.status(200).json_body(json!({
            "requestId": SAMPLE_REQUEST_ID,
            "quoteId": SAMPLE_QUOTE_ID,
            "tokenIn": WSOL_MINT,
            "amountIn": AMOUNT.to_string(),
            "tokenOut": USDC_MINT,
            "amountOut": "151230000",
            "quoteType": "exactIn",
            "protocol": "v1",
            "maker": MAKER,
            "taker": SAMPLE_TAKER
        }));
    });

    // ExactOut: receive exactly AMOUNT of WSOL for USDC
    server.mock(|when, then| {
        when.method(POST)
            .path("/quote")
            .json_body_partial(json!({ "tokenOut": WSOL_MINT, "quoteType": "exactOut" }).to_string());
        then.status(200).json_body(json!({
            "requestId": SAMPLE_REQUEST_ID,
            "quoteId": SAMPLE_QUOTE_ID,
            "tokenIn": USDC_MINT,
            "amountIn": "152000000",
            "tokenOut": WSOL_MINT,
            "amountOut": AMOUNT.to_string(),
            "quoteType": "exactOut",
            "protocol": "v1",
            "maker": MAKER,
            "taker": SAMPLE_TAKER
        }));
    });

    server.mock(|when, then| {
        when.method(POST)
            .path("/quote")
            .json_body_partial(json!({ "tokenOut": UNSUPPORTED_MINT }).to_string());
        then.status(404)
            .json_body(json!({ "message": "pair not supported" }));
    });

    server.mock(|when, then| {
        when.method(POST)
            .path("/swap")
            .json_body_partial(json!({ "requestId": SAMPLE_REQUEST_ID }).to_string());
        then.status(200).json_body(json!({
            "quoteId": SAMPLE_QUOTE_ID,
            "state": fill_state,
            "txSignature": "5Qx9...sig",
            "rejectionReason": "insufficient inventory"
        }));
    });

    server.mock(|when, then| {
        when.method(POST)
            .path("/swap")
            .json_body_partial(json!({ "requestId": SIMULATE_REJECTION_REQUEST_ID }).to_string());
        then.status(200).json_body(json!({
            "quoteId": SAMPLE_QUOTE_ID,
            "state": "rejected",
            "rejectionReason": "simulated rejection"
        }));
    });

    server.mock(|when, then| {
        when.method(GET).path("/tokens");
        then.status(200).json_body(json!([USDC_MINT, WSOL_MINT]));
    });
}

/// A quote service that routes to one maker and expects signed fills
fn mock_quote_service(server: &MockServer, taker: &TakerKeypair) {
    let taker_address = taker.address();

    for (mode, input, output, in_amount, out_amount) in [
        ("ExactIn", WSOL_MINT, USDC_MINT, AMOUNT.to_string(), "151230000".to_string()),
        ("ExactOut", USDC_MINT, WSOL_MINT, "152000000".to_string(), AMOUNT.to_string()),
    ] {
        server.mock(|when, then| {
            when.method(GET)
                .path("/order")
                .query_param("swapMode", mode)
                .query_param("webhookId", WEBHOOK_ID);
            then.status(200).json_body(json!({
                "quoteId": format!("q-order-{}", mode),
                "requestId": format!("r-order-{}", mode),
                "expireAt": "2026-10-19T12:00:00Z",
                "maker": MAKER,
                "swapMode": mode,
                "inAmount": in_amount,
                "outAmount": out_amount,
                "inputMint": input,
                "outputMint": output
            }));
        });
    }

    for (mode, input, output, in_amount, out_amount) in [
        ("exactIn", WSOL_MINT, USDC_MINT, AMOUNT.to_string(), "151230000".to_string()),
        ("exactOut", USDC_MINT, WSOL_MINT, "152000000".to_string(), AMOUNT.to_string()),
    ] {
        let unsigned = unsigned_fill(&taker.pubkey());
        let signed = taker.sign_transaction(&unsigned).unwrap();
        let quote_id = format!("q-{}", mode);

        server.mock(|when, then| {
            when.method(GET)
                .path("/quote")
                .query_param("swapType", "rfq")
                .query_param("swapMode", mode)
                .query_param("taker", &taker_address);
            then.status(200).json_body(json!({
                "quoteId": quote_id,
                "requestId": format!("r-{}", mode),
                "expireAt": 1_760_875_200,
                "maker": MAKER,
                "orderInfo": {
                    "input": { "startAmount": in_amount, "token": input },
                    "output": { "startAmount": out_amount, "token": output }
                },
                "transaction": unsigned
            }));
        });

        // Ed25519 signatures are deterministic, so only a correctly signed
        // fill matches
        server.mock(|when, then| {
            when.method(POST)
                .path("/swap")
                .query_param("swapType", "rfq")
                .json_body_partial(json!({ "quoteId": quote_id, "transaction": signed }).to_string());
            then.status(200).json_body(json!({
                "quoteId": quote_id,
                "state": "accepted",
                "txSignature": "3sig"
            }));
        });

        server.mock(|when, then| {
            when.method(POST).path("/execute").json_body_partial(
                json!({ "requestId": format!("r-{}", mode), "signedTransaction": signed })
                    .to_string(),
            );
            then.status(200).json_body(json!({
                "quoteId": quote_id,
                "state": "accepted",
                "txSignature": "4sig"
            }));
        });
    }
}

#[tokio::test]
async fn test_acceptance_suite_passes() {
    let server = MockServer::start();
    mock_webhook(&server, "accepted");
    let taker = Taker::new();
    let config = config(&server, &taker);

    let ctx = SuiteContext::new(&config).unwrap();
    let report = testing::run_suite(&ctx, Suite::Acceptance).await;

    for outcome in &report.outcomes {
        assert!(outcome.passed, "{} failed: {:?}", outcome.name, outcome.error);
    }
    assert_eq!(report.passed(), Suite::Acceptance.cases().len());
}

#[tokio::test]
async fn test_integration_suite_passes() {
    let server = MockServer::start();
    let taker = Taker::new();
    mock_quote_service(&server, &taker.keypair);
    let config = config(&server, &taker);

    let ctx = SuiteContext::new(&config).unwrap();
    let report = testing::run_suite(&ctx, Suite::Integration).await;

    for outcome in &report.outcomes {
        assert!(outcome.passed, "{} failed: {:?}", outcome.name, outcome.error);
    }
    assert!(report.success());
}

#[tokio::test]
async fn test_integration_suite_requires_webhook_id() {
    let server = MockServer::start();
    let taker = Taker::new();
    let mut config = config(&server, &taker);
    config.service.webhook_id = None;

    let ctx = SuiteContext::new(&config).unwrap();
    let report = testing::run_suite(&ctx, Suite::Integration).await;

    assert_eq!(report.passed(), 0);
    for outcome in &report.outcomes {
        assert_eq!(outcome.error.as_deref(), Some("WEBHOOK_ID is not set"));
    }
}

#[tokio::test]
async fn test_rejecting_maker_fails_swap_case_only() {
    let server = MockServer::start();
    mock_webhook(&server, "rejected");
    let taker = Taker::new();
    let config = config(&server, &taker);

    let ctx = SuiteContext::new(&config).unwrap();
    let report = testing::run_suite(&ctx, Suite::Acceptance).await;

    let failed: Vec<_> = report.outcomes.iter().filter(|o| !o.passed).collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].name, "swap_accepted");
    assert!(failed[0]
        .error
        .as_deref()
        .unwrap()
        .contains("insufficient inventory"));
}

#[tokio::test]
async fn test_order_with_numeric_amounts_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/order");
        then.status(200).json_body(json!({
            "quoteId": "q",
            "requestId": "r",
            "expireAt": "2026-10-19T12:00:00Z",
            "maker": MAKER,
            "inAmount": AMOUNT,
            "outAmount": 5,
            "inputMint": WSOL_MINT,
            "outputMint": USDC_MINT
        }));
    });
    let taker = Taker::new();
    let config = config(&server, &taker);

    let ctx = SuiteContext::new(&config).unwrap();
    let err = testing::run_case(&ctx, Case::OrderWithoutTaker)
        .await
        .unwrap_err();

    assert!(err.to_string().contains("'inAmount' to be the string"), "{}", err);
}

#[tokio::test]
async fn test_quote_type_must_echo_wire_spelling() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/quote");
        then.status(200).json_body(json!({
            "requestId": SAMPLE_REQUEST_ID,
            "quoteId": SAMPLE_QUOTE_ID,
            "tokenIn": WSOL_MINT,
            "amountIn": AMOUNT.to_string(),
            "tokenOut": USDC_MINT,
            "amountOut": "151230000",
            "quoteType": "exact_in",
            "protocol": "v1",
            "maker": MAKER,
            "taker": SAMPLE_TAKER
        }));
    });
    let taker = Taker::new();
    let config = config(&server, &taker);

    let ctx = SuiteContext::new(&config).unwrap();
    let err = testing::run_case(&ctx, Case::QuoteExactIn).await.unwrap_err();

    assert!(
        err.to_string()
            .ends_with("Expected 'quoteType' to be 'exactIn', got 'exact_in'"),
        "{}",
        err
    );
}

#[tokio::test]
async fn test_unreachable_webhook_reports_no_response() {
    let server = MockServer::start();
    let taker = Taker::new();
    let mut config = config(&server, &taker);
    config.service.webhook_url = "http://127.0.0.1:1".to_string();

    let ctx = SuiteContext::new(&config).unwrap();
    let report = testing::run_suite(&ctx, Suite::Acceptance).await;

    assert_eq!(report.failed(), Suite::Acceptance.cases().len());
    let error = report.outcomes[0].error.as_deref().unwrap();
    assert!(error.contains("no response from server"), "{}", error);
}

#[tokio::test]
async fn test_suite_timeout_fails_remaining_cases() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/quote");
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(json!({}));
    });
    let taker = Taker::new();
    let mut config = config(&server, &taker);
    config.timeouts.suite_secs = 1;
    config.timeouts.request_secs = 10;

    let ctx = SuiteContext::new(&config).unwrap();
    let report = testing::run_suite(&ctx, Suite::Acceptance).await;

    assert_eq!(report.passed(), 0);
    for outcome in &report.outcomes {
        assert_eq!(
            outcome.error.as_deref(),
            Some("Suite timed out after 1 seconds")
        );
    }
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[tokio::test]
async fn test_scenario_quote_then_signed_swap() {
    let server = MockServer::start();
    let taker = Taker::new();
    mock_quote_service(&server, &taker.keypair);
    let config = config(&server, &taker);

    let result = testing::run_scenario(&fixture("rfq_swap.yaml"), &config, false)
        .await
        .unwrap();

    assert!(result.passed, "{:?}", result.error);
    assert_eq!(result.steps_run, 2);
}

#[tokio::test]
async fn test_scenario_quote_then_execute() {
    let server = MockServer::start();
    let taker = Taker::new();
    mock_quote_service(&server, &taker.keypair);
    let config = config(&server, &taker);

    let result = testing::run_scenario(&fixture("rfq_execute.yaml"), &config, false)
        .await
        .unwrap();

    assert!(result.passed, "{:?}", result.error);
}

#[tokio::test]
async fn test_scenario_unsigned_swap_is_not_matched() {
    let server = MockServer::start();
    let taker = Taker::new();
    mock_quote_service(&server, &taker.keypair);
    let config = config(&server, &taker);

    let yaml = r#"
name: Unsigned swap
steps:
  - action: quote
  - action: swap
"#;
    let scenario = serde_yaml::from_str(yaml).unwrap();
    let result = testing::run_parsed_scenario(scenario, &config, false)
        .await
        .unwrap();

    assert!(!result.passed);
    assert_eq!(result.steps_run, 2);
    assert!(result.error.unwrap().contains("status 404"));
}

#[tokio::test]
async fn test_scenario_webhook_quote_defaults_to_sample_ids() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/quote").json_body_partial(
            json!({
                "quoteId": SAMPLE_QUOTE_ID,
                "requestId": SAMPLE_REQUEST_ID,
                "suggestedPrioritizationFees": 10_000
            })
            .to_string(),
        );
        then.status(200).json_body(json!({ "quoteId": SAMPLE_QUOTE_ID }));
    });
    let taker = Taker::new();
    let config = config(&server, &taker);

    let yaml = r#"
name: Webhook quote first
steps:
  - action: webhook_quote
    expect:
      fields:
        quoteId: 59db3e19-c7b0-4753-a8aa-206701004498
"#;
    let scenario = serde_yaml::from_str(yaml).unwrap();
    let result = testing::run_parsed_scenario(scenario, &config, false)
        .await
        .unwrap();

    assert!(result.passed, "{:?}", result.error);
    mock.assert();
}

#[tokio::test]
async fn test_scenario_unsupported_pair() {
    let server = MockServer::start();
    mock_webhook(&server, "accepted");
    let taker = Taker::new();
    let config = config(&server, &taker);

    let result = testing::run_scenario(&fixture("unsupported_pair.yaml"), &config, false)
        .await
        .unwrap();

    assert!(result.passed, "{:?}", result.error);
    assert_eq!(result.steps_total, 2);
}

#[tokio::test]
async fn test_scenario_stops_at_first_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/tokens");
        then.status(200).json_body(json!(["not-an-address"]));
    });
    let taker = Taker::new();
    let config = config(&server, &taker);

    let yaml = r#"
name: Bad tokens
steps:
  - action: tokens
    webhook: true
    expect:
      valid_addresses: true
  - action: tokens
"#;
    let scenario = serde_yaml::from_str(yaml).unwrap();
    let result = testing::run_parsed_scenario(scenario, &config, false)
        .await
        .unwrap();

    assert!(!result.passed);
    assert_eq!(result.steps_run, 1);
    assert!(result.error.unwrap().contains("valid address"));
}

#[test]
fn test_cli_prints_taker_address() {
    let taker = Taker::new();

    let output = Command::new(env!("CARGO_BIN_EXE_rfq-check"))
        .args(["address", &taker.path()])
        .output()
        .expect("Failed to run rfq-check");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        taker.keypair.address()
    );
}

#[test]
fn test_cli_fails_on_missing_keypair() {
    let output = Command::new(env!("CARGO_BIN_EXE_rfq-check"))
        .args(["address", "/nonexistent/id.json"])
        .output()
        .expect("Failed to run rfq-check");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("/nonexistent/id.json"));
}
