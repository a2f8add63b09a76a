//! Test scenario configuration types
//!
//! Defines the data structures for deserializing YAML test scenarios.
//! String fields may reference `${NAME}` variables, see the runner.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::api::SwapMode;

/// A complete test scenario loaded from a YAML file
#[derive(Deserialize, Debug)]
pub struct TestScenario {
    /// Name of the test scenario
    pub name: String,
    /// Optional description of what the test verifies
    pub description: Option<String>,
    /// The sequence of test steps to execute
    pub steps: Vec<TestStep>,
}

/// A single request in the execution flow
#[derive(Deserialize, Debug)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum TestStep {
    /// `GET /order` on the quote service
    Order {
        #[serde(default)]
        swap_mode: SwapMode,
        input_mint: Option<String>,
        output_mint: Option<String>,
        amount: Option<String>,
        /// Send the taker address (default: true)
        #[serde(default = "default_true")]
        with_taker: bool,
        expect: Option<ResponseExpectation>,
    },
    /// `GET /quote?swapType=rfq` on the quote service
    Quote {
        #[serde(default)]
        swap_mode: SwapMode,
        input_mint: Option<String>,
        output_mint: Option<String>,
        amount: Option<String>,
        fee_bps: Option<u16>,
        expect: Option<ResponseExpectation>,
    },
    /// `POST /swap?swapType=rfq` on the quote service
    Swap {
        quote_id: Option<String>,
        request_id: Option<String>,
        /// Base64 transaction, defaults to the one returned by the last quote
        transaction: Option<String>,
        /// Sign the transaction with the taker keypair before sending
        #[serde(default)]
        sign: bool,
        expect: Option<ResponseExpectation>,
    },
    /// `POST /execute` on the quote service
    Execute {
        request_id: Option<String>,
        /// Base64 transaction, defaults to the one returned by the last quote
        transaction: Option<String>,
        #[serde(default)]
        sign: bool,
        expect: Option<ResponseExpectation>,
    },
    /// `POST /quote` on the webhook
    WebhookQuote {
        #[serde(default)]
        swap_mode: SwapMode,
        token_in: Option<String>,
        token_out: Option<String>,
        amount: Option<String>,
        taker: Option<String>,
        quote_id: Option<String>,
        request_id: Option<String>,
        fee_bps: Option<u16>,
        /// Compute unit price hint in micro lamports (default: 10000)
        suggested_prioritization_fees: Option<u64>,
        expect: Option<ResponseExpectation>,
    },
    /// `POST /swap` on the webhook
    WebhookSwap {
        quote_id: Option<String>,
        request_id: Option<String>,
        transaction: Option<String>,
        #[serde(default)]
        sign: bool,
        expect: Option<ResponseExpectation>,
    },
    /// `GET /tokens`
    Tokens {
        /// Ask the webhook instead of the quote service
        #[serde(default)]
        webhook: bool,
        expect: Option<ResponseExpectation>,
    },
}

fn default_true() -> bool {
    true
}

/// Expectations for a response
#[derive(Deserialize, Debug, Default)]
pub struct ResponseExpectation {
    /// Expected HTTP status (default: any 2xx)
    pub status: Option<u16>,
    /// Fields that must be present and non-null
    #[serde(default)]
    pub present: Vec<String>,
    /// Fields that must equal a value (compared as text)
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
    /// Fields that must hold an amount greater than zero
    #[serde(default)]
    pub positive: Vec<String>,
    /// Fields that must be non-empty
    #[serde(default)]
    pub non_empty: Vec<String>,
    /// The body must be a list of valid addresses
    #[serde(default)]
    pub valid_addresses: bool,
}
