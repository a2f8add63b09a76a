//! Test runner implementation
//!
//! Executes YAML scenarios against the quote service and webhook, asserting
//! on the decoded JSON bodies rather than on printed output.
//!
//! String values may reference `${NAME}`. Configuration provides `AMOUNT`,
//! `MINT_A`, `MINT_B`, `INPUT_MINT`, `OUTPUT_MINT`, `FEE_BPS` and
//! `WEBHOOK_ID`; `TAKER` loads the taker keypair on first use; `quoteId`,
//! `requestId` and `transaction` are captured from the last response that
//! carried them.

use std::collections::HashMap;
use std::path::Path;

use colored::Colorize;

use crate::api::quote_service::{ExecuteRequest, OrderQuery, QuoteQuery};
use crate::api::webhook::{SwapRequest, WebhookQuoteRequest};
use crate::api::{Protocol, QuoteType, SwapMode};
use crate::client::ApiResponse;
use crate::common::{Config, Error, Result};
use crate::keypair::TakerKeypair;

use super::assertions::{
    expect_eq, expect_non_empty, expect_positive, expect_present, expect_status,
    expect_valid_addresses, expect_value,
};
use super::config::{ResponseExpectation, TestScenario, TestStep};
use super::suites::{
    SuiteContext, SAMPLE_QUOTE_ID, SAMPLE_REQUEST_ID, SUGGESTED_PRIORITIZATION_FEES,
};

/// Response fields carried over to later steps
const CAPTURED_FIELDS: [&str; 3] = ["quoteId", "requestId", "transaction"];

/// Result of a test run
#[derive(Debug)]
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub steps_total: usize,
    pub error: Option<String>,
}

/// Run a test scenario from a YAML file
pub async fn run_scenario(path: &Path, config: &Config, verbose: bool) -> Result<TestResult> {
    // Load and parse the YAML scenario
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read test scenario '{}': {}",
            path.display(),
            e
        ))
    })?;

    let scenario: TestScenario = serde_yaml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse test scenario: {}", e)))?;

    run_parsed_scenario(scenario, config, verbose).await
}

/// Run an already parsed scenario
pub async fn run_parsed_scenario(
    scenario: TestScenario,
    config: &Config,
    verbose: bool,
) -> Result<TestResult> {
    let steps_total = scenario.steps.len();

    println!(
        "\n{} {}",
        "Running Test:".blue().bold(),
        scenario.name.white().bold()
    );

    if let Some(desc) = &scenario.description {
        println!("  {}", desc.dimmed());
    }

    let mut state = ScenarioState::new(config)?;

    println!("\n{}", "Steps:".cyan());

    for (i, step) in scenario.steps.iter().enumerate() {
        let step_num = i + 1;

        match execute_step(&mut state, step, verbose).await {
            Ok(label) => {
                println!("  {} Step {}: {}", "✓".green(), step_num, label.dimmed());
            }
            Err(e) => {
                println!("  {} Step {}: {}", "✗".red(), step_num, e);

                return Ok(TestResult {
                    name: scenario.name,
                    passed: false,
                    steps_run: step_num,
                    steps_total,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    println!(
        "\n{} {}\n",
        "✓".green().bold(),
        "Test Passed".green().bold()
    );

    Ok(TestResult {
        name: scenario.name,
        passed: true,
        steps_run: steps_total,
        steps_total,
        error: None,
    })
}

/// Clients, variables and the lazily loaded taker
struct ScenarioState<'a> {
    ctx: SuiteContext<'a>,
    vars: HashMap<String, String>,
    taker: Option<TakerKeypair>,
}

impl<'a> ScenarioState<'a> {
    fn new(config: &'a Config) -> Result<Self> {
        let swap = &config.swap;
        let mut vars = HashMap::from([
            ("AMOUNT".to_string(), swap.amount.to_string()),
            ("MINT_A".to_string(), swap.mint_a().to_string()),
            ("MINT_B".to_string(), swap.mint_b().to_string()),
            ("INPUT_MINT".to_string(), swap.input_mint.clone()),
            ("OUTPUT_MINT".to_string(), swap.output_mint.clone()),
            ("FEE_BPS".to_string(), swap.fee_bps.to_string()),
        ]);
        if let Some(webhook_id) = &config.service.webhook_id {
            vars.insert("WEBHOOK_ID".to_string(), webhook_id.clone());
        }

        Ok(Self {
            ctx: SuiteContext::new(config)?,
            vars,
            taker: None,
        })
    }

    fn taker(&mut self) -> Result<&TakerKeypair> {
        if self.taker.is_none() {
            let taker = TakerKeypair::load(&self.ctx.config.taker.keypair)?;
            self.vars.insert("TAKER".to_string(), taker.address());
            self.taker = Some(taker);
        }
        self.taker
            .as_ref()
            .ok_or_else(|| Error::Config("Taker keypair not loaded".to_string()))
    }

    /// Substitute `${NAME}` references
    fn interpolate(&mut self, input: &str) -> Result<String> {
        let mut output = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find("${") {
            output.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after.find('}').ok_or_else(|| {
                Error::Config(format!("Unterminated variable reference in '{}'", input))
            })?;
            let name = &after[..end];

            if name == "TAKER" && !self.vars.contains_key(name) {
                self.taker()?;
            }

            let value = self.vars.get(name).ok_or_else(|| {
                Error::Config(format!("Unknown variable '${{{}}}' in '{}'", name, input))
            })?;
            output.push_str(value);
            rest = &after[end + 1..];
        }

        output.push_str(rest);
        Ok(output)
    }

    /// Interpolate `value`, or `default` when it's absent
    fn resolve(&mut self, value: Option<&str>, default: &str) -> Result<String> {
        self.interpolate(value.unwrap_or(default))
    }

    fn resolve_amount(&mut self, value: Option<&str>) -> Result<u64> {
        let amount = self.resolve(value, "${AMOUNT}")?;
        amount
            .parse()
            .map_err(|_| Error::Config(format!("Invalid amount '{}'", amount)))
    }

    fn default_pair(&self, mode: SwapMode) -> (String, String) {
        let (input, output) = self.ctx.pair(mode);
        (input.to_string(), output.to_string())
    }

    fn capture(&mut self, body: &serde_json::Value) {
        for name in CAPTURED_FIELDS {
            if let Some(value) = body.get(name).and_then(|v| v.as_str()) {
                self.vars.insert(name.to_string(), value.to_string());
            }
        }
    }
}

/// Execute a single test step, returning a label for the report
async fn execute_step(
    state: &mut ScenarioState<'_>,
    step: &TestStep,
    verbose: bool,
) -> Result<String> {
    match step {
        TestStep::Order {
            swap_mode,
            input_mint,
            output_mint,
            amount,
            with_taker,
            expect,
        } => {
            let webhook_id = state.ctx.config.require_webhook_id()?.to_string();
            let (default_in, default_out) = state.default_pair(*swap_mode);
            let input = state.resolve(input_mint.as_deref(), &default_in)?;
            let output = state.resolve(output_mint.as_deref(), &default_out)?;
            let amount = state.resolve_amount(amount.as_deref())?;

            let mut query = OrderQuery::new(&input, &output, amount, *swap_mode, &webhook_id);
            if *with_taker {
                query = query.with_taker(state.taker()?.address());
            }

            let result = state.ctx.quote_service.order(&query).await;
            check_response(state, result, expect.as_ref(), verbose)?;
            Ok(format!("order {}", swap_mode))
        }

        TestStep::Quote {
            swap_mode,
            input_mint,
            output_mint,
            amount,
            fee_bps,
            expect,
        } => {
            let webhook_id = state.ctx.config.require_webhook_id()?.to_string();
            let (default_in, default_out) = state.default_pair(*swap_mode);
            let input = state.resolve(input_mint.as_deref(), &default_in)?;
            let output = state.resolve(output_mint.as_deref(), &default_out)?;
            let amount = state.resolve_amount(amount.as_deref())?;
            let fee_bps = fee_bps.unwrap_or(state.ctx.config.swap.fee_bps);
            let taker = state.taker()?.address();

            let query = QuoteQuery::rfq(
                &input,
                &output,
                amount,
                *swap_mode,
                fee_bps,
                &taker,
                &webhook_id,
            );

            let result = state.ctx.quote_service.quote(&query).await;
            check_response(state, result, expect.as_ref(), verbose)?;
            Ok(format!("quote {}", swap_mode))
        }

        TestStep::Swap {
            quote_id,
            request_id,
            transaction,
            sign,
            expect,
        } => {
            let request = build_swap_request(
                state,
                quote_id.as_deref(),
                request_id.as_deref(),
                transaction.as_deref(),
                *sign,
            )?;

            let result = state.ctx.quote_service.swap(&request).await;
            check_response(state, result, expect.as_ref(), verbose)?;
            Ok(format!("swap {}", request.quote_id))
        }

        TestStep::Execute {
            request_id,
            transaction,
            sign,
            expect,
        } => {
            let request_id = state.resolve(request_id.as_deref(), "${requestId}")?;
            let mut transaction = state.resolve(transaction.as_deref(), "${transaction}")?;
            if *sign {
                transaction = state.taker()?.sign_transaction(&transaction)?;
            }

            let request = ExecuteRequest {
                request_id,
                signed_transaction: transaction,
            };
            let result = state.ctx.quote_service.execute(&request).await;
            check_response(state, result, expect.as_ref(), verbose)?;
            Ok(format!("execute {}", request.request_id))
        }

        TestStep::WebhookQuote {
            swap_mode,
            token_in,
            token_out,
            amount,
            taker,
            quote_id,
            request_id,
            fee_bps,
            suggested_prioritization_fees,
            expect,
        } => {
            let (default_in, default_out) = state.default_pair(*swap_mode);
            let request = WebhookQuoteRequest {
                request_id: state.resolve(request_id.as_deref(), SAMPLE_REQUEST_ID)?,
                quote_id: state.resolve(quote_id.as_deref(), SAMPLE_QUOTE_ID)?,
                token_in: state.resolve(token_in.as_deref(), &default_in)?,
                amount: state.resolve_amount(amount.as_deref())?.to_string(),
                token_out: state.resolve(token_out.as_deref(), &default_out)?,
                quote_type: QuoteType::from(*swap_mode),
                protocol: Protocol::V1,
                taker: match taker {
                    Some(taker) => Some(state.interpolate(taker)?),
                    None => None,
                },
                suggested_prioritization_fees: Some(
                    suggested_prioritization_fees.unwrap_or(SUGGESTED_PRIORITIZATION_FEES),
                ),
                fee_bps: fee_bps.unwrap_or(state.ctx.config.swap.fee_bps),
            };

            let result = state.ctx.webhook.quote(&request).await;
            check_response(state, result, expect.as_ref(), verbose)?;
            Ok(format!("webhook quote {}", swap_mode))
        }

        TestStep::WebhookSwap {
            quote_id,
            request_id,
            transaction,
            sign,
            expect,
        } => {
            let request = build_swap_request(
                state,
                quote_id.as_deref(),
                request_id.as_deref(),
                transaction.as_deref(),
                *sign,
            )?;

            let result = state.ctx.webhook.swap(&request).await;
            check_response(state, result, expect.as_ref(), verbose)?;
            Ok(format!("webhook swap {}", request.request_id))
        }

        TestStep::Tokens { webhook, expect } => {
            let result = if *webhook {
                state.ctx.webhook.tokens().await
            } else {
                state.ctx.quote_service.tokens().await
            };
            check_response(state, result, expect.as_ref(), verbose)?;
            let label = if *webhook { "webhook tokens" } else { "tokens" };
            Ok(label.to_string())
        }
    }
}

fn build_swap_request(
    state: &mut ScenarioState<'_>,
    quote_id: Option<&str>,
    request_id: Option<&str>,
    transaction: Option<&str>,
    sign: bool,
) -> Result<SwapRequest> {
    let quote_id = state.resolve(quote_id, "${quoteId}")?;
    let request_id = state.resolve(request_id, "${requestId}")?;
    let mut transaction = state.resolve(transaction, "${transaction}")?;

    if sign {
        transaction = state.taker()?.sign_transaction(&transaction)?;
    }

    Ok(SwapRequest {
        request_id,
        quote_id,
        transaction,
    })
}

/// Apply expectations to a response
///
/// A non-2xx expected status turns the error into the pass condition.
fn check_response(
    state: &mut ScenarioState<'_>,
    result: Result<ApiResponse>,
    expect: Option<&ResponseExpectation>,
    verbose: bool,
) -> Result<()> {
    let default_expectation = ResponseExpectation::default();
    let expect = expect.unwrap_or(&default_expectation);

    if let Some(status) = expect.status {
        if !(200..300).contains(&status) {
            return expect_status(result, status);
        }
    }

    let response = result?;
    if verbose {
        println!("    {} {}", response.url.dimmed(), response.body.to_string().dimmed());
    }

    if let Some(status) = expect.status {
        if response.status != status {
            return Err(Error::assertion(format!(
                "Expected status {}, got {}",
                status, response.status
            )));
        }
    }

    state.capture(&response.body);
    let body = &response.body;

    for path in &expect.present {
        expect_present(body, path)?;
    }
    for (path, expected) in &expect.fields {
        match expected {
            serde_json::Value::String(s) => expect_eq(body, path, &state.interpolate(s)?)?,
            other => expect_value(body, path, other)?,
        }
    }
    for path in &expect.positive {
        expect_positive(body, path)?;
    }
    for path in &expect.non_empty {
        expect_non_empty(body, path)?;
    }
    if expect.valid_addresses {
        expect_valid_addresses(body, "")?;
    }

    Ok(())
}
