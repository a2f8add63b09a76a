//! Built-in acceptance and integration suites
//!
//! The integration suite goes through the RFQ quote service with a real
//! webhook id and taker wallet. The acceptance suite talks to a market maker
//! webhook directly, using fixed identifiers a reference webhook recognises.

use std::time::{Duration, Instant};

use colored::Colorize;

use crate::api::quote_service::{OrderQuery, QuoteQuery, RfqQuoteResponse};
use crate::api::webhook::{SwapRequest, SwapResponse, WebhookQuoteRequest, WebhookQuoteResponse};
use crate::api::{Protocol, QuoteType, SwapMode, SwapState, SIMULATE_REJECTION_REQUEST_ID};
use crate::client::{QuoteServiceClient, WebhookClient};
use crate::common::{Config, Error, Result};
use crate::keypair::TakerKeypair;

use super::assertions::{
    expect_eq, expect_non_empty, expect_positive, expect_present, expect_status,
    expect_valid_addresses,
};

pub const SAMPLE_QUOTE_ID: &str = "59db3e19-c7b0-4753-a8aa-206701004498";
pub const SAMPLE_REQUEST_ID: &str = "629bddf3-0038-43a6-8956-f5433d6b1191";
pub const SAMPLE_TAKER: &str = "5v2Vd71VoJ1wZhz1PkhTY48mrJwS6wF4LfvDbYPnJ3bc";

/// A mint no maker can support
pub const UNSUPPORTED_MINT: &str = "fake3KUxqvJ5erXobKTYFtL2BpTgGzy7B9AcRcXeCwWvFM";

/// Suggested compute unit price sent with webhook quotes, in micro lamports
pub const SUGGESTED_PRIORITIZATION_FEES: u64 = 10_000;

/// Fill transaction submitted to the webhook swap endpoint
pub const SAMPLE_SWAP_TRANSACTION: &str = "AgAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAgAIABgxSnEehNb4kLTrfnzoVcTu/GPLBwP0kKZRTJowyLvHxxSdkl7oLuGWRcrcu3Yxm4Y9WF2TZyGphCjp+D3nAuvnbWolfQZ0Kl+9/uOLLKVXoXu/o/NQI5LY9pgx8ibLVfztqKpSdlIRAyuBnIsFa1A93abdI4AmIcbFLGFGatrhAXnMzpil7FnByGEuo10mEgCYqn/QfD1DTR6idALqAu9Bhh6NTL/nu9FDLsM2mMKzzPPKY2nBeuUHR7ibnmbqVw/MAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAMGRm/lIRcy/+ytunLDm+e8jOW7xfcSayxDmzpAAAAABpuIV/6rgYT7aH9jRhjANdrEOdwa6ztVmKDwAAAAAAEG3fbh12Whk9nL4UbO63msHLSF7V9bN5E6jPWFfv8AqUpYSftyo7vpH9xbDmpX9jxaHLRbIGem7Qys02OVyKECxvp6877brTo9ZfNqq8l0MbG75MLS9uDkfKYCA0UvXWE9f/tHi80zsUphEh9edGz8h7JFCM8ITLeBpkq6CPTyfQMHAAkDmLEBAAAAAAAHAAUCwFwVAAoMAQACAwoFCwkICQYEIKhgt6NcCiigAMqaOwAAAAAm/0kBAQAAAEAvW2cAAAAAAA==";

/// A group of cases run together
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suite {
    /// Through the quote service
    Integration,
    /// Directly against a webhook
    Acceptance,
}

impl Suite {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Integration => "integration",
            Self::Acceptance => "acceptance",
        }
    }

    pub fn cases(&self) -> &'static [Case] {
        match self {
            Self::Integration => &[
                Case::OrderExactIn,
                Case::OrderExactOut,
                Case::OrderWithoutTaker,
                Case::SwapExactIn,
                Case::SwapExactOut,
            ],
            Self::Acceptance => &[
                Case::QuoteExactIn,
                Case::QuoteExactOut,
                Case::QuoteUnsupportedPair,
                Case::SwapAccepted,
                Case::SwapRejected,
                Case::Tokens,
            ],
        }
    }
}

/// A single request/assert scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    OrderExactIn,
    OrderExactOut,
    OrderWithoutTaker,
    SwapExactIn,
    SwapExactOut,
    QuoteExactIn,
    QuoteExactOut,
    QuoteUnsupportedPair,
    SwapAccepted,
    SwapRejected,
    Tokens,
}

impl Case {
    pub fn name(&self) -> &'static str {
        match self {
            Self::OrderExactIn => "order_exact_in",
            Self::OrderExactOut => "order_exact_out",
            Self::OrderWithoutTaker => "order_without_taker",
            Self::SwapExactIn => "swap_exact_in",
            Self::SwapExactOut => "swap_exact_out",
            Self::QuoteExactIn => "quote_exact_in",
            Self::QuoteExactOut => "quote_exact_out",
            Self::QuoteUnsupportedPair => "quote_unsupported_pair",
            Self::SwapAccepted => "swap_accepted",
            Self::SwapRejected => "swap_rejected",
            Self::Tokens => "tokens",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::OrderExactIn => "should return a successful quote response (ExactIn)",
            Self::OrderExactOut => "should return a successful quote response (ExactOut)",
            Self::OrderWithoutTaker => {
                "should return a successful quote response (with an empty taker) - ExactIn"
            }
            Self::SwapExactIn => "should execute a successful swap (ExactIn)",
            Self::SwapExactOut => "should execute a successful swap (ExactOut)",
            Self::QuoteExactIn => "should return a successful quote response (ExactIn)",
            Self::QuoteExactOut => "should return a successful quote response (ExactOut)",
            Self::QuoteUnsupportedPair => "should return a 404 for pair not supported",
            Self::SwapAccepted => "should return a successful swap response",
            Self::SwapRejected => "should simulate a swap rejection",
            Self::Tokens => "should return a successful accepted token list",
        }
    }
}

/// Outcome of one case
#[derive(Debug, Clone)]
pub struct CaseOutcome {
    pub name: &'static str,
    pub passed: bool,
    pub error: Option<String>,
    pub elapsed: Duration,
}

/// Outcome of a whole suite
#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub suite: Suite,
    pub outcomes: Vec<CaseOutcome>,
}

impl SuiteReport {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn success(&self) -> bool {
        self.failed() == 0
    }
}

/// Everything a case needs
pub struct SuiteContext<'a> {
    pub config: &'a Config,
    pub quote_service: QuoteServiceClient,
    pub webhook: WebhookClient,
}

impl<'a> SuiteContext<'a> {
    pub fn new(config: &'a Config) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeouts.request_secs);
        let quote_service = QuoteServiceClient::new(&config.service.quote_service_url, timeout)?;
        let webhook = WebhookClient::new(&config.service.webhook_url, timeout)?;

        tracing::debug!(
            quote_service = quote_service.base_url(),
            webhook = webhook.base_url(),
            "Clients ready"
        );

        Ok(Self {
            config,
            quote_service,
            webhook,
        })
    }

    fn taker(&self) -> Result<TakerKeypair> {
        let taker = TakerKeypair::load(&self.config.taker.keypair)?;
        tracing::info!(taker = %taker.address(), "Loaded taker");
        Ok(taker)
    }

    fn amount(&self) -> String {
        self.config.swap.amount.to_string()
    }

    /// (input, output) mints for a swap mode, MINT_B is paid for ExactIn
    pub fn pair(&self, mode: SwapMode) -> (&str, &str) {
        let swap = &self.config.swap;
        match mode {
            SwapMode::ExactIn => (swap.mint_b(), swap.mint_a()),
            SwapMode::ExactOut => (swap.mint_a(), swap.mint_b()),
        }
    }

    fn log_question(&self, mode: SwapMode) {
        let swap = &self.config.swap;
        match mode {
            SwapMode::ExactIn => tracing::info!(
                "how many {} will you get for {} of {}?",
                swap.mint_a(),
                swap.amount,
                swap.mint_b()
            ),
            SwapMode::ExactOut => tracing::info!(
                "how many {} do you need to get {} of {}?",
                swap.mint_a(),
                swap.amount,
                swap.mint_b()
            ),
        }
    }
}

/// Run every case of a suite in order
///
/// A failing case doesn't stop the suite. Once the suite timeout passes, the
/// case in flight and all remaining cases fail with a timeout.
pub async fn run_suite(ctx: &SuiteContext<'_>, suite: Suite) -> SuiteReport {
    let suite_secs = ctx.config.timeouts.suite_secs;
    let deadline = tokio::time::Instant::now() + Duration::from_secs(suite_secs);
    let mut outcomes = Vec::new();

    println!(
        "\n{} {}",
        "Running Suite:".blue().bold(),
        suite.name().white().bold()
    );

    for case in suite.cases() {
        let started = Instant::now();
        let result = match tokio::time::timeout_at(deadline, run_case(ctx, *case)).await {
            Ok(result) => result,
            Err(_) => Err(Error::SuiteTimeout(suite_secs)),
        };
        let elapsed = started.elapsed();

        let outcome = match result {
            Ok(()) => {
                println!(
                    "  {} {} {}",
                    "✓".green(),
                    case.description(),
                    format!("({}ms)", elapsed.as_millis()).dimmed()
                );
                tracing::debug!(case = case.name(), "Case passed");
                CaseOutcome {
                    name: case.name(),
                    passed: true,
                    error: None,
                    elapsed,
                }
            }
            Err(e) => {
                println!("  {} {}: {}", "✗".red(), case.description(), e);
                tracing::warn!(case = case.name(), error = %e, "Case failed");
                CaseOutcome {
                    name: case.name(),
                    passed: false,
                    error: Some(e.to_string()),
                    elapsed,
                }
            }
        };
        outcomes.push(outcome);
    }

    let report = SuiteReport { suite, outcomes };

    if report.success() {
        println!(
            "\n{} {}\n",
            "✓".green().bold(),
            format!("{} passed", report.passed()).green().bold()
        );
    } else {
        println!(
            "\n{} {}\n",
            "✗".red().bold(),
            format!("{} passed, {} failed", report.passed(), report.failed())
                .red()
                .bold()
        );
    }

    report
}

/// Run a single case
pub async fn run_case(ctx: &SuiteContext<'_>, case: Case) -> Result<()> {
    match case {
        Case::OrderExactIn => order(ctx, SwapMode::ExactIn, true).await,
        Case::OrderExactOut => order(ctx, SwapMode::ExactOut, true).await,
        Case::OrderWithoutTaker => order(ctx, SwapMode::ExactIn, false).await,
        Case::SwapExactIn => rfq_swap(ctx, SwapMode::ExactIn).await,
        Case::SwapExactOut => rfq_swap(ctx, SwapMode::ExactOut).await,
        Case::QuoteExactIn => webhook_quote(ctx, SwapMode::ExactIn).await,
        Case::QuoteExactOut => webhook_quote(ctx, SwapMode::ExactOut).await,
        Case::QuoteUnsupportedPair => webhook_unsupported_pair(ctx).await,
        Case::SwapAccepted => webhook_swap(ctx, SAMPLE_REQUEST_ID, SwapState::Accepted).await,
        Case::SwapRejected => {
            webhook_swap(ctx, SIMULATE_REJECTION_REQUEST_ID, SwapState::Rejected).await
        }
        Case::Tokens => webhook_tokens(ctx).await,
    }
}

// === Integration cases ===

/// `GET /order` and check the flat quote shape
async fn order(ctx: &SuiteContext<'_>, mode: SwapMode, with_taker: bool) -> Result<()> {
    let webhook_id = ctx.config.require_webhook_id()?;
    ctx.log_question(mode);

    let (input, output) = ctx.pair(mode);
    let mut query = OrderQuery::new(input, output, ctx.config.swap.amount, mode, webhook_id);
    if with_taker {
        query = query.with_taker(ctx.taker()?.address());
    }

    let response = ctx.quote_service.order(&query).await?;
    let body = &response.body;

    for path in ["quoteId", "requestId", "expireAt", "maker"] {
        expect_present(body, path)?;
    }
    if with_taker {
        expect_eq(body, "swapMode", mode.as_str())?;
    }

    let amount = ctx.amount();
    match mode {
        SwapMode::ExactIn => {
            expect_eq(body, "inAmount", &amount)?;
            expect_positive(body, "outAmount")?;
        }
        SwapMode::ExactOut => {
            expect_positive(body, "inAmount")?;
            expect_eq(body, "outAmount", &amount)?;
        }
    }
    expect_eq(body, "inputMint", input)?;
    expect_eq(body, "outputMint", output)?;

    Ok(())
}

/// `GET /quote`, sign the returned transaction, `POST /swap`
async fn rfq_swap(ctx: &SuiteContext<'_>, mode: SwapMode) -> Result<()> {
    let webhook_id = ctx.config.require_webhook_id()?;
    let taker = ctx.taker()?;
    ctx.log_question(mode);

    let (input, output) = ctx.pair(mode);
    let query = QuoteQuery::rfq(
        input,
        output,
        ctx.config.swap.amount,
        mode,
        ctx.config.swap.fee_bps,
        &taker.address(),
        webhook_id,
    );

    // Step 1: fetch the quote
    let response = ctx.quote_service.quote(&query).await?;
    let body = &response.body;

    for path in ["quoteId", "requestId", "expireAt", "orderInfo", "maker"] {
        expect_present(body, path)?;
    }

    let amount = ctx.amount();
    let (exact_leg, priced_leg) = match mode {
        SwapMode::ExactIn => ("input", "output"),
        SwapMode::ExactOut => ("output", "input"),
    };
    expect_eq(body, &format!("orderInfo.{}.startAmount", exact_leg), &amount)?;
    expect_positive(body, &format!("orderInfo.{}.startAmount", priced_leg))?;
    expect_eq(body, "orderInfo.input.token", input)?;
    expect_eq(body, "orderInfo.output.token", output)?;

    // Step 2: sign
    let quote: RfqQuoteResponse = response.parse()?;
    let transaction = quote
        .transaction
        .ok_or_else(|| Error::assertion("Expected quote to carry a transaction"))?;
    let signed = taker.sign_transaction(&transaction)?;

    // Step 3: submit
    let request = SwapRequest {
        quote_id: quote.quote_id.unwrap_or_default(),
        request_id: quote.request_id.unwrap_or_default(),
        transaction: signed,
    };
    let response = ctx.quote_service.swap(&request).await?;

    expect_eq(&response.body, "quoteId", &request.quote_id)?;
    expect_state(&response.parse()?, SwapState::Accepted)
}

// === Acceptance cases ===

fn sample_quote_request(
    ctx: &SuiteContext<'_>,
    mode: SwapMode,
    token_in: &str,
    token_out: &str,
) -> WebhookQuoteRequest {
    WebhookQuoteRequest {
        request_id: SAMPLE_REQUEST_ID.to_string(),
        quote_id: SAMPLE_QUOTE_ID.to_string(),
        token_in: token_in.to_string(),
        amount: ctx.amount(),
        token_out: token_out.to_string(),
        quote_type: QuoteType::from(mode),
        protocol: Protocol::V1,
        taker: Some(SAMPLE_TAKER.to_string()),
        suggested_prioritization_fees: Some(SUGGESTED_PRIORITIZATION_FEES),
        fee_bps: ctx.config.swap.fee_bps,
    }
}

/// `POST /quote` and check the maker echoes the request
async fn webhook_quote(ctx: &SuiteContext<'_>, mode: SwapMode) -> Result<()> {
    ctx.log_question(mode);

    let (token_in, token_out) = ctx.pair(mode);
    let request = sample_quote_request(ctx, mode, token_in, token_out);

    let response = ctx.webhook.quote(&request).await?;
    let body = &response.body;

    expect_eq(body, "quoteId", &request.quote_id)?;
    expect_eq(body, "requestId", &request.request_id)?;
    expect_eq(body, "tokenIn", &request.token_in)?;
    expect_eq(body, "tokenOut", &request.token_out)?;
    expect_present(body, "maker")?;
    expect_eq(body, "taker", SAMPLE_TAKER)?;

    // Echoed in the wire spelling, not just something that decodes to it
    expect_eq(body, "quoteType", mode.as_camel())?;
    response.parse::<WebhookQuoteResponse>()?;

    match mode {
        SwapMode::ExactIn => {
            expect_eq(body, "amountIn", &request.amount)?;
            expect_positive(body, "amountOut")?;
        }
        SwapMode::ExactOut => {
            expect_eq(body, "amountOut", &request.amount)?;
            expect_positive(body, "amountIn")?;
        }
    }

    Ok(())
}

/// A pair with an unknown mint must be answered with 404
async fn webhook_unsupported_pair(ctx: &SuiteContext<'_>) -> Result<()> {
    let swap = &ctx.config.swap;
    let request = sample_quote_request(ctx, SwapMode::ExactIn, swap.mint_a(), UNSUPPORTED_MINT);

    expect_status(ctx.webhook.quote(&request).await, 404)
}

/// `POST /swap` with the sample transaction
async fn webhook_swap(
    ctx: &SuiteContext<'_>,
    request_id: &str,
    expected: SwapState,
) -> Result<()> {
    let request = SwapRequest {
        quote_id: SAMPLE_QUOTE_ID.to_string(),
        request_id: request_id.to_string(),
        transaction: SAMPLE_SWAP_TRANSACTION.to_string(),
    };

    let response = ctx.webhook.swap(&request).await?;
    expect_eq(&response.body, "quoteId", &request.quote_id)?;
    expect_state(&response.parse()?, expected)?;

    if expected == SwapState::Rejected {
        expect_non_empty(&response.body, "rejectionReason")?;
    }
    Ok(())
}

/// `GET /tokens` returns only valid addresses
async fn webhook_tokens(ctx: &SuiteContext<'_>) -> Result<()> {
    let response = ctx.webhook.tokens().await?;
    let count = expect_valid_addresses(&response.body, "")?;
    tracing::info!(count, "Webhook tokens");
    Ok(())
}

fn expect_state(response: &SwapResponse, expected: SwapState) -> Result<()> {
    if response.state != expected {
        let reason = response
            .rejection_reason
            .as_deref()
            .map(|r| format!(" ({})", r))
            .unwrap_or_default();
        return Err(Error::assertion(format!(
            "Expected state '{}', got '{}'{}",
            expected, response.state, reason
        )));
    }
    Ok(())
}
