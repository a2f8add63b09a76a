//! CLI command handling
//!
//! Dispatches CLI commands to the suites, the scenario runner or a single
//! client call, and formats the output.

use std::time::Duration;

use colored::Colorize;

use crate::api::quote_service::{OrderQuery, OrderResponse};
use crate::client::{QuoteServiceClient, WebhookClient};
use crate::commands::Commands;
use crate::common::{Config, Error, Result};
use crate::keypair::TakerKeypair;
use crate::testing::{self, SuiteContext};

/// Dispatch a CLI command
///
/// `verbose` makes scenario steps print their response bodies.
pub async fn dispatch(command: Commands, config: &Config, verbose: bool) -> Result<()> {
    match command {
        Commands::Suite { suite } => {
            let ctx = SuiteContext::new(config)?;
            let mut failed = 0;
            for suite in suite.suites() {
                let report = testing::run_suite(&ctx, *suite).await;
                failed += report.failed();
            }

            if failed > 0 {
                return Err(Error::TestAssertion(format!("{} case(s) failed", failed)));
            }
            Ok(())
        }

        Commands::Test { path } => {
            let result = testing::run_scenario(&path, config, verbose).await?;

            if !result.passed {
                return Err(Error::TestAssertion(format!(
                    "'{}' failed at step {} of {}: {}",
                    result.name,
                    result.steps_run,
                    result.steps_total,
                    result.error.unwrap_or_default()
                )));
            }
            Ok(())
        }

        Commands::Quote {
            swap_mode,
            amount,
            input_mint,
            output_mint,
            no_taker,
        } => {
            let webhook_id = config.require_webhook_id()?;
            let swap = &config.swap;
            let mut query = OrderQuery::new(
                input_mint.as_deref().unwrap_or(&swap.input_mint),
                output_mint.as_deref().unwrap_or(&swap.output_mint),
                amount.unwrap_or(swap.amount),
                swap_mode.unwrap_or(swap.swap_mode),
                webhook_id,
            );
            if !no_taker {
                let taker = TakerKeypair::load(&config.taker.keypair)?;
                query = query.with_taker(taker.address());
            }

            let client = QuoteServiceClient::new(
                &config.service.quote_service_url,
                request_timeout(config),
            )?;
            let order: OrderResponse = client.order(&query).await?.parse()?;
            print_order(&order);
            Ok(())
        }

        Commands::Tokens { webhook } => {
            let response = if webhook {
                WebhookClient::new(&config.service.webhook_url, request_timeout(config))?
                    .tokens()
                    .await?
            } else {
                QuoteServiceClient::new(&config.service.quote_service_url, request_timeout(config))?
                    .tokens()
                    .await?
            };

            let tokens: Vec<String> = response.parse()?;
            if tokens.is_empty() {
                println!("No tokens");
            } else {
                for token in &tokens {
                    println!("{}", token);
                }
            }
            Ok(())
        }

        Commands::Address { path } => {
            let path = path.as_deref().unwrap_or(&config.taker.keypair);
            let taker = TakerKeypair::load(path)?;
            println!("{}", taker.address());
            Ok(())
        }

        Commands::Config => {
            let rendered =
                toml::to_string_pretty(config).map_err(|e| Error::Config(e.to_string()))?;
            print!("{}", rendered);
            Ok(())
        }
    }
}

fn request_timeout(config: &Config) -> Duration {
    Duration::from_secs(config.timeouts.request_secs)
}

fn print_order(order: &OrderResponse) {
    let text = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    println!("{}", "Order".cyan().bold());
    println!("  quoteId:     {}", text(&order.quote_id));
    println!("  requestId:   {}", text(&order.request_id));
    println!("  maker:       {}", text(&order.maker));
    println!(
        "  swapMode:    {}",
        order
            .swap_mode
            .map(|m| m.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    println!(
        "  in:          {} {}",
        text(&order.in_amount),
        text(&order.input_mint)
    );
    println!(
        "  out:         {} {}",
        text(&order.out_amount),
        text(&order.output_mint)
    );
    println!(
        "  expireAt:    {}",
        order
            .expire_at
            .as_ref()
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    if order.transaction.is_some() {
        println!("  transaction: {}", "present".green());
    } else {
        println!("  transaction: {}", "none".dimmed());
    }
}
