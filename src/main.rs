//! rfq-check - acceptance tests for RFQ market maker webhooks
//!
//! Runs the built-in suites or YAML scenarios against a quote service and a
//! market maker webhook.

use clap::Parser;
use commands::Commands;
use rfq_check::common::{logging, Config};
use rfq_check::{cli, commands};

#[derive(Parser)]
#[command(name = "rfq-check", about = "Acceptance tests for RFQ market maker webhooks")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Quote service base URL (overrides QUOTE_SERVICE_URL)
    #[arg(long, global = true)]
    quote_service_url: Option<String>,

    /// Webhook base URL (overrides WEBHOOK_URL)
    #[arg(long, global = true)]
    webhook_url: Option<String>,

    /// Webhook id routed to by the quote service (overrides WEBHOOK_ID)
    #[arg(long, global = true)]
    webhook_id: Option<String>,

    /// Taker keypair file (overrides TAKER_KEYPAIR)
    #[arg(long, global = true)]
    keypair: Option<String>,

    /// Log requests and response bodies
    #[arg(long, short, global = true)]
    verbose: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.quote_service_url {
            config.service.quote_service_url = url.clone();
        }
        if let Some(url) = &self.webhook_url {
            config.service.webhook_url = url.clone();
        }
        if let Some(id) = &self.webhook_id {
            config.service.webhook_id = Some(id.clone());
        }
        if let Some(path) = &self.keypair {
            config.taker.keypair = path.clone();
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.verbose);

    let result = match Config::load() {
        Ok(mut config) => {
            cli.apply_overrides(&mut config);
            cli::dispatch(cli.command, &config, cli.verbose).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
