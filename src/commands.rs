//! CLI command definitions
//!
//! Defines the clap commands for the rfq-check CLI.

use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::api::SwapMode;
use crate::testing::Suite;

#[derive(Subcommand)]
pub enum Commands {
    /// Run a built-in test suite
    Suite {
        /// Which suite to run
        #[arg(value_enum, default_value_t = SuiteSelection::All)]
        suite: SuiteSelection,
    },

    /// Execute a test scenario defined in a YAML file
    Test {
        /// Path to the YAML test scenario file
        path: PathBuf,
    },

    /// Request a single order from the quote service and print it
    Quote {
        /// exactIn or exactOut (default: configured swap mode)
        #[arg(long, short = 'm')]
        swap_mode: Option<SwapMode>,

        /// Amount in base units (default: configured amount)
        #[arg(long, short)]
        amount: Option<u64>,

        /// Input mint (default: configured input mint)
        #[arg(long)]
        input_mint: Option<String>,

        /// Output mint (default: configured output mint)
        #[arg(long)]
        output_mint: Option<String>,

        /// Don't send the taker address
        #[arg(long)]
        no_taker: bool,
    },

    /// List tokens accepted by the quote service or a webhook
    Tokens {
        /// Ask the webhook instead of the quote service
        #[arg(long)]
        webhook: bool,
    },

    /// Print the taker address of a keypair file
    Address {
        /// Keypair file (default: configured taker keypair)
        path: Option<String>,
    },

    /// Print the resolved configuration
    Config,
}

/// Suites selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SuiteSelection {
    Integration,
    Acceptance,
    All,
}

impl SuiteSelection {
    pub fn suites(self) -> &'static [Suite] {
        match self {
            Self::Integration => &[Suite::Integration],
            Self::Acceptance => &[Suite::Acceptance],
            Self::All => &[Suite::Integration, Suite::Acceptance],
        }
    }
}
