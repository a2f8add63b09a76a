//! Acceptance test runner
//!
//! Built-in suites cover the standard quote/swap/tokens contract; YAML
//! scenarios describe anything else. Both assert against decoded JSON
//! bodies rather than fragile string matching.

pub mod assertions;
mod config;
mod runner;
pub mod suites;

pub use config::*;
pub use runner::{run_parsed_scenario, run_scenario, TestResult};
pub use suites::{run_case, run_suite, Case, CaseOutcome, Suite, SuiteContext, SuiteReport};
