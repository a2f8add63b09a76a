//! rfq-check - acceptance tests for RFQ market maker webhooks
//!
//! Exercises a market maker integration end to end through the RFQ quote
//! service, or directly against the maker's webhook, and reports which
//! request/assert cases pass.

pub mod api;
pub mod cli;
pub mod client;
pub mod commands;
pub mod common;
pub mod keypair;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Config, Error, Result};
pub use keypair::TakerKeypair;
