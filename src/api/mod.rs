//! Wire types for the two HTTP surfaces under test
//!
//! The quote service is the RFQ proxy a taker talks to (`/order`, `/quote`,
//! `/swap`, `/execute`). The webhook is the market maker integration the
//! proxy forwards to (`/quote`, `/swap`, `/tokens`).

mod enums;
pub mod quote_service;
pub mod webhook;

pub use enums::{Protocol, QuoteType, SwapMode, SwapState};

use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

/// Request id a reference webhook answers with a rejected swap
pub const SIMULATE_REJECTION_REQUEST_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Check that a string is a base58-encoded 32 byte address
pub fn is_valid_address(address: &str) -> bool {
    Pubkey::from_str(address).is_ok()
}

/// Parse a decimal amount string
///
/// Amounts travel as strings so they survive JSON number precision limits.
pub fn parse_amount(value: &str) -> Option<u128> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
