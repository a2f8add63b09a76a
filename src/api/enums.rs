//! Enumerations shared by the quote service and webhook messages
//!
//! Each type serializes in the spelling its endpoint expects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which side of the swap the amount fixes
///
/// The quote service spells this `ExactIn` on `/order` and `exactIn` on
/// `/quote`; both spellings (and snake case) are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SwapMode {
    #[default]
    #[serde(alias = "exactIn", alias = "exact_in")]
    ExactIn,
    #[serde(alias = "exactOut", alias = "exact_out")]
    ExactOut,
}

impl SwapMode {
    /// Spelling used by `/order` and in responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ExactIn => "ExactIn",
            Self::ExactOut => "ExactOut",
        }
    }

    /// Spelling used by `/quote`
    pub fn as_camel(&self) -> &'static str {
        match self {
            Self::ExactIn => "exactIn",
            Self::ExactOut => "exactOut",
        }
    }
}

impl fmt::Display for SwapMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SwapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.replace('_', "").to_ascii_lowercase().as_str() {
            "exactin" => Ok(Self::ExactIn),
            "exactout" => Ok(Self::ExactOut),
            _ => Err(format!("expected ExactIn or ExactOut, got '{}'", s)),
        }
    }
}

/// Webhook spelling of the swap mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuoteType {
    #[serde(alias = "ExactIn", alias = "exact_in")]
    ExactIn,
    #[serde(alias = "ExactOut", alias = "exact_out")]
    ExactOut,
}

impl From<SwapMode> for QuoteType {
    fn from(mode: SwapMode) -> Self {
        match mode {
            SwapMode::ExactIn => Self::ExactIn,
            SwapMode::ExactOut => Self::ExactOut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Protocol {
    #[default]
    V1,
}

/// Outcome of a swap as reported by the maker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapState {
    Accepted,
    Rejected,
}

impl fmt::Display for SwapState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("accepted"),
            Self::Rejected => f.write_str("rejected"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_mode_from_str() {
        assert_eq!("ExactIn".parse::<SwapMode>().unwrap(), SwapMode::ExactIn);
        assert_eq!("exactOut".parse::<SwapMode>().unwrap(), SwapMode::ExactOut);
        assert_eq!("exact_out".parse::<SwapMode>().unwrap(), SwapMode::ExactOut);
        assert!("exact".parse::<SwapMode>().is_err());
    }

    #[test]
    fn test_swap_mode_aliases() {
        let mode: SwapMode = serde_json::from_str("\"exactIn\"").unwrap();
        assert_eq!(mode, SwapMode::ExactIn);
        assert_eq!(serde_json::to_string(&SwapMode::ExactOut).unwrap(), "\"ExactOut\"");
    }

    #[test]
    fn test_quote_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&QuoteType::from(SwapMode::ExactIn)).unwrap(),
            "\"exactIn\""
        );
        let parsed: QuoteType = serde_json::from_str("\"ExactOut\"").unwrap();
        assert_eq!(parsed, QuoteType::ExactOut);
    }

    #[test]
    fn test_swap_state_wire_format() {
        let state: SwapState = serde_json::from_str("\"rejected\"").unwrap();
        assert_eq!(state, SwapState::Rejected);
        assert_eq!(serde_json::to_string(&Protocol::V1).unwrap(), "\"v1\"");
    }
}
