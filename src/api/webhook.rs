//! Market maker webhook messages (`/quote`, `/swap`, `/tokens`)

use serde::{Deserialize, Serialize};

use super::{Protocol, QuoteType, SwapState};

/// Request to get a quote from the market maker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookQuoteRequest {
    pub request_id: String,
    pub quote_id: String,
    pub token_in: String,
    pub amount: String,
    pub token_out: String,
    pub quote_type: QuoteType,
    pub protocol: Protocol,
    /// Absent when the user hasn't connected a wallet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taker: Option<String>,
    /// Compute unit price in micro lamports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_prioritization_fees: Option<u64>,
    pub fee_bps: u16,
}

/// Quote returned by the market maker
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookQuoteResponse {
    pub request_id: Option<String>,
    pub quote_id: Option<String>,
    pub token_in: Option<String>,
    pub amount_in: Option<String>,
    pub token_out: Option<String>,
    pub amount_out: Option<String>,
    pub quote_type: Option<QuoteType>,
    pub protocol: Option<Protocol>,
    pub maker: Option<String>,
    pub taker: Option<String>,
    pub receiver: Option<String>,
    pub prioritization_fee_to_use: Option<u64>,
}

/// Order to be filled, sent to both the quote service and the webhook
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRequest {
    pub request_id: String,
    pub quote_id: String,
    /// Base64 versioned transaction carrying the taker's signature
    pub transaction: String,
}

/// Swap outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapResponse {
    pub quote_id: Option<String>,
    pub state: SwapState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

/// Error body; the proxy uses `error`, the webhook reference uses `message`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(alias = "error")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_request_skips_absent_taker() {
        let request = WebhookQuoteRequest {
            request_id: "r".to_string(),
            quote_id: "q".to_string(),
            token_in: "A".to_string(),
            amount: "10".to_string(),
            token_out: "B".to_string(),
            quote_type: QuoteType::ExactIn,
            protocol: Protocol::V1,
            taker: None,
            suggested_prioritization_fees: Some(10_000),
            fee_bps: 0,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["quoteType"], "exactIn");
        assert_eq!(value["protocol"], "v1");
        assert_eq!(value["suggestedPrioritizationFees"], 10_000);
        assert!(value.get("taker").is_none());
    }

    #[test]
    fn test_swap_response_rejected() {
        let response: SwapResponse = serde_json::from_str(
            r#"{"quoteId":"q","state":"rejected","rejectionReason":"insufficient balance"}"#,
        )
        .unwrap();
        assert_eq!(response.state, SwapState::Rejected);
        assert_eq!(response.rejection_reason.as_deref(), Some("insufficient balance"));
        assert!(response.tx_signature.is_none());
    }

    #[test]
    fn test_error_response_accepts_both_spellings() {
        let a: ErrorResponse = serde_json::from_str(r#"{"message":"nope"}"#).unwrap();
        let b: ErrorResponse = serde_json::from_str(r#"{"error":"nope"}"#).unwrap();
        assert_eq!(a.message, b.message);
    }
}
