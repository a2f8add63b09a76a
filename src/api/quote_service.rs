//! RFQ quote service messages (`/order`, `/quote`, `/swap`, `/execute`)
//!
//! Response fields are optional so that a missing field shows up as an
//! assertion failure naming it instead of a decode error.

use serde::{Deserialize, Serialize};

use super::SwapMode;

/// Query parameters of `GET /order`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    pub input_mint: String,
    pub output_mint: String,
    pub amount: String,
    pub mode: String,
    pub swap_mode: SwapMode,
    pub slippage_bps: u16,
    pub broadcast_fee_type: String,
    pub priority_fee_lamports: u64,
    pub use_wsol: bool,
    pub as_legacy_transaction: bool,
    pub exclude_dexes: String,
    pub exclude_routers: String,
    /// Left out when the wallet isn't connected yet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taker: Option<String>,
    pub webhook_id: String,
}

impl OrderQuery {
    /// Order for `amount` of `input_mint` → `output_mint`, routed to a single
    /// webhook with the aggregator routers excluded
    pub fn new(
        input_mint: &str,
        output_mint: &str,
        amount: u64,
        swap_mode: SwapMode,
        webhook_id: &str,
    ) -> Self {
        Self {
            input_mint: input_mint.to_string(),
            output_mint: output_mint.to_string(),
            amount: amount.to_string(),
            mode: "manual".to_string(),
            swap_mode,
            slippage_bps: 50,
            broadcast_fee_type: "maxCap".to_string(),
            priority_fee_lamports: 1_000_000,
            use_wsol: false,
            as_legacy_transaction: false,
            exclude_dexes: String::new(),
            exclude_routers: "metis,hashflow,dflow".to_string(),
            taker: None,
            webhook_id: webhook_id.to_string(),
        }
    }

    pub fn with_taker(mut self, taker: impl Into<String>) -> Self {
        self.taker = Some(taker.into());
        self
    }
}

/// Response of `GET /order`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub quote_id: Option<String>,
    pub request_id: Option<String>,
    /// Unix timestamp or ISO string depending on the deployment
    pub expire_at: Option<serde_json::Value>,
    pub maker: Option<String>,
    pub swap_mode: Option<SwapMode>,
    pub in_amount: Option<String>,
    pub out_amount: Option<String>,
    pub input_mint: Option<String>,
    pub output_mint: Option<String>,
    /// Base64 unsigned transaction, only present when a taker was given
    pub transaction: Option<String>,
}

/// Query parameters of `GET /quote`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteQuery {
    /// `exactIn` / `exactOut`
    pub swap_mode: String,
    pub taker: String,
    pub input_mint: String,
    pub output_mint: String,
    pub amount: String,
    pub fee_bps: u16,
    pub swap_type: String,
    pub webhook_id: String,
}

impl QuoteQuery {
    pub fn rfq(
        input_mint: &str,
        output_mint: &str,
        amount: u64,
        swap_mode: SwapMode,
        fee_bps: u16,
        taker: &str,
        webhook_id: &str,
    ) -> Self {
        Self {
            swap_mode: swap_mode.as_camel().to_string(),
            taker: taker.to_string(),
            input_mint: input_mint.to_string(),
            output_mint: output_mint.to_string(),
            amount: amount.to_string(),
            fee_bps,
            swap_type: "rfq".to_string(),
            webhook_id: webhook_id.to_string(),
        }
    }
}

/// Response of `GET /quote?swapType=rfq`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RfqQuoteResponse {
    pub quote_id: Option<String>,
    pub request_id: Option<String>,
    pub expire_at: Option<serde_json::Value>,
    pub maker: Option<String>,
    pub order_info: Option<OrderInfo>,
    pub transaction: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderInfo {
    pub input: OrderLeg,
    pub output: OrderLeg,
}

/// One side of a Dutch-style order; RFQ fills use `start_amount`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLeg {
    pub start_amount: String,
    pub end_amount: Option<String>,
    pub token: String,
}

/// Body of `POST /execute`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    pub request_id: String,
    pub signed_transaction: String,
}
