use std::time::Duration;

use crate::api::quote_service::{ExecuteRequest, OrderQuery, QuoteQuery};
use crate::api::webhook::SwapRequest;
use crate::common::Result;

use super::{ApiResponse, Transport, NO_QUERY};

/// Client for the RFQ quote service a taker talks to
#[derive(Debug, Clone)]
pub struct QuoteServiceClient {
    transport: Transport,
}

impl QuoteServiceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(base_url, timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.transport.base_url
    }

    /// `GET /order`
    pub async fn order(&self, query: &OrderQuery) -> Result<ApiResponse> {
        self.transport.get("order", query).await
    }

    /// `GET /quote`
    pub async fn quote(&self, query: &QuoteQuery) -> Result<ApiResponse> {
        self.transport.get("quote", query).await
    }

    /// `POST /swap?swapType=rfq`
    pub async fn swap(&self, request: &SwapRequest) -> Result<ApiResponse> {
        self.transport
            .post("swap", &[("swapType", "rfq")], request)
            .await
    }

    /// `POST /execute`
    pub async fn execute(&self, request: &ExecuteRequest) -> Result<ApiResponse> {
        self.transport.post("execute", NO_QUERY, request).await
    }

    /// `GET /tokens`
    pub async fn tokens(&self) -> Result<ApiResponse> {
        self.transport.get("tokens", NO_QUERY).await
    }
}
