use std::time::Duration;

use crate::api::webhook::{SwapRequest, WebhookQuoteRequest};
use crate::common::Result;

use super::{ApiResponse, Transport, NO_QUERY};

/// Client for a market maker webhook, bypassing the quote service
#[derive(Debug, Clone)]
pub struct WebhookClient {
    transport: Transport,
}

impl WebhookClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(base_url, timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.transport.base_url
    }

    /// `POST /quote`
    pub async fn quote(&self, request: &WebhookQuoteRequest) -> Result<ApiResponse> {
        self.transport.post("quote", NO_QUERY, request).await
    }

    /// `POST /swap`
    pub async fn swap(&self, request: &SwapRequest) -> Result<ApiResponse> {
        self.transport.post("swap", NO_QUERY, request).await
    }

    /// `GET /tokens`
    pub async fn tokens(&self) -> Result<ApiResponse> {
        self.transport.get("tokens", NO_QUERY).await
    }
}
