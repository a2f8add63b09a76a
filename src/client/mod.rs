//! HTTP clients for the services under test
//!
//! Both clients share one transport that logs every request, keeps the raw
//! JSON body for field presence checks, and sorts failures into the three
//! categories the suites report: bad status, no response, unknown.

mod quote_service;
mod webhook;

pub use quote_service::QuoteServiceClient;
pub use webhook::WebhookClient;

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::common::{endpoint_url, Error, Result};

/// A successful (2xx) response
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Full request URL including the query string
    pub url: String,
    pub status: u16,
    /// Decoded body, `Null` when the body was empty
    pub body: serde_json::Value,
}

impl ApiResponse {
    /// Decode the body into a typed message
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(self.body.clone()).map_err(|e| {
            Error::assertion(format!("Unexpected response shape from {}: {}", self.url, e))
        })
    }
}

/// Shared request plumbing
#[derive(Debug, Clone)]
struct Transport {
    http: Client,
    base_url: String,
}

impl Transport {
    fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("rfq-check/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<Q>(&self, path: &str, query: &Q) -> Result<ApiResponse>
    where
        Q: Serialize + ?Sized,
    {
        let builder = self
            .http
            .get(endpoint_url(&self.base_url, path))
            .query(query);
        self.send(builder).await
    }

    async fn post<Q, B>(&self, path: &str, query: &Q, body: &B) -> Result<ApiResponse>
    where
        Q: Serialize + ?Sized,
        B: Serialize + ?Sized,
    {
        let builder = self
            .http
            .post(endpoint_url(&self.base_url, path))
            .query(query)
            .json(body);
        self.send(builder).await
    }

    /// Send and categorize. An unbuildable request (bad base URL, query that
    /// won't serialize) never left this process, so it stays `Http`.
    async fn send(&self, builder: RequestBuilder) -> Result<ApiResponse> {
        let request = builder.build()?;
        let method = request.method().clone();
        let url = request.url().to_string();

        tracing::info!(%method, %url, "Sending request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| Error::from_transport(&url, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::from_transport(&url, e))?;

        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), body = %text, "Request failed");
            return Err(Error::unexpected_status(&url, status.as_u16(), &text));
        }

        tracing::debug!(%url, status = status.as_u16(), body = %text, "Response received");

        let body = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        Ok(ApiResponse {
            url,
            status: status.as_u16(),
            body,
        })
    }
}

/// No query parameters
const NO_QUERY: &[(&str, &str)] = &[];
