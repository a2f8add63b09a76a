//! Common utilities shared by the clients, suites and CLI

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use config::Config;
pub use error::{Error, Result};

/// Join a base URL and an endpoint path without doubling slashes
pub fn endpoint_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        assert_eq!(endpoint_url("http://h:8080", "quote"), "http://h:8080/quote");
        assert_eq!(endpoint_url("http://h:8080/", "/swap"), "http://h:8080/swap");
        assert_eq!(endpoint_url("https://h/v1", "order"), "https://h/v1/order");
    }
}
