//! Configuration handling
//!
//! Values are resolved in layers: built-in defaults, then the optional
//! `config.toml`, then `.env`, then the process environment. CLI flags are
//! applied last by the caller.

use serde::{Deserialize, Serialize};

use super::paths::config_path;
use super::{Error, Result};
use crate::api::SwapMode;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Endpoints under test
    #[serde(default)]
    pub service: ServiceConfig,

    /// Pair, amount and fee used by every quote
    #[serde(default)]
    pub swap: SwapConfig,

    /// Taker wallet
    #[serde(default)]
    pub taker: TakerConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,
}

/// Endpoints under test
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Base URL of the RFQ quote service (`/order`, `/quote`, `/swap`)
    #[serde(default = "default_quote_service_url")]
    pub quote_service_url: String,

    /// Base URL of a market maker webhook (`/quote`, `/swap`, `/tokens`)
    #[serde(default = "default_webhook_url")]
    pub webhook_url: String,

    /// Identifier routing quote requests to one market maker integration
    #[serde(default)]
    pub webhook_id: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            quote_service_url: default_quote_service_url(),
            webhook_url: default_webhook_url(),
            webhook_id: None,
        }
    }
}

fn default_quote_service_url() -> String {
    "https://quote-proxy-edge.raccoons.dev".to_string()
}

fn default_webhook_url() -> String {
    "http://localhost:8080".to_string()
}

pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
pub const WSOL_MINT: &str = "So11111111111111111111111111111111111111112";

/// Pair, amount and fee settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SwapConfig {
    /// Amount in base units of the exact side
    #[serde(default = "default_amount")]
    pub amount: u64,

    #[serde(default = "default_input_mint")]
    pub input_mint: String,

    #[serde(default = "default_output_mint")]
    pub output_mint: String,

    /// Token the scenarios ask a price in; falls back to `output_mint`
    #[serde(default)]
    pub mint_a: Option<String>,

    /// Token the scenarios pay with; falls back to `input_mint`
    #[serde(default)]
    pub mint_b: Option<String>,

    /// Market maker fee in basis points
    #[serde(default)]
    pub fee_bps: u16,

    #[serde(default)]
    pub swap_mode: SwapMode,
}

impl Default for SwapConfig {
    fn default() -> Self {
        Self {
            amount: default_amount(),
            input_mint: default_input_mint(),
            output_mint: default_output_mint(),
            mint_a: None,
            mint_b: None,
            fee_bps: 0,
            swap_mode: SwapMode::default(),
        }
    }
}

impl SwapConfig {
    pub fn mint_a(&self) -> &str {
        self.mint_a.as_deref().unwrap_or(&self.output_mint)
    }

    pub fn mint_b(&self) -> &str {
        self.mint_b.as_deref().unwrap_or(&self.input_mint)
    }
}

// 1 USDC
fn default_amount() -> u64 {
    1_000_000
}

fn default_input_mint() -> String {
    USDC_MINT.to_string()
}

fn default_output_mint() -> String {
    WSOL_MINT.to_string()
}

/// Taker wallet settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TakerConfig {
    /// Path to a JSON keypair file, `~` is expanded
    #[serde(default = "default_keypair")]
    pub keypair: String,
}

impl Default for TakerConfig {
    fn default() -> Self {
        Self {
            keypair: default_keypair(),
        }
    }
}

fn default_keypair() -> String {
    "keypair.json".to_string()
}

/// Timeout settings in seconds
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Timeouts {
    /// Timeout for a single HTTP request
    #[serde(default = "default_request")]
    pub request_secs: u64,

    /// Timeout for a whole suite
    #[serde(default = "default_suite")]
    pub suite_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            request_secs: default_request(),
            suite_secs: default_suite(),
        }
    }
}

fn default_request() -> u64 {
    30
}
fn default_suite() -> u64 {
    600
}

impl Config {
    /// Load configuration from the default config file, `.env` and the
    /// process environment
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        dotenvy::dotenv().ok();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load only the config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load_file() -> Result<Self> {
        if let Some(path) = config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path).map_err(|e| Error::FileRead {
                    path: path.display().to_string(),
                    error: e.to_string(),
                })?;
                return Self::from_toml(&content);
            }
        }
        Ok(Self::default())
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Override values with environment variables
    ///
    /// `lookup` is the variable source, which keeps tests off the real
    /// process environment. Empty values are treated as unset.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("QUOTE_SERVICE_URL") {
            self.service.quote_service_url = v;
        }
        if let Some(v) = get("WEBHOOK_URL") {
            self.service.webhook_url = v;
        }
        if let Some(v) = get("WEBHOOK_ID") {
            self.service.webhook_id = Some(v);
        }
        if let Some(v) = get("TAKER_KEYPAIR") {
            self.taker.keypair = v;
        }
        if let Some(v) = get("AMOUNT") {
            self.swap.amount = parse_var("AMOUNT", &v)?;
        }
        if let Some(v) = get("INPUT_MINT") {
            self.swap.input_mint = v;
        }
        if let Some(v) = get("OUTPUT_MINT") {
            self.swap.output_mint = v;
        }
        if let Some(v) = get("MINT_A") {
            self.swap.mint_a = Some(v);
        }
        if let Some(v) = get("MINT_B") {
            self.swap.mint_b = Some(v);
        }
        if let Some(v) = get("FEE_BPS") {
            self.swap.fee_bps = parse_var("FEE_BPS", &v)?;
        }
        if let Some(v) = get("SWAP_MODE") {
            self.swap.swap_mode = parse_var("SWAP_MODE", &v)?;
        }
        if let Some(v) = get("REQUEST_TIMEOUT_SECS") {
            self.timeouts.request_secs = parse_var("REQUEST_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = get("SUITE_TIMEOUT_SECS") {
            self.timeouts.suite_secs = parse_var("SUITE_TIMEOUT_SECS", &v)?;
        }

        self.validate()
    }

    /// Range checks that serde can't express
    pub fn validate(&self) -> Result<()> {
        if self.swap.fee_bps > 10_000 {
            return Err(Error::Config(format!(
                "FEE_BPS must be at most 10000, got {}",
                self.swap.fee_bps
            )));
        }
        Ok(())
    }

    /// Webhook id, required by every quote service scenario
    pub fn require_webhook_id(&self) -> Result<&str> {
        self.service
            .webhook_id
            .as_deref()
            .ok_or(Error::MissingSetting("WEBHOOK_ID"))
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| Error::Config(format!("Invalid value for {}: '{}' ({})", key, value, e)))
}
