//! Terminal configuration
//!
//! Every option can be given as a flag or through the environment; a `.env`
//! file in the working directory is loaded first.

use clap::{Parser, ValueEnum};
use till_client::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use till_client::{ClientConfig, OrphanPolicy, RoundingMode, TaxPolicy};

/// Rounding mode names accepted on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Rounding {
    /// Round only when displaying amounts
    Display,
    /// Round each line and the tax to cents
    Line,
}

/// What to do with an invoice that was created but not completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Orphans {
    Leave,
    Cancel,
}

#[derive(Debug, Parser)]
#[command(name = "till-terminal", about = "Point-of-sale scanning terminal")]
pub struct Config {
    /// Store backend base URL
    #[arg(long, env = "TILL_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "TILL_API_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Bearer token sent with every request
    #[arg(long, env = "TILL_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Receipt printer, `host` or `host:port` (stdout when unset)
    #[arg(long, env = "TILL_PRINTER_ADDR")]
    pub printer_addr: Option<String>,

    /// Paper width in characters (48 for 80mm, 32 for 58mm)
    #[arg(long, env = "TILL_PRINTER_WIDTH", default_value_t = 48)]
    pub printer_width: usize,

    /// Sales tax rate
    #[arg(long, env = "TILL_TAX_RATE", default_value_t = 0.16)]
    pub tax_rate: f64,

    #[arg(long, env = "TILL_TAX_ROUNDING", value_enum, default_value_t = Rounding::Display)]
    pub tax_rounding: Rounding,

    #[arg(long, env = "TILL_ORPHAN_POLICY", value_enum, default_value_t = Orphans::Leave)]
    pub orphan_policy: Orphans,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "TILL_LOG", default_value = "info")]
    pub log: String,
}

impl Config {
    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.api_url).with_timeout(self.timeout_secs);
        match self.token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => config.with_token(token),
            None => config,
        }
    }

    pub fn tax_policy(&self) -> anyhow::Result<TaxPolicy> {
        let rounding = match self.tax_rounding {
            Rounding::Display => RoundingMode::AtDisplay,
            Rounding::Line => RoundingMode::PerLine,
        };
        Ok(TaxPolicy::new(self.tax_rate, rounding)?)
    }

    pub fn orphan_policy(&self) -> OrphanPolicy {
        match self.orphan_policy {
            Orphans::Leave => OrphanPolicy::Leave,
            Orphans::Cancel => OrphanPolicy::Cancel,
        }
    }
}
