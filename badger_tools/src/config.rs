use log::*;

pub const DEFAULT_PAYMENT_REQUEST_URL: &str = "https://pay.badger.cash/i/";
pub const DEFAULT_TX_URL: &str = "https://ecash.badger.cash:8332/tx/";
pub const DEFAULT_PAY_URL: &str = "https://bux.digital/v1/pay";

#[derive(Debug, Clone)]
pub struct BadgerConfig {
    /// Base URL for payment-request lookups; the payment-request id is appended directly.
    pub payment_request_url: String,
    /// Base URL for transaction lookups; the transaction hash is appended directly.
    pub tx_url: String,
    /// Base URL the customer is redirected to with the payment request query string.
    pub pay_url: String,
}

impl Default for BadgerConfig {
    fn default() -> Self {
        Self {
            payment_request_url: DEFAULT_PAYMENT_REQUEST_URL.to_string(),
            tx_url: DEFAULT_TX_URL.to_string(),
            pay_url: DEFAULT_PAY_URL.to_string(),
        }
    }
}

impl BadgerConfig {
    pub fn new_from_env_or_default() -> Self {
        let payment_request_url = std::env::var("BPG_PAYMENT_REQUEST_URL").unwrap_or_else(|_| {
            info!("🪛️ BPG_PAYMENT_REQUEST_URL not set, using {DEFAULT_PAYMENT_REQUEST_URL}");
            DEFAULT_PAYMENT_REQUEST_URL.to_string()
        });
        let tx_url = std::env::var("BPG_TX_URL").unwrap_or_else(|_| {
            info!("🪛️ BPG_TX_URL not set, using {DEFAULT_TX_URL}");
            DEFAULT_TX_URL.to_string()
        });
        let pay_url = std::env::var("BPG_PAY_URL").unwrap_or_else(|_| {
            info!("🪛️ BPG_PAY_URL not set, using {DEFAULT_PAY_URL}");
            DEFAULT_PAY_URL.to_string()
        });
        Self { payment_request_url, tx_url, pay_url }
    }
}
