use std::env;

use badger_tools::BadgerConfig;
use bpg_common::parse_boolean_flag;
use bux_payment_engine::config::{MerchantConfig, BUX_TOKEN_ID, DEFAULT_INVOICE_PREFIX};
use log::*;

const DEFAULT_BPG_HOST: &str = "127.0.0.1";
const DEFAULT_BPG_PORT: u16 = 8360;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub merchant: MerchantConfig,
    pub badger: BadgerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_BPG_HOST.to_string(),
            port: DEFAULT_BPG_PORT,
            merchant: MerchantConfig::default(),
            badger: BadgerConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("BPG_HOST").ok().unwrap_or_else(|| DEFAULT_BPG_HOST.into());
        let port = env::var("BPG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for BPG_PORT. {e} Using the default, {DEFAULT_BPG_PORT}, instead."
                    );
                    DEFAULT_BPG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_BPG_PORT);
        let merchant = merchant_config_from_env();
        let badger = BadgerConfig::new_from_env_or_default();
        Self { host, port, merchant, badger }
    }
}

fn merchant_config_from_env() -> MerchantConfig {
    let merchant_name = env::var("BPG_MERCHANT_NAME").unwrap_or_else(|_| {
        warn!("🪛️ BPG_MERCHANT_NAME not set. Payment requests will carry an empty shop name.");
        String::default()
    });
    let merchant_address = env::var("BPG_MERCHANT_ADDRESS").unwrap_or_else(|_| {
        error!("🪛️ BPG_MERCHANT_ADDRESS not set. Every inbound notification will fail authentication.");
        String::default()
    });
    let invoice_prefix = env::var("BPG_INVOICE_PREFIX").unwrap_or_else(|_| DEFAULT_INVOICE_PREFIX.to_string());
    let send_shipping = bool_env("BPG_SEND_SHIPPING", true);
    let total_mode = env::var("BPG_TOTAL_MODE")
        .map(|s| {
            s.parse().unwrap_or_else(|e| {
                error!("🪛️ {e}. Using 'simple' instead.");
                Default::default()
            })
        })
        .unwrap_or_default();
    let allow_zero_confirm = bool_env("BPG_ALLOW_ZERO_CONF", true);
    let token_id = env::var("BPG_TOKEN_ID").unwrap_or_else(|_| BUX_TOKEN_ID.to_string());
    let ipn_url = env::var("BPG_IPN_URL").unwrap_or_else(|_| {
        warn!("🪛️ BPG_IPN_URL not set. The payment network will have no callback URL to notify.");
        String::default()
    });
    let admin_email = env::var("BPG_ADMIN_EMAIL").unwrap_or_else(|_| {
        warn!("🪛️ BPG_ADMIN_EMAIL not set. Diagnostic reports have nowhere to go.");
        String::default()
    });
    let debug_email = env::var("BPG_DEBUG_EMAIL").ok();
    MerchantConfig {
        merchant_name,
        merchant_address,
        invoice_prefix,
        send_shipping,
        total_mode,
        allow_zero_confirm,
        token_id,
        ipn_url,
        admin_email,
        debug_email,
    }
}

fn bool_env(var: &str, default: bool) -> bool {
    parse_boolean_flag(env::var(var).ok(), default)
}
