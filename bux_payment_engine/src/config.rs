use std::{fmt::Display, str::FromStr};

use thiserror::Error;

/// The token id of the BUX eToken. Every verified transaction must move this token and no other.
pub const BUX_TOKEN_ID: &str = "7e7dacd72dcdb14e00a03dd3aff47f019ed51a6f1f4e4f532ae50692f62bc4e5";

pub const DEFAULT_INVOICE_PREFIX: &str = "WC-";

//--------------------------------------   MerchantConfig   ----------------------------------------------------------
/// Static merchant configuration, built once at startup and passed into each API at construction.
/// There is deliberately no ambient/global gateway state.
#[derive(Clone, Debug)]
pub struct MerchantConfig {
    /// The shop name, forwarded to the payment network on checkout.
    pub merchant_name: String,
    /// The merchant's eToken receiving address. Also the (weak) pre-ledger authentication factor
    /// for inbound notifications; the real proof of payment is the on-chain check.
    pub merchant_address: String,
    /// Prefix for invoice numbers. Keep unique per store if one address serves several stores.
    pub invoice_prefix: String,
    /// Forward the billing/shipping block with the payment request.
    pub send_shipping: bool,
    /// How the payable amount is derived from the order total.
    pub total_mode: TotalMode,
    /// Permit completion on received-but-unconfirmed transaction data.
    pub allow_zero_confirm: bool,
    /// The token id a verified transaction must carry.
    pub token_id: String,
    /// The absolute URL of this gateway's IPN endpoint, echoed back by the payment network.
    pub ipn_url: String,
    /// Recipient of diagnostic reports and cancellation notices.
    pub admin_email: String,
    /// Optional extra recipient for copies of invalid IPN reports.
    pub debug_email: Option<String>,
}

impl Default for MerchantConfig {
    fn default() -> Self {
        Self {
            merchant_name: String::default(),
            merchant_address: String::default(),
            invoice_prefix: DEFAULT_INVOICE_PREFIX.to_string(),
            send_shipping: true,
            total_mode: TotalMode::default(),
            allow_zero_confirm: true,
            token_id: BUX_TOKEN_ID.to_string(),
            ipn_url: String::default(),
            admin_email: String::default(),
            debug_email: None,
        }
    }
}

//--------------------------------------      TotalMode     ----------------------------------------------------------
/// The three mutually exclusive ways of splitting an order total into amount, shipping and tax
/// lines on the payment request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TotalMode {
    /// Compatibility mode: the full order total as one line, zero tax and shipping.
    #[default]
    Simple,
    /// Store prices include tax: shipping (with its tax) reported separately, tax line zero.
    TaxInclusive,
    /// Store prices exclude tax: shipping and tax both reported separately.
    TaxExclusive,
}

impl Display for TotalMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TotalMode::Simple => write!(f, "simple"),
            TotalMode::TaxInclusive => write!(f, "tax_inclusive"),
            TotalMode::TaxExclusive => write!(f, "tax_exclusive"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid total mode: {0}")]
pub struct TotalModeConversionError(String);

impl FromStr for TotalMode {
    type Err = TotalModeConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Self::Simple),
            "tax_inclusive" => Ok(Self::TaxInclusive),
            "tax_exclusive" => Ok(Self::TaxExclusive),
            other => Err(TotalModeConversionError(other.to_string())),
        }
    }
}
