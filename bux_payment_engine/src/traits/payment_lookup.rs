use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The SLP operation type of an output that actually transfers token value.
pub const SLP_SEND: &str = "SEND";

/// The black-box lookup dependency: resolves a claimed payment-request id to its record, and a
/// transaction hash to the on-chain transaction detail.
///
/// Each call is a single attempt. A transport failure or non-success response is terminal for the
/// notification being processed; the sender redelivers if appropriate.
#[allow(async_fn_in_trait)]
pub trait PaymentLookup: Clone {
    async fn payment_request(&self, payment_id: &str) -> Result<PaymentRequestRecord, LookupError>;

    async fn transaction(&self, tx_hash: &str) -> Result<OnChainTransaction, LookupError>;
}

#[derive(Debug, Clone, Error)]
pub enum LookupError {
    #[error("Could not reach the lookup service. {0}")]
    RequestError(String),
    #[error("The lookup service returned an error. Code: {status}, message: {message}")]
    QueryError { status: u16, message: String },
    #[error("Could not parse the lookup response. {0}")]
    JsonError(String),
}

//--------------------------------------  PaymentRequestRecord  ------------------------------------------------------
/// The lookup service's view of one payment request. The fields the verifier depends on are
/// optional here: their absence is a *verification* decision (reject), not a parse fault.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentRequestRecord {
    pub payment_id: String,
    /// Hash of the transaction that settled the request, once paid.
    pub tx_hash: Option<String>,
    /// The correlation value the network will echo back on the IPN callback. Must equal the
    /// order's key for the request to belong to the order.
    pub callback_custom: Option<String>,
    pub paid: bool,
}

//--------------------------------------  OnChainTransaction  --------------------------------------------------------
/// Token-level detail of a blockchain transaction, as returned by the ledger query service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnChainTransaction {
    pub tx_hash: String,
    /// The token the transaction moves, if it is a token transaction at all.
    pub token: Option<SlpTokenInfo>,
    pub outputs: Vec<TxOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlpTokenInfo {
    pub token_id: String,
    /// The token's declared decimal precision; raw output values are integers at this scale.
    pub decimals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxOutput {
    pub address: String,
    /// Token payload of this output. Plain network-currency outputs carry `None`.
    pub slp: Option<SlpOutputInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlpOutputInfo {
    /// The SLP operation type, e.g. `SEND`.
    pub op_type: String,
    pub token_id: String,
    /// Transferred value in base units (scale given by [`SlpTokenInfo::decimals`]).
    pub value: u64,
}
