use std::fmt::Display;

use bpg_common::TokenAmount;
use thiserror::Error;

use crate::{
    order_types::OrderId,
    traits::{LookupError, OrderStoreError},
};

//--------------------------------------    RejectReason    ----------------------------------------------------------
/// Every distinct way a notification can fail. The display strings are the human-readable audit
/// messages that end up in the order's activity log and the diagnostic report mail; they are
/// never exposed to the HTTP caller, which only learns that the request was rejected.
#[derive(Debug, Clone, Error)]
pub enum RejectReason {
    #[error("Error reading POST data")]
    EmptyRequestBody,
    #[error("No or incorrect Merchant Address passed")]
    MerchantAddressMismatch,
    #[error("Could not find order info for order id provided!")]
    OrderNotFound,
    #[error("Invalid order key")]
    InvalidOrderKey,
    #[error("Original currency doesn't match! Expected {expected}, got '{claimed}'")]
    CurrencyMismatch { expected: String, claimed: String },
    #[error("Amount received is less than the total!")]
    AmountTooLow,
    #[error("No payment request id provided!")]
    MissingPaymentId,
    #[error("Invalid payment id or payment request expired! {0}")]
    PaymentRequestLookup(LookupError),
    #[error("Payment request missing required properties or is not paid!")]
    IncompletePaymentRequest,
    #[error("Invalid order key")]
    CallbackKeyMismatch,
    #[error("Could not fetch transaction details. {0}")]
    TransactionLookup(LookupError),
    #[error("TXID {tx_hash} is not a valid BUX transaction")]
    NotATokenTransaction { tx_hash: String },
    #[error("Token value in TXID {tx_hash} cannot be represented")]
    UnrepresentableValue { tx_hash: String },
    #[error("Insufficient amount paid in TXID {tx_hash}")]
    InsufficientAmount { tx_hash: String },
    #[error("The order store failed while processing the notification. {0}")]
    Backend(String),
}

impl RejectReason {
    /// Coarse classification of the failure, for logging and metrics-style reporting. Externally,
    /// all kinds collapse to the same generic rejection.
    pub fn kind(&self) -> FailureKind {
        use RejectReason::*;
        match self {
            EmptyRequestBody | MerchantAddressMismatch => FailureKind::Authentication,
            OrderNotFound | InvalidOrderKey => FailureKind::Resolution,
            CurrencyMismatch { .. }
            | AmountTooLow
            | MissingPaymentId
            | IncompletePaymentRequest
            | CallbackKeyMismatch
            | NotATokenTransaction { .. }
            | UnrepresentableValue { .. }
            | InsufficientAmount { .. } => FailureKind::Verification,
            // a definite answer from the lookup service is a verification verdict; failing to get
            // an answer at all is a transport fault
            PaymentRequestLookup(e) | TransactionLookup(e) => match e {
                LookupError::QueryError { .. } => FailureKind::Verification,
                _ => FailureKind::Transport,
            },
            Backend(_) => FailureKind::Transport,
        }
    }
}

impl From<OrderStoreError> for RejectReason {
    fn from(e: OrderStoreError) -> Self {
        Self::Backend(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Authentication,
    Resolution,
    Verification,
    Transport,
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Authentication => write!(f, "authentication failure"),
            FailureKind::Resolution => write!(f, "resolution failure"),
            FailureKind::Verification => write!(f, "verification failure"),
            FailureKind::Transport => write!(f, "transport failure"),
        }
    }
}

//--------------------------------------  VerificationOutcome  -------------------------------------------------------
/// The verifier's verdict on a notification: proof of payment was found on-chain, or a concrete
/// reason it was not. Deliberately a sum type; there is no boolean-with-an-error-string channel.
#[derive(Debug, Clone)]
pub enum VerificationOutcome {
    /// Payment proven on-chain; carries the scaled amount actually received.
    Verified(TokenAmount),
    Rejected(RejectReason),
}

//--------------------------------------    IpnDisposition   ---------------------------------------------------------
/// What the state transition engine did with a verified notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpnDisposition {
    /// The order was marked paid by this notification.
    Completed,
    /// The order had already been completed; this delivery was an idempotent no-op.
    AlreadyComplete,
    /// The payment was cancelled or timed out on the network side.
    Cancelled,
    /// Payment is underway but not final; the order stays pending.
    Pending,
}

impl Display for IpnDisposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpnDisposition::Completed => write!(f, "completed"),
            IpnDisposition::AlreadyComplete => write!(f, "already complete"),
            IpnDisposition::Cancelled => write!(f, "cancelled"),
            IpnDisposition::Pending => write!(f, "pending"),
        }
    }
}

//--------------------------------------    IpnResolution    ---------------------------------------------------------
/// The definite outcome of processing one notification. The engine entrypoint always returns one
/// of these; no error ever escapes to the caller.
#[derive(Debug, Clone)]
pub enum IpnResolution {
    Accepted { order_id: OrderId, disposition: IpnDisposition },
    Rejected { reason: RejectReason, order_id: Option<OrderId> },
}

impl IpnResolution {
    pub fn is_accepted(&self) -> bool {
        matches!(self, IpnResolution::Accepted { .. })
    }
}
