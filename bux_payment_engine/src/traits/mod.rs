//! Interface contracts to the gateway's external collaborators.
//!
//! The payment engine owns none of the systems it coordinates. Orders live in the merchant's
//! e-commerce platform, proof of payment lives on the token network (reached via an HTTP lookup
//! service), and mail delivery belongs to whatever the deployment has wired up. This module
//! defines the seams:
//!
//! * [`OrderStore`] is the order ledger interface: reading orders, requesting status transitions,
//!   and recording audit metadata. Its `try_mark_payment_complete` method is the idempotency gate
//!   for the whole engine and must be implemented as an atomic test-and-set.
//! * [`PaymentLookup`] is the black-box request/response dependency for resolving a claimed
//!   payment-request id to its blockchain transaction. Calls are single-attempt; the engine never
//!   retries, because the notification sender is expected to redeliver.
//! * [`MailSender`] delivers diagnostic reports and cancellation notices. Delivery failures are a
//!   logging concern, never a flow-control concern.

mod mailer;
mod order_store;
mod payment_lookup;

pub use mailer::MailSender;
pub use order_store::{OrderStore, OrderStoreError};
pub use payment_lookup::{
    LookupError,
    OnChainTransaction,
    PaymentLookup,
    PaymentRequestRecord,
    SlpOutputInfo,
    SlpTokenInfo,
    TxOutput,
    SLP_SEND,
};
