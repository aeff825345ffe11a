//! BUX Payment Engine
//!
//! The BUX payment engine bridges a merchant's order ledger to the BUX token payment network. It
//! contains the core logic for generating outbound payment requests and for verifying, exactly
//! once, that an order has been paid when an asynchronous payment notification (IPN) arrives.
//!
//! The library is divided into three main sections:
//! 1. The trait seams to the gateway's external collaborators ([`mod@traits`]): the order store,
//!    the payment-request/transaction lookup service, and outbound mail delivery. The engine never
//!    talks to any of these directly; concrete backends implement the traits. A reference
//!    in-memory order store ([`MemoryOrderStore`]) is included for tests and demo deployments.
//! 2. The checkout flow ([`CheckoutApi`]), which builds the payment request a customer is
//!    redirected with. It defines the contract — amounts, correlation token, callback URL — that
//!    the verification flow later has to satisfy.
//! 3. The IPN flow ([`IpnFlowApi`]), the heart of the engine: it authenticates an inbound
//!    notification, resolves it to an order, confirms on-chain proof of payment, and applies the
//!    resulting state transition to the order exactly once.
//!
//! Every failure along the IPN path collapses to a single externally observable "rejected"
//! outcome; the distinct reasons exist only for the audit trail and the diagnostic report mail.

pub mod config;
pub mod helpers;
pub mod order_types;
pub mod traits;

mod checkout;
mod ipn;
mod mem_store;

pub use checkout::{CheckoutApi, CheckoutError, PaymentRequestArgs, ShippingInfo};
pub use ipn::{
    authenticate,
    resolve_order,
    verify_transaction,
    FailureKind,
    InboundNotification,
    IpnDisposition,
    IpnFlowApi,
    IpnResolution,
    RejectReason,
    VerificationOutcome,
};
pub use mem_store::{MemoryOrderStore, OrderNote};
