//! The IPN verification flow.
//!
//! An inbound payment notification passes through four gates, in order:
//! authentication ([`authenticate`]) → order resolution ([`resolve_order`]) → on-chain
//! verification ([`verify_transaction`]) → the state transition engine ([`IpnFlowApi`]), which
//! applies the outcome to the order exactly once and owns the rejection side effects (on-hold
//! transition plus diagnostic report mail).

mod authenticator;
mod flow_api;
mod notification;
mod outcome;
mod resolver;
mod verifier;

pub use authenticator::authenticate;
pub use flow_api::IpnFlowApi;
pub use notification::InboundNotification;
pub use outcome::{FailureKind, IpnDisposition, IpnResolution, RejectReason, VerificationOutcome};
pub use resolver::resolve_order;
pub use verifier::verify_transaction;
