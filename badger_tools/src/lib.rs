//! A thin client for the badger.cash services the gateway depends on: the payment-request
//! registry (`pay.badger.cash`) and the transaction index (`ecash.badger.cash`), plus construction
//! of the customer-facing bux.digital payment URL.
//!
//! The wire shapes here mirror the remote JSON exactly; mapping them into the payment engine's
//! domain objects is the caller's job.

mod api;
mod config;
mod data_objects;
mod error;

pub use api::BadgerApi;
pub use config::BadgerConfig;
pub use data_objects::{PaymentRequestResponse, SlpOutput, SlpToken, TxOutput, TxResponse};
pub use error::BadgerApiError;
