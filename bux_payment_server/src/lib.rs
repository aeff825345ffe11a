//! The BUX payment gateway server.
//!
//! A thin actix-web shell around [`bux_payment_engine`]: it exposes the IPN endpoint the payment
//! network calls back to, and the checkout endpoint that hands a customer the bux.digital payment
//! URL. All verification logic lives in the engine; the server only does transport, configuration
//! and wiring of the concrete backends (the in-memory order store, the badger.cash lookup client
//! and the log-based mailer).

pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod mailer;
pub mod routes;
pub mod server;
