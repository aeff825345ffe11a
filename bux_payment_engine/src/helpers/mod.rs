//! Small, pure helpers used across the checkout and IPN flows.

mod address;
mod correlation;
mod phone;

pub use address::address_stem;
pub use correlation::CorrelationToken;
pub use phone::clean_phone;
