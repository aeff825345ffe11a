use serde_json::json;

use crate::order_types::{OrderId, OrderKey};

/// The opaque correlation token round-tripped through the payment network so that an inbound
/// notification can be matched back to its order.
///
/// New payment requests always encode the structured pair. Decoding additionally accepts the two
/// legacy shapes older requests were issued with, so in-flight notifications keep resolving across
/// an upgrade. The decode order is fixed: a structured pair can never be mistaken for a number or
/// a plain string, so it is recognised first; a purely numeric token is the oldest legacy form;
/// anything else is treated as a legacy string token (the prefixed invoice number).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrelationToken {
    Pair { order_id: OrderId, order_key: OrderKey },
    LegacyNumeric(i64),
    LegacyString(String),
}

impl CorrelationToken {
    /// Serialize the (order id, order key) pair for a new payment request. `decode` of the result
    /// always yields `Pair` with the same values.
    pub fn encode(order_id: OrderId, order_key: &OrderKey) -> String {
        json!([order_id.as_i64(), order_key.as_str()]).to_string()
    }

    pub fn decode(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok((id, key)) = serde_json::from_str::<(i64, String)>(raw) {
            return Self::Pair { order_id: OrderId(id), order_key: OrderKey(key) };
        }
        if let Ok(id) = raw.parse::<i64>() {
            return Self::LegacyNumeric(id);
        }
        Self::LegacyString(raw.to_string())
    }
}
