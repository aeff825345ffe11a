use std::collections::BTreeMap;

use bpg_common::TokenAmount;
use serde::{Deserialize, Serialize};

/// The untrusted payload received from the payment network.
///
/// Every field is optional and arrives as a string; nothing here may be believed until the
/// notification has passed authentication and the on-chain checks. The struct lives for exactly
/// one verification cycle and is never retried by the gateway itself.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InboundNotification {
    /// The merchant address the sender claims this notification is for.
    pub merchant: Option<String>,
    pub invoice: Option<String>,
    /// The correlation token, as issued by the checkout flow.
    pub custom: Option<String>,
    pub currency1: Option<String>,
    pub amount1: Option<String>,
    pub payment_id: Option<String>,
    pub status: Option<String>,
    pub status_text: Option<String>,
    pub txn_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub received_confirms: Option<String>,
    pub received_amount: Option<String>,
    pub amount2: Option<String>,
    /// Any fields the sender posted that the gateway does not recognise. They take no part in
    /// verification but are preserved for the diagnostic report.
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl InboundNotification {
    /// The numeric status code. A missing or garbled status reads as 0 (pending).
    pub fn status_code(&self) -> i64 {
        self.status.as_deref().and_then(|s| s.trim().parse().ok()).unwrap_or(0)
    }

    /// The confirmation count reported for the payment. Missing or garbled reads as 0.
    pub fn confirmations(&self) -> i64 {
        self.received_confirms.as_deref().and_then(|s| s.trim().parse().ok()).unwrap_or(0)
    }

    /// The amount the notification claims was paid (`amount1`).
    pub fn amount_claim(&self) -> Option<TokenAmount> {
        self.amount1.as_deref().and_then(|s| s.parse().ok())
    }

    /// The amount the network reports as actually received so far (`received_amount`).
    pub fn received_claim(&self) -> Option<TokenAmount> {
        self.received_amount.as_deref().and_then(|s| s.parse().ok())
    }

    /// The amount the network expects for full payment (`amount2`).
    pub fn expected_claim(&self) -> Option<TokenAmount> {
        self.amount2.as_deref().and_then(|s| s.parse().ok())
    }

    pub fn status_text(&self) -> String {
        sanitized(self.status_text.as_deref().unwrap_or(""))
    }

    /// Render the full `key=value` field dump included in diagnostic report mails. Only fields
    /// that were actually present are listed, in wire order, followed by any unrecognised fields
    /// in key order.
    pub fn field_dump(&self) -> String {
        let fields: [(&str, &Option<String>); 15] = [
            ("merchant", &self.merchant),
            ("invoice", &self.invoice),
            ("custom", &self.custom),
            ("currency1", &self.currency1),
            ("amount1", &self.amount1),
            ("payment_id", &self.payment_id),
            ("status", &self.status),
            ("status_text", &self.status_text),
            ("txn_id", &self.txn_id),
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("received_confirms", &self.received_confirms),
            ("received_amount", &self.received_amount),
            ("amount2", &self.amount2),
        ];
        let mut dump = String::new();
        let known = fields.into_iter().filter_map(|(k, v)| v.as_deref().map(|v| (k, v)));
        let unknown = self.extra.iter().map(|(k, v)| (k.as_str(), v.as_str()));
        for (key, value) in known.chain(unknown) {
            dump.push_str(&sanitized(key));
            dump.push('=');
            dump.push_str(&sanitized(value));
            dump.push('\n');
        }
        dump
    }
}

/// Collapse control characters so an attacker-supplied field cannot forge extra report lines or
/// log entries.
fn sanitized(value: &str) -> String {
    value.chars().map(|c| if c.is_control() { ' ' } else { c }).collect::<String>().trim().to_string()
}
