use serde::{Deserialize, Serialize};

/// Body of a `POST /checkout/{order_id}` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutParams {
    /// Where the payment network sends the customer after a successful payment.
    pub success_url: String,
    /// Where the customer lands if they abandon the payment.
    pub cancel_url: String,
}

/// Response to a checkout request: the URL to redirect the customer to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub result: String,
    pub redirect: String,
}

impl CheckoutResponse {
    pub fn success(redirect: impl Into<String>) -> Self {
        Self { result: "success".to_string(), redirect: redirect.into() }
    }
}
