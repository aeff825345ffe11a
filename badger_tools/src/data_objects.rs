use serde::{Deserialize, Serialize};

//--------------------------------------  PaymentRequestResponse  ----------------------------------------------------
/// The payment-request registry's record of one invoice, as returned by `pay.badger.cash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequestResponse {
    /// The payment-request id.
    pub id: Option<String>,
    /// Hash of the settlement transaction, present once the request has been paid.
    pub tx_hash: Option<String>,
    /// Not all historical records carry the explicit flag; absence means "infer from txHash".
    pub paid: Option<bool>,
    pub callback: Option<Callback>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Callback {
    pub ipn_body: Option<IpnBody>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpnBody {
    /// The correlation value echoed back on the IPN callback.
    pub custom: Option<String>,
}

impl PaymentRequestResponse {
    /// The callback's correlation value, if the record carries one.
    pub fn callback_custom(&self) -> Option<&str> {
        self.callback.as_ref()?.ipn_body.as_ref()?.custom.as_deref()
    }

    pub fn is_paid(&self) -> bool {
        self.paid.unwrap_or(self.tx_hash.is_some())
    }
}

//--------------------------------------      TxResponse     ---------------------------------------------------------
/// A transaction as returned by the `ecash.badger.cash` index with `slp=true`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxResponse {
    pub txid: String,
    #[serde(default)]
    pub outputs: Vec<TxOutput>,
    pub slp_token: Option<SlpToken>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlpToken {
    pub token_id: String,
    pub decimals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutput {
    #[serde(default)]
    pub address: String,
    pub slp: Option<SlpOutput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlpOutput {
    #[serde(rename = "type")]
    pub op_type: String,
    pub token_id: String,
    /// The index serves values as JSON numbers or strings depending on magnitude.
    pub value: SlpValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlpValue {
    Num(u64),
    Str(String),
}

impl SlpValue {
    /// The value in base units; an unparseable string reads as 0 rather than failing the whole
    /// transaction fetch.
    pub fn as_u64(&self) -> u64 {
        match self {
            SlpValue::Num(v) => *v,
            SlpValue::Str(s) => s.parse().unwrap_or_default(),
        }
    }
}
