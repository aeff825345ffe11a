use badger_tools::{BadgerApi, BadgerApiError, BadgerConfig, TxResponse};
use bux_payment_engine::traits::{
    LookupError,
    OnChainTransaction,
    PaymentLookup,
    PaymentRequestRecord,
    SlpOutputInfo,
    SlpTokenInfo,
    TxOutput,
};

use crate::errors::ServerError;

/// [`PaymentLookup`] backed by the badger.cash services.
#[derive(Debug, Clone)]
pub struct BadgerLookup {
    api: BadgerApi,
}

impl BadgerLookup {
    pub fn new(config: BadgerConfig) -> Result<Self, ServerError> {
        let api = BadgerApi::new(config).map_err(|e| ServerError::InitializeError(e.to_string()))?;
        Ok(Self { api })
    }
}

impl PaymentLookup for BadgerLookup {
    async fn payment_request(&self, payment_id: &str) -> Result<PaymentRequestRecord, LookupError> {
        let response = self.api.payment_request(payment_id).await.map_err(to_lookup_error)?;
        Ok(PaymentRequestRecord {
            payment_id: response.id.clone().unwrap_or_else(|| payment_id.to_string()),
            tx_hash: response.tx_hash.clone(),
            callback_custom: response.callback_custom().map(String::from),
            paid: response.is_paid(),
        })
    }

    async fn transaction(&self, tx_hash: &str) -> Result<OnChainTransaction, LookupError> {
        let response = self.api.transaction(tx_hash).await.map_err(to_lookup_error)?;
        Ok(into_domain_tx(response))
    }
}

fn into_domain_tx(tx: TxResponse) -> OnChainTransaction {
    OnChainTransaction {
        tx_hash: tx.txid,
        token: tx.slp_token.map(|t| SlpTokenInfo { token_id: t.token_id, decimals: t.decimals }),
        outputs: tx
            .outputs
            .into_iter()
            .map(|o| TxOutput {
                address: o.address,
                slp: o.slp.map(|s| SlpOutputInfo {
                    op_type: s.op_type,
                    token_id: s.token_id,
                    value: s.value.as_u64(),
                }),
            })
            .collect(),
    }
}

fn to_lookup_error(e: BadgerApiError) -> LookupError {
    match e {
        BadgerApiError::QueryError { status, message } => LookupError::QueryError { status, message },
        BadgerApiError::JsonError(msg) => LookupError::JsonError(msg),
        other => LookupError::RequestError(other.to_string()),
    }
}
