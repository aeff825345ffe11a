use log::*;

use super::{InboundNotification, RejectReason, VerificationOutcome};
use crate::{
    config::MerchantConfig,
    helpers::{address_stem, CorrelationToken},
    order_types::Order,
    traits::{PaymentLookup, SLP_SEND},
};

/// Gate 3: prove the payment on-chain.
///
/// Nothing the notification claims is trusted directly. The claims are only used to fail fast
/// before the remote lookups; the amount that counts is the token value actually paid to the
/// merchant address in the settlement transaction named by the payment request record. The checks
/// run strictly in order and the first failure is terminal.
pub async fn verify_transaction<L: PaymentLookup>(
    lookup: &L,
    config: &MerchantConfig,
    order: &Order,
    ipn: &InboundNotification,
) -> VerificationOutcome {
    use VerificationOutcome::Rejected;
    // 1. the claimed currency must match the order before any remote call is made
    let claimed_currency = ipn.currency1.as_deref().unwrap_or("");
    if claimed_currency != order.currency {
        return Rejected(RejectReason::CurrencyMismatch {
            expected: order.currency.clone(),
            claimed: claimed_currency.to_string(),
        });
    }
    // 2. a claim below the order total cannot possibly verify
    match ipn.amount_claim() {
        Some(claimed) if claimed >= order.total => {},
        _ => return Rejected(RejectReason::AmountTooLow),
    }
    // 3-4. the payment request record is the bridge from the notification to the ledger
    let payment_id = ipn.payment_id.as_deref().unwrap_or("").trim();
    if payment_id.is_empty() {
        return Rejected(RejectReason::MissingPaymentId);
    }
    let record = match lookup.payment_request(payment_id).await {
        Ok(record) => record,
        Err(e) => return Rejected(RejectReason::PaymentRequestLookup(e)),
    };
    let (tx_hash, callback) = match (&record.tx_hash, &record.callback_custom, record.paid) {
        (Some(tx_hash), Some(callback), true) => (tx_hash.clone(), callback.clone()),
        _ => return Rejected(RejectReason::IncompletePaymentRequest),
    };
    // 5. the request must have been issued for this order
    if !callback_matches_order(&callback, order) {
        return Rejected(RejectReason::CallbackKeyMismatch);
    }
    // 6. fetch the settlement transaction itself
    let tx = match lookup.transaction(&tx_hash).await {
        Ok(tx) => tx,
        Err(e) => return Rejected(RejectReason::TransactionLookup(e)),
    };
    // 7. it must move the configured token and no other
    match &tx.token {
        Some(token) if token.token_id == config.token_id => {},
        _ => return Rejected(RejectReason::NotATokenTransaction { tx_hash }),
    }
    let decimals = tx.token.as_ref().map(|t| t.decimals).unwrap_or_default();
    // 8. sum the token value actually sent to the merchant address
    let merchant_stem = address_stem(&config.merchant_address);
    let mut base_units: u64 = 0;
    for output in &tx.outputs {
        let Some(slp) = &output.slp else { continue };
        if slp.op_type == SLP_SEND && slp.token_id == config.token_id && address_stem(&output.address) == merchant_stem
        {
            base_units = match base_units.checked_add(slp.value) {
                Some(sum) => sum,
                None => return Rejected(RejectReason::UnrepresentableValue { tx_hash }),
            };
        }
    }
    let received = match bpg_common::TokenAmount::from_base_units(base_units, decimals) {
        Ok(amount) => amount,
        Err(e) => {
            warn!("🚨️ Token value in TXID {tx_hash} cannot be scaled: {e}");
            return Rejected(RejectReason::UnrepresentableValue { tx_hash });
        },
    };
    // 9. the on-chain amount is the verdict
    if received >= order.total {
        debug!("💻️ TXID {tx_hash} pays {received} to the merchant address, covering order {}", order.id);
        VerificationOutcome::Verified(received)
    } else {
        Rejected(RejectReason::InsufficientAmount { tx_hash })
    }
}

/// The callback echo recorded against the payment request must identify this order. New requests
/// embed the structured correlation token; the bare order key is accepted for requests issued
/// before the token carried the order id.
fn callback_matches_order(callback: &str, order: &Order) -> bool {
    if callback == order.order_key.as_str() {
        return true;
    }
    matches!(
        CorrelationToken::decode(callback),
        CorrelationToken::Pair { order_id, order_key } if order_id == order.id && order_key == order.order_key
    )
}
