use log::*;

use super::RejectReason;
use crate::{
    helpers::CorrelationToken,
    order_types::{Order, OrderId, OrderKey},
    traits::OrderStore,
};

/// Gate 2: match the notification back to exactly one order.
///
/// The `custom` field carries the correlation token issued at checkout; `invoice` carries the
/// prefixed invoice number. Resolution tries the order id embedded in the token first and falls
/// back to a key lookup, so notifications issued before an invoice-prefix reconfiguration still
/// land on the right order. Whatever path found the order, the stored order key must match the
/// resolved key byte for byte before the order is handed to the verifier.
pub async fn resolve_order<S: OrderStore>(
    store: &S,
    custom: Option<&str>,
    invoice: Option<&str>,
    invoice_prefix: &str,
) -> Result<Order, RejectReason> {
    let custom = custom.unwrap_or("").trim();
    let invoice = invoice.unwrap_or("").trim();
    if custom.is_empty() || invoice.is_empty() {
        return Err(RejectReason::OrderNotFound);
    }
    let (candidate_id, resolved_key) = match CorrelationToken::decode(custom) {
        CorrelationToken::Pair { order_id, order_key } => (Some(order_id), order_key),
        // the oldest requests put the bare order id in `custom` and the order key in `invoice`
        CorrelationToken::LegacyNumeric(id) => (Some(OrderId(id)), OrderKey::from(invoice)),
        // later legacy requests used the prefixed invoice number for both fields
        CorrelationToken::LegacyString(s) => {
            let id = match invoice_prefix.is_empty() {
                true => s.parse::<OrderId>().ok(),
                false => s.replacen(invoice_prefix, "", 1).parse::<OrderId>().ok(),
            };
            (id, OrderKey(s))
        },
    };
    let mut order = match candidate_id {
        Some(id) => store.fetch_order(id).await?,
        None => None,
    };
    if order.is_none() {
        debug!("📦️ Correlation token id did not resolve. Falling back to a key lookup");
        if let Some(id) = store.order_id_by_key(&resolved_key).await? {
            order = store.fetch_order(id).await?;
        }
    }
    let order = order.ok_or(RejectReason::OrderNotFound)?;
    if order.order_key != resolved_key {
        return Err(RejectReason::InvalidOrderKey);
    }
    Ok(order)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        mem_store::MemoryOrderStore,
        order_types::{CustomerInfo, OrderStatusType},
    };
    use bpg_common::TokenAmount;
    use chrono::Utc;

    fn order(id: i64, key: &str) -> Order {
        Order {
            id: OrderId(id),
            order_number: id.to_string(),
            order_key: OrderKey::from(key),
            currency: "BUX".to_string(),
            total: TokenAmount::from_whole(10),
            shipping_total: TokenAmount::default(),
            shipping_tax: TokenAmount::default(),
            total_tax: TokenAmount::default(),
            status: OrderStatusType::Pending,
            customer: CustomerInfo::default(),
            created_at: Utc::now(),
        }
    }

    async fn seeded_store() -> MemoryOrderStore {
        let store = MemoryOrderStore::default();
        store.seed_order(order(42, "wc_order_abc123")).await;
        store
    }

    #[tokio::test]
    async fn resolves_a_structured_token() {
        let store = seeded_store().await;
        let custom = CorrelationToken::encode(OrderId(42), &OrderKey::from("wc_order_abc123"));
        let order = resolve_order(&store, Some(&custom), Some("WC-42"), "WC-").await.unwrap();
        assert_eq!(order.id, OrderId(42));
    }

    #[tokio::test]
    async fn falls_back_to_key_lookup_when_the_id_is_stale() {
        let store = seeded_store().await;
        // the embedded id points nowhere, but the key still resolves
        let custom = CorrelationToken::encode(OrderId(9999), &OrderKey::from("wc_order_abc123"));
        let order = resolve_order(&store, Some(&custom), Some("WC-42"), "WC-").await.unwrap();
        assert_eq!(order.id, OrderId(42));
    }

    #[tokio::test]
    async fn rejects_a_key_mismatch() {
        let store = seeded_store().await;
        let custom = CorrelationToken::encode(OrderId(42), &OrderKey::from("wc_order_zzz999"));
        let err = resolve_order(&store, Some(&custom), Some("WC-42"), "WC-").await.unwrap_err();
        assert!(matches!(err, RejectReason::InvalidOrderKey));
    }

    #[tokio::test]
    async fn rejects_missing_fields_as_order_not_found() {
        let store = seeded_store().await;
        for (custom, invoice) in [(None, Some("WC-42")), (Some("[42,\"k\"]"), None), (Some("  "), Some("WC-42"))] {
            let err = resolve_order(&store, custom, invoice, "WC-").await.unwrap_err();
            assert!(matches!(err, RejectReason::OrderNotFound));
        }
    }

    #[tokio::test]
    async fn legacy_string_tokens_resolve_via_the_invoice_prefix() {
        let store = MemoryOrderStore::default();
        store.seed_order(order(7, "WC-7")).await;
        let order = resolve_order(&store, Some("WC-7"), Some("WC-7"), "WC-").await.unwrap();
        assert_eq!(order.id, OrderId(7));
    }

    #[tokio::test]
    async fn unknown_order_is_not_found() {
        let store = seeded_store().await;
        let custom = CorrelationToken::encode(OrderId(9999), &OrderKey::from("no_such_key"));
        let err = resolve_order(&store, Some(&custom), Some("WC-9999"), "WC-").await.unwrap_err();
        assert!(matches!(err, RejectReason::OrderNotFound));
    }
}
