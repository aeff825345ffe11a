//! End-to-end tests of the IPN flow against the in-memory order store.

mod support;

use bux_payment_engine::{
    order_types::{meta_keys, OrderId, OrderStatusType},
    FailureKind,
    IpnDisposition,
    IpnFlowApi,
    IpnResolution,
    MemoryOrderStore,
    RejectReason,
};
use support::*;

async fn engine_for(
    order_id: i64,
    total: &str,
    lookup: StaticLookup,
) -> (IpnFlowApi<MemoryOrderStore, StaticLookup, RecordingMailer>, MemoryOrderStore, RecordingMailer) {
    let store = MemoryOrderStore::default();
    store.seed_order(sample_order(order_id, total)).await;
    let mailer = RecordingMailer::default();
    let api = IpnFlowApi::new(store.clone(), lookup, mailer.clone(), merchant_config());
    (api, store, mailer)
}

#[tokio::test]
async fn a_fully_paid_order_is_completed_with_audit_metadata() {
    let lookup = StaticLookup::for_settlement(42, settlement_tx(100_000, 4));
    let (api, store, mailer) = engine_for(42, "10.0000", lookup).await;

    let resolution = api.process_ipn(Some(paid_notification(42, "10.0000"))).await;

    assert!(matches!(resolution, IpnResolution::Accepted { order_id: OrderId(42), disposition: IpnDisposition::Completed }));
    let order = store.order_snapshot(OrderId(42)).await.unwrap();
    assert_eq!(order.status, OrderStatusType::Completed);
    assert_eq!(store.meta_value(OrderId(42), meta_keys::PAYMENT_COMPLETE).await.as_deref(), Some("Yes"));
    assert_eq!(store.meta_value(OrderId(42), meta_keys::TRANSACTION_ID).await, Some(tx_hash()));
    assert_eq!(store.meta_value(OrderId(42), meta_keys::PAYER_FIRST_NAME).await.as_deref(), Some("Ada"));
    assert_eq!(store.meta_value(OrderId(42), meta_keys::PAYER_EMAIL).await.as_deref(), Some("ada@example.com"));
    assert!(mailer.sent().is_empty(), "a clean completion sends no mail");
}

#[tokio::test]
async fn redelivery_of_a_completed_payment_is_acknowledged_once() {
    let lookup = StaticLookup::for_settlement(42, settlement_tx(100_000, 4));
    let (api, store, _) = engine_for(42, "10.0000", lookup).await;

    let first = api.process_ipn(Some(paid_notification(42, "10.0000"))).await;
    let second = api.process_ipn(Some(paid_notification(42, "10.0000"))).await;

    assert!(matches!(first, IpnResolution::Accepted { disposition: IpnDisposition::Completed, .. }));
    assert!(matches!(second, IpnResolution::Accepted { disposition: IpnDisposition::AlreadyComplete, .. }));
    // exactly one completion transition in the activity log
    let completions = store
        .notes(OrderId(42))
        .await
        .iter()
        .filter(|n| n.note.contains("received in full"))
        .count();
    assert_eq!(completions, 1);
}

#[tokio::test]
async fn currency_mismatch_puts_the_order_on_hold() {
    let lookup = StaticLookup::for_settlement(42, settlement_tx(100_000, 4));
    let (api, store, mailer) = engine_for(42, "10.0000", lookup).await;

    let mut ipn = paid_notification(42, "10.0000");
    ipn.currency1 = Some("USD".to_string());
    ipn.extra.insert("net".to_string(), "XEC".to_string());
    let resolution = api.process_ipn(Some(ipn)).await;

    match resolution {
        IpnResolution::Rejected { reason: RejectReason::CurrencyMismatch { .. }, order_id } => {
            assert_eq!(order_id, Some(OrderId(42)));
        },
        other => panic!("expected a currency mismatch, got {other:?}"),
    }
    let order = store.order_snapshot(OrderId(42)).await.unwrap();
    assert_eq!(order.status, OrderStatusType::OnHold);
    let report = &mailer.sent()[0];
    assert_eq!(report.subject, "BUX.digital Invalid IPN");
    assert!(report.body.contains("Original currency doesn't match!"));
    assert!(report.body.contains("currency1=USD"));
    // fields the gateway does not recognise still reach the report
    assert!(report.body.contains("net=XEC"));
}

#[tokio::test]
async fn payment_one_unit_short_is_insufficient() {
    // 9.9999 paid against a 10.0000 order
    let lookup = StaticLookup::for_settlement(42, settlement_tx(99_999, 4));
    let (api, store, _) = engine_for(42, "10.0000", lookup).await;

    let resolution = api.process_ipn(Some(paid_notification(42, "10.0000"))).await;

    assert!(matches!(resolution, IpnResolution::Rejected { reason: RejectReason::InsufficientAmount { .. }, .. }));
    assert_eq!(store.order_snapshot(OrderId(42)).await.unwrap().status, OrderStatusType::OnHold);
}

#[tokio::test]
async fn six_decimal_settlement_covers_the_order() {
    // 100000000 base units at 6 decimals is 100.0 tokens against a 10.0 order
    let lookup = StaticLookup::for_settlement(42, settlement_tx(100_000_000, 6));
    let (api, store, _) = engine_for(42, "10.0000", lookup).await;

    let resolution = api.process_ipn(Some(paid_notification(42, "10.0000"))).await;

    assert!(matches!(resolution, IpnResolution::Accepted { disposition: IpnDisposition::Completed, .. }));
    assert_eq!(store.order_snapshot(OrderId(42)).await.unwrap().status, OrderStatusType::Completed);
}

#[tokio::test]
async fn wrong_merchant_address_is_rejected_without_touching_the_order() {
    let lookup = StaticLookup::for_settlement(42, settlement_tx(100_000, 4));
    let (api, store, mailer) = engine_for(42, "10.0000", lookup.clone()).await;

    let mut ipn = paid_notification(42, "10.0000");
    ipn.merchant = Some("ecash:qqsomeoneelse0000000000000".to_string());
    let resolution = api.process_ipn(Some(ipn)).await;

    match resolution {
        IpnResolution::Rejected { reason, order_id: None } => {
            assert_eq!(reason.kind(), FailureKind::Authentication);
        },
        other => panic!("expected an authentication failure, got {other:?}"),
    }
    // the order was never resolved, so it stays pending and no lookups were made
    assert_eq!(store.order_snapshot(OrderId(42)).await.unwrap().status, OrderStatusType::Pending);
    assert_eq!(lookup.call_count(), 0);
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn negative_status_cancels_the_order_and_notifies_the_merchant() {
    let lookup = StaticLookup::for_settlement(42, settlement_tx(100_000, 4));
    let (api, store, mailer) = engine_for(42, "10.0000", lookup).await;

    let mut ipn = paid_notification(42, "10.0000");
    ipn.status = Some("-1".to_string());
    ipn.status_text = Some("Payment timed out".to_string());
    let resolution = api.process_ipn(Some(ipn)).await;

    assert!(matches!(resolution, IpnResolution::Accepted { disposition: IpnDisposition::Cancelled, .. }));
    assert_eq!(store.order_snapshot(OrderId(42)).await.unwrap().status, OrderStatusType::Cancelled);
    assert!(store.meta_value(OrderId(42), meta_keys::PAYMENT_COMPLETE).await.is_none());
    let mail = &mailer.sent()[0];
    assert_eq!(mail.to, "admin@example.com");
    assert_eq!(mail.subject, "Payment for order 42 cancelled/timed out");
}

#[tokio::test]
async fn zero_conf_completion_requires_a_confirmed_covering_delivery() {
    let lookup = StaticLookup::for_settlement(42, settlement_tx(100_000, 4));
    let (api, _, _) = engine_for(42, "10.0000", lookup).await;

    let mut ipn = paid_notification(42, "10.0000");
    ipn.status = Some("1".to_string());
    ipn.received_confirms = Some("1".to_string());
    ipn.received_amount = Some("10.0000".to_string());
    ipn.amount2 = Some("10.0000".to_string());
    let resolution = api.process_ipn(Some(ipn)).await;
    assert!(matches!(resolution, IpnResolution::Accepted { disposition: IpnDisposition::Completed, .. }));
}

#[tokio::test]
async fn unconfirmed_in_flight_payment_stays_pending() {
    let lookup = StaticLookup::for_settlement(42, settlement_tx(100_000, 4));
    let (api, store, _) = engine_for(42, "10.0000", lookup).await;

    let mut ipn = paid_notification(42, "10.0000");
    ipn.status = Some("1".to_string());
    ipn.received_confirms = Some("0".to_string());
    let resolution = api.process_ipn(Some(ipn)).await;

    assert!(matches!(resolution, IpnResolution::Accepted { disposition: IpnDisposition::Pending, .. }));
    let notes = store.notes(OrderId(42)).await;
    assert!(notes.iter().any(|n| n.note.starts_with("BUX payment pending:")));
    assert!(store.meta_value(OrderId(42), meta_keys::PAYMENT_COMPLETE).await.is_none());
}

#[tokio::test]
async fn an_empty_body_is_rejected_outright() {
    let lookup = StaticLookup::default();
    let (api, _, mailer) = engine_for(42, "10.0000", lookup).await;

    let resolution = api.process_ipn(None).await;

    assert!(matches!(resolution, IpnResolution::Rejected { reason: RejectReason::EmptyRequestBody, order_id: None }));
    assert!(mailer.sent()[0].body.starts_with("Error Message: Error reading POST data"));
}

#[tokio::test]
async fn debug_email_receives_a_copy_of_the_report() {
    let lookup = StaticLookup::default();
    let store = MemoryOrderStore::default();
    store.seed_order(sample_order(42, "10.0000")).await;
    let mailer = RecordingMailer::default();
    let mut config = merchant_config();
    config.debug_email = Some("dev@example.com".to_string());
    let api = IpnFlowApi::new(store, lookup, mailer.clone(), config);

    api.process_ipn(None).await;

    let recipients: Vec<String> = mailer.sent().iter().map(|m| m.to.clone()).collect();
    assert_eq!(recipients, vec!["dev@example.com".to_string(), "admin@example.com".to_string()]);
}
