use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use bpg_common::TokenAmount;
use bux_payment_engine::{
    config::{MerchantConfig, BUX_TOKEN_ID},
    helpers::CorrelationToken,
    order_types::{CustomerInfo, Order, OrderId, OrderKey, OrderStatusType},
    traits::{
        LookupError,
        MailSender,
        OnChainTransaction,
        PaymentLookup,
        PaymentRequestRecord,
        SlpOutputInfo,
        SlpTokenInfo,
        TxOutput,
        SLP_SEND,
    },
    InboundNotification,
};
use chrono::Utc;

pub const MERCHANT: &str = "ecash:qq1234567890abcdefghij";
pub const ORDER_KEY: &str = "wc_order_abc123";
pub const PAYMENT_ID: &str = "pr-1";

pub fn tx_hash() -> String {
    "f00d".repeat(16)
}

pub fn sample_order(id: i64, total: &str) -> Order {
    Order {
        id: OrderId(id),
        order_number: id.to_string(),
        order_key: OrderKey::from(ORDER_KEY),
        currency: "BUX".to_string(),
        total: total.parse().unwrap(),
        shipping_total: TokenAmount::default(),
        shipping_tax: TokenAmount::default(),
        total_tax: TokenAmount::default(),
        status: OrderStatusType::Pending,
        customer: CustomerInfo::default(),
        created_at: Utc::now(),
    }
}

pub fn merchant_config() -> MerchantConfig {
    MerchantConfig {
        merchant_name: "Test Shop".to_string(),
        merchant_address: MERCHANT.to_string(),
        admin_email: "admin@example.com".to_string(),
        ..Default::default()
    }
}

/// A notification that should verify against [`sample_order`] and a matching settlement
/// transaction, with the network's definitive "paid" status code.
pub fn paid_notification(order_id: i64, amount: &str) -> InboundNotification {
    InboundNotification {
        merchant: Some(MERCHANT.to_string()),
        invoice: Some(format!("WC-{order_id}")),
        custom: Some(CorrelationToken::encode(OrderId(order_id), &OrderKey::from(ORDER_KEY))),
        currency1: Some("BUX".to_string()),
        amount1: Some(amount.to_string()),
        payment_id: Some(PAYMENT_ID.to_string()),
        status: Some("100".to_string()),
        status_text: Some("Payment complete".to_string()),
        txn_id: Some(tx_hash()),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        email: Some("ada@example.com".to_string()),
        ..Default::default()
    }
}

/// A settlement transaction paying `value` base units (at `decimals`) of BUX to the merchant.
pub fn settlement_tx(value: u64, decimals: u32) -> OnChainTransaction {
    OnChainTransaction {
        tx_hash: tx_hash(),
        token: Some(SlpTokenInfo { token_id: BUX_TOKEN_ID.to_string(), decimals }),
        outputs: vec![
            TxOutput { address: "ecash:qqchange000000000000000000".to_string(), slp: None },
            TxOutput {
                address: MERCHANT.to_string(),
                slp: Some(SlpOutputInfo { op_type: SLP_SEND.to_string(), token_id: BUX_TOKEN_ID.to_string(), value }),
            },
        ],
    }
}

//--------------------------------------     StaticLookup    ---------------------------------------------------------
/// A [`PaymentLookup`] with canned responses and a call counter, standing in for the remote
/// badger.cash services.
#[derive(Debug, Clone, Default)]
pub struct StaticLookup {
    requests: HashMap<String, PaymentRequestRecord>,
    transactions: HashMap<String, OnChainTransaction>,
    pub calls: Arc<Mutex<usize>>,
}

impl StaticLookup {
    /// A lookup wired up so that [`paid_notification`] for `order_id` verifies against `tx`.
    pub fn for_settlement(order_id: i64, tx: OnChainTransaction) -> Self {
        let mut lookup = Self::default();
        lookup.requests.insert(PAYMENT_ID.to_string(), PaymentRequestRecord {
            payment_id: PAYMENT_ID.to_string(),
            tx_hash: Some(tx.tx_hash.clone()),
            callback_custom: Some(CorrelationToken::encode(OrderId(order_id), &OrderKey::from(ORDER_KEY))),
            paid: true,
        });
        lookup.transactions.insert(tx.tx_hash.clone(), tx);
        lookup
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl PaymentLookup for StaticLookup {
    async fn payment_request(&self, payment_id: &str) -> Result<PaymentRequestRecord, LookupError> {
        *self.calls.lock().unwrap() += 1;
        self.requests
            .get(payment_id)
            .cloned()
            .ok_or(LookupError::QueryError { status: 404, message: "payment request not found".to_string() })
    }

    async fn transaction(&self, tx_hash: &str) -> Result<OnChainTransaction, LookupError> {
        *self.calls.lock().unwrap() += 1;
        self.transactions
            .get(tx_hash)
            .cloned()
            .ok_or(LookupError::QueryError { status: 404, message: "transaction not found".to_string() })
    }
}

//--------------------------------------    RecordingMailer   --------------------------------------------------------
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// A [`MailSender`] that captures outbound mail for assertions.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<Mutex<Vec<SentMail>>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl MailSender for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
    }
}
