use bpg_common::TokenAmount;
use log::*;
use thiserror::Error;

use crate::{
    config::{MerchantConfig, TotalMode},
    helpers::{clean_phone, CorrelationToken},
    order_types::{meta_keys, Order, OrderId, OrderStatusType},
    traits::{OrderStore, OrderStoreError},
};

/// Builds the payment request a customer is redirected with. This is the contract the
/// verification flow later has to satisfy: the correlation token issued here is what an inbound
/// notification is resolved and key-checked against.
#[derive(Debug, Clone)]
pub struct CheckoutApi<S> {
    store: S,
    config: MerchantConfig,
}

#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("Could not find order {0}")]
    OrderNotFound(OrderId),
    #[error("The order store failed while building the payment request. {0}")]
    StoreError(#[from] OrderStoreError),
}

impl<S: OrderStore> CheckoutApi<S> {
    pub fn new(store: S, config: MerchantConfig) -> Self {
        Self { store, config }
    }

    /// Build the payment request for `order_id`. As a side effect, an order that has not already
    /// been paid is moved to pending while the customer is away at the payment network.
    pub async fn payment_request_for_order(
        &self,
        order_id: OrderId,
        success_url: &str,
        cancel_url: &str,
    ) -> Result<PaymentRequestArgs, CheckoutError> {
        let order = self.store.fetch_order(order_id).await?.ok_or(CheckoutError::OrderNotFound(order_id))?;
        let flag = self.store.fetch_meta(order_id, meta_keys::PAYMENT_COMPLETE).await?;
        if order.status != OrderStatusType::Completed && flag.as_deref() != Some(meta_keys::PAYMENT_COMPLETE_VALUE) {
            self.store
                .update_status(order_id, OrderStatusType::Pending, "Customer is being redirected to BUX...")
                .await?;
        }
        let args = self.build_args(&order, success_url, cancel_url);
        debug!("💻️ Built payment request for order {order_id}, invoice {}", args.invoice);
        Ok(args)
    }

    fn build_args(&self, order: &Order, success_url: &str, cancel_url: &str) -> PaymentRequestArgs {
        let (amount, shipping, tax) = split_total(self.config.total_mode, order);
        let mut phone = order.customer.phone.clone();
        if matches!(order.customer.country.as_str(), "US" | "CA") {
            phone = clean_phone(&phone);
        }
        let shipping_info = self.config.send_shipping.then(|| ShippingInfo {
            company: order.customer.company.clone(),
            address1: order.customer.address1.clone(),
            address2: order.customer.address2.clone(),
            city: order.customer.city.clone(),
            state: order.customer.state.clone(),
            zip: order.customer.postcode.clone(),
            country: order.customer.country.clone(),
            phone,
        });
        PaymentRequestArgs {
            merchant_name: self.config.merchant_name.clone(),
            merchant_address: self.config.merchant_address.clone(),
            currency: order.currency.clone(),
            success_url: success_url.to_string(),
            cancel_url: cancel_url.to_string(),
            invoice: format!("{}{}", self.config.invoice_prefix, order.order_number),
            order_key: order.order_key.to_string(),
            custom: CorrelationToken::encode(order.id, &order.order_key),
            ipn_url: self.config.ipn_url.clone(),
            first_name: order.customer.first_name.clone(),
            last_name: order.customer.last_name.clone(),
            email: order.customer.email.clone(),
            shipping_info,
            item_name: format!("Order {}", order.order_number),
            amount,
            shipping,
            tax,
        }
    }
}

/// Split the order total into the amount/shipping/tax lines for the given mode. The three lines
/// always sum back to the order total exactly, in 4-decimal fixed point.
fn split_total(mode: TotalMode, order: &Order) -> (TokenAmount, TokenAmount, TokenAmount) {
    match mode {
        TotalMode::Simple => (order.total, TokenAmount::default(), TokenAmount::default()),
        TotalMode::TaxInclusive => (
            order.total - order.shipping_total - order.shipping_tax,
            order.shipping_total + order.shipping_tax,
            TokenAmount::default(),
        ),
        TotalMode::TaxExclusive => {
            (order.total - order.shipping_total - order.total_tax, order.shipping_total, order.total_tax)
        },
    }
}

//--------------------------------------  PaymentRequestArgs  --------------------------------------------------------
/// One checkout attempt, ready to be turned into the payment URL. Built once per checkout and
/// never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequestArgs {
    pub merchant_name: String,
    pub merchant_address: String,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    pub invoice: String,
    pub order_key: String,
    /// The serialized correlation token echoed back on the IPN callback.
    pub custom: String,
    pub ipn_url: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Billing/shipping block, present iff the merchant forwards shipping details.
    pub shipping_info: Option<ShippingInfo>,
    pub item_name: String,
    pub amount: TokenAmount,
    pub shipping: TokenAmount,
    pub tax: TokenAmount,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShippingInfo {
    pub company: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub phone: String,
}

impl PaymentRequestArgs {
    /// The ordered key/value pairs for the payment URL. Key names and ordering are part of the
    /// wire contract with the payment network.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("cmd", "_pay_auto".to_string()),
            ("merchant_name", self.merchant_name.clone()),
            ("merchant_addr", self.merchant_address.clone()),
            ("allow_extra", "0".to_string()),
            ("currency", self.currency.clone()),
            ("reset", "1".to_string()),
            ("success_url", self.success_url.clone()),
            ("cancel_url", self.cancel_url.clone()),
            ("invoice", self.invoice.clone()),
            ("order_key", self.order_key.clone()),
            ("custom", self.custom.clone()),
            ("ipn_url", self.ipn_url.clone()),
            ("first_name", self.first_name.clone()),
            ("last_name", self.last_name.clone()),
            ("email", self.email.clone()),
        ];
        match &self.shipping_info {
            Some(info) => {
                pairs.push(("want_shipping", "1".to_string()));
                pairs.push(("company", info.company.clone()));
                pairs.push(("address1", info.address1.clone()));
                pairs.push(("address2", info.address2.clone()));
                pairs.push(("city", info.city.clone()));
                pairs.push(("state", info.state.clone()));
                pairs.push(("zip", info.zip.clone()));
                pairs.push(("country", info.country.clone()));
                pairs.push(("phone", info.phone.clone()));
            },
            None => pairs.push(("want_shipping", "0".to_string())),
        }
        pairs.push(("item_name", self.item_name.clone()));
        pairs.push(("quantity", "1".to_string()));
        pairs.push(("amount", self.amount.to_string()));
        pairs.push(("tax", self.tax.to_string()));
        pairs.push(("shipping", self.shipping.to_string()));
        pairs
    }
}
