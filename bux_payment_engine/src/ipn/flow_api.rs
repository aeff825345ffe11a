use std::fmt::Debug;

use bpg_common::TokenAmount;
use log::*;

use super::{
    authenticate, resolve_order, verify_transaction, InboundNotification, IpnDisposition, IpnResolution, RejectReason,
    VerificationOutcome,
};
use crate::{
    config::MerchantConfig,
    order_types::{meta_keys, Order, OrderId, OrderStatusType},
    traits::{MailSender, OrderStore, PaymentLookup},
};

/// The order state transition engine. Owns the full IPN flow: authentication, order resolution,
/// on-chain verification, and applying the outcome to the order exactly once.
///
/// `process_ipn` is the only entrypoint and it is total: every notification, however broken,
/// resolves to a definite [`IpnResolution`]. Rejection side effects (the on-hold transition and
/// the diagnostic report mail) live here, not in the HTTP layer.
pub struct IpnFlowApi<S, L, M> {
    store: S,
    lookup: L,
    mailer: M,
    config: MerchantConfig,
}

impl<S, L, M> Debug for IpnFlowApi<S, L, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "IpnFlowApi")
    }
}

impl<S, L, M> IpnFlowApi<S, L, M>
where
    S: OrderStore,
    L: PaymentLookup,
    M: MailSender,
{
    pub fn new(store: S, lookup: L, mailer: M, config: MerchantConfig) -> Self {
        Self { store, lookup, mailer, config }
    }

    /// Process one inbound notification to completion. `None` represents an empty or unreadable
    /// request body.
    pub async fn process_ipn(&self, ipn: Option<InboundNotification>) -> IpnResolution {
        let Some(ipn) = ipn else {
            return self.reject(RejectReason::EmptyRequestBody, None, &InboundNotification::default()).await;
        };
        if let Err(reason) = authenticate(&ipn, &self.config.merchant_address) {
            // do not touch the store for notifications that are not even for this merchant
            return self.reject(reason, None, &ipn).await;
        }
        let order = match resolve_order(
            &self.store,
            ipn.custom.as_deref(),
            ipn.invoice.as_deref(),
            &self.config.invoice_prefix,
        )
        .await
        {
            Ok(order) => order,
            Err(reason) => return self.reject(reason, None, &ipn).await,
        };
        match verify_transaction(&self.lookup, &self.config, &order, &ipn).await {
            VerificationOutcome::Verified(received) => match self.apply_verified(&order, &ipn, received).await {
                Ok(disposition) => {
                    info!("📦️ Notification for order {} handled: {disposition}", order.id);
                    IpnResolution::Accepted { order_id: order.id, disposition }
                },
                Err(reason) => self.reject(reason, Some(order.id), &ipn).await,
            },
            VerificationOutcome::Rejected(reason) => self.reject(reason, Some(order.id), &ipn).await,
        }
    }

    /// Apply a verified notification to the order. Exactly one delivery ever wins the completion;
    /// everything else is an idempotent acknowledgment or a non-final state note.
    async fn apply_verified(
        &self,
        order: &Order,
        ipn: &InboundNotification,
        received: TokenAmount,
    ) -> Result<IpnDisposition, RejectReason> {
        let status_text = ipn.status_text();
        self.store.add_note(order.id, &format!("BUX.digital Payment Status: {status_text}")).await?;
        let flag = self.store.fetch_meta(order.id, meta_keys::PAYMENT_COMPLETE).await?;
        if order.status == OrderStatusType::Completed || flag.as_deref() == Some(meta_keys::PAYMENT_COMPLETE_VALUE) {
            debug!("📦️ Order {} is already complete. Acknowledging without changes", order.id);
            return Ok(IpnDisposition::AlreadyComplete);
        }
        self.record_payer_details(order.id, ipn).await?;
        let status = ipn.status_code();
        if self.is_final_payment(ipn) {
            // only the delivery that sets the flag may write the completion
            if self.store.try_mark_payment_complete(order.id).await? {
                let note = format!("BUX payment of {received} received in full");
                self.store.update_status(order.id, OrderStatusType::Completed, &note).await?;
                Ok(IpnDisposition::Completed)
            } else {
                debug!("📦️ Lost the completion race for order {}. Acknowledging", order.id);
                Ok(IpnDisposition::AlreadyComplete)
            }
        } else if status < 0 {
            let note = format!("BUX payment cancelled/timed out: {status_text}");
            self.store.update_status(order.id, OrderStatusType::Cancelled, &note).await?;
            let subject = format!("Payment for order {} cancelled/timed out", order.order_number);
            self.mailer.send(&self.config.admin_email, &subject, &note).await;
            Ok(IpnDisposition::Cancelled)
        } else {
            let note = format!("BUX payment pending: {status_text}");
            self.store.update_status(order.id, OrderStatusType::Pending, &note).await?;
            Ok(IpnDisposition::Pending)
        }
    }

    /// Whether the notification reports the payment as final. Status 100+ and 2 are the network's
    /// definitive "paid" codes; with zero-conf enabled, a non-negative status with at least one
    /// confirmed delivery covering the expected amount also counts.
    fn is_final_payment(&self, ipn: &InboundNotification) -> bool {
        let status = ipn.status_code();
        status >= 100
            || status == 2
            || (self.config.allow_zero_confirm
                && status >= 0
                && ipn.confirmations() > 0
                && ipn.received_claim().unwrap_or_default() >= ipn.expected_claim().unwrap_or_default())
    }

    async fn record_payer_details(&self, id: OrderId, ipn: &InboundNotification) -> Result<(), RejectReason> {
        let details = [
            (meta_keys::TRANSACTION_ID, &ipn.txn_id),
            (meta_keys::PAYER_FIRST_NAME, &ipn.first_name),
            (meta_keys::PAYER_LAST_NAME, &ipn.last_name),
            (meta_keys::PAYER_EMAIL, &ipn.email),
        ];
        for (key, value) in details {
            if let Some(value) = value {
                self.store.set_meta(id, key, value).await?;
            }
        }
        Ok(())
    }

    /// The single rejection path. Moves the order (when one was resolved) on hold for manual
    /// review and mails the diagnostic report; the caller only ever sees the resolution.
    async fn reject(&self, reason: RejectReason, order_id: Option<OrderId>, ipn: &InboundNotification) -> IpnResolution {
        warn!("🚨️ Notification rejected ({}): {reason}", reason.kind());
        if let Some(id) = order_id {
            let note = format!("BUX.digital IPN Error: {reason}");
            if let Err(e) = self.store.update_status(id, OrderStatusType::OnHold, &note).await {
                error!("🚨️ Could not place order {id} on hold after a rejected notification. {e}");
            }
        }
        let report = format!("Error Message: {reason}\n\nPOST Fields\n\n{}", ipn.field_dump());
        if let Some(debug_email) = &self.config.debug_email {
            self.mailer.send(debug_email, "BUX.digital Invalid IPN", &report).await;
        }
        self.mailer.send(&self.config.admin_email, "BUX.digital Invalid IPN", &report).await;
        IpnResolution::Rejected { reason, order_id }
    }
}
