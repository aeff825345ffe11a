use super::{InboundNotification, RejectReason};

/// Gate 1: the notification must name our merchant address.
///
/// This is deliberately a weak check. The merchant address is printed on every payment request,
/// so anyone can pass it; what the gate buys is an early, cheap rejection of notifications that
/// were never meant for this store. Proof of payment comes from the on-chain checks later in the
/// flow, never from here.
pub fn authenticate(ipn: &InboundNotification, expected_merchant_address: &str) -> Result<(), RejectReason> {
    let expected = expected_merchant_address.trim();
    let claimed = ipn.merchant.as_deref().unwrap_or("").trim();
    if expected.is_empty() || claimed != expected {
        return Err(RejectReason::MerchantAddressMismatch);
    }
    Ok(())
}
