use bux_payment_engine::traits::MailSender;
use log::*;

/// A [`MailSender`] that writes outbound mail to the log. Actual delivery belongs to an external
/// collaborator; deployments that want real mail implement the trait against their relay.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl MailSender for LogMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) {
        info!("✉️ To: {to}\n✉️ Subject: {subject}\n{body}");
    }
}
