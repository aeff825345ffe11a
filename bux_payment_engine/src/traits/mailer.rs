/// Outbound mail seam. Actual delivery is owned by the deployment (an external collaborator), so
/// the interface is deliberately fire-and-forget: implementations log failures but the engine's
/// flow never depends on a mail having gone out.
#[allow(async_fn_in_trait)]
pub trait MailSender: Clone {
    async fn send(&self, to: &str, subject: &str, body: &str);
}
