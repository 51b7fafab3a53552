use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::form_urlencoded;

use crate::error::{CheckError, CheckResult};

/// Placeholder in the push template replaced by the encoded message.
pub const PLACEHOLDER: &str = "%s";

/// Query-escape `message` (space becomes `+`, reserved bytes become `%XX`).
pub fn encode_message(message: &str) -> String {
    form_urlencoded::byte_serialize(message.as_bytes()).collect()
}

/// Substitute the first placeholder of `template` with the encoded `message`.
pub fn render_url(template: &str, message: &str) -> String {
    template.replacen(PLACEHOLDER, &encode_message(message), 1)
}

/// Pushes report batches to a templated GET endpoint.
#[derive(Debug, Clone)]
pub struct Notifier {
    client: Client,
    template: String,
}

impl Notifier {
    /// `template` is expected to carry a placeholder; `Config::validate`
    /// rejects templates without one.
    pub fn new(template: impl Into<String>, client_id: &str) -> CheckResult<Self> {
        let client = Client::builder().user_agent(client_id).build()?;
        Ok(Self {
            client,
            template: template.into(),
        })
    }

    /// Join `batch` without separators and deliver it. Returns the response
    /// body on HTTP 200.
    pub async fn send(&self, batch: &[String]) -> CheckResult<String> {
        let message = batch.concat();
        let url = render_url(&self.template, &message);
        debug!(lines = batch.len(), bytes = message.len(), "sending batch");

        let resp = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(CheckError::Notification {
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(resp.text().await?)
    }
}
