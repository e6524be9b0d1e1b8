//! Resend-backed delivery of the finished package.

use anyhow::{Context, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::json;
use std::path::Path;
use std::time::Duration;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

pub struct Mailer {
    client: reqwest::Client,
    api_key: Option<String>,
    from_email: String,
}

impl Mailer {
    pub fn new(api_key: Option<String>, from_email: String) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()?,
            api_key,
            from_email,
        })
    }

    /// Emails the package as a base64 attachment.
    pub async fn send_package(
        &self,
        to: &str,
        subject: &str,
        path: &Path,
        file_name: &str,
    ) -> Result<()> {
        let api_key = self
            .api_key
            .as_ref()
            .context("RESEND_API_KEY is not configured")?;
        let content = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading package {}", path.display()))?;

        self.client
            .post(RESEND_API_URL)
            .bearer_auth(api_key)
            .json(&json!({
                "from": self.from_email,
                "to": [to],
                "subject": subject,
                "text": "Your Readwise digest is attached.",
                "attachments": [{
                    "filename": file_name,
                    "content": STANDARD.encode(&content),
                }],
            }))
            .send()
            .await?
            .error_for_status()
            .context("Resend rejected the message")?;

        tracing::info!(to, file_name, "sent digest package");
        Ok(())
    }
}
