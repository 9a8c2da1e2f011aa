// src/convert/hec.rs

//! Minimal HTTP Event Collector client.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use tracing::{debug, error, info};

use crate::config::HecSection;
use crate::errors::{ForwardError, Result};
use crate::tracker::Event;
use crate::types::HecProtocol;

/// Path of the JSON event endpoint on a HEC server.
pub const HEC_EVENT_PATH: &str = "/services/collector/event";

/// Outcome of posting a set of events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendSummary {
    /// Events in batches the server accepted.
    pub sent: usize,
    /// Events in batches that failed.
    pub failed: usize,
}

impl SendSummary {
    pub fn all_sent(&self) -> bool {
        self.failed == 0
    }
}

#[derive(Debug, Clone)]
pub struct HecClient {
    client: reqwest::Client,
    url: String,
    auth: String,
    batch_size: usize,
}

impl HecClient {
    pub fn new(cfg: &HecSection) -> Result<Self> {
        let url = format!(
            "{}://{}:{}{}",
            cfg.protocol, cfg.host, cfg.port, HEC_EVENT_PATH
        );
        let insecure = cfg.protocol == HecProtocol::Https && !cfg.verify_tls;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .danger_accept_invalid_certs(insecure)
            .build()?;

        Ok(Self {
            client,
            url,
            auth: format!("Splunk {}", cfg.token),
            batch_size: cfg.batch_size.max(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.url
    }

    /// Post `events` in batches. A failed batch is logged and does not stop
    /// the remaining ones.
    pub async fn send(&self, events: &[Event]) -> SendSummary {
        let mut summary = SendSummary::default();

        for batch in events.chunks(self.batch_size) {
            match self.send_batch(batch).await {
                Ok(()) => summary.sent += batch.len(),
                Err(e) => {
                    error!(events = batch.len(), "error sending events to HEC: {e}");
                    summary.failed += batch.len();
                }
            }
        }

        info!(
            sent = summary.sent,
            total = events.len(),
            "sent events to HEC"
        );
        summary
    }

    async fn send_batch(&self, batch: &[Event]) -> Result<()> {
        let body = batch_body(batch)?;
        debug!(url = %self.url, events = batch.len(), bytes = body.len(), "posting batch");

        let response = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, &self.auth)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.unwrap_or_default();
        Err(ForwardError::Hec(format!("{status} - {text}")))
    }
}

/// HEC batch body: JSON objects back to back, one per line.
pub fn batch_body(batch: &[Event]) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    for event in batch {
        serde_json::to_writer(&mut body, event)?;
        body.push(b'\n');
    }
    Ok(body)
}
