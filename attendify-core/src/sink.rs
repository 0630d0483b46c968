//! Attendance sinks
//!
//! Accepted submissions are forwarded to an external record store. Delivery is
//! best effort: one attempt, bounded by a timeout, failures logged and dropped.

use crate::async_utils::with_timeout;
use crate::error::{AttendifyError, AttendifyResult, ErrorContext};
use crate::sink_error;
use crate::traits::AttendanceSink;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// One spreadsheet row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub roll: String,
    pub name: String,
    pub subject: String,
    pub token: String,
}

/// Posts each record as JSON to a webhook (e.g. a spreadsheet web app)
#[derive(Debug, Clone)]
pub struct WebhookSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookSink {
    /// Create a webhook sink; `timeout` also bounds the HTTP client itself
    pub fn new(url: impl Into<String>, timeout: Duration) -> AttendifyResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AttendifyError::Config {
                message: format!("Failed to build HTTP client: {}", e),
                source: Some(Box::new(e)),
                context: ErrorContext::new("webhook_sink").with_operation("new"),
            })?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AttendanceSink for WebhookSink {
    async fn append(&self, record: &AttendanceRecord) -> AttendifyResult<()> {
        let response = self
            .client
            .post(&self.url)
            .json(record)
            .send()
            .await
            .map_err(|e| sink_error!(format!("Request failed: {}", e), "webhook_sink", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(sink_error!(
                format!("Webhook responded with {}", status),
                "webhook_sink"
            ));
        }

        debug!(status = %status, roll = %record.roll, "Attendance row delivered");
        Ok(())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

/// Fallback sink used when no webhook is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

#[async_trait]
impl AttendanceSink for LogSink {
    async fn append(&self, record: &AttendanceRecord) -> AttendifyResult<()> {
        info!(
            roll = %record.roll,
            name = %record.name,
            subject = %record.subject,
            token = %record.token,
            "Attendance recorded (no sink configured)"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Keeps rows in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<AttendanceRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all rows appended so far
    pub async fn records(&self) -> Vec<AttendanceRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl AttendanceSink for MemorySink {
    async fn append(&self, record: &AttendanceRecord) -> AttendifyResult<()> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Pick the sink for an optional webhook URL
pub fn sink_from_url(
    url: Option<&str>,
    timeout_ms: u64,
) -> AttendifyResult<Arc<dyn AttendanceSink>> {
    match url {
        Some(url) => Ok(Arc::new(WebhookSink::new(
            url,
            Duration::from_millis(timeout_ms),
        )?)),
        None => Ok(Arc::new(LogSink)),
    }
}

/// Deliver `record` on a detached task.
///
/// Exactly one attempt is made. The returned handle resolves to `true` when the
/// row was delivered; request handlers drop it without awaiting.
pub fn dispatch(
    sink: Arc<dyn AttendanceSink>,
    record: AttendanceRecord,
    timeout_ms: u64,
) -> JoinHandle<bool> {
    tokio::spawn(async move {
        let outcome = with_timeout(sink.append(&record), timeout_ms, "sink_append")
            .await
            .and_then(|inner| inner);

        match outcome {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    sink = sink.name(),
                    roll = %record.roll,
                    token = %record.token,
                    error = %e,
                    "Attendance sink unavailable, row dropped"
                );
                false
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn record() -> AttendanceRecord {
        AttendanceRecord {
            roll: "21CS042".to_string(),
            name: "Asha".to_string(),
            subject: "Math".to_string(),
            token: "a1b2c3d4e5f60718".to_string(),
        }
    }

    /// Accept one connection, capture its body and answer with `status_line`
    async fn one_shot_server(status_line: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];

            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);

                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let lower = line.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if buf.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!("{}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n", status_line);
            socket.write_all(response.as_bytes()).await.unwrap();

            let text = String::from_utf8_lossy(&buf).to_string();
            text.split("\r\n\r\n").nth(1).unwrap_or_default().to_string()
        });

        (format!("http://{}/exec", addr), handle)
    }

    #[tokio::test]
    async fn test_webhook_posts_json_row() {
        let (url, server) = one_shot_server("HTTP/1.1 200 OK").await;
        let sink = WebhookSink::new(url, Duration::from_secs(5)).unwrap();

        sink.append(&record()).await.unwrap();

        let body: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
        assert_eq!(body["roll"], "21CS042");
        assert_eq!(body["name"], "Asha");
        assert_eq!(body["subject"], "Math");
        assert_eq!(body["token"], "a1b2c3d4e5f60718");
    }

    #[tokio::test]
    async fn test_webhook_error_status_is_sink_unavailable() {
        let (url, _server) = one_shot_server("HTTP/1.1 500 Internal Server Error").await;
        let sink = WebhookSink::new(url, Duration::from_secs(5)).unwrap();

        let err = sink.append(&record()).await.unwrap_err();
        assert!(matches!(err, AttendifyError::SinkUnavailable { .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_dispatch_swallows_unreachable_sink() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = sink_from_url(Some(&format!("http://{}/exec", addr)), 1000).unwrap();
        let delivered = dispatch(sink, record(), 1000).await.unwrap();
        assert!(!delivered);
    }

    #[tokio::test]
    async fn test_dispatch_times_out_slow_sink() {
        struct StallingSink;

        #[async_trait]
        impl AttendanceSink for StallingSink {
            async fn append(&self, _record: &AttendanceRecord) -> AttendifyResult<()> {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }

            fn name(&self) -> &str {
                "stalling"
            }
        }

        let delivered = dispatch(Arc::new(StallingSink), record(), 50).await.unwrap();
        assert!(!delivered);
    }

    #[tokio::test]
    async fn test_memory_sink_collects_rows() {
        let sink = MemorySink::new();
        assert!(dispatch(Arc::new(sink.clone()), record(), 100).await.unwrap());
        assert_eq!(sink.records().await, vec![record()]);
    }

    #[test]
    fn test_sink_selection() {
        assert_eq!(sink_from_url(None, 100).unwrap().name(), "log");
        assert_eq!(
            sink_from_url(Some("http://127.0.0.1:9/exec"), 100).unwrap().name(),
            "webhook"
        );
    }
}
