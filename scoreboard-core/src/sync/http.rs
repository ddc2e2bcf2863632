//! HTTP client for the spreadsheet-backed transaction store.
//!
//! # Example
//!
//! ```ignore
//! use scoreboard_core::sync::HttpRemote;
//!
//! let remote = HttpRemote::new(Some("https://script.example.com/exec".to_string()));
//! let transactions = remote.fetch_all().await?;
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::traits::{RemoteLedger, TransactionDraft};
use crate::error::SyncError;
use crate::model::{Transaction, TransactionId};

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// [`RemoteLedger`] over HTTP.
///
/// Responses are JSON envelopes with an `ok` flag. A non-2xx status is a
/// [`SyncError::Network`] failure whatever the body says; an envelope that is
/// not `ok`, or that does not have the expected shape, is [`SyncError::Remote`].
pub struct HttpRemote {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl HttpRemote {
    /// Create a client with the default timeout.
    ///
    /// A blank endpoint counts as unconfigured.
    pub fn new(endpoint: Option<String>) -> Self {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: Option<String>, timeout: Duration) -> Self {
        let client = match reqwest::Client::builder().timeout(timeout).build() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to build HTTP client, using defaults");
                reqwest::Client::new()
            }
        };

        Self {
            endpoint: endpoint
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
            client,
        }
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    fn url(&self) -> Result<&str, SyncError> {
        self.endpoint().ok_or(SyncError::NotConfigured)
    }

    async fn read_envelope(response: reqwest::Response) -> Result<Map<String, Value>, SyncError> {
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Network(format!("remote returned status {}", status)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        open_envelope(&body)
    }
}

#[async_trait]
impl RemoteLedger for HttpRemote {
    async fn submit(&self, draft: &TransactionDraft) -> Result<TransactionId, SyncError> {
        let url = self.url()?;

        let response = self
            .client
            .post(url)
            .json(draft)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let envelope = Self::read_envelope(response).await?;
        let id = match envelope.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(SyncError::Remote(
                    "response is missing the transaction id".to_string(),
                ));
            }
        };

        debug!(id = %id, student_id = %draft.student_id, "Transaction submitted");
        Ok(id)
    }

    async fn fetch_all(&self) -> Result<Vec<Transaction>, SyncError> {
        let url = self.url()?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::Network(e.to_string()))?;

        let mut envelope = Self::read_envelope(response).await?;
        let transactions = match envelope.remove("transactions") {
            Some(list @ Value::Array(_)) => serde_json::from_value::<Vec<Transaction>>(list)
                .map_err(|e| SyncError::Remote(format!("malformed transaction list: {}", e)))?,
            _ => {
                return Err(SyncError::Remote(
                    "response is missing the transaction list".to_string(),
                ));
            }
        };

        debug!(count = transactions.len(), "Fetched remote transactions");
        Ok(transactions)
    }
}

/// Parse a response body and check its `ok` flag.
fn open_envelope(body: &str) -> Result<Map<String, Value>, SyncError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| SyncError::Remote(format!("malformed response: {}", e)))?;

    let Value::Object(envelope) = value else {
        return Err(SyncError::Remote(
            "malformed response: expected a JSON object".to_string(),
        ));
    };

    match envelope.get("ok") {
        Some(Value::Bool(true)) => Ok(envelope),
        Some(Value::Bool(false)) => {
            let message = envelope
                .get("error")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or("remote store reported a failure");
            Err(SyncError::Remote(message.to_string()))
        }
        _ => Err(SyncError::Remote(
            "malformed response: missing ok flag".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_endpoint_is_unconfigured() {
        assert!(!HttpRemote::new(None).is_configured());
        assert!(!HttpRemote::new(Some("   ".to_string())).is_configured());
        assert_eq!(
            HttpRemote::new(Some(" https://x.test/exec ".to_string())).endpoint(),
            Some("https://x.test/exec")
        );
    }

    #[tokio::test]
    async fn unconfigured_client_fails_without_network() {
        let remote = HttpRemote::new(None);
        assert_eq!(remote.fetch_all().await.unwrap_err(), SyncError::NotConfigured);

        let draft = TransactionDraft {
            student_id: "s1".to_string(),
            group_id: "g1".to_string(),
            delta: 1.0,
            reason: "Quiz".to_string(),
            date: None,
        };
        assert_eq!(remote.submit(&draft).await.unwrap_err(), SyncError::NotConfigured);
    }

    #[test]
    fn envelope_with_ok_false_reports_remote_message() {
        let err = open_envelope(r#"{"ok": false, "error": "sheet is locked"}"#).unwrap_err();
        assert_eq!(err, SyncError::Remote("sheet is locked".to_string()));
    }

    #[test]
    fn envelope_with_ok_false_and_no_message_uses_generic_text() {
        let err = open_envelope(r#"{"ok": false}"#).unwrap_err();
        assert!(matches!(err, SyncError::Remote(m) if m.contains("reported a failure")));
    }

    #[test]
    fn envelope_without_ok_flag_is_schema_mismatch() {
        assert!(matches!(
            open_envelope(r#"{"transactions": []}"#),
            Err(SyncError::Remote(_))
        ));
        assert!(matches!(
            open_envelope(r#"{"ok": "yes"}"#),
            Err(SyncError::Remote(_))
        ));
    }

    #[test]
    fn non_object_body_is_schema_mismatch() {
        assert!(matches!(open_envelope("[]"), Err(SyncError::Remote(_))));
        assert!(matches!(
            open_envelope("<html>Sign in</html>"),
            Err(SyncError::Remote(_))
        ));
    }

    #[test]
    fn ok_envelope_is_returned() {
        let envelope = open_envelope(r#"{"ok": true, "id": "r1"}"#).unwrap();
        assert_eq!(envelope.get("id").and_then(Value::as_str), Some("r1"));
    }
}
