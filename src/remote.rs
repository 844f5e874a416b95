//! Client for the remote blob store.
//!
//! The store is a dumb JSON blob: POST replaces it, GET returns it. Both
//! directions are best-effort. A publish is fire-and-forget (the response
//! body is never read, the status is only logged) and a failed pull yields
//! `None` so callers fall back to local state. Nothing here ever blocks a
//! command from completing.

use anyhow::{Context, Result};
use chrono::Utc;
use daydeck_core::SyncEnvelope;
use daydeck_core::deck_config::SyncConfig;
use tracing::{debug, warn};
use url::Url;

pub struct RemoteStore {
    client: reqwest::Client,
    endpoint: Option<Url>,
}

impl RemoteStore {
    /// `endpoint` absent means local-only mode: publish and pull become
    /// no-ops instead of errors.
    pub fn new(client: reqwest::Client, sync: &SyncConfig) -> Result<Self> {
        let endpoint = match &sync.endpoint {
            Some(raw) => Some(
                Url::parse(raw).with_context(|| format!("Invalid sync endpoint '{raw}'"))?,
            ),
            None => None,
        };

        Ok(RemoteStore { client, endpoint })
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Publish the envelope. One-way: the caller never learns whether it
    /// landed, so local flow is never gated on remote health.
    pub async fn publish(&self, envelope: &SyncEnvelope) {
        let Some(endpoint) = &self.endpoint else {
            return;
        };

        match self.client.post(endpoint.clone()).json(envelope).send().await {
            Ok(response) => debug!(status = %response.status(), "published dashboard state"),
            Err(err) => warn!(%err, "could not publish dashboard state"),
        }
    }

    /// Fetch the remote envelope. Any failure (network, status, malformed
    /// body) is logged and collapses to `None`.
    pub async fn pull(&self) -> Option<SyncEnvelope> {
        let endpoint = self.endpoint.as_ref()?;

        // Cache-buster, in case the store sits behind a CDN.
        let stamp = Utc::now().timestamp_millis().to_string();

        let result = self
            .client
            .get(endpoint.clone())
            .query(&[("t", stamp.as_str())])
            .send()
            .await;

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                warn!(%err, "could not pull remote state");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "remote state pull rejected");
            return None;
        }

        match response.json::<SyncEnvelope>().await {
            Ok(envelope) => Some(envelope),
            Err(err) => {
                warn!(%err, "remote state was malformed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use daydeck_core::{Layout, Task, TaskKind};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    fn remote(endpoint: Option<String>) -> RemoteStore {
        let sync = SyncConfig {
            endpoint,
            poll_secs: 60,
            timeout_secs: 2,
        };
        RemoteStore::new(reqwest::Client::new(), &sync).unwrap()
    }

    fn http_response(status_line: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\n\
            content-type: application/json\r\n\
            content-length: {}\r\n\
            connection: close\r\n\
            \r\n\
            {body}",
            body.len()
        )
    }

    /// Read until the headers and the full content-length body are in.
    /// Request bodies can straggle in a second segment.
    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            let n = stream.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some((head, body)) = text.split_once("\r\n\r\n") {
                let content_length = head
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);

                if body.len() >= content_length {
                    break;
                }
            }
        }

        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Serve exactly one canned response, handing back the raw request.
    async fn serve_once(status_line: &str, body: &str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/state", listener.local_addr().unwrap());
        let response = http_response(status_line, body);
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;
            let _ = tx.send(request);
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.flush().await.unwrap();
        });

        (endpoint, rx)
    }

    fn envelope_json() -> String {
        let envelope = SyncEnvelope::new(
            vec![Task::new("Draft Q3 plan", TaskKind::Today)],
            Layout::default(),
            Some("ceo@example.com".into()),
        );
        serde_json::to_string(&envelope).unwrap()
    }

    // --- pull ---

    #[tokio::test]
    async fn pull_applies_remote_envelope_and_busts_caches() {
        let (endpoint, request) = serve_once("200 OK", &envelope_json()).await;
        let remote = remote(Some(endpoint));

        let envelope = remote.pull().await.unwrap();
        assert_eq!(envelope.tasks.len(), 1);
        assert_eq!(envelope.tasks[0].text, "Draft Q3 plan");
        assert_eq!(envelope.user_email.as_deref(), Some("ceo@example.com"));

        let request = request.await.unwrap();
        assert!(request.starts_with("GET /state?t="));
    }

    #[tokio::test]
    async fn pull_collapses_server_errors_to_none() {
        let (endpoint, _request) = serve_once("500 Internal Server Error", "{}").await;
        let remote = remote(Some(endpoint));

        assert!(remote.pull().await.is_none());
    }

    #[tokio::test]
    async fn pull_collapses_malformed_bodies_to_none() {
        let (endpoint, _request) = serve_once("200 OK", "not json at all").await;
        let remote = remote(Some(endpoint));

        assert!(remote.pull().await.is_none());
    }

    #[tokio::test]
    async fn pull_collapses_connection_failures_to_none() {
        // Bind then drop, so the port is known-dead.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/state", listener.local_addr().unwrap());
        drop(listener);

        let remote = remote(Some(endpoint));
        assert!(remote.pull().await.is_none());
    }

    #[tokio::test]
    async fn pull_without_endpoint_is_a_quiet_none() {
        let remote = remote(None);
        assert!(remote.pull().await.is_none());
        assert!(!remote.is_configured());
    }

    // --- publish ---

    #[tokio::test]
    async fn publish_posts_the_envelope_and_ignores_the_body() {
        // An HTML body would choke any response parsing; publish must not care.
        let (endpoint, request) = serve_once("200 OK", "<html>whatever</html>").await;
        let remote = remote(Some(endpoint));

        let envelope = SyncEnvelope::new(
            vec![Task::new("Review board deck", TaskKind::Checklist)],
            Layout::default(),
            None,
        );
        remote.publish(&envelope).await;

        let request = request.await.unwrap();
        assert!(request.starts_with("POST /state"));
        assert!(request.contains("\"tasks\""));
        assert!(request.contains("Review board deck"));
        assert!(request.contains("\"lastUpdated\""));
    }

    #[tokio::test]
    async fn publish_swallows_failures() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}/state", listener.local_addr().unwrap());
        drop(listener);

        let remote = remote(Some(endpoint));
        let envelope = SyncEnvelope::new(Vec::new(), Layout::default(), None);

        // Must complete without error despite the dead endpoint.
        remote.publish(&envelope).await;
    }

    #[tokio::test]
    async fn publish_without_endpoint_is_a_noop() {
        let remote = remote(None);
        let envelope = SyncEnvelope::new(Vec::new(), Layout::default(), None);
        remote.publish(&envelope).await;
    }

    // --- construction ---

    #[test]
    fn rejects_unparseable_endpoints() {
        let sync = SyncConfig {
            endpoint: Some("not a url".into()),
            poll_secs: 60,
            timeout_secs: 2,
        };
        assert!(RemoteStore::new(reqwest::Client::new(), &sync).is_err());
    }
}
