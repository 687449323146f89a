use std::future::Future;

use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;

use crate::constants::{AUTH_HEADER, HEALTH_PATH, PROCESSES_PATH};
use crate::models::{Action, QueryState, Snapshot};

use super::error::ApiError;

/// Operations the client needs from the process server.
///
/// Futures must be `Send` so they can be spawned; the runtime is
/// single-threaded but `tokio::spawn` still requires it.
pub trait ProcessApi: Clone + Send + Sync + 'static {
    /// Read one snapshot using the given query (token included).
    fn list_processes(
        &self,
        query: &QueryState,
    ) -> impl Future<Output = Result<Snapshot, ApiError>> + Send;

    /// Perform one mutating action, authenticated with `token`.
    fn perform(
        &self,
        action: Action,
        token: &str,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Unauthenticated liveness probe.
    fn health(&self) -> impl Future<Output = Result<HealthStatus, ApiError>> + Send;
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub time: Option<String>,
}

/// Error body the server attaches to failed writes.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// reqwest-backed [`ProcessApi`].
///
/// No request timeout is configured: a hung call stays pending until the
/// server answers or the connection drops.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-success response into [`ApiError::Status`], keeping the
    /// server's `error` message when it sent one.
    async fn check_status(resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.error);
        Err(ApiError::Status {
            code: status.as_u16(),
            message,
        })
    }
}

/// Path and JSON body for a write.
fn action_request(action: Action) -> (String, serde_json::Value) {
    match action {
        Action::Signal { pid, signal } => (
            format!("/api/process/{}/signal", pid),
            json!({ "signal": signal }),
        ),
        Action::Renice { pid, nice } => {
            (format!("/api/process/{}/renice", pid), json!({ "nice": nice }))
        }
        Action::Restart { pid } => (format!("/api/process/{}/restart", pid), json!({})),
    }
}

impl ProcessApi for ApiClient {
    async fn list_processes(&self, query: &QueryState) -> Result<Snapshot, ApiError> {
        let params = query.params();
        let resp = self
            .client
            .get(self.url(PROCESSES_PATH))
            .query(&params[..])
            .header(AUTH_HEADER, query.token.as_str())
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn perform(&self, action: Action, token: &str) -> Result<(), ApiError> {
        let (path, body) = action_request(action);
        let resp = self
            .client
            .post(self.url(&path))
            .header(AUTH_HEADER, token)
            .json(&body)
            .send()
            .await?;
        Self::check_status(resp).await.map(|_| ())
    }

    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let resp = self.client.get(self.url(HEALTH_PATH)).send().await?;
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Read;
    use std::thread::JoinHandle;

    use super::*;
    use crate::models::{Signal, SortField, SortOrder};

    /// What the fake server saw.
    struct Captured {
        method: String,
        url: String,
        token: Option<String>,
        body: String,
    }

    /// Serve exactly one request with the given status and body.
    fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<Captured>) {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = std::thread::spawn(move || {
            let mut req = server.recv().unwrap();
            let mut body_in = String::new();
            req.as_reader().read_to_string(&mut body_in).unwrap();
            let captured = Captured {
                method: req.method().to_string(),
                url: req.url().to_string(),
                token: req
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv(AUTH_HEADER))
                    .map(|h| h.value.as_str().to_string()),
                body: body_in,
            };
            let resp = tiny_http::Response::from_string(body).with_status_code(status);
            req.respond(resp).unwrap();
            captured
        });
        (format!("http://{}", addr), handle)
    }

    fn query(filter: &str) -> QueryState {
        QueryState {
            filter: filter.to_string(),
            sort: SortField::Mem,
            order: SortOrder::Asc,
            token: "tok-1".to_string(),
        }
    }

    #[tokio::test]
    async fn list_processes_sends_query_and_token() {
        let (url, server) = serve_once(
            200,
            r#"{"count": 1, "items": [{"pid": 1, "name": "init", "username": "root",
                "cpu_percent": 0.0, "memory_rss": 4096, "ports": [], "cmdline": ["/sbin/init"], "nice": 0}]}"#,
        );
        let client = ApiClient::new(&url);
        let snap = client.list_processes(&query(" my app ")).await.unwrap();
        let seen = server.join().unwrap();

        assert_eq!(seen.method, "GET");
        assert!(seen.url.starts_with("/api/processes?"));
        assert!(seen.url.contains("q=my+app"));
        assert!(seen.url.contains("sort=mem"));
        assert!(seen.url.contains("order=asc"));
        assert_eq!(seen.token.as_deref(), Some("tok-1"));
        assert_eq!(snap.items.len(), 1);
        assert_eq!(snap.items[0].name, "init");
    }

    #[tokio::test]
    async fn list_processes_missing_items_is_empty() {
        let (url, server) = serve_once(200, r#"{}"#);
        let snap = ApiClient::new(&url).list_processes(&query("")).await.unwrap();
        server.join().unwrap();
        assert!(snap.items.is_empty());
    }

    #[tokio::test]
    async fn list_processes_non_success_is_status_error() {
        let (url, server) = serve_once(401, r#"{"error": "Unauthorized"}"#);
        let err = ApiClient::new(&url)
            .list_processes(&query(""))
            .await
            .unwrap_err();
        server.join().unwrap();
        assert_eq!(err.status_code(), Some(401));
    }

    #[tokio::test]
    async fn list_processes_malformed_body_is_decode_error() {
        let (url, server) = serve_once(200, "<html>oops</html>");
        let err = ApiClient::new(&url)
            .list_processes(&query(""))
            .await
            .unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn signal_posts_json_body() {
        let (url, server) = serve_once(200, r#"{"ok": true}"#);
        ApiClient::new(&url)
            .perform(Action::Signal { pid: 321, signal: Signal::Term }, "tok-2")
            .await
            .unwrap();
        let seen = server.join().unwrap();
        assert_eq!(seen.method, "POST");
        assert_eq!(seen.url, "/api/process/321/signal");
        assert_eq!(seen.token.as_deref(), Some("tok-2"));
        let body: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
        assert_eq!(body, json!({ "signal": "TERM" }));
    }

    #[tokio::test]
    async fn renice_and_restart_bodies() {
        let (url, server) = serve_once(200, r#"{"ok": true}"#);
        ApiClient::new(&url)
            .perform(Action::Renice { pid: 5, nice: -3 }, "")
            .await
            .unwrap();
        let seen = server.join().unwrap();
        assert_eq!(seen.url, "/api/process/5/renice");
        assert_eq!(seen.token.as_deref(), Some(""));
        let body: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
        assert_eq!(body, json!({ "nice": -3 }));

        let (url, server) = serve_once(200, r#"{"ok": true}"#);
        ApiClient::new(&url)
            .perform(Action::Restart { pid: 6 }, "t")
            .await
            .unwrap();
        let seen = server.join().unwrap();
        assert_eq!(seen.url, "/api/process/6/restart");
        let body: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn failed_write_keeps_server_message() {
        let (url, server) = serve_once(403, r#"{"error": "Access denied."}"#);
        let err = ApiClient::new(&url)
            .perform(Action::Signal { pid: 1, signal: Signal::Kill }, "t")
            .await
            .unwrap_err();
        server.join().unwrap();
        assert_eq!(err.status_code(), Some(403));
        assert_eq!(err.to_string(), "HTTP 403: Access denied.");
    }

    #[tokio::test]
    async fn health_parses_status() {
        let (url, server) = serve_once(200, r#"{"status": "ok", "time": "2024-01-01T00:00:00"}"#);
        let health = ApiClient::new(&format!("{}/", url)).health().await.unwrap();
        let seen = server.join().unwrap();
        assert_eq!(seen.url, "/api/health");
        assert_eq!(health.status, "ok");
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let c = ApiClient::new("http://host:8088/");
        assert_eq!(c.base_url(), "http://host:8088");
        assert_eq!(c.url("/api/health"), "http://host:8088/api/health");
    }
}
