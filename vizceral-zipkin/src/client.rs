use crate::error::{FetchError, Result};
use crate::window::QueryWindow;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;
use vizceral_core::RawEdge;

pub const DEPENDENCIES_PATH: &str = "api/v1/dependencies";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Zipkin dependencies client. Holds one pooled HTTP client; clone it freely.
#[derive(Debug, Clone)]
pub struct ZipkinClient {
    client: Client,
}

impl ZipkinClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("zipkin-vizceral/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the raw dependency links Zipkin aggregated over `window`.
    ///
    /// `server` is either `host:port` (plain HTTP is assumed) or a full base URL.
    pub async fn fetch_dependencies(
        &self,
        server: &str,
        window: &QueryWindow,
    ) -> Result<Vec<RawEdge>> {
        let url = dependencies_url(server, window)?;
        info!("Fetching dependencies from {}", url);

        let start = Instant::now();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let edges: Vec<RawEdge> = serde_json::from_str(&body)?;
        debug!(
            "Received {} dependency links in {:?}",
            edges.len(),
            start.elapsed()
        );
        Ok(edges)
    }
}

/// Build `http://{server}/api/v1/dependencies?endTs=..&lookback=..`.
pub fn dependencies_url(server: &str, window: &QueryWindow) -> Result<Url> {
    let server = server.trim().trim_end_matches('/');
    if server.is_empty() {
        return Err(FetchError::InvalidUrl("empty server address".to_string()));
    }

    let base = if server.starts_with("http://") || server.starts_with("https://") {
        server.to_string()
    } else {
        format!("http://{}", server)
    };

    let mut url = Url::parse(&format!("{}/{}", base, DEPENDENCIES_PATH))
        .map_err(|e| FetchError::InvalidUrl(format!("{}: {}", server, e)))?;
    url.query_pairs_mut()
        .append_pair("endTs", &window.end_ts.to_string())
        .append_pair("lookback", &window.lookback.to_string());
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn window() -> QueryWindow {
        QueryWindow::new(Some(1_500_000_000_000), 15)
    }

    #[test]
    fn test_dependencies_url_host_port() {
        let url = dependencies_url("zipkin:9411", &window()).unwrap();
        assert_eq!(
            url.as_str(),
            "http://zipkin:9411/api/v1/dependencies?endTs=1500000000000&lookback=900000"
        );
    }

    #[test]
    fn test_dependencies_url_keeps_scheme() {
        let url = dependencies_url("https://tracing.example.com/", &window()).unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.path(), "/api/v1/dependencies");
    }

    #[test]
    fn test_dependencies_url_empty_server() {
        let result = dependencies_url("  ", &window());
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_dependencies() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/dependencies"))
            .and(query_param("endTs", "1500000000000"))
            .and(query_param("lookback", "900000"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_string(
                        r#"[{"parent":"web","child":"web","callCount":4},
                            {"parent":"web","child":"db","callCount":2,"errorCount":1}]"#,
                    ),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ZipkinClient::new().unwrap();
        let edges = client
            .fetch_dependencies(&mock_server.uri(), &window())
            .await
            .unwrap();

        assert_eq!(edges.len(), 2);
        assert_eq!(edges[0], RawEdge::new("web", "web", 4));
        assert_eq!(edges[1], RawEdge::new("web", "db", 2).with_errors(1));
    }

    #[tokio::test]
    async fn test_fetch_dependencies_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/dependencies"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = ZipkinClient::new().unwrap();
        let result = client.fetch_dependencies(&mock_server.uri(), &window()).await;

        assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
    }

    #[tokio::test]
    async fn test_fetch_dependencies_invalid_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/dependencies"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>nope</html>"))
            .mount(&mock_server)
            .await;

        let client = ZipkinClient::new().unwrap();
        let result = client.fetch_dependencies(&mock_server.uri(), &window()).await;

        assert!(matches!(result, Err(FetchError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_client_is_reused_across_requests() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v1/dependencies"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(3)
            .mount(&mock_server)
            .await;

        let client = ZipkinClient::new().unwrap();
        for _ in 0..3 {
            let edges = client
                .clone()
                .fetch_dependencies(&mock_server.uri(), &window())
                .await
                .unwrap();
            assert!(edges.is_empty());
        }
    }

    #[tokio::test]
    async fn test_fetch_dependencies_unreachable() {
        let client = ZipkinClient::with_timeout(1).unwrap();
        let result = client.fetch_dependencies("127.0.0.1:1", &window()).await;
        assert!(matches!(result, Err(FetchError::HttpError(_))));
    }
}
