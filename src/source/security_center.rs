//! Tenable Security Center REST client
//!
//! Authenticates with a session token and exposes the two endpoints the
//! pipeline reads from. Every response is wrapped in the platform envelope
//! `{ response, error_code, error_msg }`.

use reqwest::StatusCode;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::RecordSource;
use crate::error::{ReportError, Result};
use crate::selector::{Criterion, RepositoryCatalog};

const TOKEN_HEADER: &str = "X-SecurityCenter";

/// Connection settings for the platform
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Host name or full base URL
    pub host: String,
    pub timeout: Duration,
    pub accept_invalid_certs: bool,
    /// Upper bound of the single result window requested per query
    pub max_results: usize,
}

pub struct SecurityCenterClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
    max_results: usize,
}

impl SecurityCenterClient {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("plugin-report/", env!("CARGO_PKG_VERSION")))
            .cookie_store(true)
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url(&settings.host),
            token: None,
            max_results: settings.max_results,
        })
    }

    /// Open an authenticated session. Any rejection is an authentication
    /// failure; there is no retry.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        info!(host = %self.base_url, username, "Logging in to Security Center");

        let response = self
            .http
            .post(self.url("token"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        let payload = match parse_envelope(status, &body) {
            Ok(payload) => payload,
            Err(ReportError::Api { message, .. }) => return Err(ReportError::Authentication(message)),
            Err(e) => return Err(e),
        };

        self.token = Some(parse_token(&payload)?);
        debug!("Session token acquired");
        Ok(())
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/rest/{}", self.base_url, endpoint)
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        match &self.token {
            Some(token) => Ok(request.header(TOKEN_HEADER, token)),
            None => Err(ReportError::Authentication("not logged in".to_string())),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = self.authorized(request)?.send().await?;
        let status = response.status();
        let body = response.text().await?;
        parse_envelope(status, &body)
    }
}

impl RecordSource for SecurityCenterClient {
    async fn repositories(&self) -> Result<RepositoryCatalog> {
        let payload = self.send(self.http.get(self.url("repository"))).await?;
        let catalog = RepositoryCatalog {
            repositories: serde_json::from_value(payload)?,
        };
        debug!(repositories = catalog.repositories.len(), "Fetched repository catalog");
        Ok(catalog)
    }

    async fn analysis(&self, filters: &[Criterion]) -> Result<Vec<Value>> {
        let request = self
            .http
            .post(self.url("analysis"))
            .json(&analysis_request(filters, self.max_results));
        let payload = self.send(request).await?;
        let results = parse_results(payload)?;

        if results.len() >= self.max_results {
            warn!(
                max_results = self.max_results,
                "Result window is full; some hosts may be missing"
            );
        }
        info!(results = results.len(), "Fetched plugin results");
        Ok(results)
    }
}

fn base_url(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

/// Body of an `/analysis` request for per-host vulnerability details.
fn analysis_request(filters: &[Criterion], max_results: usize) -> Value {
    json!({
        "type": "vuln",
        "sourceType": "cumulative",
        "query": {
            "type": "vuln",
            "tool": "vulndetails",
            "filters": filters,
            "startOffset": 0,
            "endOffset": max_results,
        },
    })
}

/// Unwrap the platform envelope, mapping HTTP and platform errors.
fn parse_envelope(status: StatusCode, body: &str) -> Result<Value> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ReportError::Authentication(format!("HTTP {status}")));
    }

    let envelope: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) if status.is_success() => return Err(e.into()),
        Err(_) => {
            return Err(ReportError::Api {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }
    };

    let error_code = envelope.get("error_code").and_then(Value::as_i64).unwrap_or(0);
    if error_code != 0 || !status.is_success() {
        let message = envelope
            .get("error_msg")
            .and_then(Value::as_str)
            .map(|msg| msg.trim().to_string())
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| format!("error code {error_code}"));
        return Err(ReportError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(envelope.get("response").cloned().unwrap_or(Value::Null))
}

fn parse_token(payload: &Value) -> Result<String> {
    match payload.get("token") {
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        _ => Err(ReportError::Authentication(
            "login response carried no session token".to_string(),
        )),
    }
}

fn parse_results(payload: Value) -> Result<Vec<Value>> {
    match payload {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(results)) => Ok(results),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(_) => Err(ReportError::Api {
                status: 200,
                message: "analysis results are not a list".to_string(),
            }),
        },
        _ => Err(ReportError::Api {
            status: 200,
            message: "unexpected analysis response shape".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url() {
        assert_eq!(base_url("sc.example.edu"), "https://sc.example.edu");
        assert_eq!(base_url("http://localhost:8443/"), "http://localhost:8443");
    }

    #[test]
    fn test_envelope_success() {
        let body = r#"{"type":"regular","response":{"token":1234},"error_code":0,"error_msg":""}"#;
        let payload = parse_envelope(StatusCode::OK, body).unwrap();
        assert_eq!(parse_token(&payload).unwrap(), "1234");
    }

    #[test]
    fn test_envelope_platform_error() {
        let body = r#"{"response":"","error_code":74,"error_msg":"Invalid login credentials.\n"}"#;
        match parse_envelope(StatusCode::OK, body) {
            Err(ReportError::Api { status, message }) => {
                assert_eq!(status, 200);
                assert_eq!(message, "Invalid login credentials.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_envelope_unauthorized_is_authentication() {
        assert!(matches!(
            parse_envelope(StatusCode::UNAUTHORIZED, "<html>nope</html>"),
            Err(ReportError::Authentication(_))
        ));
        assert!(matches!(
            parse_envelope(StatusCode::FORBIDDEN, "{}"),
            Err(ReportError::Authentication(_))
        ));
    }

    #[test]
    fn test_envelope_server_error_with_html_body() {
        assert!(matches!(
            parse_envelope(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>"),
            Err(ReportError::Api { status: 502, .. })
        ));
    }

    #[test]
    fn test_missing_token() {
        assert!(matches!(
            parse_token(&json!({ "releaseSession": false })),
            Err(ReportError::Authentication(_))
        ));
    }

    #[test]
    fn test_analysis_request_shape() {
        let filters = vec![Criterion::equals("pluginID", "22869"), Criterion::equals("ip", "10.0.0.1")];
        let body = analysis_request(&filters, 500);

        assert_eq!(body["query"]["tool"], "vulndetails");
        assert_eq!(body["query"]["endOffset"], 500);
        assert_eq!(body["query"]["filters"][0]["filterName"], "pluginID");
        assert_eq!(body["query"]["filters"][1]["value"], "10.0.0.1");
    }

    #[test]
    fn test_parse_results() {
        let payload = json!({ "totalRecords": "1", "results": [{ "ip": "10.0.0.1" }] });
        let results = parse_results(payload).unwrap();
        assert_eq!(results.len(), 1);

        assert!(parse_results(json!({ "totalRecords": "0" })).unwrap().is_empty());
        assert!(parse_results(json!([])).is_err());
    }

    #[test]
    fn test_client_requires_login() {
        let client = SecurityCenterClient::new(&ClientSettings {
            host: "sc.example.edu".to_string(),
            timeout: Duration::from_secs(5),
            accept_invalid_certs: false,
            max_results: 10,
        })
        .unwrap();

        let request = client.http.get(client.url("repository"));
        assert!(matches!(
            client.authorized(request),
            Err(ReportError::Authentication(_))
        ));
    }
}
