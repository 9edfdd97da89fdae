// API client module: contains a small blocking HTTP client that talks to
// the Blackbox build service. It is intentionally small and synchronous;
// the tool makes exactly one request per run.

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, COOKIE, REFERER};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::cookies::CookieMap;

/// Production endpoint of the build service.
pub const DEFAULT_BASE_URL: &str = "https://build.blackbox.ai";

/// Simple API client that holds a reqwest blocking client and the base
/// URL of the build service. Cookies are supplied per request; the
/// client itself carries no credentials.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

/// Body of the create-sandbox request. Fields mirror what the web UI
/// sends from the chat-history page.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SandboxRequest {
    pub session_id: String,
    pub ports: Vec<u16>,
    pub run_dev_server: bool,
}

impl SandboxRequest {
    /// The fixed payload for a session: dev server on port 3000.
    pub fn for_session(session_id: &str) -> Self {
        SandboxRequest {
            session_id: session_id.to_string(),
            ports: vec![3000],
            run_dev_server: true,
        }
    }
}

/// Expected response from the create-sandbox endpoint. Every field is
/// tolerated as absent; the UI prints a placeholder for missing ones.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SandboxResponse {
    #[serde(default)]
    pub success: bool,
    pub sandbox_id: Option<String>,
    pub session_id: Option<String>,
    /// Provisioning time in milliseconds.
    pub duration: Option<f64>,
    pub dev_server_started: Option<bool>,
    pub npm_install_completed: Option<bool>,
}

/// What the one request came back as. Transport failures (network
/// errors, unparseable 2xx bodies) are `Err` from `create_sandbox`
/// instead, so callers report them with the underlying message.
#[derive(Debug)]
pub enum SandboxOutcome {
    /// 2xx with `success: true`; carries the full response payload.
    Created(SandboxResponse),
    /// HTTP 401: the supplied cookies no longer authenticate.
    AuthExpired,
    /// Any other refusal: non-2xx status, or `success: false`. Carries
    /// the raw reason text for the user to read.
    Rejected(String),
}

impl ApiClient {
    /// Create an ApiClient configured from the environment variable
    /// `SANDBOX_API_URL` or fallback to the production endpoint.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("SANDBOX_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ApiClient { client, base_url })
    }

    /// Request a sandbox for `session_id`, authenticating with the
    /// browser-exported `cookies`. One POST, no retries; interpretation
    /// of the result is delegated to `interpret_response`.
    pub fn create_sandbox(&self, session_id: &str, cookies: &CookieMap) -> Result<SandboxOutcome> {
        let url = format!("{}/api/create-sandbox-for-session", &self.base_url);
        let payload = SandboxRequest::for_session(session_id);
        let res = self
            .client
            .post(&url)
            .headers(request_headers(cookies)?)
            .json(&payload)
            .send()
            .context("Failed to send create-sandbox request")?;

        let status = res.status();
        let body = res
            .text()
            .context("Reading create-sandbox response body")?;
        interpret_response(status, &body)
    }
}

/// The fixed header set the endpoint expects, plus a `cookie` header
/// joining the mapping back into `name=value; name=value` form.
fn request_headers(cookies: &CookieMap) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.6"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(
        REFERER,
        HeaderValue::from_static("https://build.blackbox.ai/chat-history"),
    );

    let joined = cookies
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ");
    let value = HeaderValue::from_str(&joined)
        .context("Cookie values contain characters not allowed in a header")?;
    headers.insert(COOKIE, value);
    Ok(headers)
}

/// Turn an HTTP status and body text into a `SandboxOutcome`.
///
/// 401 wins over everything, including a well-formed body. Non-2xx is a
/// rejection carrying status and body. A 2xx body must parse as JSON;
/// `success: false` is a rejection carrying the raw payload.
pub fn interpret_response(status: StatusCode, body: &str) -> Result<SandboxOutcome> {
    if status == StatusCode::UNAUTHORIZED {
        return Ok(SandboxOutcome::AuthExpired);
    }
    if !status.is_success() {
        return Ok(SandboxOutcome::Rejected(format!(
            "HTTP {}: {}",
            status,
            body.trim()
        )));
    }

    let resp: SandboxResponse =
        serde_json::from_str(body).context("Parsing create-sandbox response json")?;
    if resp.success {
        Ok(SandboxOutcome::Created(resp))
    } else {
        Ok(SandboxOutcome::Rejected(body.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_response_carries_sandbox_id() {
        let body = r#"{
            "success": true,
            "sandboxId": "abc123",
            "sessionId": "sess-1",
            "duration": 4210,
            "devServerStarted": true,
            "npmInstallCompleted": false
        }"#;
        match interpret_response(StatusCode::OK, body).unwrap() {
            SandboxOutcome::Created(resp) => {
                assert_eq!(resp.sandbox_id.as_deref(), Some("abc123"));
                assert_eq!(resp.session_id.as_deref(), Some("sess-1"));
                assert_eq!(resp.duration, Some(4210.0));
                assert_eq!(resp.dev_server_started, Some(true));
                assert_eq!(resp.npm_install_completed, Some(false));
            }
            other => panic!("expected Created, got {:?}", other),
        }
    }

    #[test]
    fn unauthorized_wins_regardless_of_body() {
        let body = r#"{"success": true, "sandboxId": "abc123"}"#;
        match interpret_response(StatusCode::UNAUTHORIZED, body).unwrap() {
            SandboxOutcome::AuthExpired => {}
            other => panic!("expected AuthExpired, got {:?}", other),
        }
    }

    #[test]
    fn non_success_status_is_rejected_with_status_and_body() {
        match interpret_response(StatusCode::INTERNAL_SERVER_ERROR, "boom").unwrap() {
            SandboxOutcome::Rejected(reason) => {
                assert!(reason.contains("500"));
                assert!(reason.contains("boom"));
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn success_false_is_rejected_with_raw_payload() {
        let body = r#"{"success": false, "error": "session not found"}"#;
        match interpret_response(StatusCode::OK, body).unwrap() {
            SandboxOutcome::Rejected(reason) => {
                assert!(reason.contains("session not found"));
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn missing_success_field_counts_as_failure() {
        match interpret_response(StatusCode::OK, r#"{"sandboxId": "abc"}"#).unwrap() {
            SandboxOutcome::Rejected(_) => {}
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn unparseable_success_body_is_a_transport_error() {
        assert!(interpret_response(StatusCode::OK, "<html>gateway</html>").is_err());
    }

    #[test]
    fn response_tolerates_absent_fields() {
        let resp: SandboxResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(resp.success);
        assert!(resp.sandbox_id.is_none());
        assert!(resp.duration.is_none());
    }

    #[test]
    fn request_payload_shape() {
        let json = serde_json::to_value(SandboxRequest::for_session("sess-9")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sessionId": "sess-9",
                "ports": [3000],
                "runDevServer": true
            })
        );
    }

    #[test]
    fn cookie_header_joins_pairs() {
        let cookies = crate::cookies::parse_cookie_string("a=1; b=2");
        let headers = request_headers(&cookies).unwrap();
        assert_eq!(headers.get(COOKIE).unwrap(), "a=1; b=2");
        assert_eq!(headers.get(ACCEPT).unwrap(), "*/*");
    }

    #[test]
    fn control_characters_in_cookies_fail_header_build() {
        let mut cookies = CookieMap::new();
        cookies.insert("bad".into(), "line\nbreak".into());
        assert!(request_headers(&cookies).is_err());
    }
}
