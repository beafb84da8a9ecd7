//! Package-status API client.

use crate::audit::record::{parse_api_response, AuditResult, AuditStatus};
use crate::config::AuditConfig;
use crate::error::Result;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

/// Checks a single phone number. Never fails: problems become result records.
pub trait NumberChecker: Send + 'static {
    fn check(&self, nomor: &str) -> AuditResult;
}

/// Queries `GET <api_url>?username=<u>&to=<nomor>`.
pub struct HttpChecker {
    client: Client,
    api_url: String,
    username: String,
    identifier_kartu: String,
    identifier_paket: String,
    timeout: Duration,
}

impl HttpChecker {
    pub fn new(config: &AuditConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = Client::builder()
            .user_agent(concat!("rekap/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            username: config.username.clone(),
            identifier_kartu: config.identifier_kartu.clone(),
            identifier_paket: config.identifier_paket.clone(),
            timeout,
        })
    }

    fn request_error(&self, nomor: &str, err: reqwest::Error) -> AuditResult {
        if err.is_timeout() {
            AuditResult::skipped(
                nomor,
                "Request timeout",
                format!("Request timed out after {} seconds", self.timeout.as_secs()),
            )
        } else if err.is_connect() {
            AuditResult::skipped(nomor, "Connection error", "Failed to connect to API")
        } else if err.is_builder() {
            AuditResult::failed(nomor, AuditStatus::ApiError, err.to_string(), "Unexpected error")
        } else {
            AuditResult::skipped(nomor, err.to_string(), "Request failed")
        }
    }
}

impl NumberChecker for HttpChecker {
    fn check(&self, nomor: &str) -> AuditResult {
        tracing::info!("checking {}", nomor);

        let response = match self
            .client
            .get(&self.api_url)
            .query(&[("username", self.username.as_str()), ("to", nomor)])
            .send()
        {
            Ok(response) => response,
            Err(err) => return self.request_error(nomor, err),
        };

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return AuditResult::skipped(
                nomor,
                format!("HTTP {}", status.as_u16()),
                "Invalid HTTP status",
            );
        }

        let body = match response.text() {
            Ok(body) => body,
            Err(err) => return self.request_error(nomor, err),
        };

        match serde_json::from_str::<Value>(&body) {
            Ok(json @ Value::Object(_)) => parse_api_response(
                nomor,
                &json,
                &self.identifier_kartu,
                &self.identifier_paket,
            ),
            Ok(other) => AuditResult::failed(
                nomor,
                AuditStatus::ApiError,
                format!("expected a JSON object, got {}", json_kind(&other)),
                "Unexpected error",
            ),
            Err(_) => AuditResult::skipped(nomor, "Invalid JSON response", "JSON parsing failed"),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn config(server: &MockServer) -> AuditConfig {
        AuditConfig {
            api_url: server.url("/get_package_status"),
            username: "ops".to_string(),
            timeout_seconds: 5,
            ..AuditConfig::default()
        }
    }

    #[test]
    fn test_success_sends_username_and_number() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/get_package_status")
                .query_param("username", "ops")
                .query_param("to", "081100001");
            then.status(200).json_body(json!({
                "msisdn": "6281100001",
                "custbalanceinfo": "1000",
                "Services": [{"packagename": "Kartu Halo", "activationdate": "a", "enddate": "b"}]
            }));
        });

        let checker = HttpChecker::new(&config(&server)).unwrap();
        let result = checker.check("081100001");

        mock.assert();
        assert_eq!(result.status, AuditStatus::Success);
        assert_eq!(result.nomor, "081100001");
        assert_eq!(result.kartu.as_deref(), Some("Kartu Halo"));
    }

    #[test]
    fn test_non_200_is_skipped() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/get_package_status");
            then.status(503);
        });

        let checker = HttpChecker::new(&config(&server)).unwrap();
        let result = checker.check("0811");
        assert_eq!(result.status, AuditStatus::Skipped);
        assert_eq!(result.error.as_deref(), Some("HTTP 503"));
    }

    #[test]
    fn test_invalid_json_is_skipped() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/get_package_status");
            then.status(200).body("<html>oops</html>");
        });

        let checker = HttpChecker::new(&config(&server)).unwrap();
        let result = checker.check("0811");
        assert_eq!(result.status, AuditStatus::Skipped);
        assert_eq!(result.error.as_deref(), Some("Invalid JSON response"));
    }

    #[test]
    fn test_non_object_json_is_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/get_package_status");
            then.status(200).json_body(json!([]));
        });

        let checker = HttpChecker::new(&config(&server)).unwrap();
        let result = checker.check("0811");
        assert_eq!(result.status, AuditStatus::ApiError);
        assert_eq!(result.nomor, "0811");
        assert_eq!(result.message.as_deref(), Some("Unexpected error"));
        assert_eq!(
            result.error.as_deref(),
            Some("expected a JSON object, got an array")
        );
        assert!(result.kartu.is_none());
        assert!(result.balance.is_none());
    }

    #[test]
    fn test_null_json_is_api_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/get_package_status");
            then.status(200).body("null");
        });

        let checker = HttpChecker::new(&config(&server)).unwrap();
        assert_eq!(checker.check("0811").status, AuditStatus::ApiError);
    }

    #[test]
    fn test_connection_refused_is_skipped() {
        let cfg = AuditConfig {
            // Port 9 (discard) on localhost is closed in test environments
            api_url: "http://127.0.0.1:9/get_package_status".to_string(),
            timeout_seconds: 2,
            ..AuditConfig::default()
        };
        let checker = HttpChecker::new(&cfg).unwrap();
        let result = checker.check("0811");
        assert_eq!(result.status, AuditStatus::Skipped);
        assert_eq!(result.nomor, "0811");
    }
}
