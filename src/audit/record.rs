//! Audit result records and API response parsing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Outcome category of one audited number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    /// API answered with a parsable package list
    Success,
    /// Request failed in a way worth moving past (HTTP status, timeout, bad JSON)
    Skipped,
    /// Unexpected failure while checking
    ApiError,
    /// Failure inside the queue itself
    QueueError,
}

impl AuditStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditStatus::Success => "success",
            AuditStatus::Skipped => "skipped",
            AuditStatus::ApiError => "api_error",
            AuditStatus::QueueError => "queue_error",
        }
    }

    pub fn is_success(self) -> bool {
        self == AuditStatus::Success
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result for one phone number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    pub nomor: String,
    pub status: AuditStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kartu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act_kartu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_kartu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act_paket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_paket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<Value>,
}

impl AuditResult {
    fn empty(nomor: &str, status: AuditStatus) -> Self {
        Self {
            nomor: nomor.to_string(),
            status,
            kartu: None,
            act_kartu: None,
            end_kartu: None,
            paket: None,
            act_paket: None,
            end_paket: None,
            balance: None,
            error: None,
            message: None,
            raw_response: None,
        }
    }

    /// A failed check with an error and an explanatory message.
    pub fn failed(
        nomor: &str,
        status: AuditStatus,
        error: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: Some(error.into()),
            message: Some(message.into()),
            ..Self::empty(nomor, status)
        }
    }

    /// Skipped result: the worker moves on to the next number.
    pub fn skipped(nomor: &str, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::failed(nomor, AuditStatus::Skipped, error, message)
    }
}

/// Convert an international `62…` MSISDN to the local `0…` form.
pub fn normalize_msisdn(msisdn: &str) -> String {
    match msisdn.strip_prefix("62") {
        Some(rest) => format!("0{}", rest),
        None => msisdn.to_string(),
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Extract card and package details from a package-status response.
///
/// `requested` is used as the number when the response has no `msisdn`.
/// When several services match an identifier, the last one wins.
pub fn parse_api_response(
    requested: &str,
    response: &Value,
    identifier_kartu: &str,
    identifier_paket: &str,
) -> AuditResult {
    let nomor = string_field(response, "msisdn")
        .filter(|m| !m.is_empty())
        .map(|m| normalize_msisdn(&m))
        .unwrap_or_else(|| requested.to_string());

    let mut result = AuditResult::empty(&nomor, AuditStatus::Success);
    result.balance = Some(string_field(response, "custbalanceinfo").unwrap_or_else(|| "0".into()));

    let kartu_id = identifier_kartu.to_lowercase();
    let paket_id = identifier_paket.to_lowercase();

    let services = response
        .get("Services")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for service in services {
        let Some(package_name) = string_field(service, "packagename") else {
            continue;
        };
        let lowered = package_name.to_lowercase();

        if lowered.contains(&kartu_id) {
            result.kartu = Some(package_name.clone());
            result.act_kartu = Some(string_field(service, "activationdate").unwrap_or_default());
            result.end_kartu = Some(string_field(service, "enddate").unwrap_or_default());
        }
        if lowered.contains(&paket_id) {
            result.paket = Some(package_name.clone());
            result.act_paket = Some(string_field(service, "activationdate").unwrap_or_default());
            result.end_paket = Some(string_field(service, "enddate").unwrap_or_default());
        }
    }

    result.raw_response = Some(response.clone());
    result
}
