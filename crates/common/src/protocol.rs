//! Request and response types exchanged between components.
//!
//! These types are serialised as JSON over the local HTTP API and, for
//! [`EncryptedAnswer`], in the answer store backend.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Answer store records
// ---------------------------------------------------------------------------

/// One stored answer: a semantic field identifier and its opaque ciphertext.
///
/// At most one current ciphertext exists per field; writes replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedAnswer {
    /// Semantic answer identifier, e.g. `"oldFirstName"`.
    pub field: String,
    /// `base64(IV ‖ ciphertext ‖ tag)`; opaque to everything but the cipher.
    pub ciphertext: String,
}

// ---------------------------------------------------------------------------
// Answers endpoints
// ---------------------------------------------------------------------------

/// Request body for `PUT /answers/:field`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetAnswerRequest {
    /// The plaintext answer: a string, boolean or list of strings depending on the field.
    pub value: serde_json::Value,
}

/// Response body for `GET /answers`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswersResponse {
    /// Decrypted answers keyed by field name.
    pub answers: serde_json::Value,
    /// Fields whose stored ciphertext could not be decrypted or parsed.
    pub failed_fields: Vec<String>,
}

// ---------------------------------------------------------------------------
// Forms endpoints
// ---------------------------------------------------------------------------

/// Metadata describing one registered form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    /// Opaque form ID, `"<jurisdiction>/<code>-<slug>"`.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Court form code, e.g. `"CJP 27"`.
    pub code: String,
    /// Jurisdiction key, e.g. `"ma"`.
    pub jurisdiction: String,
}

/// Response body for `GET /forms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormListResponse {
    pub forms: Vec<FormSummary>,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    /// Whether the device key is currently loaded in memory.
    pub key_ready: bool,
    /// Number of form definitions registered.
    pub forms_registered: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn encrypted_answer_wire_shape() {
        let a = EncryptedAnswer {
            field: "oldFirstName".into(),
            ciphertext: "AAAA".into(),
        };
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v, json!({"field": "oldFirstName", "ciphertext": "AAAA"}));
    }

    #[test]
    fn answers_response_uses_camel_case() {
        let r = AnswersResponse {
            answers: json!({}),
            failed_fields: vec!["email".into()],
        };
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(v["failedFields"][0], "email");
    }

    #[test]
    fn error_response_from_service_error() {
        let err = crate::ServiceError::NotFound("unknown form: x".into());
        let body = ErrorResponse::from(&err);
        assert_eq!(body.code, "not_found");
        assert!(body.message.contains("unknown form"));
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            key_ready: true,
            forms_registered: 2,
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.forms_registered, 2);
    }
}
