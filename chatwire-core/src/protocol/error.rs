//! Error envelope returned by the remote service

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `{"error": {...}}` body sent with a failed request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{error}")]
pub struct ChatError {
    pub error: ChatErrorDetail,
}

/// Contents of the error envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{error_type}: {message}")]
pub struct ChatErrorDetail {
    /// Human readable description
    pub message: String,

    /// Error category, e.g. `invalid_request_error`
    #[serde(rename = "type")]
    pub error_type: String,

    /// Request parameter the error refers to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,

    /// Machine readable error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ChatError {
    pub fn new(message: impl Into<String>, error_type: impl Into<String>) -> Self {
        Self {
            error: ChatErrorDetail {
                message: message.into(),
                error_type: error_type.into(),
                param: None,
                code: None,
            },
        }
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.error.param = Some(param.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.error.code = Some(code.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.error.message
    }

    pub fn error_type(&self) -> &str {
        &self.error.error_type
    }
}
