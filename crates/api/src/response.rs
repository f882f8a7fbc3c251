//! Shared response envelope types for API handlers.
//!
//! Successful responses carry `status: true`, an optional human-readable
//! `message`, and the payload under `data`. Errors use the shape produced by
//! [`crate::error::AppError`].

use serde::Serialize;

/// Standard `{ "status": true, "message"?: ..., "data": T }` envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    /// Envelope with payload only.
    pub fn new(data: T) -> Self {
        Self {
            status: true,
            message: None,
            data,
        }
    }

    /// Envelope with payload and a message, used by create endpoints.
    pub fn with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            status: true,
            message: Some(message.into()),
            data,
        }
    }
}
