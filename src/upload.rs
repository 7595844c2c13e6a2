//! Decoding of the upload endpoint's response body.

use serde::Deserialize;

use crate::error::{Result, SiftError};
use crate::types::{LogEntry, LogType};

/// Entries and per-type totals for one uploaded file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct UploadPayload {
    pub entries: Vec<LogEntry>,
    #[serde(default)]
    pub log_types: Vec<LogType>,
}

/// Body returned by the upload endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum UploadResponse {
    Success(UploadPayload),
    Failure { error: String },
}

impl UploadResponse {
    /// Decode a response body and turn failures into errors.
    ///
    /// A non-2xx status is an error even if the body looks like a payload.
    pub fn from_json(status: u16, body: &str) -> Result<UploadPayload> {
        let response: UploadResponse = serde_json::from_str(body).map_err(|e| {
            if (200..300).contains(&status) {
                SiftError::InvalidPayload(e.to_string())
            } else {
                SiftError::Upload {
                    status,
                    message: "Error uploading file".to_string(),
                }
            }
        })?;

        match response {
            UploadResponse::Success(payload) if (200..300).contains(&status) => Ok(payload),
            UploadResponse::Success(_) => Err(SiftError::Upload {
                status,
                message: "Error uploading file".to_string(),
            }),
            UploadResponse::Failure { error } => Err(SiftError::Upload {
                status,
                message: error,
            }),
        }
    }
}
