use http::StatusCode;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::errors::DirectoryError;

/// Translate a failed directory call into the caller-facing taxonomy.
///
/// Transport failures become `ServiceUnavailable`. A directory rejection keeps its
/// status when it is a known 4xx/5xx code (502 otherwise) and its body verbatim.
/// An empty or non-UTF-8 body falls back to a generic message.
pub fn translate(error: DirectoryError) -> AuthError {
    match error {
        DirectoryError::Unavailable(reason) => {
            tracing::warn!(reason = %reason, "Credentials directory unreachable");
            AuthError::ServiceUnavailable(reason)
        }
        DirectoryError::Status { status, body } => {
            let forwarded = forwarded_status(status);
            tracing::warn!(
                status = status,
                forwarded_status = forwarded,
                "Credentials directory rejected request"
            );
            AuthError::Downstream {
                status: forwarded,
                message: extract_message(&body, status),
            }
        }
        DirectoryError::Decode(reason) => {
            tracing::warn!(reason = %reason, "Credentials directory response unreadable");
            AuthError::Downstream {
                status: StatusCode::BAD_GATEWAY.as_u16(),
                message: "Invalid response from credentials directory".to_string(),
            }
        }
    }
}

impl From<DirectoryError> for AuthError {
    fn from(error: DirectoryError) -> Self {
        translate(error)
    }
}

fn forwarded_status(status: u16) -> u16 {
    StatusCode::from_u16(status)
        .ok()
        .filter(|code| code.canonical_reason().is_some())
        .filter(|code| code.is_client_error() || code.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
        .as_u16()
}

fn extract_message(body: &[u8], status: u16) -> String {
    match std::str::from_utf8(body).map(str::trim) {
        Ok(text) if !text.is_empty() => text.to_string(),
        _ => format!("Credentials directory request failed with status {}", status),
    }
}
