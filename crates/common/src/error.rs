//! Error types for amqpctl

use thiserror::Error;

/// Result type alias using amqpctl Error
pub type Result<T> = std::result::Result<T, Error>;

/// amqpctl error types
#[derive(Error, Debug)]
pub enum Error {
    /// The request could not be made at all.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The control plane answered with a status outside the accepted set.
    #[error("{operation} failed, status: {status}, message: {body}")]
    Api {
        operation: String,
        status: u16,
        body: serde_json::Value,
    },

    #[error("Invalid identifier for {kind}: {value}")]
    MissingIdentifier { kind: String, value: String },

    #[error("Couldn't find notice alarm for instance_id {instance_id}")]
    NoticeAlarmNotFound { instance_id: i64 },

    #[error("{what} disappeared while waiting for it to become ready")]
    Vanished { what: String },

    #[error("Reconciliation of {what} did not settle after {attempts} attempts")]
    Stalled { what: String, attempts: u32 },

    #[error("Reconciliation of {what} timed out after {seconds}s")]
    Timeout { what: String, seconds: u64 },

    #[error("Reconciliation of {what} was canceled")]
    Canceled { what: String },

    #[error("Invalid resource identity: {0}")]
    InvalidIdentity(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl Error {
    /// Status code of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error came from a poll loop bound rather than the API
    pub fn is_poll_bound(&self) -> bool {
        matches!(
            self,
            Error::Stalled { .. } | Error::Timeout { .. } | Error::Canceled { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_embeds_status_and_body() {
        let err = Error::Api {
            operation: "update alarm".to_string(),
            status: 404,
            body: serde_json::json!({"error": "Not found"}),
        };
        assert_eq!(
            err.to_string(),
            r#"update alarm failed, status: 404, message: {"error":"Not found"}"#
        );
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_poll_bound());
    }

    #[test]
    fn test_notice_alarm_message_names_instance() {
        let err = Error::NoticeAlarmNotFound { instance_id: 42 };
        assert!(err.to_string().contains("instance_id 42"));
    }

    #[test]
    fn test_poll_bounds() {
        assert!(Error::Canceled { what: "vpc 1".into() }.is_poll_bound());
        assert!(Error::Timeout { what: "vpc 1".into(), seconds: 5 }.is_poll_bound());
        assert!(Error::Stalled { what: "vpc 1".into(), attempts: 3 }.is_poll_bound());
        assert_eq!(Error::Transport("refused".into()).status(), None);
    }
}
