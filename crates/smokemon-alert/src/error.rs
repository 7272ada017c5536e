use smokemon_common::types::RejectReason;

/// Per-message failures. None of these stop a channel; each becomes a
/// [`smokemon_common::types::RejectedInput`].
///
/// # Examples
///
/// ```rust
/// use smokemon_alert::error::IngestError;
/// use smokemon_common::types::RejectReason;
///
/// let err = IngestError::UnknownChannel("04-food-C".to_string());
/// assert_eq!(err.reason(), RejectReason::MalformedFormat);
/// assert!(err.to_string().contains("04-food-C"));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IngestError {
    /// Payload did not split into exactly `timestamp,value`.
    #[error("expected 2 comma-separated fields, found {0}")]
    FieldCount(usize),

    #[error("payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("unable to parse timestamp '{0}'")]
    Timestamp(String),

    #[error("unable to parse temperature '{0}'")]
    Value(String),

    /// No processor is registered for the channel.
    #[error("no processor registered for channel '{0}'")]
    UnknownChannel(String),
}

impl IngestError {
    pub fn reason(&self) -> RejectReason {
        match self {
            IngestError::FieldCount(_)
            | IngestError::InvalidUtf8
            | IngestError::UnknownChannel(_) => RejectReason::MalformedFormat,
            IngestError::Timestamp(_) => RejectReason::UnparsableTimestamp,
            IngestError::Value(_) => RejectReason::UnparsableValue,
        }
    }
}

/// Invalid channel setup detected while building the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("channel id must not be empty")]
    EmptyChannelId,

    #[error("channel '{0}' is registered more than once")]
    DuplicateChannel(String),

    #[error("channel '{channel_id}': window_capacity must be at least 2, got {capacity}")]
    WindowTooSmall { channel_id: String, capacity: usize },

    #[error("channel '{channel_id}': alert_threshold must be finite and non-negative, got {value}")]
    InvalidThreshold { channel_id: String, value: f64 },

    #[error("channel '{channel_id}': max_window_minutes must be finite and positive, got {value}")]
    InvalidWindowMinutes { channel_id: String, value: f64 },
}

/// Convenience `Result` alias for engine construction.
pub type Result<T> = std::result::Result<T, ConfigError>;
