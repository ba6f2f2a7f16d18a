/// The coordination store could not be reached.
///
/// Losing a race is not an error; see [`GuardOutcome::Skipped`](crate::GuardOutcome::Skipped).
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("coordination store unavailable for `{key}`: {message}")]
    Upstream { key: String, message: String },
}

impl GuardError {
    pub fn upstream(key: &str, message: impl Into<String>) -> Self {
        Self::Upstream {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
