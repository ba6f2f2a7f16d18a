use std::io;

/// Errors raised while loading or persisting a record document.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("no record document for `{id}`")]
    NotFound { id: String },

    #[error("malformed record document `{id}`: {message}")]
    Parse { id: String, message: String },

    #[error("record `{id}` could not be serialized: {message}")]
    Serialize { id: String, message: String },

    #[error("`{id}` is not usable as a file name")]
    InvalidId { id: String },

    #[error("record store unavailable for `{id}`: {source}")]
    Upstream {
        id: String,
        #[source]
        source: io::Error,
    },
}

impl RecordError {
    pub fn parse(id: &str, message: impl Into<String>) -> Self {
        Self::Parse {
            id: id.to_string(),
            message: message.into(),
        }
    }

    pub fn serialize(id: &str, message: impl Into<String>) -> Self {
        Self::Serialize {
            id: id.to_string(),
            message: message.into(),
        }
    }

    /// Map an I/O failure: a missing document is `NotFound`, anything else is upstream.
    pub fn from_io(id: &str, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Self::NotFound { id: id.to_string() }
        } else {
            Self::Upstream {
                id: id.to_string(),
                source,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Reject identifiers that would leave their directory when joined onto it.
pub fn check_path_component(id: &str) -> Result<(), RecordError> {
    let escapes = id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', '\0']);
    if escapes {
        return Err(RecordError::InvalidId { id: id.to_string() });
    }
    Ok(())
}
