use crate::ingest::RdfFormat;
use vocab_record::RecordError;

#[derive(Debug, thiserror::Error)]
pub enum SummarizeError {
    /// Every format in the fallback chain failed.
    #[error("could not parse dump as any of {}", format_attempts(.attempts))]
    Parse {
        attempts: Vec<(RdfFormat, String)>,
    },

    #[error("dump {hint} is not valid gzip: {source}")]
    Decompress {
        hint: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("failed to read dump {path}: {source}")]
    Upstream {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn format_attempts(attempts: &[(RdfFormat, String)]) -> String {
    attempts
        .iter()
        .map(|(format, message)| format!("{format} ({message})"))
        .collect::<Vec<_>>()
        .join(", ")
}
