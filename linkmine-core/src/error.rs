use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeywordError {
    #[error("Malformed URL '{url}': {source}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Cannot determine main domain of '{0}'")]
    MissingHost(String),

    #[error("Malformed record at line {line}: {content}")]
    MalformedRecord { line: usize, content: String },

    #[error("Record store error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KeywordError>;

/// Callback for reporting non-fatal issues as they come in
pub type IssueCallback = Arc<dyn Fn(&KeywordError) + Send + Sync>;
