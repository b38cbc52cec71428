use thiserror::Error;

/// A pane refused or could not take a state write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("pane is closed")]
    PaneClosed,
    #[error("pane rejected state write: {0}")]
    Rejected(String),
}

/// Problems found in the user's rules. None of them stop a pass.
#[derive(Debug, Clone, Error)]
pub enum RuleError {
    #[error("folder rule {index}: folder `{folder}` does not exist or is not a folder")]
    UnknownFolder { index: usize, folder: String },
    #[error("{kind} rule {index}: malformed directive `{directive}`")]
    MalformedDirective {
        kind: &'static str,
        index: usize,
        directive: String,
    },
    #[error("file rule {index}: invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
