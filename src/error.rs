use thiserror::Error;

/// Configuration errors raised while building a [`crate::Generator`].
///
/// Bad field values are never errors; they simply produce no token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WordgenError {
    #[error("unknown template \"{0}\" (run with --list-templates to see the catalog)")]
    UnknownTemplate(String),

    #[error("malformed pattern \"{pattern}\": {reason}")]
    MalformedPattern { pattern: String, reason: String },

    #[error("unknown profile field \"{0}\"")]
    UnknownField(String),

    #[error("unknown token kind \"{0}\"")]
    UnknownKind(String),
}

pub type Result<T> = std::result::Result<T, WordgenError>;
