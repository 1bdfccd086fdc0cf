//! Error types for MailSRS

use thiserror::Error;

/// Reason an address carrying an SRS tag could not be parsed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatError {
    #[error("missing SRS0/SRS1 tag")]
    MissingTag,

    #[error("invalid separator after tag")]
    InvalidSeparator,

    #[error("signature field must be 4 hex digits")]
    InvalidHash,

    #[error("timestamp field must be 2 base32 characters")]
    InvalidTimestamp,

    #[error("missing '=' before {0} field")]
    MissingField(&'static str),
}

/// Main error type for MailSRS
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unrecognized SRS format: {0}")]
    UnrecognizedFormat(#[from] FormatError),

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Address has expired")]
    Expired,

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for MailSRS
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config(_) => "CONFIG_ERROR",
            Error::UnrecognizedFormat(_) => "UNRECOGNIZED_FORMAT",
            Error::InvalidSignature => "INVALID_SIGNATURE",
            Error::Expired => "EXPIRED",
            Error::Validation(_) => "VALIDATION_ERROR",
        }
    }

    /// Returns the SMTP reply code and enhanced status code an MTA should
    /// answer with when rejecting a bounce because of this error
    pub fn smtp_reply(&self) -> (u16, &'static str) {
        match self {
            Error::Config(_) => (451, "4.3.5"),
            Error::UnrecognizedFormat(_) => (550, "5.1.1"),
            Error::InvalidSignature => (550, "5.7.1"),
            Error::Expired => (550, "5.7.1"),
            Error::Validation(_) => (553, "5.1.3"),
        }
    }

    /// Whether retrying the same input can ever succeed
    pub fn is_permanent(&self) -> bool {
        !matches!(self, Error::Config(_))
    }
}
