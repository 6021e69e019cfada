//! Error types for address operations.

use std::fmt;

/// Result type alias for address operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Address error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Address text could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A domain could not be converted to or from its IDN form.
    #[error("Bad IDN '{mailbox}': {reason}")]
    Idn {
        /// The offending mailbox, as it was before conversion.
        mailbox: String,
        /// Why the conversion failed.
        reason: String,
    },

    /// Text cannot be represented in the requested charset.
    #[error("Charset conversion error: {0}")]
    Charset(String),

    /// Charset label not recognised.
    #[error("Unknown charset: {0}")]
    UnknownCharset(String),
}

/// Reasons why address text fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// A `(` comment was never closed.
    MismatchedParen,
    /// A `"` quoted string was never closed.
    MismatchedQuote,
    /// A source route (`<@a,@b:user@host>`) is malformed.
    BadRoute,
    /// An angle-bracket address is not terminated by `>`.
    BadRouteAddr,
    /// Trailing garbage after an address spec.
    BadAddrSpec,
}

impl ParseError {
    /// Get human-readable error message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        match self {
            Self::MismatchedParen => "mismatched parentheses",
            Self::MismatchedQuote => "mismatched quotes",
            Self::BadRoute => "bad route in <>",
            Self::BadRouteAddr => "bad address in <>",
            Self::BadAddrSpec => "bad addr-spec",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ParseError {}

impl Error {
    /// Creates an IDN error for a mailbox.
    #[must_use]
    pub fn idn(mailbox: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Idn {
            mailbox: mailbox.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns the offending mailbox for IDN errors.
    #[must_use]
    pub fn mailbox(&self) -> Option<&str> {
        match self {
            Self::Idn { mailbox, .. } => Some(mailbox),
            _ => None,
        }
    }
}
