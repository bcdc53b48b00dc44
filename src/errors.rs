/*!
 * Error types for the ebt-translator application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by the quotation core.
///
/// Structural variants carry the offending text verbatim so that a corrupt
/// fragment can be located in the source corpus.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    /// Unknown convention tag
    #[error("Unsupported quotation convention: {tag}")]
    Configuration {
        /// The tag that failed to resolve
        tag: String,
    },

    /// A close glyph was found with no open quotation
    #[error("Unmatched close quote: {text}")]
    UnmatchedCloseQuote {
        /// The text being processed
        text: String,
    },

    /// An open glyph would exceed the convention's maximum depth
    #[error("Quote nesting exceeded: {text}")]
    NestingExceeded {
        /// The text being processed
        text: String,
    },

    /// A glyph that is neither the expected open nor the expected close
    #[error("Invalid quote [{glyph}] for level {level}: {text}")]
    InvalidGlyphForLevel {
        /// The glyph that was found
        glyph: String,
        /// The nesting level at which it was found
        level: usize,
        /// The text being processed
        text: String,
    },
}

impl QuoteError {
    /// Whether this error describes a text inconsistent with its assumed level
    pub fn is_structural(&self) -> bool {
        !matches!(self, Self::Configuration { .. })
    }
}

/// Errors that can occur when working with the translation engine
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error related to rate limiting or exhausted character quota
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while reading glossary files
#[derive(Error, Debug)]
pub enum GlossaryError {
    /// A line has a key but no value
    #[error("No value for glossary key: {key}")]
    MissingValue {
        /// The dangling key
        key: String,
    },

    /// A line has a value but no key
    #[error("No key for glossary value: {value}")]
    MissingKey {
        /// The dangling value
        value: String,
    },

    /// The glossary file could not be read
    #[error("Glossary file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur during translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the quotation core
    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    /// Error from the translation engine
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from glossary handling
    #[error("Glossary error: {0}")]
    Glossary(#[from] GlossaryError),

    /// The engine returned a different number of texts than it was given
    #[error("Engine returned {actual} texts for {expected} inputs")]
    SegmentCountMismatch {
        /// Number of texts sent
        expected: usize,
        /// Number of texts received
        actual: usize,
    },

    /// A configured text transform has an invalid pattern
    #[error("Invalid text transform '{pattern}': {message}")]
    InvalidTransform {
        /// The offending regex source
        pattern: String,
        /// The regex compiler's message
        message: String,
    },

    /// A resource file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the translation engine
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the quotation core
    #[error("Quote error: {0}")]
    Quote(#[from] QuoteError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
