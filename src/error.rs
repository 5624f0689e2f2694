//! Custom error types for the link directory controller
//!
//! Every entry point of the page controller returns these errors to the
//! error boundary, which turns them into a visible banner.

use std::fmt;

/// Main error type for the link directory controller
#[derive(Debug)]
pub enum LinkDeckError {
    /// A required page element could not be found
    MissingElement(String),

    /// The page has no links to pick from
    NoLinks,

    /// The preference store rejected a read or write
    Storage(String),

    /// A time or date could not be formatted
    Format(String),

    /// Error occurred while reading configuration file
    ConfigRead(std::io::Error),

    /// Error occurred while parsing configuration
    ConfigParse(json5::Error),

    /// Error occurred while rendering the page template
    Render(askama::Error),

    /// Generic error with a message
    Generic(String),
}

impl fmt::Display for LinkDeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkDeckError::MissingElement(selector) => {
                write!(f, "Page element not found: {selector}")
            }
            LinkDeckError::NoLinks => f.write_str("No links available on the page"),
            LinkDeckError::Storage(msg) => write!(f, "Preference storage error: {msg}"),
            LinkDeckError::Format(msg) => write!(f, "Formatting error: {msg}"),
            LinkDeckError::ConfigRead(e) => {
                write!(f, "Failed to read configuration file: {e}")
            }
            LinkDeckError::ConfigParse(e) => {
                write!(f, "Failed to parse configuration: {e}")
            }
            LinkDeckError::Render(e) => write!(f, "Failed to render page: {e}"),
            LinkDeckError::Generic(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for LinkDeckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LinkDeckError::ConfigRead(e) => Some(e),
            LinkDeckError::ConfigParse(e) => Some(e),
            LinkDeckError::Render(e) => Some(e),
            LinkDeckError::MissingElement(_)
            | LinkDeckError::NoLinks
            | LinkDeckError::Storage(_)
            | LinkDeckError::Format(_)
            | LinkDeckError::Generic(_) => None,
        }
    }
}

impl From<std::io::Error> for LinkDeckError {
    fn from(error: std::io::Error) -> Self {
        LinkDeckError::ConfigRead(error)
    }
}

impl From<json5::Error> for LinkDeckError {
    fn from(error: json5::Error) -> Self {
        LinkDeckError::ConfigParse(error)
    }
}

impl From<serde_json::Error> for LinkDeckError {
    fn from(error: serde_json::Error) -> Self {
        LinkDeckError::Generic(format!("Invalid configuration value: {error}"))
    }
}

impl From<askama::Error> for LinkDeckError {
    fn from(error: askama::Error) -> Self {
        LinkDeckError::Render(error)
    }
}

impl From<&str> for LinkDeckError {
    fn from(msg: &str) -> Self {
        LinkDeckError::Generic(msg.to_string())
    }
}

impl From<String> for LinkDeckError {
    fn from(msg: String) -> Self {
        LinkDeckError::Generic(msg)
    }
}

/// Result type alias using our custom error type
pub type Result<T> = std::result::Result<T, LinkDeckError>;
