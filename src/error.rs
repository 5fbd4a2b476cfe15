//! Structured error types for label sheet generation.
//!
//! Configuration problems are caught before anything is drawn. Surface
//! failures propagate as-is; a missing logo is the one recoverable case.

/// The unified error type returned by all public labelsheet API functions.
#[derive(Debug, thiserror::Error)]
pub enum LabelError {
    /// JSON input (records or configuration) failed to parse.
    #[error("Failed to parse input: {source}{}", hint_suffix(.hint))]
    ParseError {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// Geometry or typography is unusable (non-positive sizes, grid larger
    /// than the page, min font above start font).
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    /// The render surface could not accept a draw call or write its output.
    #[error("Render surface error: {0}")]
    RenderSurfaceError(String),
    /// An image could not be read or decoded.
    #[error("Image error: {0}")]
    ImageError(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for LabelError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the expected shape. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input, is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        LabelError::ParseError { source: e, hint }
    }
}
