use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // Input errors
    #[error("Invalid keypad symbol: {0:?}")]
    InvalidSymbol(char),

    #[error("Invalid menu position: {0}")]
    InvalidPosition(u8),

    // Code generation errors
    #[error("Charset must contain at least one character")]
    EmptyCharset,

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::InvalidSymbol('#').to_string(),
            "Invalid keypad symbol: '#'"
        );
        assert_eq!(
            Error::EmptyCharset.to_string(),
            "Charset must contain at least one character"
        );
        assert_eq!(
            Error::config("tiers unsorted").to_string(),
            "Configuration error: tiers unsorted"
        );
    }
}
