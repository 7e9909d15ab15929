//! Errors reported by the prop's peripherals.
//!
//! Output drivers return these so the controller can log them and keep
//! playing; input device tasks end on the first one.

pub type Result<T> = std::result::Result<T, HardwareError>;

#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The device went away (unplugged, channel closed).
    #[error("{device} disconnected")]
    Disconnected { device: String },

    /// The driver cannot perform this operation.
    #[error("{operation} is not supported by this driver")]
    Unsupported { operation: String },

    /// Bus, GPIO or reader protocol failure.
    #[error("communication failed: {message}")]
    CommunicationError { message: String },

    /// A cue could not be started.
    #[error("cannot play cue: {message}")]
    PlaybackError { message: String },

    /// The device could not be opened at startup.
    #[error("device setup failed: {message}")]
    InitializationFailed { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl HardwareError {
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    pub fn communication(message: impl Into<String>) -> Self {
        Self::CommunicationError {
            message: message.into(),
        }
    }

    pub fn playback(message: impl Into<String>) -> Self {
        Self::PlaybackError {
            message: message.into(),
        }
    }

    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Whether the device is gone for good, as opposed to a single failed
    /// operation.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, Self::Disconnected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_error() {
        let error = HardwareError::disconnected("Keypad input channel");
        assert!(error.is_disconnect());
        assert_eq!(error.to_string(), "Keypad input channel disconnected");
    }

    #[test]
    fn test_unsupported_error() {
        let error = HardwareError::unsupported("start_pulse");
        assert!(!error.is_disconnect());
        assert_eq!(error.to_string(), "start_pulse is not supported by this driver");
    }

    #[test]
    fn test_communication_error() {
        let error = HardwareError::communication("LED strip SPI write failed");
        assert_eq!(
            error.to_string(),
            "communication failed: LED strip SPI write failed"
        );
    }

    #[test]
    fn test_playback_error() {
        let error = HardwareError::playback("mpg123 not found");
        assert_eq!(error.to_string(), "cannot play cue: mpg123 not found");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let error: HardwareError = io.into();
        assert!(matches!(error, HardwareError::Io(_)));
        assert_eq!(error.to_string(), "no such file");
    }
}
