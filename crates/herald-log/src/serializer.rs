//! Structured serializer used by `log_serialized`.

use serde::Serialize;

/// Converts a value into text for logging.
pub trait StructuredSerializer: Send + Sync {
    /// Error raised when a value cannot be serialized.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Serialize `value` into its textual form.
    ///
    /// # Errors
    ///
    /// Returns the serializer's own error when `value` cannot be represented.
    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, Self::Error>;
}

/// JSON serializer backed by `serde_json`; compact unless `pretty` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonSerializer {
    /// Indent the output.
    pub pretty: bool,
}

impl StructuredSerializer for JsonSerializer {
    type Error = serde_json::Error;

    fn serialize<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, Self::Error> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}
