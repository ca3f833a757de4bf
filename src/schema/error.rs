use thiserror::Error;

/// Core error types for the schema codec
#[derive(Debug, Error)]
pub enum Error {
    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An expression arrived in a JSON shape the model cannot carry.
    ///
    /// Only null and arrays are unrepresentable; every object shape is
    /// either typed or preserved through the opaque expression arm.
    #[error("unsupported expression type: {json_type}")]
    UnsupportedShape { json_type: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_shape_names_the_json_type() {
        let err = Error::UnsupportedShape { json_type: "array" };
        assert_eq!(err.to_string(), "unsupported expression type: array");
    }

    #[test]
    fn test_serde_json_errors_convert() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = Error::from(parse_err);
        assert!(err.to_string().starts_with("JSON error:"));
    }
}
