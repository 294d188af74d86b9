//! Error types for sqlforge.

use thiserror::Error;

/// The main error type for compiling a query tree to SQL.
#[derive(Debug, Error)]
pub enum SqlError {
    /// The query uses a construct the target dialect cannot express.
    #[error("{dialect} does not support {feature}")]
    UnsupportedFeature {
        dialect: &'static str,
        feature: String,
    },

    /// A node is missing an attribute the current clause requires
    /// (e.g. a CREATE TABLE column without a data type).
    #[error("Missing required attribute: {0}")]
    MissingAttribute(String),

    /// A node appeared in a position the renderer can never reach through
    /// the builder layer. Indicates a programming error, not user input.
    #[error("Unrecognized node in this position: {0}")]
    UnrecognizedNode(&'static str),

    /// Unknown dialect name, empty query name, or an identifier the
    /// active quoting style cannot represent.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl SqlError {
    /// Create an unsupported-feature error for the given dialect.
    pub fn unsupported(dialect: &'static str, feature: impl Into<String>) -> Self {
        Self::UnsupportedFeature {
            dialect,
            feature: feature.into(),
        }
    }

    /// Create a missing-attribute error.
    pub fn missing(message: impl Into<String>) -> Self {
        Self::MissingAttribute(message.into())
    }
}

/// Result type alias for sqlforge operations.
pub type Result<T> = std::result::Result<T, SqlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SqlError::unsupported("SQLite", "the RETURNING clause");
        assert_eq!(
            err.to_string(),
            "SQLite does not support the RETURNING clause"
        );

        let err = SqlError::missing("dataType missing for column id");
        assert_eq!(
            err.to_string(),
            "Missing required attribute: dataType missing for column id"
        );
    }
}
