use thiserror::Error;

/// Unified error type for the mazeflow library.
///
/// Absence of a path is never an error; it is surfaced as `Ok(None)` by the
/// solver entry points. This type covers genuine failures only: malformed
/// maze descriptions, IO while loading them, and worker tasks that died.
#[derive(Debug, Error)]
pub enum MazeflowError {
    /// Validation errors (malformed maze descriptions, bad preconditions)
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// IO errors while loading maze descriptions
    #[error("IO operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization errors
    #[error("Serialization failed: {format}")]
    Serialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Execution-related errors (a search task panicked or was aborted)
    #[error("Execution failed in {component}: {message}")]
    Execution {
        component: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl MazeflowError {
    /// Create a validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error tied to a specific field
    pub fn validation_field<S: Into<String>>(message: S, field: S) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create an IO error with operation context
    pub fn io<S: Into<String>>(operation: S, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization<S: Into<String>>(
        format: S,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::Serialization {
            format: format.into(),
            source,
        }
    }

    /// Create an execution error with context
    pub fn execution<S: Into<String>>(component: S, message: S) -> Self {
        Self::Execution {
            component: component.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Result type alias for mazeflow operations
pub type Result<T> = std::result::Result<T, MazeflowError>;
