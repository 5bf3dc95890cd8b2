//! Error types for the binding layer.
//!
//! Every intrinsic reports failure synchronously through [`BindingError`].
//! The variants mirror the three error families a host sees: usage errors at
//! the argument boundary, invalid-parameter errors for unsupported identifiers
//! and structural violations, and wrapped native errors carrying the transfer
//! library's own code and message.

use std::fmt;

use thiserror::Error;

/// Coarse classification of a [`BindingError`], suitable for mapping onto a
/// host runtime's exception hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong argument count or type at the binding boundary.
    Usage,
    /// Unsupported identifier or structural invariant violation.
    InvalidParameter,
    /// The native transfer library reported a failure.
    Native,
    /// Allocation or initialization failure outside the caller's control.
    Runtime,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Usage => "usage",
            Self::InvalidParameter => "invalid_parameter",
            Self::Native => "native",
            Self::Runtime => "runtime",
        };
        write!(f, "{label}")
    }
}

/// Errors raised by binding operations.
#[derive(Debug, Error)]
pub enum BindingError {
    /// Wrong number or type of arguments.
    #[error("usage error: {message}")]
    Usage {
        /// What the caller got wrong.
        message: String,
    },

    /// Unsupported option/info identifier or invalid handle state.
    #[error("invalid parameter: {message}")]
    InvalidParameter {
        /// Description of the rejected parameter.
        message: String,
    },

    /// The handle was closed and may not be reused.
    #[error("{type_name} object has already been closed and may not be reused")]
    Closed {
        /// Registered type name of the closed handle.
        type_name: &'static str,
    },

    /// A transfer involving this handle is in progress.
    #[error("it is illegal to call this function while a transfer is running")]
    Running,

    /// An easy-handle call failed inside the transfer library.
    #[error("{description}: {detail}")]
    Curl {
        /// Native `CURLcode`.
        code: i32,
        /// Stringified native code.
        description: String,
        /// Contents of the handle's error buffer, if any.
        detail: String,
    },

    /// A multi-handle call failed inside the transfer library.
    #[error("{description}")]
    Multi {
        /// Native `CURLMcode`.
        code: i32,
        /// Stringified native code.
        description: String,
    },

    /// Allocation or global initialization failure.
    #[error("{message}")]
    Runtime {
        /// Description of the failure.
        message: String,
    },
}

impl BindingError {
    /// Creates a usage error.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Creates an invalid-parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Creates a runtime error.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime {
            message: message.into(),
        }
    }

    /// Wraps a native easy-handle error together with the handle's error buffer.
    ///
    /// An empty buffer falls back to the extra description the `curl` crate
    /// captured, if any.
    pub fn curl(error: &curl::Error, errbuf: &str) -> Self {
        let detail = if errbuf.is_empty() {
            error.extra_description().unwrap_or_default().to_string()
        } else {
            errbuf.to_string()
        };
        Self::Curl {
            code: error.code() as i32,
            description: error.description().to_string(),
            detail,
        }
    }

    /// Wraps a native multi-handle error.
    pub fn multi(error: &curl::MultiError) -> Self {
        Self::Multi {
            code: error.code(),
            description: error.description().to_string(),
        }
    }

    /// Returns the error's classification.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Usage { .. } => ErrorKind::Usage,
            Self::InvalidParameter { .. } | Self::Closed { .. } | Self::Running => {
                ErrorKind::InvalidParameter
            }
            Self::Curl { .. } | Self::Multi { .. } => ErrorKind::Native,
            Self::Runtime { .. } => ErrorKind::Runtime,
        }
    }

    /// Returns the native code for wrapped native errors.
    #[must_use]
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Curl { code, .. } | Self::Multi { code, .. } => Some(*code),
            _ => None,
        }
    }
}

// No `From<curl::Error>`: a native error is only meaningful together with the
// error buffer of the handle that produced it, so callers go through
// `BindingError::curl`.
