//! Error kinds surfaced by table loading and validation.
//!
//! A failed checksum is not an error: `validate` returns `Ok(false)` for it.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ModulusError {
    /// Caller supplied a sort code or account number that cannot be checked.
    #[error("invalid {field}: {message}")]
    InvalidInput {
        field: InputField,
        message: String,
    },

    /// A rule or substitution resource is malformed.
    #[error("invalid {resource} at line {line}: {message}")]
    Configuration {
        resource: String,
        line: usize,
        message: String,
    },

    /// Unrecognized checking algorithm.
    #[error("unknown algorithm '{name}' (expected DBLAL, MOD10 or MOD11)")]
    Algorithm { name: String },

    /// A table or configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ModulusError {
    pub(crate) fn invalid_input(field: InputField, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }

    pub(crate) fn configuration(
        resource: impl Into<String>,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Configuration {
            resource: resource.into(),
            line,
            message: message.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::Io { .. })
    }
}

/// Which caller input a [`ModulusError::InvalidInput`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    SortCode,
    AccountNumber,
}

impl std::fmt::Display for InputField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SortCode => f.write_str("sort code"),
            Self::AccountNumber => f.write_str("account number"),
        }
    }
}
