// SPDX-License-Identifier: Apache-2.0 OR MIT
use std::io;

use thiserror::Error;

/// Errors produced while loading, resolving and decoding a manifest template.
///
/// Only [`Error::MissingVariables`] aggregates; every other variant reports
/// the first failure encountered.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to read {location:?}")]
    Read {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error("artifact is not valid UTF-8")]
    Encoding(#[source] std::str::Utf8Error),

    #[error(transparent)]
    Parse(#[from] lithos_envsubst::Error),

    #[error(
        "value for variables [{}] is not set. Please set the value using os environment variables or the env config file",
        .missing.join(", ")
    )]
    MissingVariables { missing: Vec<String> },

    #[error("failed to decode document {document}: {message}")]
    Decode {
        document: usize,
        message: String,
        #[source]
        source: Option<serde_yaml::Error>,
    },

    #[error("failed to render template from {location:?}")]
    Template {
        location: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn read(location: impl Into<String>, source: io::Error) -> Self {
        Error::Read {
            location: location.into(),
            source,
        }
    }

    /// Builds a missing-variables error; the names are sorted for stable
    /// reporting.
    pub fn missing(mut missing: Vec<String>) -> Self {
        missing.sort();
        missing.dedup();
        Error::MissingVariables { missing }
    }

    pub(crate) fn decode(document: usize, message: impl Into<String>) -> Self {
        Error::Decode {
            document,
            message: message.into(),
            source: None,
        }
    }

    /// Returns the sorted list of unresolved names when this error, or the
    /// error it wraps, is [`Error::MissingVariables`].
    pub fn missing_variables(&self) -> Option<&[String]> {
        match self {
            Error::MissingVariables { missing } => Some(missing),
            Error::Template { source, .. } => source.missing_variables(),
            _ => None,
        }
    }
}
