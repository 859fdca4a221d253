// SPDX-License-Identifier: Apache-2.0 OR MIT
use crate::ast::Span;
use thiserror::Error;

/// Unified error type for the placeholder engine.
///
/// Substitution itself cannot fail, so the only failure mode is a grammar
/// violation found while lexing or parsing. Errors carry the message and,
/// when available, the `Span` pointing to the offending location.
#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
        span: Option<Span>,
    },
}

impl Error {
    pub fn parse(message: impl Into<String>, span: Option<Span>) -> Self {
        Error::Parse {
            message: message.into(),
            source: None,
            span,
        }
    }

    pub fn parse_with_span(message: impl Into<String>, span: Span) -> Self {
        Self::parse(message, Some(span))
    }

    /// Location of the offending input, if known.
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Parse { span, .. } => *span,
        }
    }
}
