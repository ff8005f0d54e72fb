use thiserror::Error;

use crate::lexer::Pos;

/// Error parsing a query document.
///
/// Parse errors are fatal: execution never starts on a document that
/// failed to parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at {position}: {message}")]
pub struct ParseError {
    pub position: Pos,
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(position: Pos, message: impl Into<String>) -> ParseError {
        ParseError {
            position,
            message: message.into(),
        }
    }
}
