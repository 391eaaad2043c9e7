//! Error types for line parsing.

use thiserror::Error;

/// Rejections produced by [`crate::parser::ParseMode::Strict`].
///
/// The permissive mode never produces any of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing but spaces before the operator, e.g. `| wc`.
    #[error("missing command before '{0}'")]
    MissingLeft(char),

    /// Nothing but spaces after the operator, e.g. `ls >  `.
    #[error("missing operand after '{0}'")]
    MissingRight(char),

    /// The operator is the last character of the line, e.g. `ls |`.
    #[error("unexpected '{0}' at end of line")]
    TrailingOperator(char),
}
