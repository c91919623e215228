//! Error types for the dialogue engine.

use prepwise_core::error::PrepwiseError;

/// Errors from the dialogue engine.
///
/// `AlreadyThinking` and `NotThinking` are call-sequencing bugs in the host.
/// `InvalidSlotValue`, `EmptyAddress`, `EmptyQuery` and `QueryTooLong` are
/// input problems to re-prompt on; session state is unchanged when they occur.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("a query is already being processed")]
    AlreadyThinking,
    #[error("no query is waiting to be resolved")]
    NotThinking,
    #[error("invalid {field} count {value}: must be between 0 and {max}")]
    InvalidSlotValue {
        field: &'static str,
        value: u32,
        max: u32,
    },
    #[error("address cannot be empty")]
    EmptyAddress,
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
    #[error("query cannot be empty")]
    EmptyQuery,
    #[error("query exceeds maximum length of {0} characters")]
    QueryTooLong(usize),
    #[error("assistant is disabled")]
    Disabled,
    #[error("knowledge base error: {0}")]
    KnowledgeBase(String),
}

impl From<PrepwiseError> for ChatError {
    fn from(err: PrepwiseError) -> Self {
        ChatError::KnowledgeBase(err.to_string())
    }
}
