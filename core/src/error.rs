//! Error types for streaming search.
//!
//! Vertices are stored pre-formatted (via `Debug`) so the error type stays
//! non-generic and can cross thread boundaries regardless of the vertex type.

use thiserror::Error;

/// Result type alias for search operations.
pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Rejected configuration value. The previous valid setting is kept.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// `extract_min` was called on an empty frontier.
    #[error("extract-min called on an empty frontier")]
    EmptyFrontier,

    /// A non-source vertex on the predecessor walk has no predecessor.
    /// `partial` holds the walk built so far, endpoint first.
    #[error("vertex {vertex} has no predecessor (partial path: {partial:?})")]
    NoPredecessor { vertex: String, partial: Vec<String> },

    /// A path was requested to a vertex the search never reached.
    #[error("vertex {vertex} was never reached from the source")]
    Unreached { vertex: String },

    /// The event channel was closed before the push could complete.
    #[error("event channel closed")]
    ChannelClosed,

    /// The cancel token fired while the search was running.
    #[error("search cancelled")]
    Cancelled,
}

impl SearchError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::warn!(%message, "configuration rejected");
        SearchError::Configuration(message)
    }

    /// True for the errors that only affect the event side-channel.
    pub fn is_interruption(&self) -> bool {
        matches!(self, SearchError::ChannelClosed | SearchError::Cancelled)
    }
}
