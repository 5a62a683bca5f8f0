//! Error types for grid construction and search control.

use std::fmt;

use crate::engine::SearchState;

/// Errors surfaced by [`Grid`](crate::Grid) and
/// [`SearchEngine`](crate::SearchEngine).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Construction or edit parameters were rejected. The search never
    /// starts with this configuration.
    InvalidConfiguration {
        /// What went wrong.
        reason: String,
    },
    /// The grid was edited while the engine was not idle. The engine is left
    /// unchanged.
    IllegalMutation {
        /// State the engine was in when the edit was attempted.
        state: SearchState,
    },
}

impl SearchError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration { reason } => {
                write!(f, "invalid configuration: {reason}")
            }
            Self::IllegalMutation { state } => {
                write!(f, "grid cannot be edited while the search is {state}")
            }
        }
    }
}

impl std::error::Error for SearchError {}

/// Returned by [`Frontier::pop_min`](crate::Frontier::pop_min) when the open
/// set has no members left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyFrontier;

impl fmt::Display for EmptyFrontier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("frontier is empty")
    }
}

impl std::error::Error for EmptyFrontier {}
