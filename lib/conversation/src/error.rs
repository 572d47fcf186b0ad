//! Error types for the conversation crate.

use crate::session::SessionState;
use std::fmt;

/// Errors from applying an event to the submission dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// The event's content does not fit the current state.
    ///
    /// Dropped without a reply; the session is left unchanged.
    InvalidEventForState {
        state: SessionState,
        input: &'static str,
    },
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEventForState { state, input } => {
                write!(f, "{input} input is not expected in state {state}")
            }
        }
    }
}

impl std::error::Error for FlowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_error_display() {
        let err = FlowError::InvalidEventForState {
            state: SessionState::AwaitingName,
            input: "photo",
        };
        assert!(err.to_string().contains("photo"));
        assert!(err.to_string().contains("awaiting_name"));
    }
}
