//! Crate-wide error type.
//!
//! Two classes of failure come out of this crate:
//! - **invalid input**: the participant list or exclusion data is malformed
//!   (too few people, duplicates, names nobody registered, self-loops).
//! - **infeasible**: the input is well formed but no assignment satisfies the
//!   exclusions.
//!
//! Both are ordinary outcomes and are returned as values, never panics.

use thiserror::Error;

/// Result type for pairing operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("at least two participants are required, found {found}")]
    TooFewParticipants { found: usize },
    #[error("participant {0} is listed more than once")]
    DuplicateParticipant(String),
    #[error("{0} is not a registered participant")]
    UnknownParticipant(String),
    #[error("participant {0} is allowed to give to themself")]
    SelfLoop(String),
    #[error("no assignment satisfies the exclusions")]
    Infeasible,
    #[error("search gave up after {steps} steps without a result")]
    StepBudgetExhausted { steps: u64 },
}

impl Error {
    /// True when no cycle can exist for the given input.
    ///
    /// A group of fewer than two people can never close a cycle, so
    /// `TooFewParticipants` counts as infeasible as well as invalid.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Error::Infeasible | Error::TooFewParticipants { .. })
    }

    /// True when the input itself was malformed.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::TooFewParticipants { .. }
                | Error::DuplicateParticipant(_)
                | Error::UnknownParticipant(_)
                | Error::SelfLoop(_)
        )
    }

    pub(crate) fn duplicate<T: std::fmt::Debug>(participant: &T) -> Self {
        Error::DuplicateParticipant(format!("{participant:?}"))
    }

    pub(crate) fn unknown<T: std::fmt::Debug>(participant: &T) -> Self {
        Error::UnknownParticipant(format!("{participant:?}"))
    }

    pub(crate) fn self_loop<T: std::fmt::Debug>(participant: &T) -> Self {
        Error::SelfLoop(format!("{participant:?}"))
    }
}
