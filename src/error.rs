use thiserror::Error;

/// Errors raised by the learning core
///
/// None of these is fatal: the caller recovers by aborting the current episode
/// (see [`Brain::abort_episode`](crate::algo::Brain::abort_episode)) and carrying on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LearningError {
    /// The episode protocol was violated, e.g. a reward arrived before any action
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// An action outside the closed action set
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// A hyperparameter outside its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
