/// Learning algorithms
pub mod algo;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

/// Data structures
pub mod ds;

/// Environment
pub mod env;

/// Errors raised by the learning core
pub mod error;

/// Post-hoc explanations of decisions
pub mod explain;

/// Exploration policies
pub mod exploration;

/// Situations and actions of the grid chase
pub mod state;

/// Testing environments
#[cfg(feature = "gym")]
pub mod gym;

mod util;

pub use error::LearningError;
