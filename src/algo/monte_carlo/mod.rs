//! Every-visit Monte-Carlo control with an epsilon greedy policy
mod brain;
mod policy;
mod returns;
mod value_table;

pub use brain::{Brain, BrainConfig, EpisodeSummary};
pub use policy::{Policy, PolicyConfig, Preference};
pub use returns::discounted_returns;
pub use value_table::{Entry, ValueTable};
