use std::{fmt::Debug, hash::Hash};

pub mod monte_carlo;

pub use monte_carlo::{
    discounted_returns, Brain, BrainConfig, EpisodeSummary, Entry, Policy, PolicyConfig,
    Preference, ValueTable,
};

/// A trait for situation types that can be used as keys in a [`HashMap`](std::collections::HashMap)
pub trait Situation: Clone + Eq + Hash + Debug {}

impl<T> Situation for T where T: Clone + Eq + Hash + Debug {}

/// A discrete action drawn from a small, closed set
pub trait Action: Copy + Eq + Hash + Debug + 'static {
    /// Every valid action, in canonical order
    ///
    /// The order decides ties during policy improvement: the first declared action wins.
    fn all() -> &'static [Self];

    /// The action that undoes this one, if any
    fn reverse(&self) -> Option<Self> {
        None
    }

    /// Whether this value belongs to the closed action set
    fn is_valid(&self) -> bool {
        Self::all().contains(self)
    }
}
