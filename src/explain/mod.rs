//! Post-hoc explanations of single decisions
//!
//! Explanations are advisory: nothing here mutates the [`Brain`] or its
//! [`Policy`](crate::algo::Policy), and a lack of history degrades the answer instead of failing.
use std::fmt;

use rand::{seq::SliceRandom, Rng};

use crate::{
    algo::{Action, Brain, Preference, Situation},
    decay::Decay,
    ds::RingBuffer,
    LearningError,
};

mod shapley;

pub use shapley::shapley_values;

/// Message reported instead of attributions while the history window is too small
pub const INSUFFICIENT_HISTORY: &str = "not enough history to attribute this decision";

/// A situation made of named features that can be swapped between instances
pub trait Features: Sized {
    /// Feature names, in the order used by [`Features::splice`]
    fn names() -> &'static [&'static str];

    /// Build a situation taking feature `i` from `self` where `keep[i]` is set and from
    /// `background` otherwise
    fn splice(&self, background: &Self, keep: &[bool]) -> Self;
}

/// Configuration for the [`Explainer`]
#[derive(Debug, Clone)]
pub struct ExplainerConfig {
    /// Number of recently observed situations kept as background data
    ///
    /// **Default**: `200`
    pub window: usize,
    /// Maximum number of background situations drawn per explanation
    ///
    /// **Default**: `50`
    pub samples: usize,
    /// Minimum number of observed situations before attributions are computed
    ///
    /// **Default**: `1`
    pub min_history: usize,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            window: 200,
            samples: 50,
            min_history: 1,
        }
    }
}

/// How the decision came about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionMode {
    /// The situation has never been learned, so the action was random
    Random,
    /// The learned action was taken
    Exploit,
    /// A learned situation, but a different action was taken to explore
    Explore,
}

impl fmt::Display for DecisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Random => "random, no policy for this situation yet",
            Self::Exploit => "exploit, highest average return",
            Self::Explore => "explore, trying another direction",
        })
    }
}

/// Contribution of a single feature to the decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureScore {
    pub feature: &'static str,
    pub score: f32,
}

/// Per-feature attribution of a decision
#[derive(Debug, Clone, PartialEq)]
pub enum Attribution {
    /// Too little history; carries [`INSUFFICIENT_HISTORY`]
    Insufficient(&'static str),
    /// Shapley values of each feature for the probability of the decision
    Scores {
        /// Probability of the action for the explained situation
        prediction: f32,
        /// Mean probability of the action over the background situations
        baseline: f32,
        scores: Vec<FeatureScore>,
    },
}

/// A human-readable account of one decision
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation<S, A> {
    pub state: S,
    pub action: A,
    pub mode: DecisionMode,
    pub exploration: f32,
    /// Average return of each available action, if it was ever tried
    pub action_values: Vec<(A, Option<f32>)>,
    pub attribution: Attribution,
}

impl<S: fmt::Display, A: fmt::Display> fmt::Display for Explanation<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Action: {}", self.action)?;
        writeln!(f, "Situation: {}", self.state)?;
        writeln!(f, "Exploration rate: {:.3}", self.exploration)?;
        writeln!(f, "Mode: {}", self.mode)?;

        f.write_str("Action values:")?;
        for (action, value) in &self.action_values {
            match value {
                Some(v) => write!(f, " {action}: {v:.2}")?,
                None => write!(f, " {action}: -")?,
            }
        }
        writeln!(f)?;

        match &self.attribution {
            Attribution::Insufficient(msg) => write!(f, "Attribution: {msg}"),
            Attribution::Scores {
                prediction,
                baseline,
                scores,
            } => {
                write!(f, "Attribution (p = {prediction:.3}, baseline {baseline:.3}):")?;
                for FeatureScore { feature, score } in scores {
                    write!(f, " {feature} {score:+.3}")?;
                }
                Ok(())
            }
        }
    }
}

/// Explains decisions against a rolling window of recently observed situations
#[derive(Debug, Clone)]
pub struct Explainer<S> {
    history: RingBuffer<S>,
    samples: usize,
    min_history: usize,
}

impl<S: Situation + Features> Explainer<S> {
    /// **Errors** with [`LearningError::InvalidConfiguration`] if `window` or `samples` is zero
    pub fn new(config: ExplainerConfig) -> Result<Self, LearningError> {
        if config.window == 0 || config.samples == 0 {
            return Err(LearningError::InvalidConfiguration(
                "explainer window and samples must be positive".into(),
            ));
        }
        Ok(Self {
            history: RingBuffer::new(config.window),
            samples: config.samples,
            min_history: config.min_history.max(1),
        })
    }

    /// Record a situation as background data
    pub fn observe(&mut self, state: S) {
        self.history.push(state);
    }

    /// Number of situations currently in the window
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Explain why `action` was taken in `state`, after `previous`
    pub fn explain<A, D, R>(
        &self,
        brain: &Brain<S, A, D>,
        state: &S,
        action: A,
        previous: A,
        rng: &mut R,
    ) -> Explanation<S, A>
    where
        A: Action,
        D: Decay,
        R: Rng + ?Sized,
    {
        let policy = brain.policy();
        let mode = match policy.preference(state) {
            Preference::Unlearned => DecisionMode::Random,
            Preference::Learned(best) if best == action => DecisionMode::Exploit,
            Preference::Learned(_) => DecisionMode::Explore,
        };

        let action_values = policy
            .available(previous)
            .into_iter()
            .map(|a| (a, brain.value_table().get(state, a).map(|e| e.value)))
            .collect();

        Explanation {
            state: state.clone(),
            action,
            mode,
            exploration: policy.exploration(),
            action_values,
            attribution: self.attribute(brain, state, action, previous, rng),
        }
    }

    fn attribute<A, D, R>(
        &self,
        brain: &Brain<S, A, D>,
        state: &S,
        action: A,
        previous: A,
        rng: &mut R,
    ) -> Attribution
    where
        A: Action,
        D: Decay,
        R: Rng + ?Sized,
    {
        if self.history.len() < self.min_history {
            return Attribution::Insufficient(INSUFFICIENT_HISTORY);
        }

        let background: Vec<&S> = self
            .history
            .view()
            .choose_multiple(rng, self.samples)
            .collect();
        let policy = brain.policy();
        let worth = |keep: &[bool]| {
            background
                .iter()
                .map(|bg| policy.action_probability(&state.splice(bg, keep), previous, action))
                .sum::<f32>()
                / background.len() as f32
        };

        let names = S::names();
        let phi = shapley_values(names.len(), &worth);
        let all = vec![true; names.len()];
        let none = vec![false; names.len()];

        Attribution::Scores {
            prediction: worth(&all),
            baseline: worth(&none),
            scores: names
                .iter()
                .zip(phi)
                .map(|(&feature, score)| FeatureScore { feature, score })
                .collect(),
        }
    }
}
