use std::collections::HashMap;

use log::{debug, trace};
use rand::{seq::SliceRandom, Rng};

use crate::{
    algo::{Action, Situation},
    decay::{self, Decay},
    exploration::{Choice, EpsilonGreedy},
    LearningError,
};

use super::ValueTable;

/// Configuration for the [`Policy`]
#[derive(Debug, Clone)]
pub struct PolicyConfig<D: Decay> {
    /// Decay strategy for the exploration rate, advanced once per improvement
    ///
    /// **Default**: An [`Exponential`](decay::Exponential) decay from `0.5` towards `0.01` at
    /// rate `0.01`
    pub exploration: D,
    /// Never pick the action that reverses the previous one when acting randomly
    ///
    /// **Default**: `false`, i.e. random actions are drawn from the full action set
    pub forbid_reversal: bool,
}

impl Default for PolicyConfig<decay::Exponential> {
    fn default() -> Self {
        Self {
            exploration: decay::Exponential::new(0.01, 0.5, 0.01)
                .expect("default schedule is non-increasing"),
            forbid_reversal: false,
        }
    }
}

/// What the policy knows about a situation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference<A> {
    /// Never improved on; every action is drawn at random
    Unlearned,
    /// The greedy action from the last improvement
    Learned(A),
}

/// Epsilon greedy policy over a table of greedy actions
///
/// A situation moves from [`Preference::Unlearned`] to [`Preference::Learned`] only inside
/// [`Policy::improve`], and never back.
#[derive(Debug, Clone)]
pub struct Policy<S: Situation, A: Action, D: Decay> {
    table: HashMap<S, A>,
    exploration: EpsilonGreedy<D>,
    forbid_reversal: bool,
}

impl<S: Situation, A: Action, D: Decay> Policy<S, A, D> {
    /// **Errors** if the exploration schedule starts outside `[0,1]` or has no positive floor
    pub fn new(config: PolicyConfig<D>) -> Result<Self, LearningError> {
        Ok(Self {
            table: HashMap::new(),
            exploration: EpsilonGreedy::new(config.exploration)?,
            forbid_reversal: config.forbid_reversal,
        })
    }

    pub fn preference(&self, state: &S) -> Preference<A> {
        match self.table.get(state) {
            Some(&action) => Preference::Learned(action),
            None => Preference::Unlearned,
        }
    }

    /// Actions eligible for a random pick after `previous` was taken
    ///
    /// Falls back to the full action set if forbidding the reversal would leave nothing.
    pub fn available(&self, previous: A) -> Vec<A> {
        let reversal = if self.forbid_reversal {
            previous.reverse()
        } else {
            None
        };
        let available: Vec<A> = A::all()
            .iter()
            .copied()
            .filter(|a| Some(*a) != reversal)
            .collect();
        if available.is_empty() {
            A::all().to_vec()
        } else {
            available
        }
    }

    /// Choose an action for `state`
    ///
    /// Unlearned situations always act randomly; learned ones exploit with probability `1 - ε`.
    pub fn get_action<R: Rng + ?Sized>(&self, state: &S, previous: A, rng: &mut R) -> A {
        if let Preference::Learned(action) = self.preference(state) {
            if self.exploration.choose(rng) == Choice::Exploit {
                trace!("exploit {action:?} in {state:?}");
                return action;
            }
        }

        // `previous` only survives for an empty action set, which `end_episode` rejects
        let action = *self.available(previous).choose(rng).unwrap_or(&previous);
        trace!("random {action:?} in {state:?}");
        action
    }

    /// Probability that [`Policy::get_action`] returns `action` for `state`
    pub fn action_probability(&self, state: &S, previous: A, action: A) -> f32 {
        let available = self.available(previous);
        let uniform = if available.contains(&action) {
            1.0 / available.len() as f32
        } else {
            0.0
        };

        match self.preference(state) {
            Preference::Unlearned => uniform,
            Preference::Learned(best) => {
                let eps = self.exploration.epsilon();
                let greedy = if best == action { 1.0 } else { 0.0 };
                (1.0 - eps) * greedy + eps * uniform
            }
        }
    }

    /// Greedy improvement against the current value estimates, then one step of exploration decay
    pub fn improve(&mut self, values: &ValueTable<S, A>) {
        for state in values.states() {
            if let Some(action) = values.best_action(state) {
                self.table.insert(state.clone(), action);
            }
        }
        let eps = self.exploration.advance();
        debug!(
            "policy improved: {} situations learned, exploration {eps:.4}",
            self.table.len()
        );
    }

    /// The current exploration rate
    pub fn exploration(&self) -> f32 {
        self.exploration.epsilon()
    }

    /// The floor the exploration rate decays towards
    pub fn exploration_floor(&self) -> f32 {
        self.exploration.floor()
    }

    /// Number of improvement steps taken so far
    pub fn improvements(&self) -> u32 {
        self.exploration.t()
    }

    /// Iterate over learned situations and their greedy actions
    pub fn iter(&self) -> impl Iterator<Item = (&S, &A)> {
        self.table.iter()
    }

    /// Number of learned situations
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
