use std::collections::HashMap;

use crate::{
    algo::{Action, Situation},
    LearningError,
};

/// An entry in the table
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    /// Running mean of the observed returns
    pub value: f32,
    /// Number of returns averaged into `value`
    pub count: u32,
}

/// Running average return for every visited state-action pair
///
/// Entries are created the first time a pair is updated and are never removed.
#[derive(Debug, Clone)]
pub struct ValueTable<S: Situation, A: Action> {
    table: HashMap<S, HashMap<A, Entry>>,
}

impl<S: Situation, A: Action> Default for ValueTable<S, A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Situation, A: Action> ValueTable<S, A> {
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Reject actions outside the closed action set
    pub fn validate(action: A) -> Result<(), LearningError> {
        if action.is_valid() {
            Ok(())
        } else {
            Err(LearningError::InvalidAction(format!(
                "{action:?} is not a valid action"
            )))
        }
    }

    /// Fold a new return into the running mean of `(state, action)`
    ///
    /// Q<sub>n</sub> = Q<sub>n-1</sub> + (G - Q<sub>n-1</sub>) / n
    ///
    /// **Errors** with [`LearningError::InvalidAction`] without touching the table if `action`
    /// is not valid
    pub fn update(&mut self, state: &S, action: A, ret: f32) -> Result<Entry, LearningError> {
        Self::validate(action)?;

        let entry = self
            .table
            .entry(state.clone())
            .or_default()
            .entry(action)
            .or_default();
        entry.count += 1;
        entry.value += (ret - entry.value) / entry.count as f32;

        Ok(*entry)
    }

    pub fn get(&self, state: &S, action: A) -> Option<&Entry> {
        self.table.get(state).and_then(|row| row.get(&action))
    }

    /// The action with the highest mean return in `state`
    ///
    /// Ties go to the action that comes first in [`Action::all`]; NaN means never win.
    pub fn best_action(&self, state: &S) -> Option<A> {
        let row = self.table.get(state)?;
        let mut best: Option<(A, f32)> = None;
        for &action in A::all() {
            let Some(entry) = row.get(&action) else {
                continue;
            };
            match best {
                Some((_, value)) if entry.value <= value || entry.value.is_nan() => {}
                None if entry.value.is_nan() => {}
                _ => best = Some((action, entry.value)),
            }
        }
        best.map(|(action, _)| action)
    }

    /// Iterate over every recorded state
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.table.keys()
    }

    /// Number of recorded state-action pairs
    pub fn len(&self) -> usize {
        self.table.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
