use std::fmt;

mod direction;

pub use direction::{BlockedDirections, ComplexDirection, Direction};

use crate::explain::Features;

/// What the shepherd observes before each move
///
/// There are 9 × 16 = 144 distinct states, which keeps the value and policy tables small.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    /// Where the sheep is relative to the shepherd
    pub sheep_direction: ComplexDirection,
    /// Neighbouring cells occupied by the shepherd's own queue
    pub facing_queue: BlockedDirections,
}

impl State {
    pub fn new(sheep_direction: ComplexDirection, facing_queue: BlockedDirections) -> Self {
        Self {
            sheep_direction,
            facing_queue,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sheep {}, blocked {}",
            self.sheep_direction, self.facing_queue
        )
    }
}

impl Features for State {
    fn names() -> &'static [&'static str] {
        &["sheep direction", "blocked directions"]
    }

    fn splice(&self, background: &Self, keep: &[bool]) -> Self {
        Self {
            sheep_direction: if keep[0] {
                self.sheep_direction
            } else {
                background.sheep_direction
            },
            facing_queue: if keep[1] {
                self.facing_queue
            } else {
                background.facing_queue
            },
        }
    }
}

/// An observed situation paired with the action taken in it
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateAction<S, A> {
    pub state: S,
    pub action: A,
}

impl<S, A> StateAction<S, A> {
    pub fn new(state: S, action: A) -> Self {
        Self { state, action }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn equal_states_share_a_key() {
        let a = State::new(
            ComplexDirection::Left,
            [Direction::Up].into_iter().collect(),
        );
        let b = State::new(
            ComplexDirection::Left,
            [Direction::Up].into_iter().collect(),
        );
        let set = HashSet::from([StateAction::new(a, Direction::Down)]);
        assert!(set.contains(&StateAction::new(b, Direction::Down)));
        assert!(!set.contains(&StateAction::new(b, Direction::Up)));
    }

    #[test]
    fn splice_takes_kept_features_from_self() {
        let x = State::new(ComplexDirection::Up, BlockedDirections::empty());
        let bg = State::new(
            ComplexDirection::Down,
            [Direction::Left].into_iter().collect(),
        );
        assert_eq!(x.splice(&bg, &[true, true]), x);
        assert_eq!(x.splice(&bg, &[false, false]), bg);
        assert_eq!(
            x.splice(&bg, &[true, false]),
            State::new(ComplexDirection::Up, bg.facing_queue)
        );
    }

    #[test]
    fn display_is_readable() {
        let s = State::new(
            ComplexDirection::DownRight,
            [Direction::Right].into_iter().collect(),
        );
        assert_eq!(s.to_string(), "sheep DownRight, blocked [Right]");
    }
}
