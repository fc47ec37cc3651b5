use std::fmt;

use strum::{EnumIter, FromRepr, IntoEnumIterator, VariantArray};

use crate::{algo::Action, LearningError};

/// A movement on the grid
///
/// Declaration order is the canonical order used for tie breaking.
#[derive(
    EnumIter, VariantArray, FromRepr, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// Convert a raw action index
    ///
    /// **Errors** with [`LearningError::InvalidAction`] for indices outside `0..4`
    pub fn from_index(ix: u8) -> Result<Self, LearningError> {
        Self::from_repr(ix).ok_or_else(|| {
            LearningError::InvalidAction(format!("no direction with index {ix}"))
        })
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
        }
    }

    /// Grid displacement `(dx, dy)`, with `y` growing downwards
    pub fn offset(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }
}

impl Action for Direction {
    fn all() -> &'static [Self] {
        Self::VARIANTS
    }

    fn reverse(&self) -> Option<Self> {
        Some(self.opposite())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Where a target lies relative to an observer, including the diagonals and "same cell"
#[derive(EnumIter, VariantArray, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComplexDirection {
    None,
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl ComplexDirection {
    /// Classify a displacement `(dx, dy)` from observer to target by sign
    pub fn from_offset(dx: i32, dy: i32) -> Self {
        match (dx.signum(), dy.signum()) {
            (0, 0) => Self::None,
            (0, -1) => Self::Up,
            (1, -1) => Self::UpRight,
            (1, 0) => Self::Right,
            (1, 1) => Self::DownRight,
            (0, 1) => Self::Down,
            (-1, 1) => Self::DownLeft,
            (-1, 0) => Self::Left,
            _ => Self::UpLeft,
        }
    }
}

impl fmt::Display for ComplexDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A set of blocked [`Direction`]s, stored as a bit mask
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockedDirections(u8);

impl BlockedDirections {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, dir: Direction) {
        self.0 |= 1 << dir as u8;
    }

    pub fn contains(&self, dir: Direction) -> bool {
        self.0 & (1 << dir as u8) != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate in canonical [`Direction`] order
    pub fn iter(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::iter().filter(|&d| self.contains(d))
    }
}

impl FromIterator<Direction> for BlockedDirections {
    fn from_iter<T: IntoIterator<Item = Direction>>(iter: T) -> Self {
        let mut set = Self::empty();
        for dir in iter {
            set.insert(dir);
        }
        set
    }
}

impl fmt::Display for BlockedDirections {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, dir) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{dir}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_index_bounds() {
        assert_eq!(Direction::from_index(2), Ok(Direction::Down));
        assert!(matches!(
            Direction::from_index(4),
            Err(LearningError::InvalidAction(_))
        ));
    }

    #[test]
    fn opposites_cancel() {
        for dir in Direction::iter() {
            let (dx, dy) = dir.offset();
            let (ox, oy) = dir.opposite().offset();
            assert_eq!((dx + ox, dy + oy), (0, 0), "{dir} and its opposite cancel");
        }
    }

    #[test]
    fn complex_direction_from_offset() {
        assert_eq!(ComplexDirection::from_offset(0, 0), ComplexDirection::None);
        assert_eq!(ComplexDirection::from_offset(3, -7), ComplexDirection::UpRight);
        assert_eq!(ComplexDirection::from_offset(-2, 0), ComplexDirection::Left);
        assert_eq!(ComplexDirection::from_offset(-1, -1), ComplexDirection::UpLeft);
        assert_eq!(ComplexDirection::from_offset(0, 5), ComplexDirection::Down);
    }

    #[test]
    fn blocked_directions_functional() {
        let blocked: BlockedDirections = [Direction::Left, Direction::Up].into_iter().collect();
        assert_eq!(blocked.len(), 2);
        assert!(blocked.contains(Direction::Up));
        assert!(!blocked.contains(Direction::Down));
        assert_eq!(
            blocked.iter().collect::<Vec<_>>(),
            [Direction::Up, Direction::Left],
            "iterates in canonical order"
        );
        assert_eq!(blocked.to_string(), "[Up, Left]");
        assert!(BlockedDirections::empty().is_empty());
    }
}
