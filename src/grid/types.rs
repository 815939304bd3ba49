//! Two-sided face types.

use std::ops::{Index, IndexMut};

/// One of the two sides of a face.
///
/// The first side is the cell the face normal points away from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    First,
    Second,
}

impl Side {
    /// Both sides, in storage order.
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    /// Storage index of this side (0 or 1).
    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

/// A value stored for each side of a face.
///
/// Every face has exactly two sides; a missing neighbour is expressed in the
/// value type (e.g. `Sides<Option<usize>>` for adjacent cells).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sides<T>(pub [T; 2]);

impl<T> Sides<T> {
    /// Create a pair from its first and second side.
    pub const fn new(first: T, second: T) -> Self {
        Self([first, second])
    }

    /// Apply `f` to both sides.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Sides<U> {
        let Sides([a, b]) = self;
        Sides([f(a), f(b)])
    }

    /// Iterate over `(side, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::BOTH.into_iter().zip(self.0.iter())
    }
}

impl<T> Index<Side> for Sides<T> {
    type Output = T;

    fn index(&self, side: Side) -> &T {
        &self.0[side.index()]
    }
}

impl<T> IndexMut<Side> for Sides<T> {
    fn index_mut(&mut self, side: Side) -> &mut T {
        &mut self.0[side.index()]
    }
}

impl Sides<Option<usize>> {
    /// Both cells, if the face is interior.
    pub fn interior(&self) -> Option<(usize, usize)> {
        match self.0 {
            [Some(a), Some(b)] => Some((a, b)),
            _ => None,
        }
    }

    /// Whether one of the sides is the domain boundary.
    pub fn is_boundary(&self) -> bool {
        self.0.iter().any(Option::is_none)
    }

    /// The side on which `cell` lies, if it is adjacent to this face.
    pub fn side_of(&self, cell: usize) -> Option<Side> {
        Side::BOTH.into_iter().find(|&side| self[side] == Some(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides_indexing() {
        let mut s = Sides::new(1.0, 2.0);
        assert_eq!(s[Side::First], 1.0);
        assert_eq!(s[Side::Second], 2.0);
        s[Side::Second] = 5.0;
        assert_eq!(s, Sides([1.0, 5.0]));
    }

    #[test]
    fn test_face_cells_helpers() {
        let interior = Sides::new(Some(3), Some(7));
        assert_eq!(interior.interior(), Some((3, 7)));
        assert!(!interior.is_boundary());
        assert_eq!(interior.side_of(7), Some(Side::Second));
        assert_eq!(interior.side_of(4), None);

        let boundary = Sides::new(None, Some(2));
        assert!(boundary.is_boundary());
        assert_eq!(boundary.interior(), None);
        assert_eq!(boundary.map(|c| c.is_some()), Sides::new(false, true));
    }
}
