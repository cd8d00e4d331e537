//! Sparse pattern compatibility lists.
//!
//! Model builders decide adjacency with a dense predicate (overlap
//! agreement, or neighbour rules); the runtime wants sparse index lists
//! for cache-friendly iteration. [`Compatibility`] is the conversion
//! seam between the two.

use quell_core::Direction;

/// For each pattern and direction, the ordered list of patterns that
/// may lie in that direction.
///
/// `list(t, d)` contains `t2` iff `t2` may appear in direction `d` from
/// a cell holding `t`. Well-formed tables are symmetric:
/// `t2 in list(t, d)` iff `t in list(t2, d.opposite())`; the propagator
/// relies on this to equate support counts with list lengths.
#[derive(Clone, Debug)]
pub struct Compatibility {
    pattern_count: usize,
    lists: Vec<[Vec<u32>; 4]>,
}

impl Compatibility {
    /// Build the sparse lists from a dense predicate.
    ///
    /// `allows(t, d, t2)` is queried for every (pattern, direction,
    /// pattern) triple; list entries keep pattern index order.
    pub fn build(
        pattern_count: usize,
        mut allows: impl FnMut(usize, Direction, usize) -> bool,
    ) -> Self {
        let mut lists = Vec::with_capacity(pattern_count);
        for t in 0..pattern_count {
            let mut per_direction: [Vec<u32>; 4] = Default::default();
            for d in Direction::ALL {
                let list = &mut per_direction[d.index()];
                for t2 in 0..pattern_count {
                    if allows(t, d, t2) {
                        list.push(t2 as u32);
                    }
                }
            }
            lists.push(per_direction);
        }
        Self {
            pattern_count,
            lists,
        }
    }

    /// Size of the pattern set.
    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Patterns that may lie in `direction` from `pattern`.
    pub fn list(&self, pattern: usize, direction: Direction) -> &[u32] {
        &self.lists[pattern][direction.index()]
    }

    /// Whether the table satisfies the symmetry requirement.
    ///
    /// Intended for model-builder tests; the propagator assumes it.
    pub fn is_symmetric(&self) -> bool {
        for t in 0..self.pattern_count {
            for d in Direction::ALL {
                for &t2 in self.list(t, d) {
                    if !self
                        .list(t2 as usize, d.opposite())
                        .contains(&(t as u32))
                    {
                        return false;
                    }
                }
            }
        }
        true
    }
}
