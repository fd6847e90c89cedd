//! Partial and full parameter assignments.
//!
//! A combination has one slot per parameter. A slot is either an assigned
//! value index or unset. Unset is a tagged state — value 0 is a legitimate
//! domain value, so no sentinel integer can stand in for "no value".

use serde::{Deserialize, Serialize};

/// One slot per parameter; `None` marks an unset slot.
///
/// Combinations hash and compare by value, so they can key result caches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Combination {
    slots: Vec<Option<u32>>,
}

impl Combination {
    /// A combination with every slot unset.
    pub fn empty(width: usize) -> Self {
        Self {
            slots: vec![None; width],
        }
    }

    /// A fully assigned combination.
    pub fn full(values: Vec<u32>) -> Self {
        Self {
            slots: values.into_iter().map(Some).collect(),
        }
    }

    /// Build from explicit slots (used for partial fixtures).
    pub fn from_slots(slots: Vec<Option<u32>>) -> Self {
        Self { slots }
    }

    /// Number of parameters this combination spans.
    pub fn width(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, parameter: usize) -> Option<u32> {
        self.slots[parameter]
    }

    pub fn set(&mut self, parameter: usize, value: u32) {
        self.slots[parameter] = Some(value);
    }

    pub fn unset(&mut self, parameter: usize) {
        self.slots[parameter] = None;
    }

    /// True iff every slot is assigned.
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn assigned_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Iterate over assigned `(parameter, value)` pairs in index order.
    pub fn assigned(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(p, s)| s.map(|v| (p, v)))
    }

    /// True iff this combination agrees with `sub` on every slot `sub`
    /// assigns. Both combinations must have the same width.
    pub fn contains(&self, sub: &Combination) -> bool {
        debug_assert_eq!(self.width(), sub.width());
        sub.assigned().all(|(p, v)| self.slots[p] == Some(v))
    }

    /// Copy every assigned slot of `other` into `self`.
    pub fn merge(&mut self, other: &Combination) {
        for (p, v) in other.assigned() {
            self.slots[p] = Some(v);
        }
    }

    /// The assigned values, in index order, if the combination is complete.
    pub fn values(&self) -> Option<Vec<u32>> {
        self.slots.iter().copied().collect()
    }
}

impl std::fmt::Display for Combination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match slot {
                Some(v) => write!(f, "{v}")?,
                None => write!(f, "-")?,
            }
        }
        write!(f, "]")
    }
}
