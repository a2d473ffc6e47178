use crate::Amount;
use crate::model::{DENOMINATIONS, Denomination, Tier};

/// Precomputed `(Tier, Denomination) -> Tier` transitions for money insertion.
///
/// Every entry is `Tier::of(tier.value() + denomination)`, computed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    next: [[Tier; DENOMINATIONS.len()]; Tier::ALL.len()],
}

impl TransitionTable {
    pub fn new() -> Self {
        let mut next = [[Tier::Zero; DENOMINATIONS.len()]; Tier::ALL.len()];
        for tier in Tier::ALL {
            for denomination in Denomination::all() {
                // tier values and denominations are small, no overflow
                let reached = Amount::new(tier.value()) + denomination.amount();
                next[tier.index()][denomination.index()] = Tier::of(reached);
            }
        }
        Self { next }
    }

    /// Destination tier when `denomination` is inserted while in `from`.
    pub fn next(&self, from: Tier, denomination: Denomination) -> Tier {
        self.next[from.index()][denomination.index()]
    }
}

impl Default for TransitionTable {
    fn default() -> Self {
        Self::new()
    }
}
