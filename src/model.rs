//! Core domain types for the kiosk credit machine.

use std::fmt;

use crate::Amount;
use crate::machine::MachineError;

/// Accepted denominations, in ascending order.
pub const DENOMINATIONS: [u64; 8] = [10, 20, 40, 50, 100, 200, 500, 1000];

/// Credit required for, and deducted by, one dispense.
pub const DISPENSE_PRICE: Amount = Amount::new(50);

/// Drink identifiers offered by the kiosk.
pub const CATALOG: [&str; 4] = ["soda", "juice", "beer", "canned"];

/// Discretized credit level.
///
/// `Ready` is absorbing: every credit at or above [`DISPENSE_PRICE`] maps to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Zero,
    Ten,
    Twenty,
    Thirty,
    Forty,
    Ready,
}

impl Tier {
    /// All tiers, ordered by value.
    pub const ALL: [Tier; 6] = [
        Tier::Zero,
        Tier::Ten,
        Tier::Twenty,
        Tier::Thirty,
        Tier::Forty,
        Tier::Ready,
    ];

    pub const fn value(self) -> u64 {
        match self {
            Tier::Zero => 0,
            Tier::Ten => 10,
            Tier::Twenty => 20,
            Tier::Thirty => 30,
            Tier::Forty => 40,
            Tier::Ready => 50,
        }
    }

    /// Position in [`Tier::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn is_ready(self) -> bool {
        matches!(self, Tier::Ready)
    }

    /// Tier for an arbitrary amount: `Ready` at or above the price, otherwise
    /// the greatest tier whose value does not exceed `amount`.
    pub fn of(amount: Amount) -> Tier {
        if amount >= DISPENSE_PRICE {
            return Tier::Ready;
        }
        Tier::ALL
            .into_iter()
            .rev()
            .find(|tier| tier.value() <= amount.value())
            .unwrap_or(Tier::Zero)
    }
}

/// A member of the accepted denomination alphabet.
///
/// Only constructible from a value listed in [`DENOMINATIONS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Denomination {
    index: usize,
}

impl Denomination {
    pub fn new(value: u64) -> Option<Self> {
        DENOMINATIONS
            .iter()
            .position(|&d| d == value)
            .map(|index| Denomination { index })
    }

    /// Every accepted denomination, ascending.
    pub fn all() -> impl Iterator<Item = Denomination> {
        (0..DENOMINATIONS.len()).map(|index| Denomination { index })
    }

    pub fn value(self) -> u64 {
        DENOMINATIONS[self.index]
    }

    pub fn amount(self) -> Amount {
        Amount::new(self.value())
    }

    /// Position in [`DENOMINATIONS`].
    pub fn index(self) -> usize {
        self.index
    }
}

impl TryFrom<u64> for Denomination {
    type Error = MachineError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Denomination::new(value).ok_or(MachineError::InvalidDenomination(value))
    }
}

impl fmt::Display for Denomination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Display label of the machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Credit covers a dispense.
    Ready,
    /// Still collecting money; carries the current tier.
    Waiting(Tier),
}

impl From<Tier> for Status {
    fn from(tier: Tier) -> Self {
        if tier.is_ready() {
            Status::Ready
        } else {
            Status::Waiting(tier)
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => f.write_str("READY_TO_DISPENSE"),
            Status::Waiting(tier) => write!(f, "WAITING_{}", tier.value()),
        }
    }
}

/// An input to the machine, as produced by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert money; the raw value is validated against the alphabet.
    Insert { amount: u64 },
    /// Dispense one unit of `item`.
    Dispense { item: String },
    /// Hand back all accumulated credit.
    ReturnChange,
}
