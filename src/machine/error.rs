//! Error types for machine operations.

use thiserror::Error;

use crate::Amount;

/// Reason an operation was refused. A refused operation never mutates the machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error("{0} is not an accepted denomination")]
    InvalidDenomination(u64),

    #[error("insufficient credit: have {credit}, need {price}")]
    InsufficientCredit { credit: Amount, price: Amount },

    #[error("credit {credit} cannot take {amount} more without overflowing")]
    CreditOverflow { credit: Amount, amount: Amount },
}
