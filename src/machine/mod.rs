//! Credit state machine.
//!
//! The machine accumulates inserted money, authorizes a dispense once credit
//! reaches [`DISPENSE_PRICE`], and hands back unused credit on request.
//! The tier is always derived from the exact credit; it is never stored.
//! Also supports an async stream of commands.

use std::collections::BTreeMap;
use tokio_stream::{Stream, StreamExt};
use tracing::info;

use crate::Amount;
use crate::model::{CATALOG, Command, DISPENSE_PRICE, Denomination, Status, Tier};

mod table;
pub use table::TransitionTable;

mod error;
pub use error::MachineError;

/// What a successful command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Inserted(Denomination),
    Dispensed(String),
    ChangeReturned(Amount),
}

/// A successful command together with the machine state it left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub event: Event,
    pub credit: Amount,
    pub status: Status,
}

/// The kiosk credit machine.
///
/// Owns the credit, the transition table and the dispensed tallies.
#[derive(Debug, Clone)]
pub struct VendingMachine {
    credit: Amount,
    table: TransitionTable,
    /// Dispensed units per item (catalog items are seeded at zero)
    dispensed: BTreeMap<String, u64>,
}

/// Public API
impl VendingMachine {
    pub fn new() -> Self {
        Self {
            credit: Amount::ZERO,
            table: TransitionTable::new(),
            dispensed: CATALOG.iter().map(|item| (item.to_string(), 0)).collect(),
        }
    }

    /// Run the machine with the given command stream, returning the
    /// outcomes of the commands that were applied.
    pub async fn run(&mut self, mut stream: impl Stream<Item = Command> + Unpin) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        while let Some(command) = stream.next().await {
            // refusals are logged by `apply` and do not stop the session
            if let Ok(outcome) = self.apply(command) {
                outcomes.push(outcome);
            }
        }
        outcomes
    }

    /// Apply a single command on top of the current machine state
    pub fn apply(&mut self, command: Command) -> Result<Outcome, MachineError> {
        let event = match command {
            Command::Insert { amount } => {
                let result = self.apply_insert(amount);
                Self::log_result("insert", &amount.to_string(), self.credit, &result);
                result?
            }
            Command::Dispense { item } => {
                let result = self.try_dispense(&item).map(|_| Event::Dispensed(item.clone()));
                Self::log_result("dispense", &item, self.credit, &result);
                result?
            }
            Command::ReturnChange => {
                let change = self.return_change();
                let event = Event::ChangeReturned(change);
                let result = Ok(event.clone());
                Self::log_result("return", &change.to_string(), self.credit, &result);
                event
            }
        };
        Ok(self.outcome(event))
    }

    /// Insert money. Returns `false`, leaving the machine untouched, when the
    /// value is not an accepted denomination.
    pub fn insert_money(&mut self, value: u64) -> bool {
        self.try_insert(value).is_ok()
    }

    /// Insert money, returning the tier reached.
    pub fn try_insert(&mut self, value: u64) -> Result<Tier, MachineError> {
        self.insert(Denomination::try_from(value)?)
    }

    /// Insert an already validated denomination, returning the tier reached.
    ///
    /// The destination comes from the transition table keyed by the tier held
    /// before insertion; it always equals the tier recomputed from the new credit.
    pub fn insert(&mut self, denomination: Denomination) -> Result<Tier, MachineError> {
        let amount = denomination.amount();
        let credit = self
            .credit
            .checked_add(amount)
            .ok_or(MachineError::CreditOverflow {
                credit: self.credit,
                amount,
            })?;

        let next = self.table.next(self.tier(), denomination);
        debug_assert_eq!(next, Tier::of(credit));

        self.credit = credit;
        Ok(next)
    }

    pub fn can_dispense(&self) -> bool {
        self.credit >= DISPENSE_PRICE
    }

    /// Dispense one `item`. Returns `false`, leaving the machine untouched,
    /// when credit is below the price.
    pub fn dispense(&mut self, item: &str) -> bool {
        self.try_dispense(item).is_ok()
    }

    /// Dispense one `item`, returning the credit left over.
    pub fn try_dispense(&mut self, item: &str) -> Result<Amount, MachineError> {
        let credit =
            self.credit
                .checked_sub(DISPENSE_PRICE)
                .ok_or(MachineError::InsufficientCredit {
                    credit: self.credit,
                    price: DISPENSE_PRICE,
                })?;

        self.credit = credit;
        *self.dispensed.entry(item.to_string()).or_default() += 1;
        Ok(credit)
    }

    /// Hand back all credit and reset to the lowest tier.
    pub fn return_change(&mut self) -> Amount {
        std::mem::take(&mut self.credit)
    }

    pub fn status(&self) -> Status {
        Status::from(self.tier())
    }

    pub fn credit(&self) -> Amount {
        self.credit
    }

    pub fn tier(&self) -> Tier {
        Tier::of(self.credit)
    }

    /// Credit still needed before a dispense is authorized.
    pub fn remaining(&self) -> Amount {
        DISPENSE_PRICE.saturating_sub(self.credit)
    }

    /// Dispensed tallies, ordered by item identifier.
    pub fn dispensed(&self) -> impl Iterator<Item = (&str, u64)> + '_ {
        self.dispensed
            .iter()
            .map(|(item, count)| (item.as_str(), *count))
    }

    pub fn dispensed_count(&self, item: &str) -> u64 {
        self.dispensed.get(item).copied().unwrap_or(0)
    }

    pub fn table(&self) -> &TransitionTable {
        &self.table
    }
}

/// Private API
impl VendingMachine {
    fn apply_insert(&mut self, amount: u64) -> Result<Event, MachineError> {
        let denomination = Denomination::try_from(amount)?;
        self.insert(denomination)?;
        Ok(Event::Inserted(denomination))
    }

    fn outcome(&self, event: Event) -> Outcome {
        Outcome {
            event,
            credit: self.credit,
            status: self.status(),
        }
    }

    /// Small helper to log `apply` results
    fn log_result(action: &str, detail: &str, credit: Amount, result: &Result<Event, MachineError>) {
        match result {
            Ok(_) => {
                info!(detail, credit = %credit, "{action} applied");
            }
            Err(e) => {
                info!(detail, credit = %credit, reason = %e, "{action} skipped");
            }
        }
    }
}

impl Default for VendingMachine {
    fn default() -> Self {
        Self::new()
    }
}
