pub mod amount;
pub mod csv;
pub mod machine;
pub mod model;

pub use amount::Amount;
pub use machine::{Event, MachineError, Outcome, VendingMachine};
pub use model::{CATALOG, Command, DENOMINATIONS, DISPENSE_PRICE, Denomination, Status, Tier};
