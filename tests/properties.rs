//! Property-based tests for the credit machine.
//!
//! Machines are driven into arbitrary states with random valid insertions
//! and dispenses before the property under test is checked.

use kiosk_fsm::{Amount, DENOMINATIONS, DISPENSE_PRICE, Denomination, Tier, VendingMachine};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Insert(u64),
    Dispense,
}

prop_compose! {
    fn arbitrary_denomination()(index in 0..DENOMINATIONS.len()) -> u64 {
        DENOMINATIONS[index]
    }
}

fn arbitrary_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        3 => arbitrary_denomination().prop_map(Step::Insert),
        1 => Just(Step::Dispense),
    ]
}

fn arbitrary_rejected_value() -> impl Strategy<Value = u64> {
    any::<u64>().prop_filter("accepted denomination", |v| !DENOMINATIONS.contains(v))
}

prop_compose! {
    fn arbitrary_machine()(steps in prop::collection::vec(arbitrary_step(), 0..20)) -> VendingMachine {
        let mut machine = VendingMachine::new();
        for step in steps {
            match step {
                Step::Insert(value) => {
                    machine.insert_money(value);
                }
                Step::Dispense => {
                    machine.dispense("soda");
                }
            }
        }
        machine
    }
}

fn expected_tier(credit: u64) -> Tier {
    if credit >= 50 {
        Tier::Ready
    } else {
        *Tier::ALL
            .iter()
            .filter(|t| t.value() <= credit)
            .max()
            .unwrap()
    }
}

proptest! {
    #[test]
    fn insert_adds_value_and_recomputes_tier(
        mut machine in arbitrary_machine(),
        value in arbitrary_denomination(),
    ) {
        let before = machine.credit().value();
        let from = machine.tier();

        prop_assert!(machine.insert_money(value));

        let after = machine.credit().value();
        prop_assert_eq!(after, before + value);
        prop_assert_eq!(machine.tier(), expected_tier(after));
        prop_assert_eq!(machine.tier().is_ready(), after >= 50);

        let denomination = Denomination::new(value).unwrap();
        prop_assert_eq!(machine.table().next(from, denomination), machine.tier());
    }

    #[test]
    fn rejected_values_are_noops(
        mut machine in arbitrary_machine(),
        value in arbitrary_rejected_value(),
    ) {
        let credit = machine.credit();
        let counts: Vec<_> = machine.dispensed().map(|(i, c)| (i.to_string(), c)).collect();

        prop_assert!(!machine.insert_money(value));

        prop_assert_eq!(machine.credit(), credit);
        let after: Vec<_> = machine.dispensed().map(|(i, c)| (i.to_string(), c)).collect();
        prop_assert_eq!(after, counts);
    }

    #[test]
    fn dispense_succeeds_iff_price_covered(mut machine in arbitrary_machine()) {
        let credit = machine.credit();
        let count = machine.dispensed_count("juice");
        let covered = credit >= DISPENSE_PRICE;

        prop_assert_eq!(machine.can_dispense(), covered);
        prop_assert_eq!(machine.dispense("juice"), covered);

        if covered {
            prop_assert_eq!(machine.credit(), Amount::new(credit.value() - 50));
            prop_assert_eq!(machine.dispensed_count("juice"), count + 1);
        } else {
            prop_assert_eq!(machine.credit(), credit);
            prop_assert_eq!(machine.dispensed_count("juice"), count);
        }
        prop_assert_eq!(machine.tier(), expected_tier(machine.credit().value()));
    }

    #[test]
    fn return_change_hands_back_everything(mut machine in arbitrary_machine()) {
        let credit = machine.credit();

        prop_assert_eq!(machine.return_change(), credit);
        prop_assert_eq!(machine.credit(), Amount::ZERO);
        prop_assert_eq!(machine.tier(), Tier::Zero);
        prop_assert_eq!(machine.return_change(), Amount::ZERO);
    }

    #[test]
    fn remaining_closes_the_gap(machine in arbitrary_machine()) {
        let credit = machine.credit();
        let remaining = machine.remaining();

        if machine.can_dispense() {
            prop_assert_eq!(remaining, Amount::ZERO);
        } else {
            prop_assert_eq!(credit + remaining, DISPENSE_PRICE);
        }
    }
}
