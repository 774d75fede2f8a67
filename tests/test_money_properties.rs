//! Arithmetic properties of fixed-point money.

use proptest::prelude::*;
use std::cmp::Ordering;
use tenant_primitives::domain::{Currency, Money, MoneyOptions, RoundingMode};

const MAX_MINOR: i64 = 1_000_000_000_000;

fn currency() -> impl Strategy<Value = Currency> {
    prop::sample::select(Currency::ALL.to_vec())
}

fn money_in(currency: Currency) -> impl Strategy<Value = Money> {
    (0..MAX_MINOR).prop_map(move |minor| {
        Money::from_minor_units(minor, currency, MoneyOptions::default()).unwrap()
    })
}

fn pair() -> impl Strategy<Value = (Money, Money)> {
    currency().prop_flat_map(|c| (money_in(c), money_in(c)))
}

fn sum(parts: &[Money], currency: Currency) -> Money {
    parts
        .iter()
        .try_fold(Money::zero(currency), |acc, part| acc.add(part))
        .unwrap()
}

proptest! {
    #[test]
    fn prop_addition_commutes((a, b) in pair()) {
        prop_assert_eq!(a.add(&b).unwrap(), b.add(&a).unwrap());
    }

    #[test]
    fn prop_subtraction_undoes_addition((a, b) in pair()) {
        let total = a.add(&b).unwrap();
        prop_assert_eq!(total.subtract(&b).unwrap(), a);
    }

    #[test]
    fn prop_ordering_is_consistent((a, b) in pair()) {
        let forward = a.compare_to(&b).unwrap();
        prop_assert_eq!(b.compare_to(&a).unwrap(), forward.reverse());
        prop_assert_eq!(a.is_greater_than(&b).unwrap(), forward == Ordering::Greater);
        prop_assert_eq!(a.is_less_than(&b).unwrap(), forward == Ordering::Less);
    }

    #[test]
    fn prop_allocate_sums_to_original(
        minor in 0..MAX_MINOR,
        ratios in prop::collection::vec(0u32..100, 1..8),
    ) {
        prop_assume!(ratios.iter().any(|r| *r > 0));
        let money = Money::from_minor_units(minor, Currency::Cny, MoneyOptions::default()).unwrap();
        let parts = money.allocate(&ratios).unwrap();

        prop_assert_eq!(parts.len(), ratios.len());
        prop_assert_eq!(sum(&parts, Currency::Cny), money);
        for part in &parts {
            prop_assert_eq!(part.currency(), Currency::Cny);
        }
    }

    #[test]
    fn prop_allocate_shares_differ_by_at_most_one_unit(
        minor in 0..MAX_MINOR,
        count in 1usize..10,
    ) {
        let money = Money::from_minor_units(minor, Currency::Usd, MoneyOptions::default()).unwrap();
        let parts = money.allocate(&vec![1; count]).unwrap();
        let units: Vec<i64> = parts.iter().map(Money::minor_units).collect();
        let max = units.iter().copied().max().unwrap();
        let min = units.iter().copied().min().unwrap();
        prop_assert!(max - min <= 1);
    }

    #[test]
    fn prop_multiply_by_one_is_identity(a in currency().prop_flat_map(money_in)) {
        prop_assert_eq!(a.multiply(1.0).unwrap(), a);
        prop_assert_eq!(a.divide(1.0).unwrap(), a);
    }

    #[test]
    fn prop_floor_never_exceeds_ceil(
        whole in 0u64..1_000_000,
        frac in 0u64..1_000_000,
    ) {
        let text = format!("{whole}.{frac:06}");
        let floor = MoneyOptions::new(2, RoundingMode::Floor);
        let ceil = MoneyOptions::new(2, RoundingMode::Ceil);
        let low = Money::from_decimal_str(&text, Currency::Eur, floor).unwrap();
        let high = Money::from_decimal_str(&text, Currency::Eur, ceil).unwrap();
        let gap = high.minor_units() - low.minor_units();
        prop_assert!(gap == 0 || gap == 1);
        prop_assert_eq!(gap == 0, frac % 10_000 == 0);
    }

    #[test]
    fn prop_display_parses_back(a in currency().prop_flat_map(money_in)) {
        let parsed: Money = a.to_string().parse().unwrap();
        prop_assert_eq!(parsed, a);
    }
}

#[test]
fn test_allocate_uneven_split() {
    let money = Money::parse("USD 100.00").unwrap();
    let parts = money.allocate(&[1, 1, 1]).unwrap();
    let amounts: Vec<String> = parts.iter().map(Money::amount_string).collect();
    assert_eq!(amounts, vec!["33.34", "33.33", "33.33"]);
}

#[test]
fn test_allocate_rejects_zero_total() {
    let money = Money::parse("USD 100.00").unwrap();
    assert!(money.allocate(&[0, 0]).is_err());
    assert!(money.allocate(&[]).is_err());
}
