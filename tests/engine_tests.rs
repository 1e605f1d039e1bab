// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use credtrack::engine::{BILL_ADJUSTMENT_DESC, PARTIAL_PAYMENT_DESC};
use credtrack::error::StoreError;
use credtrack::ledger::Ledger;
use credtrack::models::{Category, RecurringFrequency, Spend};
use credtrack::store::MemoryStore;
use credtrack::views;
use rust_decimal::Decimal;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn category(name: &str, next_bill: Option<NaiveDate>) -> Category {
    Category {
        id: Uuid::new_v4(),
        name: name.into(),
        color: "#6366f1".into(),
        group: None,
        card_number: None,
        next_bill_date: next_bill,
        icon: None,
        created_at: Utc::now(),
    }
}

fn spend(category_id: Uuid, amount: &str, d: NaiveDate) -> Spend {
    Spend {
        id: Uuid::new_v4(),
        amount: dec(amount),
        description: "Groceries".into(),
        date: d,
        category_id,
        subcategory: None,
        is_paid: false,
        is_recurring: false,
        recurring_frequency: None,
        due_date: None,
        emi_end_date: None,
        paid_date: None,
        created_at: Utc::now(),
    }
}

fn emi(category_id: Uuid, amount: &str, d: NaiveDate, end: Option<NaiveDate>) -> Spend {
    Spend {
        is_recurring: true,
        recurring_frequency: Some(RecurringFrequency::Monthly),
        emi_end_date: end,
        description: "Phone EMI".into(),
        ..spend(category_id, amount, d)
    }
}

fn ledger_with(categories: Vec<Category>, spends: Vec<Spend>) -> Ledger<MemoryStore> {
    Ledger::load(MemoryStore {
        categories,
        spends,
        fail_next_write: false,
    })
    .unwrap()
}

#[test]
fn no_match_is_a_noop() {
    let cat = category("Visa", None);
    let cat_id = cat.id;
    let mut paid = spend(cat_id, "100", date(2024, 3, 1));
    paid.is_paid = true;
    paid.paid_date = Some(Utc::now());
    let mut ledger = ledger_with(vec![cat], vec![paid]);

    let outcome = ledger.mark_all_paid(cat_id, None).unwrap();
    assert_eq!(outcome.paid, 0);
    assert_eq!(outcome.generated, 0);
    assert!(outcome.adjustment.is_none());
    assert_eq!(ledger.spends().len(), 1);

    // Stale category ids are safe too.
    let outcome = ledger.mark_all_paid(Uuid::new_v4(), None).unwrap();
    assert_eq!(outcome.paid, 0);
    assert_eq!(ledger.spends().len(), 1);
}

#[test]
fn full_settle_leaves_nothing_unpaid_and_no_adjustment() {
    let cat = category("Visa", None);
    let cat_id = cat.id;
    let spends = vec![
        spend(cat_id, "100", date(2024, 3, 1)),
        spend(cat_id, "50", date(2024, 3, 5)),
        spend(cat_id, "200", date(2024, 3, 10)),
    ];
    let mut ledger = ledger_with(vec![cat], spends);

    let outcome = ledger.mark_all_paid(cat_id, None).unwrap();
    assert_eq!(outcome.paid, 3);
    assert!(outcome.adjustment.is_none());
    assert_eq!(ledger.spends().len(), 3);
    for s in ledger.spends() {
        assert!(s.is_paid);
        assert!(s.paid_date.is_some());
    }
    assert_eq!(views::pending_balance(ledger.spends(), cat_id), Decimal::ZERO);
}

#[test]
fn waterfall_pays_oldest_first() {
    let cat = category("Visa", None);
    let cat_id = cat.id;
    let spends = vec![
        spend(cat_id, "200", date(2024, 3, 10)),
        spend(cat_id, "100", date(2024, 3, 1)),
        spend(cat_id, "50", date(2024, 3, 5)),
    ];
    let mut ledger = ledger_with(vec![cat], spends);

    let outcome = ledger.mark_all_paid(cat_id, Some(dec("150"))).unwrap();
    assert_eq!(outcome.paid, 2);
    assert!(outcome.adjustment.is_none());
    assert_eq!(ledger.spends().len(), 3);

    let by_date = |d: NaiveDate| ledger.spends().iter().find(|s| s.date == d).unwrap();
    assert!(by_date(date(2024, 3, 1)).is_paid);
    assert!(by_date(date(2024, 3, 5)).is_paid);
    assert!(!by_date(date(2024, 3, 10)).is_paid);
}

#[test]
fn waterfall_skips_what_does_not_fit_without_splitting() {
    let cat = category("Visa", None);
    let cat_id = cat.id;
    let spends = vec![
        spend(cat_id, "100", date(2024, 3, 1)),
        spend(cat_id, "200", date(2024, 3, 5)),
        spend(cat_id, "50", date(2024, 3, 10)),
    ];
    let mut ledger = ledger_with(vec![cat], spends);

    let outcome = ledger.mark_all_paid(cat_id, Some(dec("150"))).unwrap();
    assert_eq!(outcome.paid, 2);
    assert!(outcome.adjustment.is_none());
    let by_date = |d: NaiveDate| ledger.spends().iter().find(|s| s.date == d).unwrap();
    assert!(by_date(date(2024, 3, 1)).is_paid);
    assert!(!by_date(date(2024, 3, 5)).is_paid);
    assert!(by_date(date(2024, 3, 10)).is_paid);
}

#[test]
fn partial_payment_books_an_open_credit() {
    let cat = category("Visa", None);
    let cat_id = cat.id;
    let mut ledger = ledger_with(vec![cat], vec![spend(cat_id, "100", date(2024, 3, 1))]);

    let outcome = ledger.mark_all_paid(cat_id, Some(dec("60"))).unwrap();
    assert_eq!(outcome.paid, 0);
    assert_eq!(outcome.adjustment, Some(dec("-60")));
    assert_eq!(ledger.spends().len(), 2);

    let original = ledger
        .spends()
        .iter()
        .find(|s| s.date == date(2024, 3, 1))
        .unwrap();
    assert!(!original.is_paid);

    let adj = ledger
        .spends()
        .iter()
        .find(|s| s.description == PARTIAL_PAYMENT_DESC)
        .unwrap();
    assert_eq!(adj.amount, dec("-60"));
    assert!(!adj.is_paid);
    assert!(adj.paid_date.is_none());
}

#[test]
fn overpayment_books_a_settled_adjustment() {
    let cat = category("Visa", None);
    let cat_id = cat.id;
    let spends = vec![
        spend(cat_id, "60", date(2024, 3, 1)),
        spend(cat_id, "40", date(2024, 3, 5)),
    ];
    let mut ledger = ledger_with(vec![cat], spends);

    let outcome = ledger.mark_all_paid(cat_id, Some(dec("130"))).unwrap();
    assert_eq!(outcome.paid, 2);
    assert_eq!(outcome.adjustment, Some(dec("-30")));

    let adj = ledger
        .spends()
        .iter()
        .find(|s| s.description == BILL_ADJUSTMENT_DESC)
        .unwrap();
    assert_eq!(adj.amount, dec("-30"));
    assert!(adj.is_paid);
    assert!(adj.paid_date.is_some());
}

#[test]
fn near_exact_payment_creates_no_adjustment() {
    let cat = category("Visa", None);
    let cat_id = cat.id;
    let mut ledger = ledger_with(vec![cat], vec![spend(cat_id, "100", date(2024, 3, 1))]);

    // Within the 0.01 tolerance; a rounding crumb must not book a record.
    let outcome = ledger.mark_all_paid(cat_id, Some(dec("100.005"))).unwrap();
    assert_eq!(outcome.paid, 1);
    assert!(outcome.adjustment.is_none());
    assert_eq!(ledger.spends().len(), 1);
}

#[test]
fn zero_payment_is_a_noop() {
    let cat = category("Visa", None);
    let cat_id = cat.id;
    let mut ledger = ledger_with(vec![cat], vec![spend(cat_id, "100", date(2024, 3, 1))]);

    let outcome = ledger.mark_all_paid(cat_id, Some(Decimal::ZERO)).unwrap();
    assert_eq!(outcome.paid, 0);
    assert!(outcome.adjustment.is_none());
    assert_eq!(ledger.spends().len(), 1);
    assert!(!ledger.spends()[0].is_paid);
}

#[test]
fn settling_a_recurring_spend_rolls_it_forward() {
    let cat = category("Visa", Some(date(2024, 2, 1)));
    let cat_id = cat.id;
    let original = emi(cat_id, "500", date(2024, 1, 15), None);
    let original_id = original.id;
    let mut ledger = ledger_with(vec![cat], vec![original]);

    let outcome = ledger.mark_all_paid(cat_id, None).unwrap();
    assert_eq!(outcome.paid, 1);
    assert_eq!(outcome.generated, 1);
    assert!(outcome.bill_date_advanced);
    assert_eq!(ledger.spends().len(), 2);

    let next = ledger
        .spends()
        .iter()
        .find(|s| s.id != original_id)
        .unwrap();
    assert_eq!(next.date, date(2024, 2, 15));
    assert!(!next.is_paid);
    assert!(next.paid_date.is_none());
    assert!(next.is_recurring);

    assert_eq!(
        ledger.category(cat_id).unwrap().next_bill_date,
        Some(date(2024, 3, 1))
    );
}

#[test]
fn recurrence_stops_past_the_emi_end_date() {
    let cat = category("Visa", None);
    let cat_id = cat.id;
    let mut ledger = ledger_with(
        vec![cat],
        vec![emi(cat_id, "500", date(2024, 1, 15), Some(date(2024, 1, 31)))],
    );

    let outcome = ledger.mark_all_paid(cat_id, None).unwrap();
    assert_eq!(outcome.paid, 1);
    assert_eq!(outcome.generated, 0);
    assert_eq!(ledger.spends().len(), 1);
    assert!(ledger.spends()[0].is_paid);
}

#[test]
fn bill_date_only_moves_when_a_recurring_spend_was_paid() {
    let cat = category("Visa", Some(date(2024, 4, 1)));
    let cat_id = cat.id;
    let mut ledger = ledger_with(vec![cat], vec![spend(cat_id, "100", date(2024, 3, 1))]);

    let outcome = ledger.mark_all_paid(cat_id, None).unwrap();
    assert_eq!(outcome.paid, 1);
    assert!(!outcome.bill_date_advanced);
    assert_eq!(
        ledger.category(cat_id).unwrap().next_bill_date,
        Some(date(2024, 4, 1))
    );
}

#[test]
fn toggling_paid_generates_once_and_unpay_does_not_retract() {
    let cat = category("Visa", Some(date(2024, 2, 1)));
    let cat_id = cat.id;
    let original = emi(cat_id, "500", date(2024, 1, 15), None);
    let id = original.id;
    let mut ledger = ledger_with(vec![cat], vec![original]);

    let outcome = ledger.set_spend_paid(id, true).unwrap();
    assert!(outcome.changed);
    assert!(outcome.generated);
    assert!(outcome.bill_date_advanced);
    assert_eq!(ledger.spends().len(), 2);

    // Undoing the payment keeps the generated occurrence around.
    let outcome = ledger.set_spend_paid(id, false).unwrap();
    assert!(outcome.changed);
    assert!(!outcome.generated);
    assert_eq!(ledger.spends().len(), 2);
    let original = ledger.spend(id).unwrap();
    assert!(!original.is_paid);
    assert!(original.paid_date.is_none());
}

#[test]
fn toggle_is_idempotent_and_ignores_unknown_ids() {
    let cat = category("Visa", None);
    let cat_id = cat.id;
    let s = spend(cat_id, "100", date(2024, 3, 1));
    let id = s.id;
    let mut ledger = ledger_with(vec![cat], vec![s]);

    assert!(!ledger.set_spend_paid(id, false).unwrap().changed);
    assert!(ledger.set_spend_paid(id, true).unwrap().changed);
    assert!(!ledger.set_spend_paid(id, true).unwrap().changed);
    assert!(!ledger.set_spend_paid(Uuid::new_v4(), true).unwrap().changed);
}

#[test]
fn net_balance_tracks_every_mutation() {
    let cat = category("Visa", Some(date(2024, 2, 1)));
    let cat_id = cat.id;
    let spends = vec![
        spend(cat_id, "100", date(2024, 1, 1)),
        emi(cat_id, "500", date(2024, 1, 15), None),
    ];
    let mut ledger = ledger_with(vec![cat], spends);

    let check = |ledger: &Ledger<MemoryStore>| {
        let expected: Decimal = ledger
            .spends()
            .iter()
            .filter(|s| s.category_id == cat_id)
            .map(|s| s.amount)
            .sum();
        assert_eq!(views::net_balance(ledger.spends(), cat_id), expected);
    };

    check(&ledger);
    ledger.mark_all_paid(cat_id, Some(dec("120"))).unwrap();
    check(&ledger);
    ledger.mark_all_paid(cat_id, None).unwrap();
    check(&ledger);
    let id = ledger.spends()[0].id;
    ledger.set_spend_paid(id, false).unwrap();
    check(&ledger);
}

#[test]
fn failed_persist_keeps_the_memory_state_and_reports() {
    let cat = category("Visa", None);
    let cat_id = cat.id;
    let mut ledger = Ledger::load(MemoryStore {
        categories: vec![cat],
        spends: vec![spend(cat_id, "100", date(2024, 3, 1))],
        fail_next_write: true,
    })
    .unwrap();

    let err = ledger.mark_all_paid(cat_id, None).unwrap_err();
    assert!(matches!(err, StoreError::Persistence { .. }));
    // Optimistic update: memory already reflects the settlement.
    assert!(ledger.spends()[0].is_paid);
}
