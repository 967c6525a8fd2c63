// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use budgetbook::errors::BudgetError;
use budgetbook::models::IncomePeriod;
use budgetbook::period::Period;
use budgetbook::store::{self, IncomeChange, NewExpense, NewRecurring};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> (Connection, String) {
    let conn = budgetbook::db::open_in_memory().unwrap();
    let u = store::add_user(&conn, "ann@example.com", Some("Ann"), None, false).unwrap();
    store::add_category(&conn, &u.id, "Food").unwrap();
    store::add_category(&conn, &u.id, "Housing").unwrap();
    (conn, u.id)
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn expense(amount: &str, category: &str, on: &str) -> NewExpense {
    NewExpense {
        amount: dec(amount),
        category: category.into(),
        description: "test".into(),
        date: date(on),
    }
}

fn domain_err(err: &anyhow::Error) -> &BudgetError {
    err.downcast_ref::<BudgetError>()
        .expect("expected a BudgetError")
}

#[test]
fn duplicate_category_is_rejected_case_insensitively() {
    let (conn, owner) = setup();
    let err = store::add_category(&conn, &owner, "  fOOd ").unwrap_err();
    assert_eq!(
        domain_err(&err),
        &BudgetError::DuplicateCategory("fOOd".into())
    );
    assert_eq!(store::list_categories(&conn, &owner).unwrap().len(), 2);
}

#[test]
fn category_in_use_cannot_be_deleted() {
    let (conn, owner) = setup();
    store::add_expense(&conn, &owner, expense("12.50", "Food", "2024-06-01")).unwrap();
    store::add_recurring(
        &conn,
        &owner,
        NewRecurring {
            name: "Rent".into(),
            amount: dec("800"),
            category: "Housing".into(),
            day_of_month: 1,
        },
    )
    .unwrap();

    for name in ["Food", "Housing"] {
        let err = store::delete_category(&conn, &owner, name).unwrap_err();
        assert!(matches!(domain_err(&err), BudgetError::CategoryInUse { .. }));
    }

    store::add_category(&conn, &owner, "Fuel").unwrap();
    store::delete_category(&conn, &owner, "Fuel").unwrap();
    let names: Vec<_> = store::list_categories(&conn, &owner)
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Food", "Housing"]);
}

#[test]
fn expenses_need_positive_amount_and_known_category() {
    let (conn, owner) = setup();
    let err = store::add_expense(&conn, &owner, expense("0", "Food", "2024-06-01")).unwrap_err();
    assert!(matches!(domain_err(&err), BudgetError::NonPositiveAmount(_)));
    let err = store::add_expense(&conn, &owner, expense("5", "Toys", "2024-06-01")).unwrap_err();
    assert_eq!(domain_err(&err), &BudgetError::UnknownCategory("Toys".into()));
}

#[test]
fn blank_names_are_rejected() {
    let (conn, owner) = setup();
    let err = store::add_category(&conn, &owner, "   ").unwrap_err();
    assert_eq!(domain_err(&err), &BudgetError::EmptyName("Category"));

    let err = store::add_recurring(
        &conn,
        &owner,
        NewRecurring {
            name: "  ".into(),
            amount: dec("800"),
            category: "Housing".into(),
            day_of_month: 1,
        },
    )
    .unwrap_err();
    assert_eq!(domain_err(&err), &BudgetError::EmptyName("Recurring expense"));
    assert_eq!(store::list_categories(&conn, &owner).unwrap().len(), 2);
    assert!(store::list_recurring(&conn, &owner).unwrap().is_empty());
}

#[test]
fn category_references_resolve_to_stored_spelling() {
    let (conn, owner) = setup();
    let e = store::add_expense(&conn, &owner, expense("5", " food ", "2024-06-01")).unwrap();
    assert_eq!(e.category, "Food");
    let t = store::add_recurring(
        &conn,
        &owner,
        NewRecurring {
            name: "Rent".into(),
            amount: dec("800"),
            category: "HOUSING".into(),
            day_of_month: 1,
        },
    )
    .unwrap();
    assert_eq!(t.category, "Housing");
    assert_eq!(
        store::find_category(&conn, &owner, "fOoD").unwrap().as_deref(),
        Some("Food")
    );

    let err = store::delete_category(&conn, &owner, "food").unwrap_err();
    assert!(matches!(
        domain_err(&err),
        BudgetError::CategoryInUse { expenses: 1, .. }
    ));
}

#[test]
fn recurring_day_must_be_in_range() {
    let (conn, owner) = setup();
    let err = store::add_recurring(
        &conn,
        &owner,
        NewRecurring {
            name: "Rent".into(),
            amount: dec("800"),
            category: "Housing".into(),
            day_of_month: 32,
        },
    )
    .unwrap_err();
    assert_eq!(domain_err(&err), &BudgetError::InvalidDayOfMonth(32));
}

#[test]
fn list_expenses_filters_by_month_newest_first() {
    let (conn, owner) = setup();
    store::add_expense(&conn, &owner, expense("1", "Food", "2024-05-31")).unwrap();
    store::add_expense(&conn, &owner, expense("2", "Food", "2024-06-01")).unwrap();
    store::add_expense(&conn, &owner, expense("3", "Food", "2024-06-20")).unwrap();

    let june = store::list_expenses(&conn, &owner, Some(Period::parse("2024-06").unwrap())).unwrap();
    let amounts: Vec<_> = june.iter().map(|e| e.amount).collect();
    assert_eq!(amounts, [dec("3"), dec("2")]);
    assert_eq!(store::list_expenses(&conn, &owner, None).unwrap().len(), 3);
}

#[test]
fn zero_month_income_removes_the_override() {
    let (conn, owner) = setup();
    let june = IncomePeriod::parse("2024-06").unwrap();
    store::save_income(&conn, &owner, IncomePeriod::Default, dec("500")).unwrap();
    assert_eq!(
        store::save_income(&conn, &owner, june, dec("700")).unwrap(),
        IncomeChange::Saved
    );
    let snap = store::load_snapshot(&conn, &owner).unwrap();
    assert_eq!(snap.income_overrides.get("2024-06"), Some(&dec("700")));

    assert_eq!(
        store::save_income(&conn, &owner, june, Decimal::ZERO).unwrap(),
        IncomeChange::Removed
    );
    let snap = store::load_snapshot(&conn, &owner).unwrap();
    assert!(snap.income_overrides.is_empty());
    assert_eq!(snap.default_income, dec("500"));
}

#[test]
fn zero_default_income_is_stored() {
    let (conn, owner) = setup();
    store::save_income(&conn, &owner, IncomePeriod::Default, dec("500")).unwrap();
    store::save_income(&conn, &owner, IncomePeriod::Default, Decimal::ZERO).unwrap();
    let records = store::load_incomes(&conn, &owner).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amount, Decimal::ZERO);
}

#[test]
fn income_upsert_keeps_one_row_per_period() {
    let (conn, owner) = setup();
    let p = IncomePeriod::parse("2024-06").unwrap();
    store::save_income(&conn, &owner, p, dec("100")).unwrap();
    store::save_income(&conn, &owner, p, dec("250")).unwrap();
    let records = store::load_incomes(&conn, &owner).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].amount, dec("250"));

    let err = store::save_income(&conn, &owner, p, dec("-1")).unwrap_err();
    assert!(matches!(domain_err(&err), BudgetError::NegativeIncome(_)));
    assert!(store::remove_income_override(&conn, &owner, Period::parse("2024-06").unwrap()).unwrap());
    assert!(!store::remove_income_override(&conn, &owner, Period::parse("2024-06").unwrap()).unwrap());
}

#[test]
fn records_are_scoped_to_their_owner() {
    let (conn, ann) = setup();
    let bob = store::add_user(&conn, "bob@example.com", None, None, false)
        .unwrap()
        .id;
    store::add_category(&conn, &bob, "Food").unwrap();
    let e = store::add_expense(&conn, &ann, expense("9", "Food", "2024-06-01")).unwrap();

    assert!(store::list_expenses(&conn, &bob, None).unwrap().is_empty());
    assert!(store::delete_expense(&conn, &bob, &e.id).is_err());
    store::delete_expense(&conn, &ann, &e.id).unwrap();
    assert!(store::list_expenses(&conn, &ann, None).unwrap().is_empty());
}

#[test]
fn deleting_a_user_cascades() {
    let (conn, owner) = setup();
    store::add_expense(&conn, &owner, expense("9", "Food", "2024-06-01")).unwrap();
    store::save_income(&conn, &owner, IncomePeriod::Default, dec("100")).unwrap();
    store::delete_user(&conn, &owner).unwrap();

    for table in ["expenses", "categories", "monthly_incomes", "recurring_expenses"] {
        let n: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
            .unwrap();
        assert_eq!(n, 0, "{} should be empty", table);
    }
}
