// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Budget resolution: recurring projections, effective income and carry-over.
//!
//! Everything in here is pure. Callers hand in a snapshot of the owner's
//! records plus "today"; nothing reads the clock or the database.

use crate::models::{BudgetSnapshot, Expense, PROJECTED_ID_PREFIX, RecurringExpense};
use crate::period::Period;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Latest day of `period` whose recurring charges have already happened
/// as of `reference`. 31 for past months, today's day for the current
/// month and 0 for future months.
pub fn max_day_to_show(period: Period, reference: NaiveDate) -> u32 {
    let current = Period::of(reference);
    if period < current {
        31
    } else if period == current {
        reference.day()
    } else {
        0
    }
}

pub fn projected_id(template_id: &str, date: NaiveDate) -> String {
    format!("{}{}:{}", PROJECTED_ID_PREFIX, template_id, date)
}

/// Virtual expenses due in `period` as of `reference`.
///
/// Output order follows `templates`. The day of month is compared
/// unclamped against the cutoff and clamped only when building the date,
/// so a day-31 template in February shows up once February is in the past.
pub fn project_recurring_expenses(
    templates: &[RecurringExpense],
    period: Period,
    reference: NaiveDate,
) -> Vec<Expense> {
    let max_day = max_day_to_show(period, reference);
    templates
        .iter()
        .filter(|t| t.day_of_month <= max_day)
        .map(|t| {
            let date = period.day(t.day_of_month);
            Expense {
                id: projected_id(&t.id, date),
                owner: t.owner.clone(),
                amount: t.amount,
                category: t.category.clone(),
                description: t.name.clone(),
                date,
            }
        })
        .collect()
}

/// The month override when one exists, otherwise the default income.
pub fn resolve_effective_income(
    overrides: &BTreeMap<String, Decimal>,
    default_income: Decimal,
    period_key: &str,
) -> Decimal {
    overrides
        .get(period_key)
        .copied()
        .unwrap_or(default_income)
}

/// Sum of real expenses dated inside `period`. Projected records are skipped.
pub fn total_for_period(expenses: &[Expense], period: Period) -> Decimal {
    sum_amounts(
        expenses
            .iter()
            .filter(|e| !e.is_projected() && period.contains(e.date)),
    )
}

/// Saturating sum, so rows that predate the amount cap cannot panic.
fn sum_amounts<'a>(expenses: impl Iterator<Item = &'a Expense>) -> Decimal {
    expenses.fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount))
}

/// Previous month's income minus its real expenses. Negative means the
/// previous month was overspent. Recurring projections do not count here.
pub fn compute_carry_over(
    expenses: &[Expense],
    overrides: &BTreeMap<String, Decimal>,
    default_income: Decimal,
    period: Period,
) -> Decimal {
    let prev = period.previous();
    let income = resolve_effective_income(overrides, default_income, &prev.key());
    income.saturating_sub(total_for_period(expenses, prev))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotal {
    pub period: Period,
    pub total: Decimal,
}

/// One `total_for_period` per calendar month of `year`.
pub fn yearly_totals(expenses: &[Expense], year: i32) -> Vec<MonthTotal> {
    Period::months_of_year(year)
        .into_iter()
        .map(|period| MonthTotal {
            period,
            total: total_for_period(expenses, period),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Decimal,
}

/// Spend per category inside `period`, largest first. Unlike the totals
/// above this takes whatever it is given, projected records included.
pub fn category_breakdown<'a, I>(expenses: I, period: Period) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Expense>,
{
    let mut agg: HashMap<&str, Decimal> = HashMap::new();
    for e in expenses.into_iter().filter(|e| period.contains(e.date)) {
        let total = agg.entry(e.category.as_str()).or_insert(Decimal::ZERO);
        *total = total.saturating_add(e.amount);
    }
    let mut items: Vec<CategoryTotal> = agg
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    items.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    items
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetOverview {
    pub income: Decimal,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub over_budget: bool,
    pub used_pct: Decimal,
    pub remaining_pct: Decimal,
}

/// `part` as a percentage of a positive `whole`. Saturates at
/// `Decimal::MAX`/`MIN` when the ratio does not fit.
fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if part.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

impl BudgetOverview {
    pub fn compute(income: Decimal, spent: Decimal) -> Self {
        let remaining = income.saturating_sub(spent);
        let (used_pct, remaining_pct) = if income > Decimal::ZERO {
            (percent_of(spent, income), percent_of(remaining, income))
        } else {
            (Decimal::ZERO, Decimal::ZERO)
        };
        Self {
            income,
            spent,
            remaining,
            over_budget: remaining < Decimal::ZERO,
            used_pct,
            remaining_pct,
        }
    }
}

/// The month view: what the dashboard shows for one selected period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlySummary {
    pub period: Period,
    pub reference_date: NaiveDate,
    pub income: Decimal,
    pub carry_over: Decimal,
    pub spent: Decimal,
    pub recurring: Vec<Expense>,
    pub recurring_total: Decimal,
    pub total: Decimal,
    pub overview: BudgetOverview,
    pub by_category: Vec<CategoryTotal>,
}

impl MonthlySummary {
    /// `total` counts projected recurring charges, `carry_over` does not.
    pub fn build(snapshot: &BudgetSnapshot, period: Period, reference: NaiveDate) -> Self {
        let income = resolve_effective_income(
            &snapshot.income_overrides,
            snapshot.default_income,
            &period.key(),
        );
        let carry_over = compute_carry_over(
            &snapshot.expenses,
            &snapshot.income_overrides,
            snapshot.default_income,
            period,
        );
        let spent = total_for_period(&snapshot.expenses, period);
        let recurring = project_recurring_expenses(&snapshot.recurring, period, reference);
        let recurring_total = sum_amounts(recurring.iter());
        let total = spent.saturating_add(recurring_total);
        let by_category = category_breakdown(
            snapshot
                .expenses
                .iter()
                .filter(|e| !e.is_projected())
                .chain(recurring.iter()),
            period,
        );
        Self {
            period,
            reference_date: reference,
            income,
            carry_over,
            spent,
            recurring,
            recurring_total,
            total,
            overview: BudgetOverview::compute(income, total),
            by_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn p(s: &str) -> Period {
        Period::parse(s).unwrap()
    }

    fn template(id: &str, day: u32) -> RecurringExpense {
        RecurringExpense {
            id: id.into(),
            owner: "u1".into(),
            name: format!("Bill {}", id),
            amount: dec("10.50"),
            category: "Housing".into(),
            day_of_month: day,
        }
    }

    fn expense(id: &str, date: &str, amount: &str) -> Expense {
        Expense {
            id: id.into(),
            owner: "u1".into(),
            amount: dec(amount),
            category: "Food".into(),
            description: String::new(),
            date: d(date),
        }
    }

    #[test]
    fn day_31_clamps_into_february() {
        let t = [template("rent", 31)];
        let non_leap = project_recurring_expenses(&t, p("2023-02"), d("2023-06-01"));
        assert_eq!(non_leap[0].date, d("2023-02-28"));
        let leap = project_recurring_expenses(&t, p("2024-02"), d("2024-06-01"));
        assert_eq!(leap[0].date, d("2024-02-29"));
        assert_eq!(leap[0].id, "recurring:rent:2024-02-29");
    }

    #[test]
    fn past_month_projects_every_template() {
        let t: Vec<_> = (1..=31).map(|day| template(&day.to_string(), day)).collect();
        let out = project_recurring_expenses(&t, p("2024-05"), d("2024-06-15"));
        assert_eq!(out.len(), 31);
        assert_eq!(out.last().unwrap().date, d("2024-05-31"));
    }

    #[test]
    fn current_month_cuts_off_at_reference_day() {
        let t = [template("late", 20), template("early", 10), template("today", 15)];
        let out = project_recurring_expenses(&t, p("2024-06"), d("2024-06-15"));
        let ids: Vec<_> = out.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["recurring:early:2024-06-10", "recurring:today:2024-06-15"]);
    }

    #[test]
    fn future_month_projects_nothing() {
        let t: Vec<_> = (1..=31).map(|day| template(&day.to_string(), day)).collect();
        assert!(project_recurring_expenses(&t, p("2024-07"), d("2024-06-15")).is_empty());
        assert!(project_recurring_expenses(&t, p("2025-01"), d("2024-06-15")).is_empty());
    }

    #[test]
    fn projection_copies_template_fields_and_is_repeatable() {
        let t = [template("a", 3), template("b", 1)];
        let first = project_recurring_expenses(&t, p("2024-03"), d("2024-06-15"));
        let second = project_recurring_expenses(&t, p("2024-03"), d("2024-06-15"));
        assert_eq!(first, second);
        assert_eq!(first[0].description, "Bill a");
        assert_eq!(first[0].category, "Housing");
        assert_eq!(first[0].amount, dec("10.50"));
        assert!(first.iter().all(Expense::is_projected));
    }

    #[test]
    fn income_falls_back_to_default() {
        let mut overrides = BTreeMap::new();
        assert_eq!(resolve_effective_income(&overrides, dec("500"), "2024-06"), dec("500"));
        overrides.insert("2024-06".to_string(), dec("700"));
        assert_eq!(resolve_effective_income(&overrides, dec("500"), "2024-06"), dec("700"));
        assert_eq!(resolve_effective_income(&overrides, dec("500"), "2024-07"), dec("500"));
    }

    #[test]
    fn zero_month_income_is_an_explicit_zero() {
        let mut overrides = BTreeMap::new();
        overrides.insert("2024-06".to_string(), Decimal::ZERO);
        assert_eq!(
            resolve_effective_income(&overrides, dec("500"), "2024-06"),
            Decimal::ZERO
        );
        assert_eq!(resolve_effective_income(&overrides, dec("500"), "2024-05"), dec("500"));
    }

    #[test]
    fn carry_over_after_a_zero_income_month_is_pure_deficit() {
        let mut overrides = BTreeMap::new();
        overrides.insert("2024-05".to_string(), Decimal::ZERO);
        let expenses = [expense("1", "2024-05-20", "80")];
        assert_eq!(
            compute_carry_over(&expenses, &overrides, dec("500"), p("2024-06")),
            dec("-80")
        );
        assert_eq!(
            compute_carry_over(&[], &overrides, dec("500"), p("2024-06")),
            Decimal::ZERO
        );
    }

    #[test]
    fn carry_over_goes_negative_when_overspent() {
        let mut overrides = BTreeMap::new();
        overrides.insert("2024-05".to_string(), dec("1000"));
        let expenses = [
            expense("1", "2024-05-02", "700"),
            expense("2", "2024-05-31", "500"),
            expense("3", "2024-06-01", "999"),
            expense("4", "2023-05-10", "999"),
        ];
        assert_eq!(
            compute_carry_over(&expenses, &overrides, dec("0"), p("2024-06")),
            dec("-200")
        );
    }

    #[test]
    fn carry_over_uses_december_of_previous_year_in_january() {
        let expenses = [expense("1", "2023-12-24", "150")];
        let carry = compute_carry_over(&expenses, &BTreeMap::new(), dec("400"), p("2024-01"));
        assert_eq!(carry, dec("250"));
    }

    #[test]
    fn carry_over_ignores_projected_records() {
        let mut expenses = vec![expense("1", "2024-05-02", "100")];
        expenses.extend(project_recurring_expenses(
            &[template("rent", 1)],
            p("2024-05"),
            d("2024-06-15"),
        ));
        let carry = compute_carry_over(&expenses, &BTreeMap::new(), dec("300"), p("2024-06"));
        assert_eq!(carry, dec("200"));
    }

    #[test]
    fn yearly_totals_cover_twelve_months() {
        let expenses = [
            expense("1", "2024-01-05", "10"),
            expense("2", "2024-01-20", "5"),
            expense("3", "2024-12-31", "7.25"),
            expense("4", "2025-01-01", "100"),
        ];
        let totals = yearly_totals(&expenses, 2024);
        assert_eq!(totals.len(), 12);
        assert_eq!(totals[0].total, dec("15"));
        assert_eq!(totals[5].total, Decimal::ZERO);
        assert_eq!(totals[11].total, dec("7.25"));
        assert_eq!(totals[11].period.key(), "2024-12");
    }

    #[test]
    fn overview_reports_deficit_and_zero_income() {
        let over = BudgetOverview::compute(dec("100"), dec("150"));
        assert!(over.over_budget);
        assert_eq!(over.remaining, dec("-50"));
        assert_eq!(over.used_pct, dec("150"));

        let none = BudgetOverview::compute(Decimal::ZERO, dec("20"));
        assert_eq!(none.used_pct, Decimal::ZERO);
        assert_eq!(none.remaining_pct, Decimal::ZERO);
    }

    #[test]
    fn tiny_income_saturates_percentages() {
        let tiny = dec("0.0000000000000000000000000001");
        let o = BudgetOverview::compute(tiny, dec("1000"));
        assert!(o.over_budget);
        assert_eq!(o.used_pct, Decimal::MAX);
        assert_eq!(o.remaining_pct, Decimal::MIN);

        let snapshot = BudgetSnapshot {
            owner: "u1".into(),
            expenses: vec![expense("1", "2024-06-03", "50")],
            default_income: tiny,
            ..Default::default()
        };
        let s = MonthlySummary::build(&snapshot, p("2024-06"), d("2024-06-15"));
        assert_eq!(s.total, dec("50"));
        assert_eq!(s.overview.used_pct, Decimal::MAX);
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let expenses = [
            expense("1", "2024-06-01", &Decimal::MAX.to_string()),
            expense("2", "2024-06-02", "1"),
        ];
        assert_eq!(total_for_period(&expenses, p("2024-06")), Decimal::MAX);
        let carry = compute_carry_over(&expenses, &BTreeMap::new(), Decimal::ZERO, p("2024-07"));
        assert_eq!(carry, -Decimal::MAX);
    }

    #[test]
    fn summary_counts_projections_in_total_but_not_in_carry_over() {
        let snapshot = BudgetSnapshot {
            owner: "u1".into(),
            expenses: vec![
                expense("1", "2024-05-10", "40"),
                expense("2", "2024-06-03", "25"),
            ],
            recurring: vec![template("rent", 1), template("gym", 28)],
            default_income: dec("100"),
            ..Default::default()
        };
        let s = MonthlySummary::build(&snapshot, p("2024-06"), d("2024-06-15"));
        assert_eq!(s.income, dec("100"));
        assert_eq!(s.carry_over, dec("60"));
        assert_eq!(s.spent, dec("25"));
        assert_eq!(s.recurring.len(), 1);
        assert_eq!(s.recurring_total, dec("10.50"));
        assert_eq!(s.total, dec("35.50"));
        assert_eq!(s.overview.remaining, dec("64.50"));
        assert_eq!(s.by_category[0].category, "Food");
        assert_eq!(s.by_category[1].category, "Housing");
    }
}
