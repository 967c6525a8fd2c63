// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Precondition checks run against in-memory collections before a write.

use crate::errors::BudgetError;
use crate::models::{Expense, RecurringExpense};
use rust_decimal::Decimal;

/// Upper bound for any stored amount or income. Month and year sums stay
/// far from `Decimal::MAX` below it.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Trimmed `name`, or `EmptyName` when nothing is left.
pub fn validate_name<'a>(kind: &'static str, name: &'a str) -> Result<&'a str, BudgetError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(BudgetError::EmptyName(kind));
    }
    Ok(name)
}

pub fn ensure_category_unique<S: AsRef<str>>(existing: &[S], name: &str) -> Result<(), BudgetError> {
    let wanted = name.trim().to_lowercase();
    if existing
        .iter()
        .any(|c| c.as_ref().trim().to_lowercase() == wanted)
    {
        return Err(BudgetError::DuplicateCategory(name.trim().to_string()));
    }
    Ok(())
}

/// Category references are by name, so a referenced category must stay.
pub fn ensure_category_unused(
    name: &str,
    expenses: &[Expense],
    templates: &[RecurringExpense],
) -> Result<(), BudgetError> {
    let expenses = expenses.iter().filter(|e| e.category == name).count();
    let templates = templates.iter().filter(|t| t.category == name).count();
    if expenses > 0 || templates > 0 {
        return Err(BudgetError::CategoryInUse {
            name: name.to_string(),
            expenses,
            templates,
        });
    }
    Ok(())
}

pub fn validate_amount(amount: Decimal) -> Result<Decimal, BudgetError> {
    if amount <= Decimal::ZERO {
        return Err(BudgetError::NonPositiveAmount(amount));
    }
    ensure_within_max(amount)
}

fn ensure_within_max(amount: Decimal) -> Result<Decimal, BudgetError> {
    if amount > MAX_AMOUNT {
        return Err(BudgetError::AmountTooLarge(amount));
    }
    Ok(amount)
}

pub fn validate_income(amount: Decimal) -> Result<Decimal, BudgetError> {
    if amount < Decimal::ZERO {
        return Err(BudgetError::NegativeIncome(amount));
    }
    ensure_within_max(amount)
}

pub fn validate_day_of_month(day: u32) -> Result<u32, BudgetError> {
    if !(1..=31).contains(&day) {
        return Err(BudgetError::InvalidDayOfMonth(day));
    }
    Ok(day)
}
