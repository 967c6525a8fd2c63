// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Domain failures raised by guards, the store and the identity layer.
///
/// Command handlers bubble these up through `anyhow`, so callers that care
/// about a specific case can `downcast_ref::<BudgetError>()`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),
    #[error("Category '{name}' is still used by {expenses} expense(s) and {templates} recurring expense(s)")]
    CategoryInUse {
        name: String,
        expenses: usize,
        templates: usize,
    },
    #[error("Category '{0}' not found")]
    UnknownCategory(String),
    #[error("{0} name must not be empty")]
    EmptyName(&'static str),
    #[error("Amount {0} exceeds the maximum of {max}", max = crate::guards::MAX_AMOUNT)]
    AmountTooLarge(Decimal),
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("Income must not be negative, got {0}")]
    NegativeIncome(Decimal),
    #[error("Day of month must be between 1 and 31, got {0}")]
    InvalidDayOfMonth(u32),
    #[error("Invalid period '{0}', expected YYYY-MM")]
    InvalidPeriod(String),
    #[error("User '{0}' not found")]
    UnknownUser(String),
    #[error("User '{0}' already exists")]
    DuplicateUser(String),
    #[error("No active user; pass --user or run `budgetbook user use --email <email>`")]
    NoActiveUser,
    #[error("User '{acting}' may not act on data owned by '{target}'")]
    NotAuthorized { acting: String, target: String },
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
}
