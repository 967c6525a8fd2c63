// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::period::Period;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Id prefix marking an expense generated from a recurring template.
pub const PROJECTED_ID_PREFIX: &str = "recurring:";

/// Sentinel `month_year` value of the default income row.
pub const DEFAULT_INCOME_KEY: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_admin: bool,
    pub created_at: String,
}

impl User {
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(f), Some(l)) => format!("{} {}", f, l),
            (Some(f), None) => f.clone(),
            (None, Some(l)) => l.clone(),
            (None, None) => self.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub owner: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub owner: String,
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: NaiveDate, // accrual date
}

impl Expense {
    pub fn is_projected(&self) -> bool {
        self.id.starts_with(PROJECTED_ID_PREFIX)
    }
}

/// A rule producing one virtual expense per month on `day_of_month`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringExpense {
    pub id: String,
    pub owner: String,
    pub name: String,
    pub amount: Decimal,
    pub category: String,
    pub day_of_month: u32, // 1..=31
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "month")]
pub enum IncomePeriod {
    Default,
    Month(Period),
}

impl IncomePeriod {
    pub fn parse(s: &str) -> Result<Self, crate::errors::BudgetError> {
        let raw = s.trim();
        if raw.eq_ignore_ascii_case(DEFAULT_INCOME_KEY) {
            Ok(IncomePeriod::Default)
        } else {
            Ok(IncomePeriod::Month(Period::parse(raw)?))
        }
    }

    pub fn key(&self) -> String {
        match self {
            IncomePeriod::Default => DEFAULT_INCOME_KEY.to_string(),
            IncomePeriod::Month(p) => p.key(),
        }
    }
}

impl fmt::Display for IncomePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub owner: String,
    pub period: IncomePeriod,
    pub amount: Decimal,
}

/// Everything the engine needs about one owner, loaded in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BudgetSnapshot {
    pub owner: String,
    pub expenses: Vec<Expense>,
    pub recurring: Vec<RecurringExpense>,
    pub categories: Vec<Category>,
    pub default_income: Decimal,
    pub income_overrides: BTreeMap<String, Decimal>, // period key -> amount
}

impl BudgetSnapshot {
    /// Splits income rows into the default amount and the per-month map.
    /// A missing default row means zero income.
    pub fn with_incomes(mut self, records: &[IncomeRecord]) -> Self {
        self.default_income = Decimal::ZERO;
        self.income_overrides.clear();
        for r in records {
            match r.period {
                IncomePeriod::Default => self.default_income = r.amount,
                IncomePeriod::Month(p) => {
                    self.income_overrides.insert(p.key(), r.amount);
                }
            }
        }
        self
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }
}
