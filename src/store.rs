// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Owner-scoped reads and writes. Every query filters on `user_id`, so no
//! record ever leaks across owners.

use crate::errors::BudgetError;
use crate::guards;
use crate::models::{
    BudgetSnapshot, Category, DEFAULT_INCOME_KEY, Expense, IncomePeriod, IncomeRecord,
    RecurringExpense, User,
};
use crate::period::Period;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use uuid::Uuid;

fn stored_decimal(raw: &str, what: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .with_context(|| format!("Invalid {} amount '{}' in database", what, raw))
}

fn stored_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' in database", raw))
}

// ---------------------------------------------------------------- settings

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn get_currency(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, "currency")?.unwrap_or_else(|| "EUR".to_string()))
}

// ------------------------------------------------------------------- users

const USER_COLS: &str = "id, email, first_name, last_name, is_admin, created_at";

fn user_from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: r.get(0)?,
        email: r.get(1)?,
        first_name: r.get(2)?,
        last_name: r.get(3)?,
        is_admin: r.get::<_, i64>(4)? != 0,
        created_at: r.get(5)?,
    })
}

pub fn add_user(
    conn: &Connection,
    email: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
    is_admin: bool,
) -> Result<User> {
    let email = email.trim();
    if find_user(conn, email)?.is_some() {
        return Err(BudgetError::DuplicateUser(email.to_string()).into());
    }
    let id = Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO users(id, email, first_name, last_name, is_admin) VALUES (?1,?2,?3,?4,?5)",
        params![id, email, first_name, last_name, is_admin as i64],
    )?;
    tracing::info!(user = %email, admin = is_admin, "user created");
    user_by_email(conn, email)
}

pub fn find_user(conn: &Connection, email: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {} FROM users WHERE email=?1", USER_COLS);
    let u = conn
        .query_row(&sql, params![email.trim()], user_from_row)
        .optional()?;
    Ok(u)
}

pub fn user_by_email(conn: &Connection, email: &str) -> Result<User> {
    find_user(conn, email)?
        .ok_or_else(|| BudgetError::UnknownUser(email.trim().to_string()).into())
}

pub fn any_admin(conn: &Connection) -> Result<bool> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM users WHERE is_admin=1", [], |r| {
        r.get(0)
    })?;
    Ok(n > 0)
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let sql = format!("SELECT {} FROM users ORDER BY created_at DESC, email", USER_COLS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], user_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Removes the user and, through cascading keys, everything they own.
pub fn delete_user(conn: &Connection, user_id: &str) -> Result<()> {
    let n = conn.execute("DELETE FROM users WHERE id=?1", params![user_id])?;
    if n == 0 {
        return Err(BudgetError::NotFound {
            kind: "User",
            id: user_id.to_string(),
        }
        .into());
    }
    tracing::info!(user_id, "user deleted");
    Ok(())
}

// -------------------------------------------------------------- categories

pub fn list_categories(conn: &Connection, owner: &str) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name FROM categories WHERE user_id=?1 ORDER BY name COLLATE NOCASE",
    )?;
    let rows = stmt.query_map(params![owner], |r| {
        Ok(Category {
            id: r.get(0)?,
            owner: r.get(1)?,
            name: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

pub fn add_category(conn: &Connection, owner: &str, name: &str) -> Result<Category> {
    let name = guards::validate_name("Category", name)?;
    let existing: Vec<String> = list_categories(conn, owner)?
        .into_iter()
        .map(|c| c.name)
        .collect();
    guards::ensure_category_unique(&existing, name)?;
    conn.execute(
        "INSERT INTO categories(user_id, name) VALUES (?1, ?2)",
        params![owner, name],
    )?;
    tracing::debug!(owner, category = name, "category added");
    Ok(Category {
        id: conn.last_insert_rowid(),
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

/// Stored spelling of `name`, matched case-insensitively.
pub fn find_category(conn: &Connection, owner: &str, name: &str) -> Result<Option<String>> {
    let hit: Option<String> = conn
        .query_row(
            "SELECT name FROM categories WHERE user_id=?1 AND name=?2 COLLATE NOCASE",
            params![owner, name.trim()],
            |r| r.get(0),
        )
        .optional()?;
    Ok(hit)
}

fn require_category(conn: &Connection, owner: &str, name: &str) -> Result<String> {
    find_category(conn, owner, name)?
        .ok_or_else(|| BudgetError::UnknownCategory(name.trim().to_string()).into())
}

/// Refuses while any expense or recurring template still names the category.
pub fn delete_category(conn: &Connection, owner: &str, name: &str) -> Result<()> {
    let stored = require_category(conn, owner, name)?;
    let name = stored.as_str();
    let expenses = list_expenses(conn, owner, None)?;
    let templates = list_recurring(conn, owner)?;
    guards::ensure_category_unused(name, &expenses, &templates)?;
    conn.execute(
        "DELETE FROM categories WHERE user_id=?1 AND name=?2",
        params![owner, name],
    )?;
    tracing::debug!(owner, category = name, "category removed");
    Ok(())
}

// ---------------------------------------------------------------- expenses

#[derive(Debug, Clone)]
pub struct NewExpense {
    pub amount: Decimal,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
}

pub fn add_expense(conn: &Connection, owner: &str, new: NewExpense) -> Result<Expense> {
    let amount = guards::validate_amount(new.amount)?;
    let category = require_category(conn, owner, &new.category)?;
    let e = Expense {
        id: Uuid::new_v4().to_string(),
        owner: owner.to_string(),
        amount,
        category,
        description: new.description.trim().to_string(),
        date: new.date,
    };
    conn.execute(
        "INSERT INTO expenses(id, user_id, date, amount, category, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            e.id,
            e.owner,
            e.date.to_string(),
            e.amount.to_string(),
            e.category,
            e.description
        ],
    )?;
    tracing::debug!(owner, id = %e.id, amount = %e.amount, "expense recorded");
    Ok(e)
}

/// Newest first. `period` narrows to one month.
pub fn list_expenses(
    conn: &Connection,
    owner: &str,
    period: Option<Period>,
) -> Result<Vec<Expense>> {
    let mut sql = String::from(
        "SELECT id, user_id, date, amount, category, description FROM expenses WHERE user_id=?1",
    );
    let month_key = period.map(|p| p.key());
    if month_key.is_some() {
        sql.push_str(" AND substr(date,1,7)=?2");
    }
    sql.push_str(" ORDER BY date DESC, created_at DESC");

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = match &month_key {
        Some(m) => stmt.query(params![owner, m])?,
        None => stmt.query(params![owner])?,
    };
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let date: String = r.get(2)?;
        let amount: String = r.get(3)?;
        out.push(Expense {
            id: r.get(0)?,
            owner: r.get(1)?,
            date: stored_date(&date)?,
            amount: stored_decimal(&amount, "expense")?,
            category: r.get(4)?,
            description: r.get(5)?,
        });
    }
    Ok(out)
}

pub fn delete_expense(conn: &Connection, owner: &str, id: &str) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM expenses WHERE user_id=?1 AND id=?2",
        params![owner, id],
    )?;
    if n == 0 {
        return Err(BudgetError::NotFound {
            kind: "Expense",
            id: id.to_string(),
        }
        .into());
    }
    Ok(())
}

// ------------------------------------------------------ recurring expenses

#[derive(Debug, Clone)]
pub struct NewRecurring {
    pub name: String,
    pub amount: Decimal,
    pub category: String,
    pub day_of_month: u32,
}

pub fn add_recurring(conn: &Connection, owner: &str, new: NewRecurring) -> Result<RecurringExpense> {
    let name = guards::validate_name("Recurring expense", &new.name)?.to_string();
    let amount = guards::validate_amount(new.amount)?;
    let day_of_month = guards::validate_day_of_month(new.day_of_month)?;
    let category = require_category(conn, owner, &new.category)?;
    let t = RecurringExpense {
        id: Uuid::new_v4().to_string(),
        owner: owner.to_string(),
        name,
        amount,
        category,
        day_of_month,
    };
    conn.execute(
        "INSERT INTO recurring_expenses(id, user_id, name, amount, category, day_of_month)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            t.id,
            t.owner,
            t.name,
            t.amount.to_string(),
            t.category,
            t.day_of_month
        ],
    )?;
    tracing::debug!(owner, id = %t.id, day = t.day_of_month, "recurring expense added");
    Ok(t)
}

pub fn list_recurring(conn: &Connection, owner: &str) -> Result<Vec<RecurringExpense>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, amount, category, day_of_month
         FROM recurring_expenses WHERE user_id=?1 ORDER BY name, id",
    )?;
    let mut rows = stmt.query(params![owner])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let amount: String = r.get(3)?;
        out.push(RecurringExpense {
            id: r.get(0)?,
            owner: r.get(1)?,
            name: r.get(2)?,
            amount: stored_decimal(&amount, "recurring expense")?,
            category: r.get(4)?,
            day_of_month: r.get(5)?,
        });
    }
    Ok(out)
}

pub fn delete_recurring(conn: &Connection, owner: &str, id: &str) -> Result<()> {
    let n = conn.execute(
        "DELETE FROM recurring_expenses WHERE user_id=?1 AND id=?2",
        params![owner, id],
    )?;
    if n == 0 {
        return Err(BudgetError::NotFound {
            kind: "Recurring expense",
            id: id.to_string(),
        }
        .into());
    }
    Ok(())
}

// ------------------------------------------------------------------ income

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomeChange {
    Saved,
    /// A zero month override was turned into a removal.
    Removed,
}

/// Upserts an income row. A month override of exactly zero deletes the
/// override instead of storing it, so that month falls back to the default.
pub fn save_income(
    conn: &Connection,
    owner: &str,
    period: IncomePeriod,
    amount: Decimal,
) -> Result<IncomeChange> {
    let amount = guards::validate_income(amount)?;
    if let IncomePeriod::Month(p) = period {
        if amount.is_zero() {
            remove_income_override(conn, owner, p)?;
            return Ok(IncomeChange::Removed);
        }
    }
    conn.execute(
        "INSERT INTO monthly_incomes(user_id, month_year, income) VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id, month_year) DO UPDATE SET income=excluded.income",
        params![owner, period.key(), amount.to_string()],
    )?;
    tracing::debug!(owner, period = %period, amount = %amount, "income saved");
    Ok(IncomeChange::Saved)
}

/// Returns whether an override existed.
pub fn remove_income_override(conn: &Connection, owner: &str, period: Period) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM monthly_incomes WHERE user_id=?1 AND month_year=?2",
        params![owner, period.key()],
    )?;
    Ok(n > 0)
}

pub fn load_incomes(conn: &Connection, owner: &str) -> Result<Vec<IncomeRecord>> {
    let mut stmt = conn.prepare(
        "SELECT month_year, income FROM monthly_incomes WHERE user_id=?1 ORDER BY month_year",
    )?;
    let mut rows = stmt.query(params![owner])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let key: String = r.get(0)?;
        let income: String = r.get(1)?;
        let period = if key == DEFAULT_INCOME_KEY {
            IncomePeriod::Default
        } else {
            match Period::parse(&key) {
                Ok(p) => IncomePeriod::Month(p),
                Err(err) => {
                    tracing::warn!(owner, key = %key, %err, "skipping income row with bad period");
                    continue;
                }
            }
        };
        out.push(IncomeRecord {
            owner: owner.to_string(),
            period,
            amount: stored_decimal(&income, "income")?,
        });
    }
    Ok(out)
}

// ---------------------------------------------------------------- snapshot

pub fn load_snapshot(conn: &Connection, owner: &str) -> Result<BudgetSnapshot> {
    let incomes = load_incomes(conn, owner)?;
    let snapshot = BudgetSnapshot {
        owner: owner.to_string(),
        expenses: list_expenses(conn, owner, None)?,
        recurring: list_recurring(conn, owner)?,
        categories: list_categories(conn, owner)?,
        ..Default::default()
    }
    .with_incomes(&incomes);
    tracing::trace!(
        owner,
        expenses = snapshot.expenses.len(),
        recurring = snapshot.recurring.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}
