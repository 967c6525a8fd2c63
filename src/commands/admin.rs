// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine;
use crate::identity::{self, CURRENT_USER_KEY};
use crate::models::{Expense, IncomeRecord, RecurringExpense, User};
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

/// Everything an admin sees on a user's detail page.
#[derive(Debug, Serialize)]
pub struct UserDetails {
    pub user: User,
    pub categories: Vec<String>,
    pub incomes: Vec<IncomeRecord>,
    pub recurring: Vec<RecurringExpense>,
    pub expenses: Vec<Expense>,
    pub total_expenses: Decimal,
}

pub fn user_details(conn: &Connection, user: User) -> Result<UserDetails> {
    let snapshot = store::load_snapshot(conn, &user.id)?;
    let incomes = store::load_incomes(conn, &user.id)?;
    let total_expenses = snapshot.expenses.iter().map(|e| e.amount).sum();
    Ok(UserDetails {
        categories: snapshot.category_names(),
        incomes,
        recurring: snapshot.recurring,
        expenses: snapshot.expenses,
        total_expenses,
        user,
    })
}

pub fn handle(conn: &Connection, acting: &User, m: &clap::ArgMatches) -> Result<()> {
    identity::require_admin(acting)?;
    match m.subcommand() {
        Some(("users", sub)) => {
            let users = store::list_users(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &users)? {
                let rows = users
                    .into_iter()
                    .map(|u| {
                        vec![
                            u.email.clone(),
                            u.display_name(),
                            if u.is_admin { "yes".into() } else { String::new() },
                            u.created_at,
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Email", "Name", "Admin", "Created"], rows)
                );
            }
        }
        Some(("show", sub)) => {
            let user = store::user_by_email(conn, sub.get_one::<String>("email").unwrap())?;
            let d = user_details(conn, user)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &d)? {
                print_details(conn, &d)?;
            }
        }
        Some(("rm", sub)) => {
            let user = store::user_by_email(conn, sub.get_one::<String>("email").unwrap())?;
            if user.id == acting.id {
                bail!("Refusing to delete the acting admin account '{}'", user.email);
            }
            store::delete_user(conn, &user.id)?;
            if store::get_setting(conn, CURRENT_USER_KEY)?.as_deref() == Some(user.email.as_str()) {
                store::set_setting(conn, CURRENT_USER_KEY, &acting.email)?;
            }
            println!("Deleted user '{}' and all of their data", user.email);
        }
        _ => {}
    }
    Ok(())
}

fn print_details(conn: &Connection, d: &UserDetails) -> Result<()> {
    let ccy = store::get_currency(conn)?;
    println!("{} <{}>, joined {}", d.user.display_name(), d.user.email, d.user.created_at);
    println!(
        "Categories: {}",
        if d.categories.is_empty() {
            "(none)".to_string()
        } else {
            d.categories.join(", ")
        }
    );

    let income_rows = d
        .incomes
        .iter()
        .map(|r| vec![r.period.key(), format!("{:.2}", r.amount)])
        .collect();
    println!("{}", pretty_table(&["Period", "Income"], income_rows));

    let recurring_rows = d
        .recurring
        .iter()
        .map(|t| {
            vec![
                t.name.clone(),
                format!("{:.2}", t.amount),
                t.category.clone(),
                t.day_of_month.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Recurring", "Amount", "Category", "Day"], recurring_rows)
    );

    let expense_rows = d
        .expenses
        .iter()
        .map(|e| {
            vec![
                e.date.to_string(),
                e.category.clone(),
                format!("{:.2}", e.amount),
                e.description.clone(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Category", "Amount", "Description"], expense_rows)
    );
    println!(
        "Total recorded: {}",
        crate::utils::fmt_money(&d.total_expenses, &ccy)
    );
    let this_month = crate::period::Period::of(chrono::Local::now().date_naive());
    println!(
        "Spent in {}: {}",
        this_month,
        crate::utils::fmt_money(&engine::total_for_period(&d.expenses, this_month), &ccy)
    );
    Ok(())
}
