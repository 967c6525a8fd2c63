// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::identity::Actor;
use crate::models::Expense;
use crate::store::{self, NewExpense};
use crate::utils::{
    maybe_print_json, parse_date, parse_decimal, parse_period, parse_search, pretty_table,
};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, actor: &Actor, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, actor, sub)?,
        Some(("list", sub)) => list(conn, actor, sub)?,
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            store::delete_expense(conn, actor.owner(), id)?;
            println!("Removed expense {}", id);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, actor: &Actor, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };
    let description = sub
        .get_one::<String>("description")
        .cloned()
        .unwrap_or_default();

    let e = store::add_expense(
        conn,
        actor.owner(),
        NewExpense {
            amount,
            category,
            description,
            date,
        },
    )?;
    let ccy = store::get_currency(conn)?;
    println!(
        "Recorded {} on {} in '{}' (id: {})",
        crate::utils::fmt_money(&e.amount, &ccy),
        e.date,
        e.category,
        e.id
    );
    Ok(())
}

fn list(conn: &Connection, actor: &Actor, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, actor, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|e| {
                vec![
                    e.date.to_string(),
                    e.category.clone(),
                    format!("{:.2}", e.amount),
                    e.description.clone(),
                    e.id.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Date", "Category", "Amount", "Description", "ID"], rows)
        );
    }
    Ok(())
}

/// Applies the list filters from the command line.
pub fn query_rows(conn: &Connection, actor: &Actor, sub: &clap::ArgMatches) -> Result<Vec<Expense>> {
    let period = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_period(m)?),
        None => None,
    };
    let search = match sub.get_one::<String>("search") {
        Some(s) => Some(parse_search(s)?),
        None => None,
    };
    let category = sub.get_one::<String>("category").map(|s| s.trim().to_lowercase());

    let mut rows: Vec<Expense> = store::list_expenses(conn, actor.owner(), period)?
        .into_iter()
        .filter(|e| category.as_ref().is_none_or(|c| e.category.to_lowercase() == *c))
        .filter(|e| search.as_ref().is_none_or(|re| re.is_match(&e.description)))
        .collect();
    if let Some(limit) = sub.get_one::<usize>("limit") {
        rows.truncate(*limit);
    }
    Ok(rows)
}
