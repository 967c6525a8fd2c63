// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::engine::{self, MonthlySummary};
use crate::identity::Actor;
use crate::period::Period;
use crate::store;
use crate::utils::{fmt_money, maybe_print_json, parse_date, parse_period, parse_year, pretty_table};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;

pub fn handle(conn: &Connection, actor: &Actor, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => month(conn, actor, sub)?,
        Some(("year", sub)) => year(conn, actor, sub)?,
        _ => {}
    }
    Ok(())
}

/// Builds the month view for the selected period from a fresh snapshot.
pub fn month_summary(
    conn: &Connection,
    owner: &str,
    period: Period,
    today: NaiveDate,
) -> Result<MonthlySummary> {
    let snapshot = store::load_snapshot(conn, owner)?;
    Ok(MonthlySummary::build(&snapshot, period, today))
}

fn month(conn: &Connection, actor: &Actor, sub: &clap::ArgMatches) -> Result<()> {
    let today = match sub.get_one::<String>("today") {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };
    let period = match sub.get_one::<String>("month") {
        Some(m) => parse_period(m)?,
        None => Period::of(today),
    };
    let s = month_summary(conn, actor.owner(), period, today)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }

    let ccy = store::get_currency(conn)?;
    let money = |d| fmt_money(&d, &ccy);
    let status = if s.overview.over_budget {
        "Over budget by"
    } else {
        "Remaining"
    };
    let rows = vec![
        vec!["Income".to_string(), money(s.income)],
        vec![
            format!("Carry-over from {}", s.period.previous()),
            money(s.carry_over),
        ],
        vec!["Spent".to_string(), money(s.spent)],
        vec![
            format!("Recurring ({} due)", s.recurring.len()),
            money(s.recurring_total),
        ],
        vec!["Total".to_string(), money(s.total)],
        vec![status.to_string(), money(s.overview.remaining.abs())],
        vec![
            "Used".to_string(),
            format!("{:.0}%", s.overview.used_pct.round_dp(0)),
        ],
    ];
    println!("Budget for {}", s.period);
    println!("{}", pretty_table(&["Item", "Amount"], rows));

    if !s.by_category.is_empty() {
        let rows = s
            .by_category
            .iter()
            .map(|c| vec![c.category.clone(), money(c.total)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    if !s.recurring.is_empty() {
        let rows = s
            .recurring
            .iter()
            .map(|e| vec![e.date.to_string(), e.description.clone(), money(e.amount)])
            .collect();
        println!("{}", pretty_table(&["Due", "Recurring", "Amount"], rows));
    }
    Ok(())
}

fn year(conn: &Connection, actor: &Actor, sub: &clap::ArgMatches) -> Result<()> {
    let year = match sub.get_one::<String>("year") {
        Some(y) => parse_year(y)?,
        None => chrono::Local::now().date_naive().year(),
    };
    let expenses = store::list_expenses(conn, actor.owner(), None)?;
    let totals = engine::yearly_totals(&expenses, year);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &totals)? {
        let rows = totals
            .iter()
            .map(|t| vec![t.period.key(), format!("{:.2}", t.total)])
            .collect();
        println!("{}", pretty_table(&["Month", "Spent"], rows));
    }
    Ok(())
}
