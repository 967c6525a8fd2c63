// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::identity::Actor;
use crate::models::IncomePeriod;
use crate::store::{self, IncomeChange};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, parse_period, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, actor: &Actor, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, actor, sub)?,
        Some(("clear", sub)) => {
            let period = parse_period(sub.get_one::<String>("month").unwrap())?;
            if store::remove_income_override(conn, actor.owner(), period)? {
                println!("Removed income override for {}", period);
            } else {
                println!("No income override for {}", period);
            }
        }
        Some(("list", sub)) => {
            let records = store::load_incomes(conn, actor.owner())?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &records)? {
                let rows = records
                    .into_iter()
                    .map(|r| vec![r.period.key(), format!("{:.2}", r.amount)])
                    .collect();
                println!("{}", pretty_table(&["Period", "Income"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, actor: &Actor, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let period = match sub.get_one::<String>("month") {
        Some(m) => IncomePeriod::parse(m)?,
        None => IncomePeriod::Default,
    };
    let ccy = store::get_currency(conn)?;
    match store::save_income(conn, actor.owner(), period, amount)? {
        IncomeChange::Saved => match period {
            IncomePeriod::Default => {
                println!("Default monthly income set to {}", fmt_money(&amount, &ccy))
            }
            IncomePeriod::Month(p) => {
                println!("Income for {} set to {}", p, fmt_money(&amount, &ccy))
            }
        },
        IncomeChange::Removed => {
            println!("Income override for {} removed; the default applies", period)
        }
    }
    Ok(())
}
