// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::identity::Actor;
use crate::store;
use crate::utils::parse_period;
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, actor: &Actor, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => export_expenses(conn, actor, sub),
        _ => Ok(()),
    }
}

fn export_expenses(conn: &Connection, actor: &Actor, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    let period = match sub.get_one::<String>("month") {
        Some(m) => Some(parse_period(m)?),
        None => None,
    };

    let mut rows = store::list_expenses(conn, actor.owner(), period)?;
    // oldest first in files, unlike the on-screen list
    rows.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["date", "amount", "category", "description"])?;
            for e in &rows {
                wtr.write_record([
                    e.date.to_string(),
                    e.amount.to_string(),
                    e.category.clone(),
                    e.description.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|e| {
                    json!({
                        "id": e.id, "date": e.date, "amount": e.amount.to_string(),
                        "category": e.category, "description": e.description
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    tracing::info!(count = rows.len(), out, "expenses exported");
    println!("Exported {} expenses to {}", rows.len(), out);
    Ok(())
}
