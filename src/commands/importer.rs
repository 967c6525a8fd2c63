// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::identity::Actor;
use crate::store::{self, NewExpense};
use crate::utils::{parse_date, parse_decimal};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::Connection;
use std::collections::HashMap;

pub fn handle(conn: &mut Connection, actor: &Actor, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("expenses", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let n = import_expenses(conn, actor.owner(), path)?;
            println!("Imported {} expenses from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Reads `date,amount,category,description` rows in one transaction.
/// Categories match case-insensitively and unknown ones are created.
/// Any bad row aborts the whole import.
pub fn import_expenses(conn: &mut Connection, owner: &str, path: &str) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    // lowercased name -> stored spelling
    let mut known: HashMap<String, String> = store::list_categories(&tx, owner)?
        .into_iter()
        .map(|c| (c.name.to_lowercase(), c.name))
        .collect();
    let mut count = 0usize;

    for (idx, result) in rdr.records().enumerate() {
        let line = idx + 2;
        let rec = result?;
        let date_raw = rec.get(0).context("date missing")?.trim();
        let amount_raw = rec.get(1).context("amount missing")?.trim();
        let category_raw = rec.get(2).context("category missing")?.trim();
        let description = rec.get(3).unwrap_or("").trim().to_string();

        let date = parse_date(date_raw).with_context(|| format!("Line {}", line))?;
        let amount = parse_decimal(amount_raw).with_context(|| format!("Line {}", line))?;
        let category = match known.get(&category_raw.to_lowercase()) {
            Some(name) => name.clone(),
            None => {
                let c = store::add_category(&tx, owner, category_raw)
                    .with_context(|| format!("Line {}: category '{}'", line, category_raw))?;
                known.insert(c.name.to_lowercase(), c.name.clone());
                c.name
            }
        };
        store::add_expense(
            &tx,
            owner,
            NewExpense {
                amount,
                category,
                description,
                date,
            },
        )
        .with_context(|| format!("Line {}", line))?;
        count += 1;
    }
    tx.commit()?;
    tracing::info!(owner, count, path, "expenses imported");
    Ok(count)
}
