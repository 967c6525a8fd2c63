// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::identity::Actor;
use crate::models::IncomePeriod;
use crate::store;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use std::collections::HashSet;

/// Finds records the CLI would refuse to create today.
pub fn check(conn: &Connection, owner: &str) -> Result<Vec<Vec<String>>> {
    let snapshot = store::load_snapshot(conn, owner)?;
    let known: HashSet<&str> = snapshot
        .categories
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    let mut rows = Vec::new();

    // 1) Category references that no longer resolve
    for e in &snapshot.expenses {
        if !known.contains(e.category.as_str()) {
            rows.push(vec![
                "expense_unknown_category".into(),
                format!("{} {} '{}'", e.date, e.id, e.category),
            ]);
        }
    }
    for t in &snapshot.recurring {
        if !known.contains(t.category.as_str()) {
            rows.push(vec![
                "recurring_unknown_category".into(),
                format!("{} '{}'", t.name, t.category),
            ]);
        }
    }

    // 2) Month overrides stored as zero shadow the default instead of removing it
    for r in store::load_incomes(conn, owner)? {
        if let IncomePeriod::Month(p) = r.period {
            if r.amount.is_zero() {
                rows.push(vec!["zero_income_override".into(), p.key()]);
            }
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection, actor: &Actor) -> Result<()> {
    let rows = check(conn, actor.owner())?;
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
