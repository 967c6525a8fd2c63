// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::identity::Actor;
use crate::store::{self, NewRecurring};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, actor: &Actor, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            let category = sub.get_one::<String>("category").unwrap().trim().to_string();
            let day_of_month = *sub.get_one::<u32>("day").unwrap();
            let t = store::add_recurring(
                conn,
                actor.owner(),
                NewRecurring {
                    name,
                    amount,
                    category,
                    day_of_month,
                },
            )?;
            println!(
                "Added recurring '{}' ({}) on day {} (id: {})",
                t.name,
                fmt_money(&t.amount, &store::get_currency(conn)?),
                t.day_of_month,
                t.id
            );
        }
        Some(("list", sub)) => {
            let items = store::list_recurring(conn, actor.owner())?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
                let rows = items
                    .into_iter()
                    .map(|t| {
                        vec![
                            t.name,
                            format!("{:.2}", t.amount),
                            t.category,
                            t.day_of_month.to_string(),
                            t.id,
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Name", "Amount", "Category", "Day", "ID"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            store::delete_recurring(conn, actor.owner(), id)?;
            println!("Removed recurring expense {}", id);
        }
        _ => {}
    }
    Ok(())
}
