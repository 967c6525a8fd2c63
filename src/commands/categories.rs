// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::identity::Actor;
use crate::store;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, actor: &Actor, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let c = store::add_category(conn, actor.owner(), name)?;
            println!("Added category '{}'", c.name);
        }
        Some(("list", sub)) => {
            let cats = store::list_categories(conn, actor.owner())?;
            let names: Vec<String> = cats.into_iter().map(|c| c.name).collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &names)? {
                let data = names.into_iter().map(|n| vec![n]).collect();
                println!("{}", pretty_table(&["Category"], data));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            store::delete_category(conn, actor.owner(), name)?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
