// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::identity::CURRENT_USER_KEY;
use crate::store;
use crate::utils::pretty_table;
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            let rows = vec![
                vec!["database".to_string(), db::db_path()?.display().to_string()],
                vec!["currency".to_string(), store::get_currency(conn)?],
                vec![
                    CURRENT_USER_KEY.to_string(),
                    store::get_setting(conn, CURRENT_USER_KEY)?.unwrap_or_default(),
                ],
            ];
            println!("{}", pretty_table(&["Setting", "Value"], rows));
        }
        Some(("currency", sub)) => {
            let code = sub.get_one::<String>("code").unwrap().trim().to_uppercase();
            if code.is_empty() {
                bail!("Currency code must not be empty");
            }
            store::set_setting(conn, "currency", &code)?;
            println!("Currency set to {}", code);
        }
        _ => {}
    }
    Ok(())
}
