// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::identity::{self, CURRENT_USER_KEY};
use crate::store;
use anyhow::Result;
use rusqlite::Connection;

/// `user_flag` is the global `--user` value, used by `whoami` and to
/// check who may grant admin capability.
pub fn handle(conn: &Connection, user_flag: Option<&str>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let email = sub.get_one::<String>("email").unwrap();
            let first = sub.get_one::<String>("first-name").map(|s| s.trim());
            let last = sub.get_one::<String>("last-name").map(|s| s.trim());
            let admin = sub.get_flag("admin");
            // Bootstrap: only the very first admin may be created without one.
            if admin && store::any_admin(conn)? {
                identity::require_admin(&identity::acting_user(conn, user_flag)?)?;
            }
            let u = store::add_user(conn, email, first, last, admin)?;
            // The first account becomes the default acting user.
            if store::get_setting(conn, CURRENT_USER_KEY)?.is_none() {
                store::set_setting(conn, CURRENT_USER_KEY, &u.email)?;
            }
            println!(
                "Added user '{}'{}",
                u.email,
                if u.is_admin { " (admin)" } else { "" }
            );
        }
        Some(("use", sub)) => {
            let u = store::user_by_email(conn, sub.get_one::<String>("email").unwrap())?;
            store::set_setting(conn, CURRENT_USER_KEY, &u.email)?;
            println!("Now acting as '{}'", u.email);
        }
        Some(("whoami", _)) => {
            let u = identity::acting_user(conn, user_flag)?;
            println!(
                "{} <{}>{}",
                u.display_name(),
                u.email,
                if u.is_admin { " [admin]" } else { "" }
            );
        }
        _ => {}
    }
    Ok(())
}
