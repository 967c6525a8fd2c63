// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use budgetbook::{cli, commands, db, identity, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;
    let user_flag = matches.get_one::<String>("user").map(String::as_str);
    let as_flag = matches.get_one::<String>("as").map(String::as_str);

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("user", sub)) => commands::users::handle(&conn, user_flag, sub)?,
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        Some(("admin", sub)) => {
            let acting = identity::acting_user(&conn, user_flag)?;
            commands::admin::handle(&conn, &acting, sub)?
        }
        Some((name, sub)) => {
            let actor = identity::resolve_actor(&conn, user_flag, as_flag)?;
            if actor.is_impersonating() {
                eprintln!("(viewing data of {})", actor.target.email);
            }
            match name {
                "category" => commands::categories::handle(&conn, &actor, sub)?,
                "expense" => commands::expenses::handle(&conn, &actor, sub)?,
                "recurring" => commands::recurring::handle(&conn, &actor, sub)?,
                "income" => commands::income::handle(&conn, &actor, sub)?,
                "summary" => commands::summary::handle(&conn, &actor, sub)?,
                "export" => commands::exporter::handle(&conn, &actor, sub)?,
                "import" => commands::importer::handle(&mut conn, &actor, sub)?,
                "doctor" => commands::doctor::handle(&conn, &actor)?,
                _ => {
                    cli::build_cli().print_help()?;
                    println!();
                }
            }
        }
        None => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
