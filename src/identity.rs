// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Who is acting and whose data they are acting on.

use crate::errors::BudgetError;
use crate::models::User;
use crate::store;
use anyhow::Result;
use rusqlite::Connection;

/// Settings key holding the email of the default acting user.
pub const CURRENT_USER_KEY: &str = "current_user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub acting: User,
    pub target: User,
}

impl Actor {
    /// Owner id every data operation is scoped to.
    pub fn owner(&self) -> &str {
        &self.target.id
    }

    pub fn is_impersonating(&self) -> bool {
        self.acting.id != self.target.id
    }
}

/// An admin may act on anyone; everyone else only on themselves.
pub fn authorize(acting: &User, target: &User) -> Result<(), BudgetError> {
    if acting.id == target.id || acting.is_admin {
        return Ok(());
    }
    Err(BudgetError::NotAuthorized {
        acting: acting.email.clone(),
        target: target.email.clone(),
    })
}

pub fn require_admin(acting: &User) -> Result<(), BudgetError> {
    if acting.is_admin {
        Ok(())
    } else {
        Err(BudgetError::NotAuthorized {
            acting: acting.email.clone(),
            target: "*".to_string(),
        })
    }
}

pub fn acting_user(conn: &Connection, user_flag: Option<&str>) -> Result<User> {
    let email = match user_flag.map(str::trim).filter(|s| !s.is_empty()) {
        Some(e) => e.to_string(),
        None => store::get_setting(conn, CURRENT_USER_KEY)?.ok_or(BudgetError::NoActiveUser)?,
    };
    store::user_by_email(conn, &email)
}

/// Resolves `--user` / `--as` into an authorized actor.
pub fn resolve_actor(
    conn: &Connection,
    user_flag: Option<&str>,
    as_flag: Option<&str>,
) -> Result<Actor> {
    let acting = acting_user(conn, user_flag)?;
    let target = match as_flag.map(str::trim).filter(|s| !s.is_empty()) {
        Some(email) => store::user_by_email(conn, email)?,
        None => acting.clone(),
    };
    authorize(&acting, &target)?;
    if acting.id != target.id {
        tracing::info!(acting = %acting.email, target = %target.email, "acting on behalf of user");
    }
    Ok(Actor { acting, target })
}
