// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::period::Period;
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use regex::Regex;
use rust_decimal::Decimal;
use std::sync::Once;

/// Env var read by [`init_tracing`], e.g. `BUDGETBOOK_LOG=budgetbook=debug`.
pub const LOG_ENV: &str = "BUDGETBOOK_LOG";

static TRACING_INIT: Once = Once::new();

/// Installs the stderr subscriber once. Defaults to warnings only so
/// table/JSON output on stdout stays clean.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_period(s: &str) -> Result<Period> {
    Ok(Period::parse(s)?)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_year(s: &str) -> Result<i32> {
    let y: i32 = s
        .trim()
        .parse()
        .with_context(|| format!("Invalid year '{}'", s))?;
    Period::new(y, 1).map_err(|_| anyhow!("Invalid year '{}'", s))?;
    Ok(y)
}

pub fn parse_search(s: &str) -> Result<Regex> {
    let pattern = s.trim();
    Regex::new(&format!("(?i){}", pattern))
        .map_err(|err| anyhow!("Invalid search pattern '{}': {}", pattern, err))
}

pub fn fmt_money(d: &Decimal, ccy: &str) -> String {
    format!("{:.2} {}", d.round_dp(2), ccy)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_rounds_to_cents() {
        let d: Decimal = "12.346".parse().unwrap();
        assert_eq!(fmt_money(&d, "EUR"), "12.35 EUR");
        assert_eq!(fmt_money(&Decimal::from(-3), "EUR"), "-3.00 EUR");
    }

    #[test]
    fn search_is_case_insensitive() {
        let re = parse_search("rent").unwrap();
        assert!(re.is_match("Monthly RENT"));
        assert!(parse_search("(").is_err());
    }

    #[test]
    fn inputs_are_trimmed() {
        assert_eq!(parse_decimal(" 4.20 ").unwrap().to_string(), "4.20");
        assert_eq!(parse_date(" 2024-02-29 ").unwrap().to_string(), "2024-02-29");
        assert!(parse_date("2023-02-29").is_err());
        assert_eq!(parse_year("2024").unwrap(), 2024);
        assert!(parse_year("20x4").is_err());
    }
}
