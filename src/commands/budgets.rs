// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{self, CategoryStatus};
use crate::store::Store;
use crate::utils::{maybe_print_json, parse_month, pretty_table};
use crate::view::ViewState;
use anyhow::Result;

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("report", sub)) => report(store, sub)?,
        _ => {}
    }
    Ok(())
}

/// Spend vs 40/30/20/10 target for one month. Effective income is the
/// period's INCOME transactions when any exist, else the configured nominal
/// income.
pub fn month_report(store: &Store, month: &str) -> Vec<CategoryStatus> {
    let in_month = aggregate::for_month(store.all(), month);
    aggregate::budget_status(&in_month, store.monthly_income())
}

fn report(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => {
            // Default to the latest month with data, or the current month on
            // an empty store.
            let mut view = ViewState::new();
            view.reconcile(&aggregate::available_months(store.all()));
            view.current_key(chrono::Local::now().date_naive())
        }
    };

    let statuses = month_report(store, &month);
    if !maybe_print_json(json_flag, jsonl_flag, &statuses)? {
        let rows: Vec<Vec<String>> = statuses
            .iter()
            .map(|s| {
                vec![
                    s.category.rule().label.to_string(),
                    format!("{}%", s.category.rule().percentage),
                    format!("{:.2}", s.target),
                    format!("{:.2}", s.spent),
                    format!("{:.1}%", s.percent_used),
                    if s.is_over { "OVER".into() } else { String::new() },
                ]
            })
            .collect();
        println!("Budget report for {}", month);
        println!(
            "{}",
            pretty_table(
                &["Category", "Share", "Target", "Spent", "Used", ""],
                rows,
            )
        );
    }
    Ok(())
}
