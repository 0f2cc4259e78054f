// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate;
use crate::models::Category;
use crate::store::Store;
use crate::utils::{maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use std::str::FromStr;

pub fn handle(store: &Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("cashflow", sub)) => cashflow(store, sub)?,
        Some(("annual", sub)) => annual(store, sub)?,
        Some(("breakdown", sub)) => breakdown(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn cashflow(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);

    let mut flows = aggregate::monthly_flows(store.all());
    if flows.len() > months {
        flows.drain(..flows.len() - months);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &flows)? {
        let rows: Vec<Vec<String>> = flows
            .iter()
            .map(|f| {
                vec![
                    f.month.clone(),
                    format!("{:.2}", f.income),
                    format!("{:.2}", f.expenses),
                    format!("{:.2}", f.invested),
                    format!("{:.2}", f.net),
                    format!("{:.2}", f.cumulative),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Month", "Income", "Expenses", "Invested", "Net", "Cumulative"],
                rows,
            )
        );
    }
    Ok(())
}

fn annual(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let year: i32 = sub.get_one::<String>("year").unwrap().trim().parse()?;

    let summary = aggregate::annual_summary(store.all(), year);
    if !maybe_print_json(json_flag, jsonl_flag, &summary)? {
        println!("Annual report {}", summary.year);
        println!("  Income:      {:.2}", summary.income);
        println!("  Expenses:    {:.2} (without savings)", summary.expenses);
        println!("  Invested:    {:.2}", summary.invested);
        println!(
            "  Net worth +: {:.2} (savings rate {:.1}%)",
            summary.total_saved, summary.savings_rate
        );
        let rows: Vec<Vec<String>> = summary
            .by_category
            .iter()
            .map(|c| {
                vec![
                    c.category.rule().label.to_string(),
                    format!("{:.2}", c.amount),
                    format!("{:.1}%", c.percent_of_income),
                    format!("{}%", c.category.rule().percentage),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Amount", "Of income", "Goal"], rows)
        );
        println!("{} transaction(s) in {}", summary.transaction_count, summary.year);
    }
    Ok(())
}

fn breakdown(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let category = Category::from_str(sub.get_one::<String>("category").unwrap())?;
    let top: usize = *sub
        .get_one::<usize>("top")
        .unwrap_or(&aggregate::DEFAULT_BREAKDOWN_TOP);

    let txns = match sub.get_one::<String>("month") {
        Some(m) => aggregate::for_month(store.all(), &parse_month(m)?),
        None => store.all().to_vec(),
    };
    let rows_data = aggregate::breakdown(&txns, category, top);
    if !maybe_print_json(json_flag, jsonl_flag, &rows_data)? {
        let rows: Vec<Vec<String>> = rows_data
            .iter()
            .map(|r| vec![r.description.clone(), format!("{:.2}", r.amount)])
            .collect();
        println!(
            "{}",
            pretty_table(&[category.rule().label, "Amount"], rows)
        );
    }
    Ok(())
}
