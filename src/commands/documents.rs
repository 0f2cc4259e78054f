// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::Store;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        Some(("balances", sub)) => balances(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let docs = store.documents();
    if !maybe_print_json(json_flag, jsonl_flag, &docs)? {
        let rows: Vec<Vec<String>> = docs
            .iter()
            .map(|d| {
                vec![
                    d.id.to_string(),
                    d.name.clone(),
                    d.upload_date.to_string(),
                    d.transaction_count.to_string(),
                    d.account_name.clone().unwrap_or_default(),
                    d.account_type.map(|t| t.to_string()).unwrap_or_default(),
                    d.balance
                        .map(|b| fmt_money(&b, d.currency.as_deref().unwrap_or("")))
                        .unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "File", "Uploaded", "Txns", "Account", "Type", "Balance"],
                rows,
            )
        );
    }
    Ok(())
}

fn rm(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
    // Irreversible and potentially wide; require explicit confirmation.
    if !sub.get_flag("yes") {
        println!(
            "Deleting document {} removes every transaction it imported. Re-run with --yes to confirm.",
            id
        );
        return Ok(());
    }
    let existed = store.documents().iter().any(|d| d.id == id);
    let removed = store.remove_document(id)?;
    if existed {
        println!("Removed document {} and {} linked transaction(s)", id, removed);
    } else {
        println!("Document {} not found; nothing to do", id);
    }
    Ok(())
}

fn balances(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let sheet = store.balance_sheet();
    if !maybe_print_json(json_flag, jsonl_flag, &sheet)? {
        let rows: Vec<Vec<String>> = sheet
            .iter()
            .map(|a| {
                vec![
                    a.name.clone(),
                    a.account_type.map(|t| t.to_string()).unwrap_or_default(),
                    format!("{:.2}", a.balance),
                    a.currency.clone(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Account", "Type", "Balance", "CCY"], rows));
    }
    Ok(())
}
