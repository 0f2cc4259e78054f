// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::classify::{self, Classifier, GeminiClassifier, SingleParse};
use crate::models::{Category, NewTransaction, Transaction};
use crate::store::Store;
use crate::utils::{maybe_print_json, parse_date, parse_decimal, pretty_table, signed_amount};
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::str::FromStr;

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        Some(("set-category", sub)) => set_category(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => chrono::Local::now().date_naive(),
    };

    let recorded = if let Some(amount_raw) = sub.get_one::<String>("amount") {
        // Explicit fields bypass the classifier entirely.
        let amount = parse_decimal(amount_raw)?;
        if amount.is_sign_negative() {
            return Err(anyhow!("Amount must be a non-negative magnitude"));
        }
        let category = sub
            .get_one::<String>("category")
            .ok_or_else(|| anyhow!("--category is required with --amount"))?
            .parse::<Category>()?;
        let description = sub
            .get_one::<String>("description")
            .cloned()
            .or_else(|| sub.get_one::<String>("text").cloned())
            .ok_or_else(|| anyhow!("--description is required with --amount"))?;
        let currency = sub
            .get_one::<String>("currency")
            .map(|c| c.to_uppercase())
            .unwrap_or_else(|| "CZK".to_string());
        store.add(NewTransaction {
            description,
            amount,
            currency,
            category,
            date,
            ai_generated: false,
        })?
    } else {
        let text = sub
            .get_one::<String>("text")
            .ok_or_else(|| anyhow!("Give free text, or --amount with --category"))?;
        let classifier = GeminiClassifier::from_env()?;
        let parse = classifier.classify_text(text)?;
        add_classified(store, &parse, date)?
    };

    println!(
        "Recorded #{} {} {} '{}' ({})",
        recorded.id,
        signed_amount(recorded.category, &recorded.amount),
        recorded.currency,
        recorded.description,
        recorded.category
    );
    Ok(())
}

/// Validates one collaborator result, applies the local rules and commits.
/// Split out so tests can feed parses without a live classifier.
pub fn add_classified(
    store: &mut Store,
    parse: &SingleParse,
    date: chrono::NaiveDate,
) -> Result<Transaction> {
    let mut new = classify::validate_single(parse, date)
        .map_err(|e| anyhow!("Could not understand this transaction: {}", e))?;
    let (rule_cat, rewrite) = classify::apply_rules(store.rules(), &new.description);
    if let Some(cat) = rule_cat {
        new.category = cat;
    }
    if let Some(newd) = rewrite {
        new.description = newd;
    }
    store.add(new)
}

fn rm(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
    if store.remove(id)? {
        println!("Removed transaction {}", id);
    } else {
        println!("Transaction {} not found; nothing to do", id);
    }
    Ok(())
}

fn set_category(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
    // Unrecognized categories are rejected here, before the store is touched.
    let category = Category::from_str(sub.get_one::<String>("category").unwrap())?;
    if store.reassign_category(id, category)? {
        println!("Transaction {} -> {}", id, category);
    } else {
        println!("Transaction {} not found; nothing to do", id);
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub description: String,
    pub amount: String,
    pub currency: String,
    pub category: String,
    pub source: String,
    pub document_id: Option<i64>,
}

pub fn query_rows(store: &Store, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let month = sub.get_one::<String>("month");
    let category = sub
        .get_one::<String>("category")
        .map(|s| Category::from_str(s))
        .transpose()?;

    let mut txns: Vec<&Transaction> = store
        .all()
        .iter()
        .filter(|t| month.is_none_or(|m| crate::aggregate::month_key(t.date) == *m))
        .filter(|t| category.is_none_or(|c| t.category == c))
        .collect();
    txns.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txns.truncate(*limit);
    }

    Ok(txns
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            description: t.description.clone(),
            amount: signed_amount(t.category, &t.amount),
            currency: t.currency.clone(),
            category: t.category.to_string(),
            source: if t.ai_generated {
                "ai".into()
            } else {
                "manual".into()
            },
            document_id: t.document_id,
        })
        .collect())
}

fn list(store: &Store, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.category.clone(),
                    r.source.clone(),
                    r.document_id.map(|d| d.to_string()).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Description", "Amount", "CCY", "Category", "Source", "Doc"],
                rows,
            )
        );
    }
    Ok(())
}
