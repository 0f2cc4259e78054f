// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, ClassifierRule};
use crate::store::Store;
use crate::utils::pretty_table;
use anyhow::{anyhow, Result};
use regex::Regex;
use std::str::FromStr;

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let pattern_raw = sub.get_one::<String>("pattern").unwrap();
            let pattern = pattern_raw.trim();
            Regex::new(pattern)
                .map_err(|err| anyhow!("Invalid regex pattern '{}': {}", pattern, err))?;

            let category = sub
                .get_one::<String>("category")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(Category::from_str)
                .transpose()?;
            let rewrite = sub
                .get_one::<String>("rewrite")
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string());
            let rule = store.add_rule(ClassifierRule {
                id: 0,
                pattern: pattern.to_string(),
                category,
                rewrite,
            })?;
            println!(
                "Added rule {}: /{}/ -> category {:?}, rewrite {:?}",
                rule.id, rule.pattern, rule.category, rule.rewrite
            );
        }
        Some(("list", _)) => {
            let rows: Vec<Vec<String>> = store
                .rules()
                .iter()
                .rev()
                .map(|r| {
                    vec![
                        r.id.to_string(),
                        r.pattern.clone(),
                        r.category.map(|c| c.to_string()).unwrap_or_default(),
                        r.rewrite.clone().unwrap_or_default(),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["ID", "Pattern", "Category", "Rewrite"], rows)
            );
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim().parse::<i64>()?;
            if store.remove_rule(id)? {
                println!("Removed rule {}", id);
            } else {
                println!("Rule {} not found; nothing to do", id);
            }
        }
        _ => {}
    }
    Ok(())
}
