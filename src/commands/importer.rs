// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::classify::{self, Classifier, GeminiClassifier, StatementParse};
use crate::models::Document;
use crate::store::Store;
use anyhow::{Context, Result};
use std::path::Path;

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("statement", sub)) => import_statement_cmd(store, sub),
        _ => Ok(()),
    }
}

fn import_statement_cmd(store: &mut Store, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let pre_parsed = sub.get_flag("pre-parsed");
    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    let parse: StatementParse = if pre_parsed {
        let raw = std::fs::read_to_string(path).with_context(|| format!("Read {}", path))?;
        serde_json::from_str(&raw).with_context(|| format!("Parse classifier response {}", path))?
    } else {
        let bytes = std::fs::read(path).with_context(|| format!("Read {}", path))?;
        GeminiClassifier::from_env()?.parse_statement(&bytes, &file_name)?
    };

    let outcome = import_statement(store, &parse, &file_name)?;
    println!(
        "Imported {} transaction(s) from '{}' as document {}{}",
        outcome.imported,
        file_name,
        outcome.document.id,
        if outcome.dropped > 0 {
            format!(" ({} invalid entr{} dropped)", outcome.dropped, if outcome.dropped == 1 { "y" } else { "ies" })
        } else {
            String::new()
        }
    );
    Ok(())
}

pub struct ImportOutcome {
    pub document: Document,
    pub imported: usize,
    pub dropped: usize,
}

/// Validates the collaborator's batch, applies the local rules and commits
/// document plus transactions in one atomic store operation. Invalid entries
/// are dropped; the counts are the only per-entry signal.
pub fn import_statement(
    store: &mut Store,
    parse: &StatementParse,
    file_name: &str,
) -> Result<ImportOutcome> {
    let (mut valid, dropped) = classify::validate_batch(&parse.transactions);
    for entry in &mut valid {
        let (rule_cat, rewrite) = classify::apply_rules(store.rules(), &entry.description);
        if let Some(cat) = rule_cat {
            entry.category = cat;
        }
        if let Some(newd) = rewrite {
            entry.description = newd;
        }
    }
    let meta = classify::document_meta(parse, file_name);
    let (document, imported) = store.add_batch(valid, meta)?;
    Ok(ImportOutcome {
        document,
        imported,
        dropped,
    })
}
