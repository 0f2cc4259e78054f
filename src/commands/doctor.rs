// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::Store;
use crate::utils::pretty_table;
use anyhow::Result;
use std::collections::{HashMap, HashSet};

pub fn handle(store: &Store) -> Result<()> {
    let rows = scan(store);
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        let rows = rows
            .into_iter()
            .map(|(issue, detail)| vec![issue, detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn scan(store: &Store) -> Vec<(String, String)> {
    let mut rows = Vec::new();

    // 1) Transactions pointing at a document that no longer exists
    let doc_ids: HashSet<i64> = store.documents().iter().map(|d| d.id).collect();
    for t in store.all() {
        if let Some(doc) = t.document_id {
            if !doc_ids.contains(&doc) {
                rows.push((
                    "orphan_document_ref".to_string(),
                    format!("transaction {} -> document {}", t.id, doc),
                ));
            }
        }
    }

    // 2) Duplicate transaction ids (hand-edited state files)
    let mut seen: HashSet<i64> = HashSet::new();
    for t in store.all() {
        if !seen.insert(t.id) {
            rows.push(("duplicate_id".to_string(), format!("transaction {}", t.id)));
        }
    }

    // 3) More linked rows than the document imported. Fewer is normal
    // (single deletes leave the import-time count alone), more is not.
    let mut linked: HashMap<i64, usize> = HashMap::new();
    for t in store.all() {
        if let Some(doc) = t.document_id {
            *linked.entry(doc).or_insert(0) += 1;
        }
    }
    for d in store.documents() {
        let actual = linked.get(&d.id).copied().unwrap_or(0);
        if actual > d.transaction_count {
            rows.push((
                "count_mismatch".to_string(),
                format!(
                    "document {} imported {} transaction(s), found {}",
                    d.id, d.transaction_count, actual
                ),
            ));
        }
    }

    rows
}
