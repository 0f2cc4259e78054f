// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use smartbudget::cli::build_cli;
use smartbudget::classify::SingleParse;
use smartbudget::commands::{rules, transactions};
use smartbudget::models::Category;
use smartbudget::store::{MemoryStorage, Store};

fn new_store() -> Store {
    Store::open(Box::new(MemoryStorage::default())).unwrap()
}

fn run_rules(store: &mut Store, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["smartbudget", "rules"];
    argv.extend_from_slice(args);
    let matches = build_cli().get_matches_from(argv);
    rules::handle(store, matches.subcommand_matches("rules").unwrap())
}

#[test]
fn add_list_and_remove_a_rule() {
    let mut store = new_store();
    run_rules(
        &mut store,
        &[
            "add",
            "--pattern",
            "(?i)spotify",
            "--category",
            "wants",
            "--rewrite",
            "Spotify",
        ],
    )
    .unwrap();
    assert_eq!(store.rules().len(), 1);
    let rule = &store.rules()[0];
    assert_eq!(rule.pattern, "(?i)spotify");
    assert_eq!(rule.category, Some(Category::Wants));
    assert_eq!(rule.rewrite.as_deref(), Some("Spotify"));

    let id = rule.id.to_string();
    run_rules(&mut store, &["rm", "--id", &id]).unwrap();
    assert!(store.rules().is_empty());
}

#[test]
fn invalid_regex_is_rejected_before_the_store() {
    let mut store = new_store();
    let err = run_rules(&mut store, &["add", "--pattern", "([unclosed"]).unwrap_err();
    assert!(err.to_string().contains("Invalid regex pattern"));
    assert!(store.rules().is_empty());
}

#[test]
fn unknown_rule_category_is_rejected() {
    let mut store = new_store();
    let err = run_rules(
        &mut store,
        &["add", "--pattern", "cafe", "--category", "FUN"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Unknown category"));
    assert!(store.rules().is_empty());
}

#[test]
fn rules_reclassify_manual_free_text_entries() {
    let mut store = new_store();
    run_rules(
        &mut store,
        &["add", "--pattern", "(?i)lidl", "--category", "NEEDS", "--rewrite", "Lidl"],
    )
    .unwrap();

    let parse = SingleParse {
        amount: 540.0,
        currency: None,
        category: "WANTS".to_string(),
        description: "LIDL CZ PRAHA 4".to_string(),
    };
    let date = NaiveDate::parse_from_str("2025-08-15", "%Y-%m-%d").unwrap();
    let t = transactions::add_classified(&mut store, &parse, date).unwrap();
    assert_eq!(t.category, Category::Needs);
    assert_eq!(t.description, "Lidl");
    assert!(t.ai_generated);
}
