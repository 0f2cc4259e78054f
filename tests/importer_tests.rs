// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde_json::json;
use smartbudget::classify::StatementParse;
use smartbudget::cli::build_cli;
use smartbudget::commands::importer::{self, import_statement};
use smartbudget::models::{AccountType, Category, ClassifierRule};
use smartbudget::store::{MemoryStorage, Store};
use smartbudget::aggregate;
use std::io::Write;

fn new_store() -> Store {
    Store::open(Box::new(MemoryStorage::default())).unwrap()
}

fn sample_statement() -> serde_json::Value {
    json!({
        "account_name": "Spending account",
        "account_type": "SAVINGS",
        "balance": 15000.0,
        "currency": "CZK",
        "transactions": [
            {"date": "2025-08-01", "amount": 40000.0, "category": "INCOME",
             "description": "Salary", "type": "INCOME"},
            {"date": "2025-08-02", "amount": 10000.0, "category": "NEEDS",
             "description": "Rent", "type": "EXPENSE"},
            {"date": "2025-08-03", "amount": 5000.0, "category": "TRANSFER",
             "description": "To savings", "type": "TRANSFER"}
        ]
    })
}

#[test]
fn statement_import_commits_rows_and_metadata() {
    let mut store = new_store();
    let parse: StatementParse = serde_json::from_value(sample_statement()).unwrap();
    let outcome = import_statement(&mut store, &parse, "august.pdf").unwrap();
    assert_eq!(outcome.imported, 3);
    assert_eq!(outcome.dropped, 0);
    assert_eq!(outcome.document.name, "august.pdf");
    assert_eq!(outcome.document.account_type, Some(AccountType::Savings));
    assert_eq!(outcome.document.balance, Some(Decimal::from(15000)));

    // the batch drives the budget math end to end
    let txns = store.all();
    assert_eq!(
        aggregate::effective_income(txns, Decimal::from(50000)),
        Decimal::from(40000)
    );
    let flows = aggregate::monthly_flows(txns);
    assert_eq!(flows[0].expenses, Decimal::from(10000));

    let sheet = store.balance_sheet();
    assert_eq!(sheet.len(), 1);
    assert_eq!(sheet[0].name, "Spending account");
}

#[test]
fn invalid_rows_drop_without_sinking_the_batch() {
    let mut store = new_store();
    let parse: StatementParse = serde_json::from_value(json!({
        "transactions": [
            {"date": "2025-08-02", "amount": 10000.0, "category": "NEEDS",
             "description": "Rent"},
            {"date": "garbage", "amount": 1.0, "category": "NEEDS",
             "description": "bad date"},
            {"date": "2025-08-03", "amount": -1.0, "category": "NEEDS",
             "description": "negative"}
        ]
    }))
    .unwrap();
    let outcome = import_statement(&mut store, &parse, "partial.pdf").unwrap();
    assert_eq!(outcome.imported, 1);
    assert_eq!(outcome.dropped, 2);
    assert_eq!(store.all().len(), 1);
    assert_eq!(store.all()[0].description, "Rent");
    // the document records what was actually admitted
    assert_eq!(store.documents()[0].transaction_count, 1);
}

#[test]
fn local_rules_override_the_collaborator() {
    let mut store = new_store();
    store
        .add_rule(ClassifierRule {
            id: 0,
            pattern: "(?i)netflix".to_string(),
            category: Some(Category::Wants),
            rewrite: Some("Netflix".to_string()),
        })
        .unwrap();
    let parse: StatementParse = serde_json::from_value(json!({
        "transactions": [
            {"date": "2025-08-05", "amount": 299.0, "category": "NEEDS",
             "description": "NETFLIX.COM PRAGUE"}
        ]
    }))
    .unwrap();
    import_statement(&mut store, &parse, "sub.pdf").unwrap();
    assert_eq!(store.all()[0].category, Category::Wants);
    assert_eq!(store.all()[0].description, "Netflix");
}

#[test]
fn pre_parsed_statement_imports_through_the_cli() {
    let mut store = new_store();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{}", sample_statement()).unwrap();
    let path = file.path().to_str().unwrap().to_string();

    let matches = build_cli().get_matches_from([
        "smartbudget",
        "import",
        "statement",
        "--path",
        &path,
        "--pre-parsed",
    ]);
    let sub = matches.subcommand_matches("import").unwrap();
    importer::handle(&mut store, sub).unwrap();

    assert_eq!(store.all().len(), 3);
    assert_eq!(store.documents().len(), 1);
    // file name, not the whole path, names the document
    assert_eq!(
        store.documents()[0].name,
        file.path().file_name().unwrap().to_string_lossy()
    );
}
