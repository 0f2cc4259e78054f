// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The aggregation engine: pure functions from a transaction snapshot (plus
//! the configured nominal income) to the derived numbers every view shows.
//! No caching, no incremental state; callers recompute on change.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Category, Transaction};

pub const DEFAULT_BREAKDOWN_TOP: usize = 8;

pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Sorted, de-duplicated month keys present in the snapshot.
pub fn available_months(txns: &[Transaction]) -> Vec<String> {
    let mut keys: Vec<String> = txns.iter().map(|t| month_key(t.date)).collect();
    keys.sort();
    keys.dedup();
    keys
}

pub fn available_years(txns: &[Transaction]) -> Vec<i32> {
    let mut years: Vec<i32> = txns.iter().map(|t| t.date.year()).collect();
    years.sort_unstable();
    years.dedup();
    years
}

pub fn for_month(txns: &[Transaction], key: &str) -> Vec<Transaction> {
    txns.iter()
        .filter(|t| month_key(t.date) == key)
        .cloned()
        .collect()
}

pub fn for_year(txns: &[Transaction], year: i32) -> Vec<Transaction> {
    txns.iter()
        .filter(|t| t.date.year() == year)
        .cloned()
        .collect()
}

/// Exact-match sum over one category.
pub fn total_for(txns: &[Transaction], category: Category) -> Decimal {
    txns.iter()
        .filter(|t| t.category == category)
        .map(|t| t.amount)
        .sum()
}

/// All-or-nothing income switch: any INCOME transaction in the period makes
/// the period transaction-sourced; otherwise the configured nominal income
/// applies. The two sources never blend.
pub fn effective_income(txns: &[Transaction], nominal_income: Decimal) -> Decimal {
    let from_txns = total_for(txns, Category::Income);
    if txns.iter().any(|t| t.category == Category::Income) {
        from_txns
    } else {
        nominal_income
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryStatus {
    pub category: Category,
    pub target: Decimal,
    pub spent: Decimal,
    pub percent_used: Decimal,
    pub is_over: bool,
}

/// Target, spend and capped usage for the four budget categories.
pub fn budget_status(txns: &[Transaction], nominal_income: Decimal) -> Vec<CategoryStatus> {
    let income = effective_income(txns, nominal_income);
    Category::ALL
        .iter()
        .filter(|c| c.rule().is_budget_category)
        .map(|&category| {
            let rule = category.rule();
            let target = income * Decimal::from(rule.percentage) / Decimal::ONE_HUNDRED;
            let spent = total_for(txns, category);
            // target == 0 guards the division; never emit a non-finite ratio.
            let percent_used = if target > Decimal::ZERO {
                (spent / target * Decimal::ONE_HUNDRED).min(Decimal::ONE_HUNDRED)
            } else {
                Decimal::ZERO
            };
            let is_over = target > Decimal::ZERO && spent > target;
            CategoryStatus {
                category,
                target,
                spent,
                percent_used,
                is_over,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthFlow {
    pub month: String,
    pub income: Decimal,
    pub expenses: Decimal,
    pub invested: Decimal,
    pub net: Decimal,
    pub cumulative: Decimal,
}

/// Chronological month buckets. TRANSFER rows never enter any column;
/// `invested` is the SAVINGS share of `expenses` (money leaving the checking
/// flow but staying an asset). The cumulative series starts at zero: it is a
/// relative trend, not an absolute net worth.
pub fn monthly_flows(txns: &[Transaction]) -> Vec<MonthFlow> {
    let mut buckets: BTreeMap<String, (Decimal, Decimal, Decimal)> = BTreeMap::new();
    for t in txns {
        let entry = buckets
            .entry(month_key(t.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO, Decimal::ZERO));
        match t.category {
            Category::Income => entry.0 += t.amount,
            Category::Transfer => {}
            other => {
                entry.1 += t.amount;
                if other == Category::Savings {
                    entry.2 += t.amount;
                }
            }
        }
    }
    let mut cumulative = Decimal::ZERO;
    buckets
        .into_iter()
        .map(|(month, (income, expenses, invested))| {
            let net = income - expenses;
            // SAVINGS was subtracted as an expense but is not consumed wealth;
            // add it back for the savings trend.
            cumulative += net + invested;
            MonthFlow {
                month,
                income,
                expenses,
                invested,
                net,
                cumulative,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    pub amount: Decimal,
    pub percent_of_income: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnualSummary {
    pub year: i32,
    pub income: Decimal,
    pub expenses: Decimal,
    pub invested: Decimal,
    pub total_saved: Decimal,
    pub savings_rate: Decimal,
    pub by_category: Vec<CategoryShare>,
    pub transaction_count: usize,
}

/// Year roll-up. `expenses` here means true consumption (NEEDS, WANTS,
/// GIVING); `total_saved` is a conservative net-worth increase: invested
/// amounts plus whatever stayed on the current account.
pub fn annual_summary(txns: &[Transaction], year: i32) -> AnnualSummary {
    let in_year = for_year(txns, year);
    let income = total_for(&in_year, Category::Income);
    let expenses = total_for(&in_year, Category::Needs)
        + total_for(&in_year, Category::Wants)
        + total_for(&in_year, Category::Giving);
    let invested = total_for(&in_year, Category::Savings);
    let balance = income - expenses - invested;
    let total_saved = invested + balance.max(Decimal::ZERO);
    let savings_rate = if income > Decimal::ZERO {
        total_saved / income * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };
    let by_category = Category::BUDGET
        .iter()
        .map(|&category| {
            let amount = total_for(&in_year, category);
            let percent_of_income = if income > Decimal::ZERO {
                amount / income * Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };
            CategoryShare {
                category,
                amount,
                percent_of_income,
            }
        })
        .collect();
    AnnualSummary {
        year,
        income,
        expenses,
        invested,
        total_saved,
        savings_rate,
        by_category,
        transaction_count: in_year.len(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakdownRow {
    pub description: String,
    pub amount: Decimal,
}

pub const OTHER_LABEL: &str = "Other";

/// Within one category, group by exact trimmed description, sort descending
/// and collapse everything past the top `top` groups into a single "Other"
/// row to bound output size. No merchant normalization.
pub fn breakdown(txns: &[Transaction], category: Category, top: usize) -> Vec<BreakdownRow> {
    let mut groups: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in txns.iter().filter(|t| t.category == category) {
        *groups
            .entry(t.description.trim().to_string())
            .or_insert(Decimal::ZERO) += t.amount;
    }
    let mut rows: Vec<BreakdownRow> = groups
        .into_iter()
        .map(|(description, amount)| BreakdownRow {
            description,
            amount,
        })
        .collect();
    rows.sort_by(|a, b| b.amount.cmp(&a.amount));
    if rows.len() > top {
        let other: Decimal = rows[top..].iter().map(|r| r.amount).sum();
        rows.truncate(top);
        if other > Decimal::ZERO {
            rows.push(BreakdownRow {
                description: OTHER_LABEL.to_string(),
                amount: other,
            });
        }
    }
    rows
}
