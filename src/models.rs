// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{anyhow, Error};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed category set. The first four split income 40/30/20/10; INCOME and
/// TRANSFER are flow markers that never count against a budget target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Needs,
    Wants,
    Savings,
    Giving,
    Income,
    Transfer,
}

#[derive(Debug, Clone, Copy)]
pub struct BudgetRule {
    pub category: Category,
    pub percentage: u32,
    pub label: &'static str,
    pub is_budget_category: bool,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Needs,
        Category::Wants,
        Category::Savings,
        Category::Giving,
        Category::Income,
        Category::Transfer,
    ];

    /// The four categories that participate in percentage-target comparisons.
    pub const BUDGET: [Category; 4] = [
        Category::Needs,
        Category::Wants,
        Category::Savings,
        Category::Giving,
    ];

    pub fn rule(self) -> BudgetRule {
        match self {
            Category::Needs => BudgetRule {
                category: self,
                percentage: 40,
                label: "Needs",
                is_budget_category: true,
            },
            Category::Wants => BudgetRule {
                category: self,
                percentage: 30,
                label: "Wants",
                is_budget_category: true,
            },
            Category::Savings => BudgetRule {
                category: self,
                percentage: 20,
                label: "Savings",
                is_budget_category: true,
            },
            Category::Giving => BudgetRule {
                category: self,
                percentage: 10,
                label: "Giving",
                is_budget_category: true,
            },
            Category::Income => BudgetRule {
                category: self,
                percentage: 0,
                label: "Income",
                is_budget_category: false,
            },
            Category::Transfer => BudgetRule {
                category: self,
                percentage: 0,
                label: "Transfer",
                is_budget_category: false,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Needs => "NEEDS",
            Category::Wants => "WANTS",
            Category::Savings => "SAVINGS",
            Category::Giving => "GIVING",
            Category::Income => "INCOME",
            Category::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NEEDS" => Ok(Category::Needs),
            "WANTS" => Ok(Category::Wants),
            "SAVINGS" => Ok(Category::Savings),
            "GIVING" => Ok(Category::Giving),
            "INCOME" => Ok(Category::Income),
            "TRANSFER" => Ok(Category::Transfer),
            other => Err(anyhow!(
                "Unknown category '{}' (use NEEDS|WANTS|SAVINGS|GIVING|INCOME|TRANSFER)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Current,
    Savings,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Current => f.write_str("CURRENT"),
            AccountType::Savings => f.write_str("SAVINGS"),
        }
    }
}

impl FromStr for AccountType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CURRENT" => Ok(AccountType::Current),
            "SAVINGS" => Ok(AccountType::Savings),
            other => Err(anyhow!(
                "Unknown account type '{}' (use CURRENT|SAVINGS)",
                other
            )),
        }
    }
}

/// Amounts are unsigned magnitudes; direction is implied by the category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub category: Category,
    pub date: NaiveDate,
    #[serde(default)]
    pub ai_generated: bool,
    #[serde(default)]
    pub document_id: Option<i64>,
}

/// A transaction the store has not admitted yet: no id, no document link.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub description: String,
    pub amount: Decimal,
    pub currency: String,
    pub category: Category,
    pub date: NaiveDate,
    pub ai_generated: bool,
}

/// One bulk-imported bank statement. Balance and account metadata are
/// authoritative data supplied at import time, never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub name: String,
    pub upload_date: NaiveDate,
    pub transaction_count: usize,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub account_type: Option<AccountType>,
    #[serde(default)]
    pub balance: Option<Decimal>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Account metadata attached to a statement import, before the document
/// record exists.
#[derive(Debug, Clone, Default)]
pub struct DocumentMeta {
    pub name: String,
    pub account_name: Option<String>,
    pub account_type: Option<AccountType>,
    pub balance: Option<Decimal>,
    pub currency: Option<String>,
}

/// User-managed classification rule: regex over the description, an optional
/// category override and an optional description rewrite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierRule {
    pub id: i64,
    pub pattern: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub rewrite: Option<String>,
}
