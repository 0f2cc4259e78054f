// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Boundary to the classification collaborator. The engine never classifies
//! anything itself: it sends free text or a statement out, and validates
//! whatever comes back before admitting it into the store.

use anyhow::{anyhow, Context, Result};
use base64::Engine as _;
use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;

use crate::models::{AccountType, Category, ClassifierRule, DocumentMeta, NewTransaction};
use crate::utils;

/// Rejected classifier output. Each variant maps to one drop reason; nothing
/// here is fatal.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("amount must be a non-negative finite number")]
    BadAmount,
    #[error("unknown category '{0}'")]
    UnknownCategory(String),
    #[error("invalid date '{0}'")]
    BadDate(String),
    #[error("malformed entry: {0}")]
    Malformed(String),
}

/// Collaborator response for a single free-text entry.
#[derive(Debug, Clone, Deserialize)]
pub struct SingleParse {
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    pub category: String,
    pub description: String,
}

/// One row of a parsed statement. The collaborator also tags a flow `type`;
/// the category already encodes income/transfer, so it is accepted and
/// ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct StatementEntry {
    pub date: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
    pub category: String,
    pub description: String,
    #[serde(default, rename = "type")]
    pub flow_type: Option<String>,
}

/// Collaborator response for a whole statement: account metadata plus raw
/// rows, kept as loose JSON values so one malformed row drops alone instead
/// of sinking the batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatementParse {
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub balance: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub transactions: Vec<serde_json::Value>,
}

const DEFAULT_CURRENCY: &str = "CZK";

fn validate_amount(amount: f64) -> Result<Decimal, ValidationError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(ValidationError::BadAmount);
    }
    Decimal::try_from(amount).map_err(|_| ValidationError::BadAmount)
}

fn validate_category(raw: &str) -> Result<Category, ValidationError> {
    Category::from_str(raw).map_err(|_| ValidationError::UnknownCategory(raw.to_string()))
}

/// Single manual entry: the date is supplied by the caller (now), not by the
/// collaborator.
pub fn validate_single(
    parse: &SingleParse,
    date: NaiveDate,
) -> Result<NewTransaction, ValidationError> {
    let amount = validate_amount(parse.amount)?;
    let category = validate_category(&parse.category)?;
    Ok(NewTransaction {
        description: parse.description.trim().to_string(),
        amount,
        currency: parse
            .currency
            .clone()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        category,
        date,
        ai_generated: true,
    })
}

fn validate_statement_entry(value: &serde_json::Value) -> Result<NewTransaction, ValidationError> {
    let entry: StatementEntry = serde_json::from_value(value.clone())
        .map_err(|e| ValidationError::Malformed(e.to_string()))?;
    let amount = validate_amount(entry.amount)?;
    let category = validate_category(&entry.category)?;
    let date = utils::parse_iso_date(&entry.date)
        .map_err(|_| ValidationError::BadDate(entry.date.clone()))?;
    Ok(NewTransaction {
        description: entry.description.trim().to_string(),
        amount,
        currency: entry
            .currency
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        category,
        date,
        ai_generated: true,
    })
}

/// Batch validation: valid entries commit, invalid entries are dropped, and
/// the dropped count is the only per-entry signal.
pub fn validate_batch(values: &[serde_json::Value]) -> (Vec<NewTransaction>, usize) {
    let mut valid = Vec::with_capacity(values.len());
    let mut dropped = 0usize;
    for v in values {
        match validate_statement_entry(v) {
            Ok(t) => valid.push(t),
            Err(_) => dropped += 1,
        }
    }
    (valid, dropped)
}

pub fn document_meta(parse: &StatementParse, file_name: &str) -> DocumentMeta {
    DocumentMeta {
        name: file_name.to_string(),
        account_name: parse.account_name.clone(),
        account_type: parse
            .account_type
            .as_deref()
            .and_then(|s| AccountType::from_str(s).ok()),
        balance: parse
            .balance
            .filter(|b| b.is_finite())
            .and_then(|b| Decimal::try_from(b).ok()),
        currency: parse.currency.clone(),
    }
}

/// Applies the user's local rules to a description, newest rule first.
/// Returns the category override and description rewrite, if any matched.
pub fn apply_rules(rules: &[ClassifierRule], description: &str) -> (Option<Category>, Option<String>) {
    for rule in rules.iter().rev() {
        if let Ok(re) = Regex::new(&rule.pattern) {
            if re.is_match(description) {
                return (rule.category, rule.rewrite.clone());
            }
        }
    }
    (None, None)
}

/// The one asynchronous boundary in the system. Requests are short-lived and
/// user-triggered; the caller awaits a single response and only then mutates
/// the store.
pub trait Classifier {
    fn classify_text(&self, input: &str) -> Result<SingleParse>;
    fn parse_statement(&self, bytes: &[u8], file_name: &str) -> Result<StatementParse>;
}

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-2.5-flash";

const CLASSIFY_PROMPT: &str = "Extract the transaction from this text. Reply with a single JSON \
object {\"amount\": number, \"currency\": string, \"category\": string, \"description\": string}. \
Amount is always a positive number; assume CZK when no currency is given. Category rules \
(40/30/20/10 budget): NEEDS = rent, utilities, groceries, commute; WANTS = restaurants, cinema, \
hobbies, subscriptions; SAVINGS = investments, savings account, debt paydown; GIVING = charity, \
gifts, unexpected help.";

const STATEMENT_PROMPT: &str = "Parse this bank statement. Reply with a single JSON object \
{\"account_name\": string, \"account_type\": \"CURRENT\"|\"SAVINGS\", \"balance\": number, \
\"currency\": string, \"transactions\": [{\"date\": \"YYYY-MM-DD\", \"amount\": number, \
\"currency\": string, \"description\": string, \"category\": \
\"NEEDS\"|\"WANTS\"|\"SAVINGS\"|\"GIVING\"|\"INCOME\"|\"TRANSFER\", \"type\": \
\"EXPENSE\"|\"INCOME\"|\"TRANSFER\"}]}. Amounts are positive magnitudes. Mark movements between \
the customer's own accounts and credit-card repayments as TRANSFER so they are not double \
counted.";

/// HTTP classifier speaking the Gemini generateContent protocol.
pub struct GeminiClassifier {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
}

impl GeminiClassifier {
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .context("Set GEMINI_API_KEY to use the classifier")?;
        Ok(GeminiClassifier {
            client: utils::http_client()?,
            api_key,
            model: GEMINI_MODEL.to_string(),
        })
    }

    fn generate(&self, parts: serde_json::Value) -> Result<String> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_ENDPOINT, self.model, self.api_key
        );
        let body = json!({
            "contents": [{ "parts": parts }],
            "generationConfig": { "responseMimeType": "application/json" }
        });
        let resp = self
            .client
            .post(url)
            .json(&body)
            .send()
            .context("Classification service unreachable; try again")?
            .error_for_status()
            .context("Classification service rejected the request")?;

        #[derive(Deserialize)]
        struct GenerateResponse {
            candidates: Vec<Candidate>,
        }
        #[derive(Deserialize)]
        struct Candidate {
            content: Content,
        }
        #[derive(Deserialize)]
        struct Content {
            parts: Vec<Part>,
        }
        #[derive(Deserialize)]
        struct Part {
            text: String,
        }

        let parsed: GenerateResponse = resp.json().context("Malformed classifier response")?;
        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| anyhow!("Classifier returned no candidates"))
    }
}

impl Classifier for GeminiClassifier {
    fn classify_text(&self, input: &str) -> Result<SingleParse> {
        let text = self.generate(json!([
            { "text": format!("{}\n\nText: \"{}\"", CLASSIFY_PROMPT, input) }
        ]))?;
        serde_json::from_str(&text).context("Could not understand this transaction")
    }

    fn parse_statement(&self, bytes: &[u8], _file_name: &str) -> Result<StatementParse> {
        let data = base64::engine::general_purpose::STANDARD.encode(bytes);
        let text = self.generate(json!([
            { "text": STATEMENT_PROMPT },
            { "inlineData": { "mimeType": "application/pdf", "data": data } }
        ]))?;
        serde_json::from_str(&text).context("Could not parse this statement")
    }
}
