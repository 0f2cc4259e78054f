// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use crate::models::{
    AccountType, Category, ClassifierRule, Document, DocumentMeta, NewTransaction, Transaction,
};

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.smartbudget", "SmartBudget", "smartbudget"));

pub fn data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let dir = proj.data_dir().to_path_buf();
    fs::create_dir_all(&dir).context("Failed to create data dir")?;
    Ok(dir)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub monthly_income: Decimal,
    pub next_id: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            monthly_income: Decimal::ZERO,
            next_id: 1,
        }
    }
}

/// Everything the store persists: three independent records (transactions,
/// documents, settings) plus the local classification rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub transactions: Vec<Transaction>,
    pub documents: Vec<Document>,
    pub settings: Settings,
    pub rules: Vec<ClassifierRule>,
}

/// Injected persistence collaborator. The store never knows where or how the
/// state lands on disk.
pub trait Storage {
    fn load(&self) -> Result<PersistedState>;
    fn save(&self, state: &PersistedState) -> Result<()>;
}

/// Disk backend: one JSON file per record in the platform data dir.
pub struct JsonStorage {
    dir: PathBuf,
}

impl JsonStorage {
    pub fn new(dir: PathBuf) -> Self {
        JsonStorage { dir }
    }

    pub fn default_location() -> Result<Self> {
        Ok(JsonStorage::new(data_dir()?))
    }

    fn read_record<T: Default + serde::de::DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(T::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("Parse {}", path.display()))
    }

    fn stage<T: Serialize>(&self, file: &str, v: &T) -> Result<()> {
        let tmp = self.dir.join(format!("{}.tmp", file));
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Create {}", self.dir.display()))?;
        fs::write(&tmp, serde_json::to_string_pretty(v)?)
            .with_context(|| format!("Write {}", tmp.display()))?;
        Ok(())
    }

    fn commit(&self, file: &str) -> Result<()> {
        let tmp = self.dir.join(format!("{}.tmp", file));
        let path = self.dir.join(file);
        fs::rename(&tmp, &path).with_context(|| format!("Commit {}", path.display()))
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> Result<PersistedState> {
        Ok(PersistedState {
            transactions: self.read_record("transactions.json")?,
            documents: self.read_record("documents.json")?,
            settings: self.read_record("settings.json")?,
            rules: self.read_record("rules.json")?,
        })
    }

    // Stage every record, then rename into place. Documents commit before
    // transactions: an interrupted save can lose a document's rows, but it
    // never records rows without their owning document.
    fn save(&self, state: &PersistedState) -> Result<()> {
        self.stage("documents.json", &state.documents)?;
        self.stage("transactions.json", &state.transactions)?;
        self.stage("settings.json", &state.settings)?;
        self.stage("rules.json", &state.rules)?;
        self.commit("documents.json")?;
        self.commit("transactions.json")?;
        self.commit("settings.json")?;
        self.commit("rules.json")?;
        Ok(())
    }
}

/// In-memory backend for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStorage {
    state: RefCell<PersistedState>,
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<PersistedState> {
        Ok(self.state.borrow().clone())
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        *self.state.borrow_mut() = state.clone();
        Ok(())
    }
}

/// One balance-sheet row: documents carrying a known balance, passed through
/// without any derived computation.
#[derive(Debug, Clone, Serialize)]
pub struct AccountBalance {
    pub name: String,
    pub balance: Decimal,
    pub account_type: Option<AccountType>,
    pub currency: String,
}

/// The source of truth: classified transactions, imported documents and the
/// nominal income, mirrored through the injected storage after every
/// mutation.
pub struct Store {
    state: PersistedState,
    storage: Box<dyn Storage>,
}

impl Store {
    pub fn open(storage: Box<dyn Storage>) -> Result<Store> {
        let mut state = storage.load()?;
        // Guard against a stale id counter in hand-edited state files.
        let max_seen = state
            .transactions
            .iter()
            .map(|t| t.id)
            .chain(state.documents.iter().map(|d| d.id))
            .chain(state.rules.iter().map(|r| r.id))
            .max()
            .unwrap_or(0);
        if state.settings.next_id <= max_seen {
            state.settings.next_id = max_seen + 1;
        }
        Ok(Store { state, storage })
    }

    fn next_id(&mut self) -> i64 {
        let id = self.state.settings.next_id;
        self.state.settings.next_id += 1;
        id
    }

    fn persist(&self) -> Result<()> {
        self.storage.save(&self.state)
    }

    /// Insertion-ordered snapshot; consumers sort as needed.
    pub fn all(&self) -> &[Transaction] {
        &self.state.transactions
    }

    pub fn documents(&self) -> &[Document] {
        &self.state.documents
    }

    pub fn rules(&self) -> &[ClassifierRule] {
        &self.state.rules
    }

    pub fn monthly_income(&self) -> Decimal {
        self.state.settings.monthly_income
    }

    pub fn set_monthly_income(&mut self, amount: Decimal) -> Result<()> {
        let prev = self.state.settings.monthly_income;
        self.state.settings.monthly_income = amount;
        if let Err(e) = self.persist() {
            self.state.settings.monthly_income = prev;
            return Err(e);
        }
        Ok(())
    }

    pub fn add(&mut self, new: NewTransaction) -> Result<Transaction> {
        let id = self.next_id();
        let t = Transaction {
            id,
            description: new.description,
            amount: new.amount,
            currency: new.currency,
            category: new.category,
            date: new.date,
            ai_generated: new.ai_generated,
            document_id: None,
        };
        self.state.transactions.push(t.clone());
        if let Err(e) = self.persist() {
            self.state.transactions.pop();
            self.state.settings.next_id = id;
            return Err(e);
        }
        Ok(t)
    }

    /// Atomically records one document and its batch of transactions. Either
    /// everything lands or the state is left untouched.
    pub fn add_batch(
        &mut self,
        entries: Vec<NewTransaction>,
        meta: DocumentMeta,
    ) -> Result<(Document, usize)> {
        let tx_mark = self.state.transactions.len();
        let doc_mark = self.state.documents.len();
        let id_mark = self.state.settings.next_id;

        let doc_id = self.next_id();
        let count = entries.len();
        let doc = Document {
            id: doc_id,
            name: meta.name,
            upload_date: chrono::Local::now().date_naive(),
            transaction_count: count,
            account_name: meta.account_name,
            account_type: meta.account_type,
            balance: meta.balance,
            currency: meta.currency,
        };
        self.state.documents.push(doc.clone());
        for new in entries {
            let id = self.next_id();
            self.state.transactions.push(Transaction {
                id,
                description: new.description,
                amount: new.amount,
                currency: new.currency,
                category: new.category,
                date: new.date,
                ai_generated: new.ai_generated,
                document_id: Some(doc_id),
            });
        }
        if let Err(e) = self.persist() {
            self.state.transactions.truncate(tx_mark);
            self.state.documents.truncate(doc_mark);
            self.state.settings.next_id = id_mark;
            return Err(e);
        }
        Ok((doc, count))
    }

    /// Idempotent: removing an absent id is a no-op, never an error.
    pub fn remove(&mut self, id: i64) -> Result<bool> {
        let Some(pos) = self.state.transactions.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        let taken = self.state.transactions.remove(pos);
        if let Err(e) = self.persist() {
            self.state.transactions.insert(pos, taken);
            return Err(e);
        }
        Ok(true)
    }

    /// Cascading delete: the document and every transaction referencing it.
    /// Returns the number of transactions removed; absent ids are a no-op.
    pub fn remove_document(&mut self, document_id: i64) -> Result<usize> {
        let had_doc = self.state.documents.iter().any(|d| d.id == document_id);
        if !had_doc {
            return Ok(0);
        }
        let docs_prev = self.state.documents.clone();
        let txns_prev = self.state.transactions.clone();
        self.state.documents.retain(|d| d.id != document_id);
        let before = self.state.transactions.len();
        self.state
            .transactions
            .retain(|t| t.document_id != Some(document_id));
        let removed = before - self.state.transactions.len();
        if let Err(e) = self.persist() {
            self.state.documents = docs_prev;
            self.state.transactions = txns_prev;
            return Err(e);
        }
        Ok(removed)
    }

    /// The only in-place mutation a transaction supports. No-op on a missing
    /// id; callers reject unrecognized categories before getting here.
    pub fn reassign_category(&mut self, id: i64, category: Category) -> Result<bool> {
        let Some(pos) = self.state.transactions.iter().position(|t| t.id == id) else {
            return Ok(false);
        };
        let prev = self.state.transactions[pos].category;
        self.state.transactions[pos].category = category;
        if let Err(e) = self.persist() {
            self.state.transactions[pos].category = prev;
            return Err(e);
        }
        Ok(true)
    }

    /// Documents with a known balance, surfaced directly.
    pub fn balance_sheet(&self) -> Vec<AccountBalance> {
        self.state
            .documents
            .iter()
            .filter_map(|d| {
                d.balance.map(|balance| AccountBalance {
                    name: d.account_name.clone().unwrap_or_else(|| d.name.clone()),
                    balance,
                    account_type: d.account_type,
                    currency: d.currency.clone().unwrap_or_else(|| "CZK".to_string()),
                })
            })
            .collect()
    }

    pub fn add_rule(&mut self, rule_without_id: ClassifierRule) -> Result<ClassifierRule> {
        let id = self.next_id();
        let rule = ClassifierRule {
            id,
            ..rule_without_id
        };
        self.state.rules.push(rule.clone());
        if let Err(e) = self.persist() {
            self.state.rules.pop();
            self.state.settings.next_id = id;
            return Err(e);
        }
        Ok(rule)
    }

    pub fn remove_rule(&mut self, id: i64) -> Result<bool> {
        let Some(pos) = self.state.rules.iter().position(|r| r.id == id) else {
            return Ok(false);
        };
        let taken = self.state.rules.remove(pos);
        if let Err(e) = self.persist() {
            self.state.rules.insert(pos, taken);
            return Err(e);
        }
        Ok(true)
    }
}
