// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;

use crate::aggregate::month_key;

/// Which month the views are filtered to. Derived from, never authoritative
/// over, the transaction store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MonthSelection {
    #[default]
    None,
    Selected(String),
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    selection: MonthSelection,
}

impl ViewState {
    pub fn new() -> Self {
        ViewState::default()
    }

    pub fn selected(&self) -> Option<&str> {
        match &self.selection {
            MonthSelection::Selected(key) => Some(key),
            MonthSelection::None => None,
        }
    }

    /// Explicit user navigation.
    pub fn select(&mut self, key: String) {
        self.selection = MonthSelection::Selected(key);
    }

    /// Must run whenever the available-months set changes, not only on user
    /// navigation: a selection whose month vanished snaps to the latest
    /// available key; an empty store clears the selection.
    pub fn reconcile(&mut self, available: &[String]) {
        match &self.selection {
            MonthSelection::Selected(key) if available.contains(key) => {}
            _ => {
                self.selection = match available.last() {
                    Some(latest) => MonthSelection::Selected(latest.clone()),
                    None => MonthSelection::None,
                };
            }
        }
    }

    /// The key views should filter by. With nothing selected this falls back
    /// to the current real-world month, a display-only default that is never
    /// persisted.
    pub fn current_key(&self, today: NaiveDate) -> String {
        match &self.selection {
            MonthSelection::Selected(key) => key.clone(),
            MonthSelection::None => month_key(today),
        }
    }
}
