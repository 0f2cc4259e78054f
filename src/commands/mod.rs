// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod budgets;
pub mod doctor;
pub mod documents;
pub mod exporter;
pub mod importer;
pub mod income;
pub mod reports;
pub mod rules;
pub mod transactions;
