// Copyright (c) 2025 SmartBudget.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::Store;
use crate::utils::parse_decimal;
use anyhow::{anyhow, Result};

pub fn handle(store: &mut Store, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
            if amount.is_sign_negative() {
                return Err(anyhow!("Monthly income cannot be negative"));
            }
            store.set_monthly_income(amount)?;
            println!("Nominal monthly income set to {:.2}", amount);
        }
        Some(("show", _)) => {
            println!("{:.2}", store.monthly_income());
        }
        _ => {}
    }
    Ok(())
}
