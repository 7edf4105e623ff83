use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::amount;
use crate::reports::get_balance;

use super::open_db;

pub fn run() -> Result<()> {
    let conn = open_db()?;
    let balance = get_balance(&conn)?;

    let total = if balance.total >= 0.0 {
        amount(balance.total).green().to_string()
    } else {
        amount(balance.total).red().to_string()
    };

    let mut table = Table::new();
    table.set_header(vec!["", "Amount"]);
    table.add_row(vec![Cell::new("Income"), Cell::new(amount(balance.income))]);
    table.add_row(vec![Cell::new("Outcome"), Cell::new(amount(balance.outcome))]);
    table.add_row(vec![Cell::new("Total".bold()), Cell::new(total)]);
    println!("Balance\n{table}");
    Ok(())
}
