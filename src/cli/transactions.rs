use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::amount;
use crate::models::TransactionType;
use crate::reports::list_transactions;

use super::open_db;

pub fn list() -> Result<()> {
    let conn = open_db()?;
    let rows = list_transactions(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Type", "Value", "Category"]);
    for row in rows {
        let value = match row.kind {
            TransactionType::Income => amount(row.value).green().to_string(),
            TransactionType::Outcome => amount(row.value).red().to_string(),
        };
        table.add_row(vec![
            Cell::new(row.id),
            Cell::new(row.title),
            Cell::new(row.kind),
            Cell::new(value),
            Cell::new(row.category),
        ]);
    }
    println!("Transactions\n{table}");
    Ok(())
}
