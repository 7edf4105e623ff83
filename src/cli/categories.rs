use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::reports::list_categories;

use super::open_db;

pub fn list() -> Result<()> {
    let conn = open_db()?;
    let categories = list_categories(&conn)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Transactions"]);
    for cat in categories {
        table.add_row(vec![
            Cell::new(cat.id),
            Cell::new(cat.title),
            Cell::new(cat.transaction_count),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}
