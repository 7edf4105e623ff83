use rusqlite::Connection;

use crate::error::Result;
use crate::models::TransactionType;

pub struct Balance {
    pub income: f64,
    pub outcome: f64,
    pub total: f64,
}

pub fn get_balance(conn: &Connection) -> Result<Balance> {
    let (income, outcome): (f64, f64) = conn.query_row(
        "SELECT \
            COALESCE(SUM(CASE WHEN type = 'income' THEN value END), 0.0), \
            COALESCE(SUM(CASE WHEN type = 'outcome' THEN value END), 0.0) \
         FROM transactions",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;
    Ok(Balance {
        income,
        outcome,
        total: income - outcome,
    })
}

pub struct CategorySummary {
    pub id: i64,
    pub title: String,
    pub transaction_count: i64,
}

pub fn list_categories(conn: &Connection) -> Result<Vec<CategorySummary>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.title, COUNT(t.id) FROM categories c \
         LEFT JOIN transactions t ON t.category_id = c.id \
         GROUP BY c.id ORDER BY c.title",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(CategorySummary {
                id: row.get(0)?,
                title: row.get(1)?,
                transaction_count: row.get(2)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub struct TransactionRow {
    pub id: i64,
    pub title: String,
    pub kind: TransactionType,
    pub value: f64,
    pub category: String,
}

pub fn list_transactions(conn: &Connection) -> Result<Vec<TransactionRow>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.title, t.type, t.value, c.title FROM transactions t \
         JOIN categories c ON t.category_id = c.id ORDER BY t.id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(TransactionRow {
                id: row.get(0)?,
                title: row.get(1)?,
                kind: row.get(2)?,
                value: row.get(3)?,
                category: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
