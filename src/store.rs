//! Persistence seam between the importer and the database.
//!
//! The importer only sees the two traits below, so its reconciliation logic
//! can be driven by an in-memory store in tests and by [`SqliteStore`] in the
//! binary.

use rusqlite::Connection;

use crate::error::Result;
use crate::models::{Category, NewCategory, NewTransaction, Transaction};

pub trait CategoryStore {
    /// Categories whose title is exactly one of `titles`.
    fn find_by_titles(&self, titles: &[String]) -> Result<Vec<Category>>;

    /// Persist all of `categories` and return them with their generated ids,
    /// in input order.
    fn save_categories(&self, categories: &[NewCategory]) -> Result<Vec<Category>>;
}

pub trait TransactionStore {
    /// Persist all of `transactions` and return them with their generated
    /// ids, in input order.
    fn save_transactions(&self, transactions: &[NewTransaction]) -> Result<Vec<Transaction>>;
}

pub struct SqliteStore<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl CategoryStore for SqliteStore<'_> {
    fn find_by_titles(&self, titles: &[String]) -> Result<Vec<Category>> {
        if titles.is_empty() {
            return Ok(Vec::new());
        }
        let placeholders = vec!["?"; titles.len()].join(", ");
        let sql = format!("SELECT id, title FROM categories WHERE title IN ({placeholders}) ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let found = stmt
            .query_map(rusqlite::params_from_iter(titles.iter()), |row| {
                Ok(Category {
                    id: row.get(0)?,
                    title: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(found)
    }

    fn save_categories(&self, categories: &[NewCategory]) -> Result<Vec<Category>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut saved = Vec::with_capacity(categories.len());
        {
            let mut stmt = tx.prepare("INSERT INTO categories (title) VALUES (?1)")?;
            for cat in categories {
                let id = stmt.insert([&cat.title])?;
                saved.push(Category {
                    id,
                    title: cat.title.clone(),
                });
            }
        }
        tx.commit()?;
        tracing::debug!(count = saved.len(), "saved categories");
        Ok(saved)
    }
}

impl TransactionStore for SqliteStore<'_> {
    fn save_transactions(&self, transactions: &[NewTransaction]) -> Result<Vec<Transaction>> {
        let tx = self.conn.unchecked_transaction()?;
        let mut saved = Vec::with_capacity(transactions.len());
        {
            let mut stmt = tx.prepare(
                "INSERT INTO transactions (title, type, value, category_id) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for txn in transactions {
                let id = stmt.insert(rusqlite::params![txn.title, txn.kind, txn.value, txn.category.id])?;
                saved.push(Transaction {
                    id,
                    title: txn.title.clone(),
                    kind: txn.kind,
                    value: txn.value,
                    category: txn.category.clone(),
                });
            }
        }
        tx.commit()?;
        tracing::debug!(count = saved.len(), "saved transactions");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::models::TransactionType;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn new_cats(titles: &[&str]) -> Vec<NewCategory> {
        titles
            .iter()
            .map(|t| NewCategory { title: t.to_string() })
            .collect()
    }

    #[test]
    fn test_find_by_titles_empty_input() {
        let (_dir, conn) = test_db();
        let store = SqliteStore::new(&conn);
        assert!(store.find_by_titles(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_save_and_find_categories() {
        let (_dir, conn) = test_db();
        let store = SqliteStore::new(&conn);
        let saved = store.save_categories(&new_cats(&["Food", "Rent", "Travel"])).unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved[1].title, "Rent");

        let found = store
            .find_by_titles(&["Rent".to_string(), "Travel".to_string(), "Missing".to_string()])
            .unwrap();
        let titles: Vec<&str> = found.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Rent", "Travel"]);
        assert_eq!(found[0].id, saved[1].id);
    }

    #[test]
    fn test_find_by_titles_is_case_sensitive() {
        let (_dir, conn) = test_db();
        let store = SqliteStore::new(&conn);
        store.save_categories(&new_cats(&["Food"])).unwrap();
        assert!(store.find_by_titles(&["food".to_string()]).unwrap().is_empty());
    }

    #[test]
    fn test_save_categories_is_atomic() {
        let (_dir, conn) = test_db();
        let store = SqliteStore::new(&conn);
        store.save_categories(&new_cats(&["Food"])).unwrap();
        // "Food" collides with the UNIQUE constraint, so "Bills" must not stick either.
        assert!(store.save_categories(&new_cats(&["Bills", "Food"])).is_err());
        let count: i64 = conn.query_row("SELECT count(*) FROM categories", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_save_transactions() {
        let (_dir, conn) = test_db();
        let store = SqliteStore::new(&conn);
        let cat = store.save_categories(&new_cats(&["Work"])).unwrap().remove(0);
        let saved = store
            .save_transactions(&[
                NewTransaction {
                    title: "Salary".to_string(),
                    kind: TransactionType::Income,
                    value: 5000.0,
                    category: cat.clone(),
                },
                NewTransaction {
                    title: "Lunch".to_string(),
                    kind: TransactionType::Outcome,
                    value: 12.5,
                    category: cat.clone(),
                },
            ])
            .unwrap();
        assert_eq!(saved.len(), 2);
        assert_ne!(saved[0].id, saved[1].id);
        assert_eq!(saved[1].category, cat);

        let (kind, category_id): (TransactionType, i64) = conn
            .query_row(
                "SELECT type, category_id FROM transactions WHERE title = 'Lunch'",
                [],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .unwrap();
        assert_eq!(kind, TransactionType::Outcome);
        assert_eq!(category_id, cat.id);
    }
}
