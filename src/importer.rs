use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use crate::error::{Result, TallyError};
use crate::models::{Category, CsvRow, NewCategory, NewTransaction, Transaction, TransactionType};
use crate::store::{CategoryStore, TransactionStore};

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Everything collected from one import file before the database is touched.
#[derive(Debug, Default)]
pub struct ParsedImport {
    pub rows: Vec<CsvRow>,
    /// Category name of every row, in row order, duplicates included.
    pub categories: Vec<String>,
    pub skipped: usize,
}

/// A plain decimal number. Grouping separators and currency symbols are not
/// accepted, so `"1,5"` is rejected rather than read as 15.
pub fn parse_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn on_first_line(position: Option<&csv::Position>) -> bool {
    position.is_some_and(|p| p.line() == 1)
}

fn parse_record(record: &csv::StringRecord) -> Option<CsvRow> {
    let field = |i| record.get(i).filter(|f| !f.is_empty());
    let (Some(title), Some(kind), Some(value), Some(category)) = (field(0), field(1), field(2), field(3))
    else {
        return None;
    };
    let Ok(kind) = kind.parse::<TransactionType>() else {
        tracing::debug!(title, kind, "dropping row with unknown type");
        return None;
    };
    let Some(value) = parse_value(value) else {
        tracing::debug!(title, value, "dropping row with non-numeric value");
        return None;
    };
    Some(CsvRow {
        title: title.to_string(),
        kind,
        value,
        category: category.to_string(),
    })
}

/// Read title,type,value,category rows. Line 1 is a header and is ignored,
/// even when blank; incomplete rows are dropped.
pub fn parse_reader<R: Read>(reader: R) -> Result<ParsedImport> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut parsed = ParsedImport::default();

    for result in rdr.records() {
        let record = match result {
            Ok(record) if on_first_line(record.position()) => continue,
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) if on_first_line(e.position()) => continue,
            Err(e) => {
                tracing::debug!(error = %e, "dropping unreadable row");
                parsed.skipped += 1;
                continue;
            }
        };
        match parse_record(&record) {
            Some(row) => {
                parsed.categories.push(row.category.clone());
                parsed.rows.push(row);
            }
            None => parsed.skipped += 1,
        }
    }
    Ok(parsed)
}

pub fn parse_file(file_path: &Path) -> Result<ParsedImport> {
    let file = std::fs::File::open(file_path)?;
    parse_reader(std::io::BufReader::new(file))
}

/// First-occurrence order, exact (case-sensitive) comparison.
fn distinct(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|n| seen.insert(n.as_str()))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Importer
// ---------------------------------------------------------------------------

pub struct ImportReport {
    pub transactions: Vec<Transaction>,
    pub new_categories: Vec<Category>,
    pub skipped: usize,
}

pub struct Importer<'a, S> {
    store: &'a S,
}

impl<'a, S> Importer<'a, S>
where
    S: CategoryStore + TransactionStore,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Import `file_path` and delete it once everything is saved. Returns the
    /// created transactions.
    #[allow(dead_code)]
    pub fn execute(&self, file_path: &Path) -> Result<Vec<Transaction>> {
        self.run(file_path).map(|report| report.transactions)
    }

    pub fn run(&self, file_path: &Path) -> Result<ImportReport> {
        let parsed = parse_file(file_path)?;
        tracing::debug!(
            rows = parsed.rows.len(),
            skipped = parsed.skipped,
            file = %file_path.display(),
            "parsed import file"
        );

        let report = self.persist(parsed)?;
        std::fs::remove_file(file_path)?;

        tracing::info!(
            imported = report.transactions.len(),
            new_categories = report.new_categories.len(),
            skipped = report.skipped,
            file = %file_path.display(),
            "import complete"
        );
        Ok(report)
    }

    fn persist(&self, parsed: ParsedImport) -> Result<ImportReport> {
        let titles = distinct(&parsed.categories);
        let existing = self.store.find_by_titles(&titles)?;

        let known: HashSet<&str> = existing.iter().map(|c| c.title.as_str()).collect();
        let missing: Vec<NewCategory> = titles
            .iter()
            .filter(|t| !known.contains(t.as_str()))
            .map(|t| NewCategory { title: t.clone() })
            .collect();
        let new_categories = if missing.is_empty() {
            Vec::new()
        } else {
            self.store.save_categories(&missing)?
        };

        let by_title: HashMap<&str, &Category> = existing
            .iter()
            .chain(new_categories.iter())
            .map(|c| (c.title.as_str(), c))
            .collect();

        let pending = parsed
            .rows
            .into_iter()
            .map(|row| {
                let category = by_title
                    .get(row.category.as_str())
                    .ok_or_else(|| TallyError::Other(format!("Unresolved category: {}", row.category)))?;
                Ok(NewTransaction {
                    title: row.title,
                    kind: row.kind,
                    value: row.value,
                    category: (*category).clone(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let transactions = if pending.is_empty() {
            Vec::new()
        } else {
            self.store.save_transactions(&pending)?
        };

        Ok(ImportReport {
            transactions,
            new_categories,
            skipped: parsed.skipped,
        })
    }
}
