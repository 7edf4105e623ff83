pub mod balance;
pub mod categories;
pub mod import;
pub mod init;
pub mod transactions;

use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::db::get_connection;
use crate::error::{Result, TallyError};
use crate::settings::get_db_path;

/// Open the configured database, refusing to create an empty one.
pub(crate) fn open_db() -> Result<Connection> {
    let db_path = get_db_path();
    if !db_path.exists() {
        return Err(TallyError::Other(
            "Database not found. Run `tally init` to set up.".to_string(),
        ));
    }
    get_connection(&db_path)
}

#[derive(Parser)]
#[command(name = "tally", about = "Import CSV transaction exports into a local ledger.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for tally data (default: ~/Documents/tally)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Import a CSV file of title,type,value,category rows. The file is deleted afterwards.
    Import {
        /// Path to the CSV file to import
        file: String,
    },
    /// Inspect categories.
    Categories {
        #[command(subcommand)]
        command: CategoriesCommands,
    },
    /// Inspect transactions.
    Transactions {
        #[command(subcommand)]
        command: TransactionsCommands,
    },
    /// Show total income, outcome and balance.
    Balance,
}

#[derive(Subcommand)]
pub enum CategoriesCommands {
    /// List all categories with their transaction counts.
    List,
}

#[derive(Subcommand)]
pub enum TransactionsCommands {
    /// List all transactions.
    List,
}
