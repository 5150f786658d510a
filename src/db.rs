//! Database initialization and schema migrations.
//!
//! The schema version is tracked with SQLite's `PRAGMA user_version`.
//! Version 1 is the base schema; version 2 adds the `other_category`
//! column to the transactions table. [initialize] brings a database up to
//! [SCHEMA_VERSION] and is safe to call on every start-up; [downgrade]
//! reverses the `other_category` migration.

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{Error, category::create_category_table, transaction::create_transaction_table};

/// The schema version that this build of the application expects.
pub const SCHEMA_VERSION: i64 = 2;

/// Initialize the database, creating the tables for the domain models and
/// running any pending schema migrations.
///
/// All schema changes are applied inside a single exclusive transaction,
/// so a fault leaves the database at the version it started with.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    if schema_version(&transaction)? == 0 {
        create_transaction_table(&transaction)?;
        create_category_table(&transaction)?;
        set_schema_version(&transaction, 1)?;
    }

    if schema_version(&transaction)? < 2 {
        transaction.execute("ALTER TABLE transactions ADD COLUMN other_category TEXT", ())?;
        set_schema_version(&transaction, 2)?;
    }

    transaction.commit()?;

    Ok(())
}

/// Reverse the migration that added the `other_category` column.
///
/// Does nothing if the database is already at version 1 or below.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn downgrade(connection: &Connection) -> Result<(), Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    if schema_version(&transaction)? >= 2 {
        transaction.execute("ALTER TABLE transactions DROP COLUMN other_category", ())?;
        set_schema_version(&transaction, 1)?;
    }

    transaction.commit()?;

    Ok(())
}

fn schema_version(connection: &Connection) -> Result<i64, Error> {
    connection
        .query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|error| error.into())
}

// PRAGMA statements do not support bound parameters.
fn set_schema_version(connection: &Connection, version: i64) -> Result<(), Error> {
    connection.execute_batch(&format!("PRAGMA user_version = {version}"))?;

    Ok(())
}
