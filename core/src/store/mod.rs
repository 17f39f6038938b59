//! Database persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The seeder calls FixtureWriter methods — it never executes SQL directly.
//!
//! Two backends sit behind the same writer trait: the app's Postgres
//! database, and a local SQLite file that stands in for it.

mod pg;
mod sqlite;

pub use pg::{connect as connect_postgres, TlsChoice};

use crate::{
    config::DatabaseTarget,
    documents::MockDocument,
    error::FixtureResult,
    fixtures::{AssetFixture, FinancialFixture, TestUser},
};
use log::{info, warn};
use rusqlite::Connection;
use std::time::Duration;

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A debt with its per-run values (original balance, due day) resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct DebtRow {
    pub creditor: String,
    pub debt_type: &'static str,
    pub current_balance: f64,
    pub original_balance: f64,
    pub apr: f64,
    pub minimum_payment: f64,
    pub due_date: i32,
}

/// Row-level writes the seeder performs inside one transaction.
pub trait FixtureWriter {
    /// Insert or refresh a user keyed on `id`.
    fn upsert_user(&mut self, user: &TestUser) -> FixtureResult<()>;

    /// Insert-only; a re-run adds another row.
    fn insert_debt(&mut self, user_id: &str, debt: &DebtRow) -> FixtureResult<()>;

    /// Insert-only; a re-run adds another row.
    fn insert_asset(&mut self, user_id: &str, asset: &AssetFixture) -> FixtureResult<()>;

    /// Insert or refresh the financial summary keyed on `user_id`.
    fn upsert_financial_profile(
        &mut self,
        user_id: &str,
        financial: &FinancialFixture,
    ) -> FixtureResult<()>;

    /// Insert-only; a re-run adds another row.
    fn insert_document(&mut self, user_id: &str, doc: &MockDocument) -> FixtureResult<()>;
}

/// Tables the seeder writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Users,
    Debts,
    Assets,
    FinancialProfiles,
    Documents,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Debts => "debts",
            Self::Assets => "assets",
            Self::FinancialProfiles => "financial_profiles",
            Self::Documents => "documents",
        }
    }
}

enum Backend {
    Sqlite(Connection),
    Postgres(Box<postgres::Client>),
}

pub struct SeedStore {
    backend: Backend,
}

impl SeedStore {
    /// Open a connection to the target. SQLite targets are migrated;
    /// the Postgres schema belongs to the app and is left alone.
    pub fn connect(target: &DatabaseTarget) -> FixtureResult<Self> {
        info!("connecting to {}", target.redacted());
        let store = match target {
            DatabaseTarget::Sqlite(path) => Self {
                backend: Backend::Sqlite(sqlite::open(path)?),
            },
            DatabaseTarget::Postgres(url) => Self {
                backend: Backend::Postgres(Box::new(pg::connect(url)?)),
            },
        };
        store.migrate()?;
        Ok(store)
    }

    /// Open a migrated in-memory SQLite database (used in tests).
    pub fn in_memory() -> FixtureResult<Self> {
        let store = Self {
            backend: Backend::Sqlite(sqlite::open(":memory:")?),
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Sqlite(_) => "sqlite",
            Backend::Postgres(_) => "postgres",
        }
    }

    /// Apply the local schema. No-op for Postgres.
    pub fn migrate(&self) -> FixtureResult<()> {
        if let Backend::Sqlite(conn) = &self.backend {
            conn.execute_batch(include_str!("../../../migrations/001_timber_schema.sql"))?;
        }
        Ok(())
    }

    /// Run `f` inside a single transaction. Commits once when `f`
    /// succeeds; rolls everything back when it fails.
    pub fn transaction<T>(
        &mut self,
        f: impl FnOnce(&mut dyn FixtureWriter) -> FixtureResult<T>,
    ) -> FixtureResult<T> {
        match &mut self.backend {
            Backend::Sqlite(conn) => {
                let mut tx = conn.transaction()?;
                match f(&mut tx) {
                    Ok(out) => {
                        tx.commit()?;
                        Ok(out)
                    }
                    Err(e) => {
                        warn!("rolling back sqlite transaction: {e}");
                        tx.rollback()?;
                        Err(e)
                    }
                }
            }
            Backend::Postgres(client) => {
                let mut tx = client.transaction()?;
                match f(&mut tx) {
                    Ok(out) => {
                        tx.commit()?;
                        Ok(out)
                    }
                    Err(e) => {
                        warn!("rolling back postgres transaction: {e}");
                        tx.rollback()?;
                        Err(e)
                    }
                }
            }
        }
    }

    pub fn count_rows(&mut self, table: Table) -> FixtureResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", table.as_str());
        match &mut self.backend {
            Backend::Sqlite(conn) => Ok(conn.query_row(&sql, [], |row| row.get(0))?),
            Backend::Postgres(client) => Ok(client.query_one(sql.as_str(), &[])?.get(0)),
        }
    }

    pub fn count_rows_for(&mut self, table: Table, user_id: &str) -> FixtureResult<i64> {
        let column = match table {
            Table::Users => "id",
            _ => "user_id",
        };
        match &mut self.backend {
            Backend::Sqlite(conn) => {
                let sql = format!("SELECT COUNT(*) FROM {} WHERE {column} = ?1", table.as_str());
                Ok(conn.query_row(&sql, [user_id], |row| row.get(0))?)
            }
            Backend::Postgres(client) => {
                let sql = format!("SELECT COUNT(*) FROM {} WHERE {column} = $1", table.as_str());
                Ok(client.query_one(sql.as_str(), &[&user_id])?.get(0))
            }
        }
    }

    /// Sum of `current_balance` over every debt row for a user.
    pub fn debt_total_for(&mut self, user_id: &str) -> FixtureResult<f64> {
        match &mut self.backend {
            Backend::Sqlite(conn) => Ok(conn.query_row(
                "SELECT COALESCE(SUM(current_balance), 0.0) FROM debts WHERE user_id = ?1",
                [user_id],
                |row| row.get(0),
            )?),
            Backend::Postgres(client) => Ok(client
                .query_one(
                    "SELECT COALESCE(SUM(current_balance), 0)::float8 FROM debts WHERE user_id = $1",
                    &[&user_id],
                )?
                .get(0)),
        }
    }

    /// Document statuses for a user, in insertion order.
    pub fn document_statuses_for(&mut self, user_id: &str) -> FixtureResult<Vec<String>> {
        match &mut self.backend {
            Backend::Sqlite(conn) => sqlite::document_statuses(conn, user_id),
            Backend::Postgres(client) => pg::document_statuses(client, user_id),
        }
    }
}
