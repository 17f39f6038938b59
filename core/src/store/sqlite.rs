use super::{DebtRow, FixtureWriter};
use crate::{
    documents::MockDocument,
    error::FixtureResult,
    fixtures::{AssetFixture, FinancialFixture, TestUser},
};
use log::debug;
use rusqlite::{params, Connection, OpenFlags, Transaction};

pub(super) fn open(path: &str) -> FixtureResult<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE | OpenFlags::SQLITE_OPEN_URI,
    )?;
    // WAL mode only for real files (:memory: ignores it).
    let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub(super) fn document_statuses(conn: &Connection, user_id: &str) -> FixtureResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT status FROM documents WHERE user_id = ?1 ORDER BY id ASC")?;
    let rows = stmt.query_map(params![user_id], |row| row.get(0))?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

impl FixtureWriter for Transaction<'_> {
    fn upsert_user(&mut self, user: &TestUser) -> FixtureResult<()> {
        self.execute(
            "INSERT INTO users (
                id, email, first_name, last_name, subscription_plan, subscription_status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)
            ON CONFLICT (id) DO UPDATE SET
                email = excluded.email,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                subscription_plan = excluded.subscription_plan,
                subscription_status = excluded.subscription_status,
                updated_at = CURRENT_TIMESTAMP",
            params![
                &user.id,
                &user.email,
                &user.first_name,
                &user.last_name,
                &user.subscription_plan,
                &user.subscription_status,
            ],
        )?;
        debug!("upserted user {}", user.id);
        Ok(())
    }

    fn insert_debt(&mut self, user_id: &str, debt: &DebtRow) -> FixtureResult<()> {
        self.execute(
            "INSERT INTO debts (
                user_id, creditor, debt_type, current_balance, original_balance, apr,
                minimum_payment, due_date, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            params![
                user_id,
                &debt.creditor,
                debt.debt_type,
                debt.current_balance,
                debt.original_balance,
                debt.apr,
                debt.minimum_payment,
                debt.due_date,
            ],
        )?;
        Ok(())
    }

    fn insert_asset(&mut self, user_id: &str, asset: &AssetFixture) -> FixtureResult<()> {
        self.execute(
            "INSERT INTO assets (user_id, name, asset_type, current_value, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, CURRENT_TIMESTAMP, CURRENT_TIMESTAMP)",
            params![user_id, &asset.name, asset.asset_type.as_str(), asset.value],
        )?;
        Ok(())
    }

    fn upsert_financial_profile(
        &mut self,
        user_id: &str,
        financial: &FinancialFixture,
    ) -> FixtureResult<()> {
        self.execute(
            "INSERT INTO financial_profiles (user_id, monthly_income, credit_score, updated_at)
             VALUES (?1, ?2, ?3, CURRENT_TIMESTAMP)
             ON CONFLICT (user_id) DO UPDATE SET
                monthly_income = excluded.monthly_income,
                credit_score = excluded.credit_score,
                updated_at = CURRENT_TIMESTAMP",
            params![user_id, financial.monthly_income, financial.credit_score],
        )?;
        Ok(())
    }

    fn insert_document(&mut self, user_id: &str, doc: &MockDocument) -> FixtureResult<()> {
        self.execute(
            "INSERT INTO documents (
                user_id, file_name, file_type, document_type, status,
                uploaded_at, analysis_data, size, pages, needs_review
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                user_id,
                &doc.file_name,
                doc.file_type,
                doc.document_type.as_str(),
                doc.status.as_str(),
                doc.uploaded_at,
                doc.analysis_json()?,
                doc.size,
                doc.pages,
                doc.needs_review,
            ],
        )?;
        Ok(())
    }
}
