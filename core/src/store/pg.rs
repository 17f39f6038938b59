//! Postgres writer for the live Timber Money database.
//!
//! Numeric parameters carry explicit casts so the bound Rust types line
//! up with whatever numeric/integer column types the app schema uses;
//! Postgres applies the assignment cast on insert.
//!
//! Hosted Postgres (Neon) only accepts TLS, so every connection goes
//! through rustls unless the URL says `sslmode=disable`.

use super::{DebtRow, FixtureWriter, CONNECT_TIMEOUT};
use crate::{
    documents::MockDocument,
    error::FixtureResult,
    fixtures::{AssetFixture, FinancialFixture, TestUser},
};
use log::debug;
use postgres::{config::SslMode, Client, NoTls, Transaction};
use rustls::{crypto::aws_lc_rs, ClientConfig, RootCertStore};
use std::sync::Arc;
use tokio_postgres_rustls::MakeRustlsConnect;

/// How the client negotiates transport security with the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsChoice {
    /// `sslmode=disable`: never send an SSLRequest.
    Plain,
    /// `prefer` (the default) or `require`: negotiate TLS through rustls.
    /// Under `prefer` a server that declines TLS still gets a plaintext
    /// session.
    Rustls,
}

impl TlsChoice {
    pub fn for_config(config: &postgres::Config) -> Self {
        match config.get_ssl_mode() {
            SslMode::Disable => Self::Plain,
            _ => Self::Rustls,
        }
    }
}

/// Connector trusting the Mozilla root set. The crypto provider is
/// named explicitly so it never depends on a process-wide default.
pub(super) fn rustls_connector() -> FixtureResult<MakeRustlsConnect> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let config = ClientConfig::builder_with_provider(Arc::new(aws_lc_rs::default_provider()))
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(MakeRustlsConnect::new(config))
}

/// Raw client for a Postgres URL, negotiating TLS per its `sslmode`.
pub fn connect(url: &str) -> FixtureResult<Client> {
    let mut config = url.parse::<postgres::Config>()?;
    config.connect_timeout(CONNECT_TIMEOUT);
    let client = match TlsChoice::for_config(&config) {
        TlsChoice::Plain => config.connect(NoTls)?,
        TlsChoice::Rustls => config.connect(rustls_connector()?)?,
    };
    Ok(client)
}

pub(super) fn document_statuses(client: &mut Client, user_id: &str) -> FixtureResult<Vec<String>> {
    let rows = client.query(
        "SELECT status::text FROM documents WHERE user_id = $1 ORDER BY id ASC",
        &[&user_id],
    )?;
    Ok(rows.iter().map(|row| row.get(0)).collect())
}

impl FixtureWriter for Transaction<'_> {
    fn upsert_user(&mut self, user: &TestUser) -> FixtureResult<()> {
        self.execute(
            "INSERT INTO users (
                id, email, first_name, last_name, subscription_plan, subscription_status,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                subscription_plan = EXCLUDED.subscription_plan,
                subscription_status = EXCLUDED.subscription_status,
                updated_at = NOW()",
            &[
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
            ) VALUES ($1, $2, $3, $4::float8, $5::float8, $6::float8, $7::float8, $8::int4,
                      NOW(), NOW())",
            &[
                &user_id,
                &debt.creditor,
                &debt.debt_type,
                &debt.current_balance,
                &debt.original_balance,
                &debt.apr,
                &debt.minimum_payment,
                &debt.due_date,
            ],
        )?;
        Ok(())
    }

    fn insert_asset(&mut self, user_id: &str, asset: &AssetFixture) -> FixtureResult<()> {
        self.execute(
            "INSERT INTO assets (user_id, name, asset_type, current_value, created_at, updated_at)
             VALUES ($1, $2, $3, $4::float8, NOW(), NOW())",
            &[&user_id, &asset.name, &asset.asset_type.as_str(), &asset.value],
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
             VALUES ($1, $2::float8, $3::int4, NOW())
             ON CONFLICT (user_id) DO UPDATE SET
                monthly_income = EXCLUDED.monthly_income,
                credit_score = EXCLUDED.credit_score,
                updated_at = NOW()",
            &[&user_id, &financial.monthly_income, &financial.credit_score],
        )?;
        Ok(())
    }

    fn insert_document(&mut self, user_id: &str, doc: &MockDocument) -> FixtureResult<()> {
        let analysis = doc.analysis_json()?;
        self.execute(
            "INSERT INTO documents (
                user_id, file_name, file_type, document_type, status,
                uploaded_at, analysis_data, size, pages, needs_review
            ) VALUES ($1, $2, $3, $4, $5, $6::timestamptz, $7, $8::int8, $9::int4, $10)",
            &[
                &user_id,
                &doc.file_name,
                &doc.file_type,
                &doc.document_type.as_str(),
                &doc.status.as_str(),
                &doc.uploaded_at,
                &analysis,
                &doc.size,
                &doc.pages,
                &doc.needs_review,
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choice(url: &str) -> TlsChoice {
        TlsChoice::for_config(&url.parse::<postgres::Config>().unwrap())
    }

    #[test]
    fn only_disable_skips_tls() {
        assert_eq!(choice("postgresql://u:p@db/neondb?sslmode=disable"), TlsChoice::Plain);
        assert_eq!(choice("host=localhost dbname=timber sslmode=disable"), TlsChoice::Plain);
    }

    #[test]
    fn require_and_default_negotiate_tls() {
        assert_eq!(choice("postgresql://u:p@db/neondb?sslmode=require"), TlsChoice::Rustls);
        assert_eq!(choice("postgresql://u:p@db/neondb?sslmode=prefer"), TlsChoice::Rustls);
        assert_eq!(choice("postgres://u:p@db/neondb"), TlsChoice::Rustls);
        assert_eq!(choice("host=db.example.com user=timber dbname=timber"), TlsChoice::Rustls);
    }

    #[test]
    fn connector_builds_with_bundled_roots() {
        assert!(rustls_connector().is_ok());
    }
}
