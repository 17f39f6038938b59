//! Seeding against a live Postgres server.
//!
//! Runs only when `TIMBER_TEST_PG_URL` points at a disposable database;
//! the five seeded tables are dropped and recreated on every run.

use chrono::{DateTime, TimeZone, Utc};
use std::error::Error;
use timber_core::{
    config::DatabaseTarget,
    documents::DocumentGenerator,
    fixtures::{FixtureCatalogue, ProfileKind},
    rng::{RngBank, RngSlot},
    seeder::{SeedReport, Seeder},
    store::{connect_postgres, SeedStore, Table},
};

const PG_URL_VAR: &str = "TIMBER_TEST_PG_URL";

/// Column types follow the app's schema: numeric money columns, integer
/// day/score/size columns, jsonb analysis payloads.
const APP_SCHEMA: &str = "
DROP TABLE IF EXISTS documents, financial_profiles, assets, debts, users CASCADE;
CREATE TABLE users (
    id varchar PRIMARY KEY,
    email varchar UNIQUE,
    first_name varchar,
    last_name varchar,
    subscription_plan varchar,
    subscription_status varchar,
    created_at timestamp DEFAULT now(),
    updated_at timestamp DEFAULT now()
);
CREATE TABLE debts (
    id serial PRIMARY KEY,
    user_id varchar NOT NULL REFERENCES users(id),
    creditor varchar NOT NULL,
    debt_type varchar NOT NULL,
    current_balance numeric(12, 2) NOT NULL,
    original_balance numeric(12, 2),
    apr numeric(5, 2) NOT NULL,
    minimum_payment numeric(10, 2),
    due_date integer,
    created_at timestamp,
    updated_at timestamp
);
CREATE TABLE assets (
    id serial PRIMARY KEY,
    user_id varchar NOT NULL REFERENCES users(id),
    name varchar NOT NULL,
    asset_type varchar NOT NULL,
    current_value numeric(14, 2) NOT NULL,
    created_at timestamp,
    updated_at timestamp
);
CREATE TABLE financial_profiles (
    id serial PRIMARY KEY,
    user_id varchar NOT NULL UNIQUE REFERENCES users(id),
    monthly_income numeric(12, 2),
    credit_score integer,
    updated_at timestamp
);
CREATE TABLE documents (
    id serial PRIMARY KEY,
    user_id varchar NOT NULL REFERENCES users(id),
    file_name text NOT NULL,
    file_type text,
    document_type text,
    status text NOT NULL,
    uploaded_at timestamp,
    analysis_data jsonb,
    size integer,
    pages integer,
    needs_review boolean DEFAULT false
);
";

fn pg_url() -> Option<String> {
    match std::env::var(PG_URL_VAR) {
        Ok(url) if !url.trim().is_empty() => Some(url),
        _ => {
            eprintln!("skipping: {PG_URL_VAR} not set");
            None
        }
    }
}

fn run_clock() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 15, 9, 30, 0).unwrap()
}

fn seed_once(store: &mut SeedStore, catalogue: &FixtureCatalogue, seed: u64) -> SeedReport {
    let seeder = Seeder::new(catalogue, seed, run_clock());
    store
        .transaction(|writer| seeder.run(writer))
        .expect("seeding run")
}

/// Statuses the seeder generates for `kind` under `seed`, in write order.
fn expected_statuses(catalogue: &FixtureCatalogue, seed: u64, kind: ProfileKind) -> Vec<String> {
    let mut rng = RngBank::new(seed).for_slot(RngSlot::Documents);
    let mut wanted = Vec::new();
    for profile in &catalogue.profiles {
        let docs = DocumentGenerator::new(profile.weights()).generate_batch(
            &mut rng,
            run_clock(),
            profile.document_count,
        );
        if profile.kind == kind {
            wanted = docs.iter().map(|d| d.status.as_str().to_string()).collect();
        }
    }
    wanted
}

#[test]
fn postgres_rerun_upserts_users_but_duplicates_dependent_rows() -> Result<(), Box<dyn Error>> {
    let Some(url) = pg_url() else {
        return Ok(());
    };
    connect_postgres(&url)?.batch_execute(APP_SCHEMA)?;

    let target = DatabaseTarget::parse(&url)?;
    let mut store = SeedStore::connect(&target)?;
    assert_eq!(store.backend_name(), "postgres");

    let catalogue = FixtureCatalogue::builtin();
    let first = seed_once(&mut store, &catalogue, 7);
    assert_eq!(first.total_documents(), 45);
    assert_eq!(store.count_rows(Table::Debts)?, 14);
    assert_eq!(store.count_rows(Table::Assets)?, 12);
    assert_eq!(store.count_rows(Table::Documents)?, 45);
    assert_eq!(store.debt_total_for("test-user-avalanche")?, 34_700.0);

    seed_once(&mut store, &catalogue, 8);

    assert_eq!(store.count_rows(Table::Users)?, 3);
    assert_eq!(store.count_rows(Table::FinancialProfiles)?, 3);
    for user in &catalogue.users {
        assert_eq!(store.count_rows_for(Table::Users, &user.id)?, 1);
        assert_eq!(store.count_rows_for(Table::FinancialProfiles, &user.id)?, 1);
    }
    assert_eq!(store.count_rows(Table::Debts)?, 2 * 14);
    assert_eq!(store.count_rows(Table::Assets)?, 2 * 12);
    assert_eq!(store.count_rows(Table::Documents)?, 2 * 45);
    assert_eq!(store.debt_total_for("test-user-avalanche")?, 2.0 * 34_700.0);

    // Rows come back in insertion order: first run, then second run.
    let mut wanted = expected_statuses(&catalogue, 7, ProfileKind::Healthy);
    wanted.extend(expected_statuses(&catalogue, 8, ProfileKind::Healthy));
    assert_eq!(wanted.len(), 2 * 25);
    assert_eq!(store.document_statuses_for("test-user-healthy")?, wanted);
    Ok(())
}
