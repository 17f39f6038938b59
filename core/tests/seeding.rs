//! End-to-end seeding against an in-memory SQLite stand-in.

use chrono::{TimeZone, Utc};
use timber_core::{
    documents::DocumentStatus,
    error::FixtureError,
    fixtures::{FixtureCatalogue, ProfileKind},
    seeder::{SeedReport, Seeder},
    store::{SeedStore, Table},
};

const SEED: u64 = 0xC0FF_EE00_1234_5678;

fn seed_once(store: &mut SeedStore, catalogue: &FixtureCatalogue, seed: u64) -> SeedReport {
    let now = Utc.with_ymd_and_hms(2025, 10, 15, 9, 30, 0).unwrap();
    let seeder = Seeder::new(catalogue, seed, now);
    store
        .transaction(|writer| seeder.run(writer))
        .expect("seeding run")
}

#[test]
fn avalanche_debts_sum_to_listed_balances() {
    let mut store = SeedStore::in_memory().expect("in-memory store");
    let catalogue = FixtureCatalogue::builtin();
    let report = seed_once(&mut store, &catalogue, SEED);

    let total = store.debt_total_for("test-user-avalanche").unwrap();
    assert_eq!(total, 8500.0 + 6200.0 + 4800.0 + 3200.0 + 12000.0);
    assert_eq!(total, 34_700.0);
    assert_eq!(
        report.profile(ProfileKind::Avalanche).unwrap().summary(),
        "Created Avalanche profile: $34,700 in debt"
    );
}

#[test]
fn first_run_writes_expected_row_counts() {
    let mut store = SeedStore::in_memory().unwrap();
    let catalogue = FixtureCatalogue::builtin();
    let report = seed_once(&mut store, &catalogue, SEED);

    assert_eq!(store.count_rows(Table::Users).unwrap(), 3);
    assert_eq!(store.count_rows(Table::FinancialProfiles).unwrap(), 3);
    assert_eq!(store.count_rows(Table::Debts).unwrap(), 5 + 7 + 2);
    assert_eq!(store.count_rows(Table::Assets).unwrap(), 3 + 2 + 7);
    assert_eq!(store.count_rows(Table::Documents).unwrap(), 8 + 12 + 25);
    assert_eq!(report.total_documents(), 45);

    assert_eq!(store.count_rows_for(Table::Documents, "test-user-healthy").unwrap(), 25);
    assert_eq!(store.count_rows_for(Table::Documents, "test-user-snowball").unwrap(), 12);
}

#[test]
fn rerun_upserts_users_but_duplicates_dependent_rows() {
    let mut store = SeedStore::in_memory().unwrap();
    let catalogue = FixtureCatalogue::builtin();
    seed_once(&mut store, &catalogue, SEED);
    seed_once(&mut store, &catalogue, SEED + 1);

    // Upserted on primary key: still one per test user.
    assert_eq!(store.count_rows(Table::Users).unwrap(), 3);
    assert_eq!(store.count_rows(Table::FinancialProfiles).unwrap(), 3);
    for user in &catalogue.users {
        assert_eq!(store.count_rows_for(Table::Users, &user.id).unwrap(), 1);
        assert_eq!(store.count_rows_for(Table::FinancialProfiles, &user.id).unwrap(), 1);
    }

    // Insert-only tables double.
    assert_eq!(store.count_rows(Table::Debts).unwrap(), 2 * 14);
    assert_eq!(store.count_rows(Table::Assets).unwrap(), 2 * 12);
    assert_eq!(store.count_rows(Table::Documents).unwrap(), 2 * 45);
    assert_eq!(store.debt_total_for("test-user-avalanche").unwrap(), 2.0 * 34_700.0);
}

#[test]
fn failed_run_leaves_no_partial_writes() {
    let mut store = SeedStore::in_memory().unwrap();
    let catalogue = FixtureCatalogue::builtin();

    let result: Result<(), FixtureError> = store.transaction(|writer| {
        writer.upsert_user(&catalogue.users[0])?;
        Err(FixtureError::Other(anyhow::anyhow!("simulated failure mid-run")))
    });
    assert!(result.is_err());
    assert_eq!(store.count_rows(Table::Users).unwrap(), 0);
}

#[test]
fn dependent_rows_require_a_seeded_user() {
    let mut store = SeedStore::in_memory().unwrap();
    let catalogue = FixtureCatalogue::builtin();
    let profile = catalogue.profile(ProfileKind::Snowball).unwrap().clone();

    let result = store.transaction(|writer| writer.insert_asset(&profile.user_id, &profile.assets[0]));
    assert!(matches!(result, Err(FixtureError::Database(_))));
    assert_eq!(store.count_rows(Table::Assets).unwrap(), 0);
}

#[test]
fn stored_statuses_come_from_the_fixed_set() {
    let mut store = SeedStore::in_memory().unwrap();
    let catalogue = FixtureCatalogue::builtin();
    seed_once(&mut store, &catalogue, SEED);

    let allowed: Vec<&str> = DocumentStatus::ALL.iter().map(|s| s.as_str()).collect();
    for user in &catalogue.users {
        for status in store.document_statuses_for(&user.id).unwrap() {
            assert!(allowed.contains(&status.as_str()), "unexpected status {status}");
        }
    }
}

#[test]
fn same_seed_produces_identical_documents() {
    let catalogue = FixtureCatalogue::builtin();
    let mut store_a = SeedStore::in_memory().unwrap();
    let mut store_b = SeedStore::in_memory().unwrap();
    let report_a = seed_once(&mut store_a, &catalogue, 42);
    let report_b = seed_once(&mut store_b, &catalogue, 42);

    assert_eq!(report_a, report_b);
    for user in &catalogue.users {
        assert_eq!(
            store_a.document_statuses_for(&user.id).unwrap(),
            store_b.document_statuses_for(&user.id).unwrap()
        );
    }
}

#[test]
fn invalid_catalogue_is_rejected_before_any_write() {
    let mut store = SeedStore::in_memory().unwrap();
    let mut catalogue = FixtureCatalogue::builtin();
    catalogue.profiles[1].status_weights =
        Some(timber_core::documents::StatusWeights::new(0.5, 0.5, 0.5, 0.0));

    let now = Utc::now();
    let seeder = Seeder::new(&catalogue, SEED, now);
    let result = store.transaction(|writer| seeder.run(writer));
    assert!(matches!(result, Err(FixtureError::InvalidCatalogue(_))));
    assert_eq!(store.count_rows(Table::Users).unwrap(), 0);
}

#[test]
fn catalogue_round_trips_through_json_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profiles.json");
    let catalogue = FixtureCatalogue::builtin();
    std::fs::write(&path, serde_json::to_string_pretty(&catalogue).unwrap()).unwrap();

    let loaded = FixtureCatalogue::load(&path).unwrap();
    assert_eq!(loaded.users, catalogue.users);
    for (a, b) in loaded.profiles.iter().zip(&catalogue.profiles) {
        assert_eq!(a.kind, b.kind);
        assert_eq!(a.debts.len(), b.debts.len());
        assert!((a.debt_total() - b.debt_total()).abs() < 1e-6);
        assert_eq!(a.document_count, b.document_count);
    }
}
