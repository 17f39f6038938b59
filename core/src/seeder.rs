//! Seeding run: users first, then each profile's debts, assets and
//! financial summary, then the mock documents.
//!
//! Execution order is fixed so that every dependent row references a
//! user inserted earlier in the same transaction.

use crate::{
    documents::{DocumentGenerator, DocumentStatus},
    error::FixtureResult,
    fixtures::{FixtureCatalogue, ProfileFixture, ProfileKind},
    rng::{FixtureRng, RngBank, RngSlot},
    store::{DebtRow, FixtureWriter},
};
use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileReport {
    pub user_id: String,
    pub kind: ProfileKind,
    pub debt_count: usize,
    pub debt_total: f64,
    pub asset_count: usize,
    pub asset_total: f64,
    pub document_count: usize,
    pub documents_by_status: BTreeMap<&'static str, usize>,
}

impl ProfileReport {
    /// One-line confirmation in the wording testers are used to.
    pub fn summary(&self) -> String {
        match self.kind {
            ProfileKind::Avalanche => format!(
                "Created Avalanche profile: {} in debt",
                format_dollars(self.debt_total)
            ),
            ProfileKind::Snowball => format!(
                "Created Snowball profile: {} debts totaling {}",
                self.debt_count,
                format_dollars(self.debt_total)
            ),
            ProfileKind::Healthy => format!(
                "Created Healthy profile: {} in assets",
                format_dollars(self.asset_total)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedReport {
    pub seed: u64,
    pub users_created: usize,
    pub profiles: Vec<ProfileReport>,
}

impl SeedReport {
    pub fn profile(&self, kind: ProfileKind) -> Option<&ProfileReport> {
        self.profiles.iter().find(|p| p.kind == kind)
    }

    pub fn total_documents(&self) -> usize {
        self.profiles.iter().map(|p| p.document_count).sum()
    }
}

pub struct Seeder<'a> {
    catalogue: &'a FixtureCatalogue,
    rng_bank: RngBank,
    now: DateTime<Utc>,
}

impl<'a> Seeder<'a> {
    pub fn new(catalogue: &'a FixtureCatalogue, seed: u64, now: DateTime<Utc>) -> Self {
        Self {
            catalogue,
            rng_bank: RngBank::new(seed),
            now,
        }
    }

    pub fn run(&self, writer: &mut dyn FixtureWriter) -> FixtureResult<SeedReport> {
        self.catalogue.validate()?;

        info!("creating {} test users", self.catalogue.users.len());
        for user in &self.catalogue.users {
            writer.upsert_user(user)?;
        }

        let mut debt_rng = self.rng_bank.for_slot(RngSlot::Debts);
        let mut profiles = Vec::with_capacity(self.catalogue.profiles.len());
        for profile in &self.catalogue.profiles {
            profiles.push(self.seed_profile(writer, profile, &mut debt_rng)?);
        }

        let mut doc_rng = self.rng_bank.for_slot(RngSlot::Documents);
        for (profile, report) in self.catalogue.profiles.iter().zip(profiles.iter_mut()) {
            self.seed_documents(writer, profile, report, &mut doc_rng)?;
        }

        Ok(SeedReport {
            seed: self.rng_bank.master_seed(),
            users_created: self.catalogue.users.len(),
            profiles,
        })
    }

    fn seed_profile(
        &self,
        writer: &mut dyn FixtureWriter,
        profile: &ProfileFixture,
        rng: &mut FixtureRng,
    ) -> FixtureResult<ProfileReport> {
        info!("creating {} profile for {}", profile.kind.label(), profile.user_id);

        for debt in &profile.debts {
            let row = DebtRow {
                creditor: debt.creditor.clone(),
                debt_type: debt.debt_type.as_str(),
                current_balance: debt.balance,
                original_balance: debt.balance * profile.original_balance_factor,
                apr: debt.apr,
                minimum_payment: debt.min_payment,
                due_date: rng.range_inclusive(1, 28) as i32,
            };
            debug!("{}: debt {} due day {}", profile.user_id, row.creditor, row.due_date);
            writer.insert_debt(&profile.user_id, &row)?;
        }

        for asset in &profile.assets {
            writer.insert_asset(&profile.user_id, asset)?;
        }

        writer.upsert_financial_profile(&profile.user_id, &profile.financial)?;

        Ok(ProfileReport {
            user_id: profile.user_id.clone(),
            kind: profile.kind,
            debt_count: profile.debts.len(),
            debt_total: profile.debt_total(),
            asset_count: profile.assets.len(),
            asset_total: profile.asset_total(),
            document_count: 0,
            documents_by_status: BTreeMap::new(),
        })
    }

    fn seed_documents(
        &self,
        writer: &mut dyn FixtureWriter,
        profile: &ProfileFixture,
        report: &mut ProfileReport,
        rng: &mut FixtureRng,
    ) -> FixtureResult<()> {
        info!(
            "creating {} mock documents for {}",
            profile.document_count, profile.user_id
        );
        let generator = DocumentGenerator::new(profile.weights());
        for doc in generator.generate_batch(rng, self.now, profile.document_count) {
            writer.insert_document(&profile.user_id, &doc)?;
            *report
                .documents_by_status
                .entry(doc.status.as_str())
                .or_insert(0) += 1;
        }
        report.document_count = profile.document_count;
        debug!(
            "{}: {} completed of {}",
            profile.user_id,
            report
                .documents_by_status
                .get(DocumentStatus::Completed.as_str())
                .copied()
                .unwrap_or(0),
            report.document_count
        );
        Ok(())
    }
}

/// `34700.0` → `$34,700`. Whole dollars, thousands separated.
pub fn format_dollars(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dollars_are_grouped() {
        assert_eq!(format_dollars(34_700.0), "$34,700");
        assert_eq!(format_dollars(619_500.0), "$619,500");
        assert_eq!(format_dollars(850.0), "$850");
        assert_eq!(format_dollars(1_234_567.4), "$1,234,567");
        assert_eq!(format_dollars(-1200.0), "-$1,200");
    }
}
