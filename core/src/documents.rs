//! Mock document generation.
//!
//! Each seeded user gets a batch of uploaded-document rows with a
//! processing status drawn from a per-profile distribution. Completed
//! statements and receipts carry a fake extraction payload so the app's
//! document views have something to render.

use crate::{
    error::{FixtureError, FixtureResult},
    fixtures::ProfileKind,
    rng::FixtureRng,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

pub const STATEMENT_VENDORS: &[&str] = &["Chase Bank", "Wells Fargo", "Bank of America", "Capital One"];

pub const TRANSACTION_DESCRIPTIONS: &[&str] = &[
    "Grocery Store",
    "Gas Station",
    "Restaurant",
    "Online Shopping",
    "Utility Bill",
    "Insurance Payment",
    "Subscription Service",
];

pub const RECEIPT_VENDORS: &[&str] = &[
    "Whole Foods",
    "Target",
    "Walmart",
    "Costco",
    "Home Depot",
    "Starbucks",
    "McDonald's",
    "Shell Gas",
    "CVS Pharmacy",
];

pub const RECEIPT_CATEGORIES: &[&str] = &["Foraging", "Building Material", "Obstacles"];

/// Chance that a completed document is still flagged for manual review.
pub const COMPLETED_REVIEW_PROBABILITY: f64 = 0.1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentType {
    BankStatement,
    CreditCard,
    Loan,
    Receipt,
    Invoice,
    Income,
}

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        Self::BankStatement,
        Self::CreditCard,
        Self::Loan,
        Self::Receipt,
        Self::Invoice,
        Self::Income,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BankStatement => "bank-statement",
            Self::CreditCard => "credit-card",
            Self::Loan => "loan",
            Self::Receipt => "receipt",
            Self::Invoice => "invoice",
            Self::Income => "income",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Completed,
    Processing,
    Failed,
    Pending,
}

impl DocumentStatus {
    pub const ALL: [DocumentStatus; 4] = [
        Self::Completed,
        Self::Processing,
        Self::Failed,
        Self::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Processing => "processing",
            Self::Failed => "failed",
            Self::Pending => "pending",
        }
    }
}

/// Probability of each processing status for one profile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct StatusWeights {
    pub completed: f64,
    pub processing: f64,
    pub failed: f64,
    pub pending: f64,
}

impl StatusWeights {
    pub fn for_profile(kind: ProfileKind) -> Self {
        match kind {
            // Mostly completed
            ProfileKind::Healthy => Self::new(0.80, 0.10, 0.05, 0.05),
            // Some processing/failed
            ProfileKind::Snowball => Self::new(0.60, 0.20, 0.15, 0.05),
            ProfileKind::Avalanche => Self::new(0.70, 0.15, 0.10, 0.05),
        }
    }

    pub fn new(completed: f64, processing: f64, failed: f64, pending: f64) -> Self {
        Self {
            completed,
            processing,
            failed,
            pending,
        }
    }

    pub fn total(&self) -> f64 {
        self.completed + self.processing + self.failed + self.pending
    }

    pub fn validate(&self) -> FixtureResult<()> {
        let weights = [self.completed, self.processing, self.failed, self.pending];
        if weights.iter().any(|w| *w < 0.0 || !w.is_finite()) {
            return Err(FixtureError::InvalidCatalogue(format!(
                "status weights must be non-negative: {self:?}"
            )));
        }
        if (self.total() - 1.0).abs() > 1e-9 {
            return Err(FixtureError::InvalidCatalogue(format!(
                "status weights sum to {}, expected 1.0",
                self.total()
            )));
        }
        Ok(())
    }

    /// Ordered (status, weight) pairs for weighted sampling.
    pub fn table(&self) -> [(DocumentStatus, f64); 4] {
        [
            (DocumentStatus::Completed, self.completed),
            (DocumentStatus::Processing, self.processing),
            (DocumentStatus::Failed, self.failed),
            (DocumentStatus::Pending, self.pending),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatementPeriod {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatementTransaction {
    pub date: String,
    pub description: String,
    pub amount: f64,
}

/// Fake extraction output attached to a completed document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DocumentAnalysis {
    Statement {
        total: f64,
        vendor: String,
        period: StatementPeriod,
        transactions: Vec<StatementTransaction>,
    },
    Receipt {
        total: f64,
        vendor: String,
        date: String,
        category: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockDocument {
    pub file_name: String,
    pub file_type: &'static str,
    pub document_type: DocumentType,
    pub status: DocumentStatus,
    pub uploaded_at: DateTime<Utc>,
    pub analysis: Option<DocumentAnalysis>,
    pub size: i64,
    pub pages: Option<i32>,
    pub needs_review: bool,
}

impl MockDocument {
    pub fn is_pdf(&self) -> bool {
        self.file_name.ends_with(".pdf")
    }

    pub fn analysis_json(&self) -> FixtureResult<Option<serde_json::Value>> {
        self.analysis
            .as_ref()
            .map(serde_json::to_value)
            .transpose()
            .map_err(Into::into)
    }
}

pub struct DocumentGenerator {
    weights: StatusWeights,
}

impl DocumentGenerator {
    pub fn new(weights: StatusWeights) -> Self {
        Self { weights }
    }

    pub fn for_profile(kind: ProfileKind) -> Self {
        Self::new(StatusWeights::for_profile(kind))
    }

    pub fn generate_batch(
        &self,
        rng: &mut FixtureRng,
        now: DateTime<Utc>,
        count: usize,
    ) -> Vec<MockDocument> {
        (0..count).map(|_| self.generate(rng, now)).collect()
    }

    pub fn generate(&self, rng: &mut FixtureRng, now: DateTime<Utc>) -> MockDocument {
        let document_type = *rng.choose(&DocumentType::ALL);
        let status = *rng.choose_weighted(&self.weights.table());

        let date_str = days_ago(now, rng.range_inclusive(1, 90))
            .format("%Y-%m-%d")
            .to_string();
        let file_name = match document_type {
            DocumentType::BankStatement => format!("bank_statement_{date_str}.pdf"),
            DocumentType::CreditCard => format!("cc_statement_{date_str}.pdf"),
            DocumentType::Loan => format!("loan_statement_{date_str}.pdf"),
            DocumentType::Receipt => format!("receipt_{date_str}.jpg"),
            DocumentType::Invoice => format!("invoice_{}.pdf", rng.range_inclusive(1000, 9999)),
            DocumentType::Income => format!("paystub_{date_str}.pdf"),
        };

        let analysis = if status == DocumentStatus::Completed {
            analysis_for(document_type, rng, now)
        } else {
            None
        };

        let uploaded_at = days_ago(now, rng.range_inclusive(0, 60));
        let is_pdf = file_name.ends_with(".pdf");
        let size = rng.range_inclusive(50_000, 5_000_000);
        let pages = is_pdf.then(|| rng.range_inclusive(1, 10) as i32);
        let needs_review = match status {
            DocumentStatus::Failed => true,
            DocumentStatus::Completed => rng.chance(COMPLETED_REVIEW_PROBABILITY),
            _ => false,
        };

        MockDocument {
            file_name,
            file_type: if is_pdf { "pdf" } else { "image" },
            document_type,
            status,
            uploaded_at,
            analysis,
            size,
            pages,
            needs_review,
        }
    }
}

fn analysis_for(
    document_type: DocumentType,
    rng: &mut FixtureRng,
    now: DateTime<Utc>,
) -> Option<DocumentAnalysis> {
    match document_type {
        DocumentType::BankStatement | DocumentType::CreditCard => {
            let total = round_cents(rng.uniform(500.0, 5000.0));
            let vendor = rng.choose(STATEMENT_VENDORS).to_string();
            let count = rng.range_inclusive(5, 15);
            let transactions = (0..count)
                .map(|_| StatementTransaction {
                    date: days_ago(now, rng.range_inclusive(1, 30)).to_rfc3339(),
                    description: rng.choose(TRANSACTION_DESCRIPTIONS).to_string(),
                    amount: round_cents(rng.uniform(10.0, 200.0)),
                })
                .collect();
            Some(DocumentAnalysis::Statement {
                total,
                vendor,
                period: StatementPeriod {
                    start: days_ago(now, 30).to_rfc3339(),
                    end: now.to_rfc3339(),
                },
                transactions,
            })
        }
        DocumentType::Receipt => Some(DocumentAnalysis::Receipt {
            total: round_cents(rng.uniform(10.0, 150.0)),
            vendor: rng.choose(RECEIPT_VENDORS).to_string(),
            date: days_ago(now, rng.range_inclusive(1, 30)).to_rfc3339(),
            category: rng.choose(RECEIPT_CATEGORIES).to_string(),
        }),
        DocumentType::Loan | DocumentType::Invoice | DocumentType::Income => None,
    }
}

fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, RngSlot};
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn builtin_weights_sum_to_one() {
        for kind in [ProfileKind::Avalanche, ProfileKind::Snowball, ProfileKind::Healthy] {
            let weights = StatusWeights::for_profile(kind);
            assert!((weights.total() - 1.0).abs() < 1e-9, "{kind:?}: {}", weights.total());
            weights.validate().unwrap();
        }
    }

    #[test]
    fn lopsided_weights_are_rejected() {
        assert!(StatusWeights::new(0.9, 0.2, 0.0, 0.0).validate().is_err());
        assert!(StatusWeights::new(1.2, -0.2, 0.0, 0.0).validate().is_err());
    }

    #[test]
    fn file_type_follows_extension() {
        let mut rng = RngBank::new(3).for_slot(RngSlot::Documents);
        let generator = DocumentGenerator::for_profile(ProfileKind::Snowball);
        for doc in generator.generate_batch(&mut rng, fixed_now(), 200) {
            if doc.is_pdf() {
                assert_eq!(doc.file_type, "pdf");
                assert!(matches!(doc.pages, Some(1..=10)));
            } else {
                assert_eq!(doc.file_type, "image");
                assert_eq!(doc.document_type, DocumentType::Receipt);
                assert_eq!(doc.pages, None);
            }
            assert!((50_000..=5_000_000).contains(&doc.size));
        }
    }

    #[test]
    fn receipt_payload_serializes_flat() {
        let analysis = DocumentAnalysis::Receipt {
            total: 12.34,
            vendor: "Target".into(),
            date: "2025-10-01T00:00:00+00:00".into(),
            category: "Foraging".into(),
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["total"], 12.34);
        assert_eq!(json["category"], "Foraging");
        assert!(json.get("Receipt").is_none());
    }

    #[test]
    fn round_cents_keeps_two_decimals() {
        assert_eq!(round_cents(12.345_6), 12.35);
        assert_eq!(round_cents(500.0), 500.0);
    }
}
