//! Test user catalogue: the three Timber Money personas and the debts,
//! assets and financial summary each one is seeded with.
//!
//! The built-in catalogue mirrors what the app's QA checklist expects.
//! Custom catalogues can be loaded from JSON with the same shape.

use crate::{
    documents::StatusWeights,
    error::{FixtureError, FixtureResult},
};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Avalanche,
    Snowball,
    Healthy,
}

impl ProfileKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Avalanche => "Avalanche",
            Self::Snowball => "Snowball",
            Self::Healthy => "Healthy",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DebtType {
    CreditCard,
    Loan,
    Mortgage,
}

impl DebtType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "credit-card",
            Self::Loan => "loan",
            Self::Mortgage => "mortgage",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Savings,
    Vehicle,
    Property,
    Investment,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Savings => "savings",
            Self::Vehicle => "vehicle",
            Self::Property => "property",
            Self::Investment => "investment",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub subscription_plan: String,
    pub subscription_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebtFixture {
    pub creditor: String,
    pub balance: f64,
    pub apr: f64,
    pub min_payment: f64,
    pub debt_type: DebtType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssetFixture {
    pub name: String,
    pub asset_type: AssetType,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FinancialFixture {
    pub monthly_income: f64,
    pub credit_score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileFixture {
    pub user_id: String,
    pub kind: ProfileKind,
    /// Multiplier applied to `balance` to fake an original loan amount.
    pub original_balance_factor: f64,
    pub debts: Vec<DebtFixture>,
    pub assets: Vec<AssetFixture>,
    pub financial: FinancialFixture,
    pub document_count: usize,
    /// Defaults to the per-kind weights when omitted from a JSON catalogue.
    #[serde(default)]
    pub status_weights: Option<StatusWeights>,
}

impl ProfileFixture {
    pub fn debt_total(&self) -> f64 {
        self.debts.iter().map(|d| d.balance).sum()
    }

    pub fn asset_total(&self) -> f64 {
        self.assets.iter().map(|a| a.value).sum()
    }

    pub fn weights(&self) -> StatusWeights {
        self.status_weights
            .unwrap_or_else(|| StatusWeights::for_profile(self.kind))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixtureCatalogue {
    pub users: Vec<TestUser>,
    pub profiles: Vec<ProfileFixture>,
}

impl FixtureCatalogue {
    /// Load a catalogue from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> FixtureResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            FixtureError::InvalidCatalogue(format!("cannot read {}: {e}", path.display()))
        })?;
        let catalogue: Self = serde_json::from_str(&content)?;
        catalogue.validate()?;
        Ok(catalogue)
    }

    pub fn validate(&self) -> FixtureResult<()> {
        let user_ids: HashSet<&str> = self.users.iter().map(|u| u.id.as_str()).collect();
        if user_ids.len() != self.users.len() {
            return Err(FixtureError::InvalidCatalogue("duplicate user id".into()));
        }
        for profile in &self.profiles {
            if !user_ids.contains(profile.user_id.as_str()) {
                return Err(FixtureError::InvalidCatalogue(format!(
                    "profile references unknown user '{}'",
                    profile.user_id
                )));
            }
            profile.weights().validate()?;
        }
        Ok(())
    }

    pub fn profile(&self, kind: ProfileKind) -> Option<&ProfileFixture> {
        self.profiles.iter().find(|p| p.kind == kind)
    }

    pub fn builtin() -> Self {
        Self {
            users: vec![
                user(
                    "test-user-avalanche",
                    "avalanche@timbermoney.test",
                    "Alex",
                    "Avalanche",
                    "pro_monthly",
                ),
                user(
                    "test-user-snowball",
                    "snowball@timbermoney.test",
                    "Sam",
                    "Snowball",
                    "free",
                ),
                user(
                    "test-user-healthy",
                    "healthy@timbermoney.test",
                    "Harper",
                    "Healthy",
                    "family_monthly",
                ),
            ],
            profiles: vec![avalanche(), snowball(), healthy()],
        }
    }
}

fn user(id: &str, email: &str, first: &str, last: &str, plan: &str) -> TestUser {
    TestUser {
        id: id.into(),
        email: email.into(),
        first_name: first.into(),
        last_name: last.into(),
        subscription_plan: plan.into(),
        subscription_status: "active".into(),
    }
}

fn debt(creditor: &str, balance: f64, apr: f64, min_payment: f64, debt_type: DebtType) -> DebtFixture {
    DebtFixture {
        creditor: creditor.into(),
        balance,
        apr,
        min_payment,
        debt_type,
    }
}

fn asset(name: &str, asset_type: AssetType, value: f64) -> AssetFixture {
    AssetFixture {
        name: name.into(),
        asset_type,
        value,
    }
}

/// High credit card debt, for avalanche-method testing.
fn avalanche() -> ProfileFixture {
    use AssetType::*;
    use DebtType::*;
    ProfileFixture {
        user_id: "test-user-avalanche".into(),
        kind: ProfileKind::Avalanche,
        original_balance_factor: 1.5,
        debts: vec![
            debt("Chase Sapphire", 8500.0, 24.99, 255.0, CreditCard),
            debt("Capital One Venture", 6200.0, 21.49, 186.0, CreditCard),
            debt("Discover It", 4800.0, 19.99, 144.0, CreditCard),
            debt("Citi Double Cash", 3200.0, 18.24, 96.0, CreditCard),
            debt("Personal Loan", 12000.0, 12.50, 350.0, Loan),
        ],
        assets: vec![
            asset("Checking Account", Savings, 2500.0),
            asset("Emergency Fund", Savings, 1000.0),
            asset("2015 Honda Civic", Vehicle, 8000.0),
        ],
        financial: FinancialFixture {
            monthly_income: 4500.0,
            credit_score: 620,
        },
        document_count: 8,
        status_weights: None,
    }
}

/// Many small loans, for snowball-method testing.
fn snowball() -> ProfileFixture {
    use AssetType::*;
    use DebtType::*;
    ProfileFixture {
        user_id: "test-user-snowball".into(),
        kind: ProfileKind::Snowball,
        original_balance_factor: 1.3,
        debts: vec![
            debt("Medical Bill - Hospital", 850.0, 0.0, 50.0, Loan),
            debt("Store Credit - Best Buy", 1200.0, 26.99, 50.0, CreditCard),
            debt("Payday Loan", 500.0, 399.00, 150.0, Loan),
            debt("Credit Card - Target", 680.0, 22.99, 35.0, CreditCard),
            debt("Student Loan", 15000.0, 5.50, 180.0, Loan),
            debt("Car Loan", 8500.0, 7.25, 285.0, Loan),
            debt("Furniture Financing", 1800.0, 0.0, 75.0, Loan),
        ],
        assets: vec![
            asset("Checking Account", Savings, 800.0),
            asset("2018 Toyota Corolla", Vehicle, 12000.0),
        ],
        financial: FinancialFixture {
            monthly_income: 3200.0,
            credit_score: 580,
        },
        document_count: 12,
        status_weights: None,
    }
}

/// High savings and a large document volume.
fn healthy() -> ProfileFixture {
    use AssetType::*;
    use DebtType::*;
    ProfileFixture {
        user_id: "test-user-healthy".into(),
        kind: ProfileKind::Healthy,
        original_balance_factor: 1.1,
        debts: vec![
            debt("Mortgage", 185000.0, 3.75, 1200.0, Mortgage),
            debt("Chase Sapphire Reserve", 1200.0, 18.99, 50.0, CreditCard),
        ],
        assets: vec![
            asset("Primary Residence", Property, 350000.0),
            asset("401(k)", Investment, 125000.0),
            asset("Roth IRA", Investment, 45000.0),
            asset("Brokerage Account", Investment, 28000.0),
            asset("Emergency Fund", Savings, 25000.0),
            asset("Checking Account", Savings, 8500.0),
            asset("2022 Tesla Model 3", Vehicle, 38000.0),
        ],
        financial: FinancialFixture {
            monthly_income: 9500.0,
            credit_score: 780,
        },
        document_count: 25,
        status_weights: None,
    }
}
