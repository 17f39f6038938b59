//! seed-timber-data: populate the Timber Money database with test users.
//!
//! Usage:
//!   DATABASE_URL=postgres://... seed-timber-data
//!   DATABASE_URL=sqlite:fixtures.db seed-timber-data --seed 12345
//!   DATABASE_URL=... seed-timber-data --fixtures custom_profiles.json

use anyhow::Result;
use chrono::Utc;
use std::{env, process};
use timber_core::{
    config::DatabaseTarget,
    fixtures::FixtureCatalogue,
    seeder::Seeder,
    store::SeedStore,
};
use timber_tools::{clock_seed, flag_value, parse_arg};

fn main() -> Result<()> {
    env_logger::init();

    let target = match DatabaseTarget::from_env() {
        Ok(target) => target,
        Err(e) => {
            println!("ERROR: {e}");
            process::exit(1);
        }
    };

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", clock_seed());
    let catalogue = match flag_value(&args, "--fixtures") {
        Some(path) => FixtureCatalogue::load(path)?,
        None => FixtureCatalogue::builtin(),
    };

    println!("🦫 Timber Money Database Seeder");
    println!("{}", "=".repeat(50));
    println!("  target: {}", target.redacted());
    println!("  seed:   {seed}");
    println!();

    let mut store = match SeedStore::connect(&target) {
        Ok(store) => store,
        Err(e) => {
            println!("Failed to connect to database: {e}");
            process::exit(1);
        }
    };

    let seeder = Seeder::new(&catalogue, seed, Utc::now());
    let report = match store.transaction(|writer| seeder.run(writer)) {
        Ok(report) => report,
        Err(e) => {
            println!("\n❌ Error seeding database: {e}");
            process::exit(1);
        }
    };

    println!("✅ Created {} test users", report.users_created);
    for profile in &report.profiles {
        println!("✅ {}", profile.summary());
    }
    for profile in &report.profiles {
        let breakdown: Vec<String> = profile
            .documents_by_status
            .iter()
            .map(|(status, n)| format!("{status}={n}"))
            .collect();
        println!(
            "✅ Created {} mock documents for {} ({})",
            profile.document_count,
            profile.user_id,
            breakdown.join(", ")
        );
    }

    println!();
    println!("{}", "=".repeat(50));
    println!("✅ Database seeding completed successfully!");
    println!();
    println!("Test Users Created:");
    for (i, user) in catalogue.users.iter().enumerate() {
        let blurb = catalogue
            .profiles
            .iter()
            .find(|p| p.user_id == user.id)
            .map(|p| profile_blurb(p.kind))
            .unwrap_or("custom profile");
        println!("{}. {} - {blurb}", i + 1, user.email);
    }
    println!();
    println!("🦫 Ready to test Timber Money!");
    Ok(())
}

fn profile_blurb(kind: timber_core::fixtures::ProfileKind) -> &'static str {
    use timber_core::fixtures::ProfileKind::*;
    match kind {
        Avalanche => "High credit card debt (Avalanche method)",
        Snowball => "Multiple small loans (Snowball method)",
        Healthy => "High savings, document volume",
    }
}
