pub mod config;
pub mod documents;
pub mod error;
pub mod fixtures;
pub mod ocr;
pub mod receipt;
pub mod rng;
pub mod seeder;
pub mod store;
