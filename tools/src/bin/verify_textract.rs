//! verify-textract: check AWS Textract can read the sample receipt.
//!
//! Usage:
//!   AWS_REGION=us-east-1 verify-textract
//!   verify-textract --image ./sample_receipt.png

use anyhow::Result;
use std::{env, io};
use timber_core::{
    config::OcrConfig,
    ocr::{verify_image, TextractDetector},
};
use timber_tools::flag_value;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = OcrConfig::from_env();
    if let Some(path) = flag_value(&args, "--image") {
        config.image_path = path.into();
    }

    let outcome = verify_image(&config.image_path, || TextractDetector::new(&config));
    outcome.render(&mut io::stdout().lock())?;
    Ok(())
}
