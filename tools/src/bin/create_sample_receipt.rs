//! create-sample-receipt: draw a fake store receipt for OCR testing.
//!
//! Usage:
//!   create-sample-receipt
//!   create-sample-receipt --out /tmp/sample_receipt.png

use anyhow::Result;
use std::env;
use timber_core::{config::ReceiptConfig, receipt::ReceiptRenderer};
use timber_tools::flag_value;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let mut config = ReceiptConfig::from_env();
    if let Some(out) = flag_value(&args, "--out") {
        config.output_path = out.into();
    }

    let renderer = ReceiptRenderer::from_config(&config);
    renderer.write_png(&config.output_path)?;
    println!("Wrote {}", config.output_path.display());
    Ok(())
}
