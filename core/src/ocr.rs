//! Textract smoke check: send the sample receipt to DetectDocumentText
//! and report the LINE blocks that come back.

use crate::{
    config::OcrConfig,
    error::{FixtureError, FixtureResult},
};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_textract::{
    error::DisplayErrorContext,
    primitives::Blob,
    types::{BlockType, Document},
    Client,
};
use log::{debug, info};
use std::{
    io::Write,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::runtime::Runtime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Page,
    Line,
    Word,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub kind: BlockKind,
    pub text: Option<String>,
}

/// Anything that can turn image bytes into detection blocks.
pub trait TextDetector {
    fn detect_document_text(&self, image: &[u8]) -> FixtureResult<Vec<TextBlock>>;
}

/// Blocking wrapper over the async Textract client.
pub struct TextractDetector {
    client: Client,
    runtime: Option<Arc<Runtime>>,
}

impl Drop for TextractDetector {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            let _ = std::thread::spawn(move || drop(runtime));
        }
    }
}

impl TextractDetector {
    pub fn new(config: &OcrConfig) -> FixtureResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let region = config.region.clone();
        let shared_config = runtime.block_on(async {
            aws_config::defaults(BehaviorVersion::latest())
                .region(Region::new(region))
                .load()
                .await
        });
        info!("textract client ready in {}", config.region);
        Ok(Self {
            client: Client::new(&shared_config),
            runtime: Some(Arc::new(runtime)),
        })
    }
}

impl TextDetector for TextractDetector {
    fn detect_document_text(&self, image: &[u8]) -> FixtureResult<Vec<TextBlock>> {
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| FixtureError::Ocr("textract runtime closed".into()))?;
        let document = Document::builder().bytes(Blob::new(image)).build();
        let output = runtime
            .block_on(self.client.detect_document_text().document(document).send())
            .map_err(|err| FixtureError::Ocr(DisplayErrorContext(&err).to_string()))?;
        let blocks = output
            .blocks()
            .iter()
            .map(|block| TextBlock {
                kind: match block.block_type() {
                    Some(BlockType::Page) => BlockKind::Page,
                    Some(BlockType::Line) => BlockKind::Line,
                    Some(BlockType::Word) => BlockKind::Word,
                    _ => BlockKind::Other,
                },
                text: block.text().map(str::to_string),
            })
            .collect::<Vec<_>>();
        debug!("textract returned {} blocks", blocks.len());
        Ok(blocks)
    }
}

/// Text of every LINE block, in response order. Missing text becomes "".
pub fn line_texts(blocks: &[TextBlock]) -> Vec<String> {
    blocks
        .iter()
        .filter(|b| b.kind == BlockKind::Line)
        .map(|b| b.text.clone().unwrap_or_default())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrOutcome {
    MissingInput(PathBuf),
    Extracted(Vec<String>),
    Failed(String),
}

impl OcrOutcome {
    pub fn render(&self, out: &mut impl Write) -> std::io::Result<()> {
        match self {
            Self::MissingInput(path) => writeln!(out, "Missing test file: {}", path.display()),
            Self::Failed(message) => writeln!(out, "ERROR: {message}"),
            Self::Extracted(lines) => {
                let rule = "-".repeat(40);
                writeln!(out, "SUCCESS: Textract returned {} lines", lines.len())?;
                writeln!(out)?;
                writeln!(out, "Extracted text:")?;
                writeln!(out, "{rule}")?;
                for line in lines {
                    writeln!(out, "{line}")?;
                }
                writeln!(out, "{rule}")
            }
        }
    }
}

/// Check the image exists, then build a detector and run it.
/// `make_detector` is never called for a missing input, so no client
/// is created and no request leaves the machine.
pub fn verify_image<D, F>(path: &Path, make_detector: F) -> OcrOutcome
where
    D: TextDetector,
    F: FnOnce() -> FixtureResult<D>,
{
    if !path.exists() {
        return OcrOutcome::MissingInput(path.to_path_buf());
    }
    let result = make_detector().and_then(|detector| {
        let bytes = std::fs::read(path)?;
        detector.detect_document_text(&bytes)
    });
    match result {
        Ok(blocks) => OcrOutcome::Extracted(line_texts(&blocks)),
        Err(e) => OcrOutcome::Failed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(kind: BlockKind, text: Option<&str>) -> TextBlock {
        TextBlock {
            kind,
            text: text.map(str::to_string),
        }
    }

    #[test]
    fn only_line_blocks_are_kept() {
        let blocks = vec![
            block(BlockKind::Page, None),
            block(BlockKind::Line, Some("SAMPLE STORE")),
            block(BlockKind::Word, Some("SAMPLE")),
            block(BlockKind::Line, None),
            block(BlockKind::Line, Some("TOTAL: $12.34")),
        ];
        assert_eq!(line_texts(&blocks), vec!["SAMPLE STORE", "", "TOTAL: $12.34"]);
    }

    #[test]
    fn extracted_render_frames_lines() {
        let outcome = OcrOutcome::Extracted(vec!["A".into(), "B".into()]);
        let mut buf = Vec::new();
        outcome.render(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let rule = "-".repeat(40);
        assert_eq!(
            text,
            format!("SUCCESS: Textract returned 2 lines\n\nExtracted text:\n{rule}\nA\nB\n{rule}\n")
        );
    }

    #[test]
    fn failure_renders_error_prefix() {
        let mut buf = Vec::new();
        OcrOutcome::Failed("no credentials".into())
            .render(&mut buf)
            .unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "ERROR: no credentials\n");
    }
}
