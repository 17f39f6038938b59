//! Synthetic receipt image for exercising the OCR path end to end.

use crate::{config::ReceiptConfig, error::FixtureResult};
use ab_glyph::FontVec;
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::{drawing::draw_filled_rect_mut, drawing::draw_text_mut, rect::Rect};
use log::{info, warn};
use std::path::{Path, PathBuf};

pub const RECEIPT_WIDTH: u32 = 800;
pub const RECEIPT_HEIGHT: u32 = 600;
pub const LEFT_MARGIN: i32 = 30;
pub const TOP_MARGIN: i32 = 20;

/// Each pixel of the 8x8 fallback glyphs becomes a 3x3 block.
pub const BITMAP_SCALE: u32 = 3;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

/// Receipt lines and the vertical gap that follows each one.
pub const RECEIPT_LINES: &[(&str, i32)] = &[
    ("SAMPLE STORE", 50),
    ("123 Main St", 35),
    ("Anytown, USA", 35),
    ("Date: 2025-10-15", 50),
    ("Item A       $5.00", 35),
    ("Item B       $7.34", 35),
    ("----------------------", 35),
    ("TOTAL:       $12.34", 50),
    ("Thank you!", 0),
];

pub enum ReceiptFont {
    TrueType { path: PathBuf, font: FontVec },
    Bitmap,
}

impl ReceiptFont {
    /// First readable `font_file` in `font_dirs`, else the bitmap font.
    pub fn resolve(config: &ReceiptConfig) -> Self {
        for dir in &config.font_dirs {
            let path = dir.join(&config.font_file);
            if !path.is_file() {
                continue;
            }
            match std::fs::read(&path).map(FontVec::try_from_vec) {
                Ok(Ok(font)) => return Self::TrueType { path, font },
                Ok(Err(e)) => warn!("{} is not a usable font: {e}", path.display()),
                Err(e) => warn!("cannot read {}: {e}", path.display()),
            }
        }
        warn!("{} not found, using built-in bitmap font", config.font_file);
        Self::Bitmap
    }

    pub fn describe(&self) -> String {
        match self {
            Self::TrueType { path, .. } => path.display().to_string(),
            Self::Bitmap => "built-in 8x8 bitmap".into(),
        }
    }
}

pub struct ReceiptRenderer {
    font: ReceiptFont,
    font_size: f32,
}

impl ReceiptRenderer {
    pub fn new(font: ReceiptFont, font_size: f32) -> Self {
        Self { font, font_size }
    }

    pub fn from_config(config: &ReceiptConfig) -> Self {
        Self::new(ReceiptFont::resolve(config), config.font_size)
    }

    pub fn font(&self) -> &ReceiptFont {
        &self.font
    }

    pub fn render(&self) -> RgbImage {
        let mut img = RgbImage::from_pixel(RECEIPT_WIDTH, RECEIPT_HEIGHT, WHITE);
        let mut y = TOP_MARGIN;
        for (text, gap) in RECEIPT_LINES {
            self.draw_line(&mut img, LEFT_MARGIN, y, text);
            y += gap;
        }
        img
    }

    fn draw_line(&self, img: &mut RgbImage, x: i32, y: i32, text: &str) {
        match &self.font {
            ReceiptFont::TrueType { font, .. } => {
                draw_text_mut(img, BLACK, x, y, self.font_size, font, text);
            }
            ReceiptFont::Bitmap => draw_bitmap_text(img, x, y, text),
        }
    }

    /// Render and write a PNG, creating parent directories as needed.
    pub fn write_png(&self, path: &Path) -> FixtureResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        self.render().save_with_format(path, ImageFormat::Png)?;
        info!("wrote receipt to {} using {}", path.display(), self.font.describe());
        Ok(())
    }
}

fn draw_bitmap_text(img: &mut RgbImage, x: i32, y: i32, text: &str) {
    let cell = BITMAP_SCALE;
    let advance = 8 * cell as i32;
    for (i, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch) else {
            continue;
        };
        let gx = x + i as i32 * advance;
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..8 {
                // bit 0 is the leftmost pixel
                if bits & (1u8 << col) == 0 {
                    continue;
                }
                let rect = Rect::at(gx + col * cell as i32, y + row as i32 * cell as i32)
                    .of_size(cell, cell);
                draw_filled_rect_mut(img, rect, BLACK);
            }
        }
    }
}
