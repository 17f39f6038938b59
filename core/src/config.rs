//! Environment-driven configuration for the three fixture tools.
//! In tests, use the `default_test()` constructors.

use crate::error::{FixtureError, FixtureResult};
use std::path::PathBuf;

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const AWS_REGION_VAR: &str = "AWS_REGION";
pub const RECEIPT_PATH_VAR: &str = "RECEIPT_PATH";
pub const RECEIPT_FONT_DIRS_VAR: &str = "RECEIPT_FONT_DIRS";

pub const DEFAULT_RECEIPT_PATH: &str = "/home/runner/workspace/sample_receipt.png";
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Font directories searched for the receipt font, in order.
pub const DEFAULT_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/TTF",
    "/usr/local/share/fonts",
    "/Library/Fonts",
];

/// Where the seeder writes. Parsed from `DATABASE_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    Postgres(String),
    Sqlite(String),
}

impl DatabaseTarget {
    pub fn from_env() -> FixtureResult<Self> {
        match std::env::var(DATABASE_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => Self::parse(&url),
            _ => Err(FixtureError::MissingEnv {
                name: DATABASE_URL_VAR,
            }),
        }
    }

    /// SQLite for `sqlite:` URLs, `:memory:` and `.db`/`.sqlite`/`.sqlite3`
    /// paths. Everything else must be a Postgres URL or libpq `key=value`
    /// string; anything unparseable is an error rather than a new file.
    pub fn parse(url: &str) -> FixtureResult<Self> {
        let url = url.trim();
        if url.starts_with("postgres://") || url.starts_with("postgresql://") {
            return Ok(Self::Postgres(url.to_string()));
        }
        if let Some(path) = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
        {
            return Ok(Self::Sqlite(path.to_string()));
        }
        if url.is_empty() {
            return Err(invalid_url("empty connection string".into()));
        }
        if url == ":memory:" || SQLITE_EXTENSIONS.iter().any(|ext| url.ends_with(ext)) {
            return Ok(Self::Sqlite(url.to_string()));
        }
        match url.parse::<postgres::Config>() {
            Ok(_) => Ok(Self::Postgres(url.to_string())),
            Err(e) => Err(invalid_url(format!(
                "not a SQLite path or Postgres connection string ({e})"
            ))),
        }
    }

    /// Connection string with any password masked, for log lines.
    pub fn redacted(&self) -> String {
        match self {
            Self::Sqlite(path) => format!("sqlite:{path}"),
            Self::Postgres(url) => match (url.find("://"), url.rfind('@')) {
                (Some(scheme_end), Some(at)) if at > scheme_end => {
                    let creds = &url[scheme_end + 3..at];
                    let user = creds.split(':').next().unwrap_or_default();
                    format!("{}{user}:***{}", &url[..scheme_end + 3], &url[at..])
                }
                (Some(_), _) => url.clone(),
                // libpq key=value form
                (None, _) => url
                    .split_whitespace()
                    .map(|pair| {
                        if pair.starts_with("password=") {
                            "password=***"
                        } else {
                            pair
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" "),
            },
        }
    }
}

const SQLITE_EXTENSIONS: &[&str] = &[".db", ".sqlite", ".sqlite3"];

fn invalid_url(reason: String) -> FixtureError {
    FixtureError::InvalidDatabaseUrl {
        var: DATABASE_URL_VAR,
        reason,
    }
}

#[derive(Debug, Clone)]
pub struct ReceiptConfig {
    pub output_path: PathBuf,
    pub font_file: String,
    pub font_dirs: Vec<PathBuf>,
    pub font_size: f32,
}

impl ReceiptConfig {
    pub fn from_env() -> Self {
        let mut font_dirs: Vec<PathBuf> = std::env::var(RECEIPT_FONT_DIRS_VAR)
            .map(|dirs| {
                dirs.split(':')
                    .filter(|d| !d.is_empty())
                    .map(PathBuf::from)
                    .collect()
            })
            .unwrap_or_default();
        font_dirs.extend(DEFAULT_FONT_DIRS.iter().map(PathBuf::from));
        Self {
            output_path: receipt_path_from_env(),
            font_file: "DejaVuSans-Bold.ttf".into(),
            font_dirs,
            font_size: 28.0,
        }
    }

    /// No font directories, so rendering always takes the bitmap fallback.
    pub fn default_test(output_path: PathBuf) -> Self {
        Self {
            output_path,
            font_file: "DejaVuSans-Bold.ttf".into(),
            font_dirs: Vec::new(),
            font_size: 28.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub region: String,
    pub image_path: PathBuf,
}

impl OcrConfig {
    pub fn from_env() -> Self {
        Self {
            region: std::env::var(AWS_REGION_VAR).unwrap_or_else(|_| DEFAULT_AWS_REGION.into()),
            image_path: receipt_path_from_env(),
        }
    }
}

fn receipt_path_from_env() -> PathBuf {
    std::env::var(RECEIPT_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_RECEIPT_PATH))
}
