use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Postgres error: {0}")]
    Postgres(#[from] postgres::Error),

    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    #[error("invalid {var}: {reason}")]
    InvalidDatabaseUrl { var: &'static str, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("OCR request failed: {0}")]
    Ocr(String),

    #[error("{name} environment variable not set")]
    MissingEnv { name: &'static str },

    #[error("Invalid fixture catalogue: {0}")]
    InvalidCatalogue(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type FixtureResult<T> = Result<T, FixtureError>;
