use cbc_codec::CodecError;
use hls::ManifestError;
use platforms_parser::extractor::error::ExtractorError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read configuration: {0}")]
    ConfigRead(#[from] toml::de::Error),

    #[error("failed to write configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CliError>;
