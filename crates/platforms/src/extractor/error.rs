use cbc_codec::CodecError;
use hls::ManifestError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("http error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("request to {url} failed: {reason}")]
    RequestFailure { url: String, reason: String },
    #[error("failed to decode {stage}: {reason}")]
    DecodeFailure { stage: &'static str, reason: String },
    #[error("crypto failure while {stage}: {source}")]
    CryptoFailure {
        stage: &'static str,
        #[source]
        source: CodecError,
    },
    #[error("failed to parse manifest {url}: {source}")]
    ParseFailure {
        url: String,
        #[source]
        source: ManifestError,
    },
    #[error("no match found for {0}")]
    NoMatchFound(String),
    #[error("no content: {0}")]
    NoContent(String),
    #[error("unsupported extractor")]
    UnsupportedExtractor,
}

/// Coarse classification of an [`ExtractorError`] for callers that report
/// failures over a status-code oriented surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    BadRequest,
    NotFound,
    BadGateway,
    Internal,
}

impl StatusClass {
    pub fn code(self) -> u16 {
        match self {
            StatusClass::BadRequest => 400,
            StatusClass::NotFound => 404,
            StatusClass::BadGateway => 502,
            StatusClass::Internal => 500,
        }
    }
}

impl ExtractorError {
    pub fn decode(stage: &'static str, reason: impl ToString) -> Self {
        ExtractorError::DecodeFailure {
            stage,
            reason: reason.to_string(),
        }
    }

    pub fn crypto(stage: &'static str, source: CodecError) -> Self {
        ExtractorError::CryptoFailure { stage, source }
    }

    pub fn status_class(&self) -> StatusClass {
        match self {
            ExtractorError::InvalidArgument(_) | ExtractorError::UnsupportedExtractor => {
                StatusClass::BadRequest
            }
            ExtractorError::NoMatchFound(_) | ExtractorError::NoContent(_) => StatusClass::NotFound,
            ExtractorError::HttpError(_) | ExtractorError::RequestFailure { .. } => {
                StatusClass::BadGateway
            }
            ExtractorError::DecodeFailure { .. }
            | ExtractorError::CryptoFailure { .. }
            | ExtractorError::ParseFailure { .. } => StatusClass::Internal,
        }
    }
}
