use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Ciphertext could not be base64 decoded or is not block aligned.
    #[error("malformed ciphertext: {reason}")]
    MalformedCiphertext { reason: String },

    #[error("invalid padding: {reason}")]
    InvalidPadding { reason: &'static str },

    /// Key or IV length rejected by the block cipher.
    #[error("cipher initialization failed: {reason}")]
    CipherInit { reason: String },
}

impl CodecError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedCiphertext {
            reason: reason.into(),
        }
    }
}
