use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ManifestError {
    #[error("invalid {attribute} value `{value}` on line {line}")]
    InvalidAttribute {
        attribute: &'static str,
        value: String,
        line: usize,
    },

    #[error("no quality variants found in master playlist")]
    NoVariantsFound,

    #[error("unparsable playlist: {reason}")]
    Unparsable { reason: String },
}
