//! Anime catalog mapping and embed-player stream extraction.
//!
//! - [`extractor`] fetches provider pages and turns an embed-player URL into a
//!   [`media::StreamDescriptor`].
//! - [`mapping`] matches a metadata entry onto a streaming catalog and merges
//!   its subbed and dubbed episode lists.
//! - [`pkce`] holds the OAuth code-verifier helpers.

pub mod extractor;
pub mod mapping;
pub mod media;
pub mod pkce;

#[cfg(test)]
pub(crate) mod test_support;
