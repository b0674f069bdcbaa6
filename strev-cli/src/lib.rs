//! Library target for the `anistrev` package.
//!
//! The primary deliverable of this package is the `anistrev` CLI binary
//! (`src/main.rs`). This library exists so CI can run `cargo test -p anistrev --doc`
//! for feature/doctype validation.

#[doc(hidden)]
pub use platforms_parser;
