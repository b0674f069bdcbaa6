mod builder;
pub mod models;

pub use builder::{GogoCdn, URL_REGEX};
