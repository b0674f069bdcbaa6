pub mod error;
pub mod factory;
pub mod hls_extractor;
pub mod platform_configs;
pub mod platform_extractor;
pub mod platforms;
pub mod utils;
mod default;

pub use default::{client_with_timeout, default_client, default_factory};
