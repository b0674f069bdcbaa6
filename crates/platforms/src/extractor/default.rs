use super::error::ExtractorError;
use super::factory::ExtractorFactory;
use super::platform_configs::PlatformConfigs;
use super::platform_extractor::{Extractor, PageFetcher};
use reqwest::Client;
use rustls::{ClientConfig, crypto::aws_lc_rs};
use rustls_platform_verifier::BuilderVerifierExt;
use std::{sync::Arc, time::Duration};

pub(crate) const DEFAULT_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub fn default_client() -> Result<Client, ExtractorError> {
    client_with_timeout(DEFAULT_TIMEOUT)
}

pub fn client_with_timeout(timeout: Duration) -> Result<Client, ExtractorError> {
    let provider = Arc::new(aws_lc_rs::default_provider());
    let tls_config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| ExtractorError::InvalidArgument(format!("tls protocol versions: {e}")))?
        .with_platform_verifier()
        .map_err(|e| ExtractorError::InvalidArgument(format!("tls verifier: {e}")))?
        .with_no_client_auth();

    Ok(Client::builder()
        .use_preconfigured_tls(tls_config)
        .timeout(timeout)
        .build()?)
}

/// Returns a new `ExtractorFactory` backed by the default client and the
/// built-in player secrets.
pub fn default_factory() -> Result<ExtractorFactory, ExtractorError> {
    let fetcher: Arc<dyn PageFetcher> = Arc::new(Extractor::new("gogocdn", default_client()?));
    Ok(ExtractorFactory::new(fetcher, PlatformConfigs::default()))
}
