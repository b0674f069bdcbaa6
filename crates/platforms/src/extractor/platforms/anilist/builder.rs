use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    extractor::{
        error::ExtractorError,
        platform_configs::AniListConfig,
        platform_extractor::Extractor,
        platforms::anilist::models::{GraphQlResponse, MediaData, PageData},
    },
    mapping::MetadataProvider,
    media::CatalogEntry,
};

const MEDIA_FIELDS: &str = r#"
id
idMal
title { romaji english native }
coverImage { extraLarge large }
bannerImage
description
seasonYear
format
status(version: 2)
episodes
duration
genres
synonyms
meanScore
popularity
"#;

/// AniList GraphQL client.
pub struct AniList {
    extractor: Extractor,
    endpoint: String,
}

impl AniList {
    pub fn new(client: Client, config: AniListConfig) -> Self {
        let mut extractor = Extractor::new("anilist", client);
        extractor.add_header_typed(reqwest::header::ACCEPT, "application/json");
        Self {
            extractor,
            endpoint: config.endpoint,
        }
    }

    fn media_query() -> String {
        format!("query ($id: Int) {{ Media(id: $id, type: ANIME) {{ {MEDIA_FIELDS} }} }}")
    }

    fn search_query() -> String {
        format!(
            "query ($page: Int, $perPage: Int, $search: String) {{ \
             Page(page: $page, perPage: $perPage) {{ \
             media(type: ANIME, search: $search) {{ {MEDIA_FIELDS} }} }} }}"
        )
    }

    async fn post_graphql<T: DeserializeOwned>(
        &self,
        query: String,
        variables: Value,
    ) -> Result<(StatusCode, GraphQlResponse<T>), ExtractorError> {
        let response = self
            .extractor
            .post(&self.endpoint)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, bytes = body.len(), "anilist response");

        let parsed: GraphQlResponse<T> = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                ExtractorError::decode("anilist response", e)
            } else {
                ExtractorError::RequestFailure {
                    url: self.endpoint.clone(),
                    reason: format!("HTTP {status}"),
                }
            }
        })?;
        Ok((status, parsed))
    }

    fn first_error<T>(response: &GraphQlResponse<T>) -> String {
        response
            .errors
            .first()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "empty response".to_string())
    }
}

#[async_trait]
impl MetadataProvider for AniList {
    async fn fetch_media(&self, id: &str) -> Result<CatalogEntry, ExtractorError> {
        let numeric_id: u64 = id
            .trim()
            .parse()
            .map_err(|_| ExtractorError::InvalidArgument(format!("anilist id '{id}'")))?;

        let (status, response) = self
            .post_graphql::<MediaData>(Self::media_query(), json!({ "id": numeric_id }))
            .await?;

        if status == StatusCode::NOT_FOUND {
            return Err(ExtractorError::NoMatchFound(format!("anilist media {id}")));
        }
        let message = Self::first_error(&response);
        match response.data.and_then(|d| d.media) {
            Some(media) => Ok(media.into()),
            None if status.is_success() => {
                Err(ExtractorError::NoMatchFound(format!("anilist media {id}")))
            }
            None => Err(ExtractorError::RequestFailure {
                url: self.endpoint.clone(),
                reason: format!("HTTP {status}: {message}"),
            }),
        }
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<CatalogEntry>, ExtractorError> {
        if query.trim().is_empty() {
            return Err(ExtractorError::InvalidArgument("empty search query".to_string()));
        }

        let (status, response) = self
            .post_graphql::<PageData>(
                Self::search_query(),
                json!({ "search": query, "page": page.max(1), "perPage": per_page.clamp(1, 50) }),
            )
            .await?;

        let message = Self::first_error(&response);
        match response.data {
            Some(data) => Ok(data.page.media.into_iter().map(CatalogEntry::from).collect()),
            None => Err(ExtractorError::RequestFailure {
                url: self.endpoint.clone(),
                reason: format!("HTTP {status}: {message}"),
            }),
        }
    }
}
