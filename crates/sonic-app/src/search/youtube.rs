//! YouTube Data API v3 search client

use anyhow::Context;
use serde::Deserialize;
use sonic_proto::config::SearchConfig;
use sonic_proto::error::ProviderError;
use sonic_proto::protocol::Track;
use std::time::Duration;

/// `search.list` response.  Only the fields we map are modelled; everything
/// an item needs is required so schema drift fails loudly on ingress.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    error: Option<ApiError>,
    items: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: ItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct ItemId {
    #[serde(rename = "videoId")]
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(rename = "channelTitle")]
    channel_title: String,
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl SearchItem {
    fn into_track(self) -> Result<Track, ProviderError> {
        let Thumbnails { high, default } = self.snippet.thumbnails;
        let cover = high.or(default).map(|t| t.url).ok_or_else(|| {
            ProviderError::Malformed(format!("item {} has no thumbnail", self.id.video_id))
        })?;

        Ok(Track {
            id: self.id.video_id.clone(),
            title: self.snippet.title,
            artist: self.snippet.channel_title,
            album_cover_url: cover,
            youtube_id: Some(self.id.video_id),
            audio_url: None,
        })
    }
}

#[derive(Debug, Clone)]
pub struct YoutubeClient {
    client: reqwest::Client,
    endpoint: String,
    api_key_env: String,
    max_results: u32,
    query_suffix: String,
}

impl YoutubeClient {
    pub fn new(config: &SearchConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key_env: config.api_key_env.clone(),
            max_results: config.max_results,
            query_suffix: config.query_suffix.clone(),
        })
    }

    fn api_key(&self) -> Result<String, ProviderError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingCredential(self.api_key_env.clone()))
    }

    /// One `GET` against the search endpoint.  `query` must already be
    /// trimmed and non-empty.
    pub async fn search(&self, query: &str) -> Result<Vec<Track>, ProviderError> {
        let key = self.api_key()?;
        let q = if self.query_suffix.is_empty() {
            query.to_string()
        } else {
            format!("{} {}", query, self.query_suffix)
        };
        let max_results = self.max_results.to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .query(&[
                ("part", "snippet"),
                ("maxResults", max_results.as_str()),
                ("q", q.as_str()),
                ("type", "video"),
                ("key", key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        parse_search_response(status, &body)
    }
}

/// Validate and map a provider response body.
pub fn parse_search_response(status: u16, body: &[u8]) -> Result<Vec<Track>, ProviderError> {
    let success = (200..300).contains(&status);

    let parsed: SearchResponse = match serde_json::from_slice(body) {
        Ok(parsed) => parsed,
        Err(_) if !success => return Err(ProviderError::Status(status)),
        Err(e) => return Err(ProviderError::Malformed(e.to_string())),
    };

    if let Some(err) = parsed.error {
        let message = if err.message.is_empty() {
            "unknown error".to_string()
        } else {
            err.message
        };
        return Err(ProviderError::Reported {
            code: err.code,
            message,
        });
    }

    if !success {
        return Err(ProviderError::Status(status));
    }

    parsed
        .items
        .ok_or(ProviderError::NoResults)?
        .into_iter()
        .map(SearchItem::into_track)
        .collect()
}
