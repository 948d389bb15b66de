//! Search gateway: free-text query in, ordered track candidates out.
//!
//! Each call issues at most one provider request.  No retries, no caching.
//! Errors are returned to the caller; the app core turns them into an empty
//! result set plus a notification.

pub mod fixture;
pub mod youtube;

#[cfg(test)]
mod tests;

use sonic_proto::config::{ProviderKind, SearchConfig};
use sonic_proto::error::ProviderError;
use sonic_proto::fixtures;
use sonic_proto::protocol::Track;
use tracing::debug;

use self::fixture::FixtureSearch;
use self::youtube::YoutubeClient;

#[derive(Debug, Clone)]
pub enum SearchProvider {
    Youtube(YoutubeClient),
    Fixture(FixtureSearch),
}

/// Cheap to clone; each search runs in its own task with its own copy.
#[derive(Debug, Clone)]
pub struct SearchGateway {
    provider: SearchProvider,
}

impl SearchGateway {
    pub fn new(provider: SearchProvider) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &SearchConfig) -> anyhow::Result<Self> {
        let provider = match config.provider {
            ProviderKind::Youtube => SearchProvider::Youtube(YoutubeClient::new(config)?),
            ProviderKind::Fixture => SearchProvider::Fixture(FixtureSearch::new(
                fixtures::search_tracks(),
                config.max_results as usize,
            )),
        };
        Ok(Self::new(provider))
    }

    pub fn provider_name(&self) -> &'static str {
        match self.provider {
            SearchProvider::Youtube(_) => "youtube",
            SearchProvider::Fixture(_) => "fixture",
        }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Track>, ProviderError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Searching {} for {:?}", self.provider_name(), query);
        match &self.provider {
            SearchProvider::Youtube(client) => client.search(query).await,
            SearchProvider::Fixture(fixture) => Ok(fixture.search(query)),
        }
    }
}
