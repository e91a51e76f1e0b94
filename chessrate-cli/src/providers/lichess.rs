//! Lichess public profile client
//!
//! `GET {base}/api/user/{identifier}` → `perfs.bullet.rating`, `perfs.blitz.rating`

use super::{endpoint, get_json, settle, FetchError};
use crate::types::{Identifier, RatingPair, RatingProvider};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

const PROVIDER_NAME: &str = "Lichess";

/// Lichess user profile (only the fields we read)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LichessUser {
    perfs: LichessPerfs,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LichessPerfs {
    bullet: Option<LichessPerf>,
    blitz: Option<LichessPerf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LichessPerf {
    rating: Option<u32>,
}

impl LichessUser {
    fn into_ratings(self) -> RatingPair {
        RatingPair::new(
            self.perfs.bullet.and_then(|p| p.rating),
            self.perfs.blitz.and_then(|p| p.rating),
        )
    }
}

pub struct LichessProvider {
    http_client: reqwest::Client,
    base_url: String,
}

impl LichessProvider {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
        }
    }

    async fn lookup(&self, identifier: &Identifier) -> Result<RatingPair, FetchError> {
        let url = endpoint(&self.base_url, &["api", "user", identifier.as_str()])?;

        debug!(provider = PROVIDER_NAME, identifier = %identifier, url = %url, "Querying Lichess API");

        let user: LichessUser = get_json(self.http_client.get(url)).await?;
        Ok(user.into_ratings())
    }
}

#[async_trait]
impl RatingProvider for LichessProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn fetch_ratings(&self, identifier: &Identifier) -> RatingPair {
        let result = self.lookup(identifier).await;
        settle(PROVIDER_NAME, identifier.as_str(), result)
    }
}
