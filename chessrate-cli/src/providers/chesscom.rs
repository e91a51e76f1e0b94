//! Chess.com public stats client
//!
//! `GET {base}/pub/player/{identifier}/stats` → `chess_bullet.last.rating`,
//! `chess_blitz.last.rating`. The identifier is lowercased before the path is
//! built, and a User-Agent header is always attached; the service rejects
//! anonymous clients.

use super::{endpoint, get_json, settle, FetchError};
use crate::types::{Identifier, RatingPair, RatingProvider};
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::debug;

const PROVIDER_NAME: &str = "Chess.com";

/// Player stats (only the fields we read)
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChessComStats {
    chess_bullet: Option<ChessComMode>,
    chess_blitz: Option<ChessComMode>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChessComMode {
    last: Option<ChessComRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ChessComRecord {
    rating: Option<u32>,
}

impl ChessComMode {
    fn last_rating(self) -> Option<u32> {
        self.last.and_then(|l| l.rating)
    }
}

impl ChessComStats {
    fn into_ratings(self) -> RatingPair {
        RatingPair::new(
            self.chess_bullet.and_then(ChessComMode::last_rating),
            self.chess_blitz.and_then(ChessComMode::last_rating),
        )
    }
}

pub struct ChessComProvider {
    http_client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl ChessComProvider {
    pub fn new(
        http_client: reqwest::Client,
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.into(),
            user_agent: user_agent.into(),
        }
    }

    async fn lookup(&self, identifier: &Identifier) -> Result<RatingPair, FetchError> {
        let folded = identifier.case_folded();
        let url = endpoint(&self.base_url, &["pub", "player", folded.as_str(), "stats"])?;

        debug!(provider = PROVIDER_NAME, identifier = %folded, url = %url, "Querying Chess.com API");

        let request = self
            .http_client
            .get(url)
            .header(USER_AGENT, self.user_agent.as_str());
        let stats: ChessComStats = get_json(request).await?;
        Ok(stats.into_ratings())
    }
}

#[async_trait]
impl RatingProvider for ChessComProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    async fn fetch_ratings(&self, identifier: &Identifier) -> RatingPair {
        let result = self.lookup(identifier).await;
        settle(PROVIDER_NAME, identifier.as_str(), result)
    }
}
