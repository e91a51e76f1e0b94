//! Rating service clients
//!
//! Each provider implements [`RatingProvider`] for one service. Requests go
//! through [`get_json`], which returns a typed [`FetchError`]; the provider
//! folds that into a [`RatingPair`] at its boundary so callers only ever see
//! data.
//!
//! # Providers
//! 1. **lichess** - public profile endpoint, `perfs.{bullet,blitz}.rating`
//! 2. **chesscom** - public stats endpoint, `chess_{bullet,blitz}.last.rating`

pub mod chesscom;
pub mod lichess;

pub use chesscom::ChessComProvider;
pub use lichess::LichessProvider;

use crate::types::{RatingPair, RatingProvider, PLAYER_NOT_FOUND};
use chessrate_common::config::Settings;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a single lookup failed
#[derive(Debug, Error)]
pub enum FetchError {
    /// Any non-200 answer; both services use it for unknown players
    #[error("{}", PLAYER_NOT_FOUND)]
    NotFound { status: StatusCode },

    /// DNS, connect, timeout or a bad base URL
    #[error("{0}")]
    Transport(String),

    /// 200 with a body that is not the expected JSON
    #[error("{0}")]
    Decode(String),
}

impl FetchError {
    /// An unknown handle is an ordinary answer; everything else is a fault
    pub fn is_fault(&self) -> bool {
        !matches!(self, FetchError::NotFound { .. })
    }
}

/// Build the HTTP client shared by all providers
pub fn build_http_client(settings: &Settings) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(settings.timeout)
        .build()
}

/// Lichess and Chess.com providers configured from settings
pub fn default_providers(
    client: reqwest::Client,
    settings: &Settings,
) -> (Arc<dyn RatingProvider>, Arc<dyn RatingProvider>) {
    let lichess = LichessProvider::new(client.clone(), settings.lichess_base_url.as_str());
    let chesscom = ChessComProvider::new(
        client,
        settings.chesscom_base_url.as_str(),
        settings.user_agent.as_str(),
    );
    (Arc::new(lichess), Arc::new(chesscom))
}

/// Append path segments to a base URL, escaping each segment
pub(crate) fn endpoint(base_url: &str, segments: &[&str]) -> Result<Url, FetchError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| FetchError::Transport(format!("invalid base URL {}: {}", base_url, e)))?;

    url.path_segments_mut()
        .map_err(|_| FetchError::Transport(format!("base URL cannot take a path: {}", base_url)))?
        .pop_if_empty()
        .extend(segments);

    Ok(url)
}

/// One GET, no retry. Only status 200 counts as success.
pub(crate) async fn get_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, FetchError> {
    let response = request
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::NotFound { status });
    }

    response
        .json::<T>()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))
}

/// Collapse a lookup result into the in-band pair the caller sees
pub(crate) fn settle(
    provider: &'static str,
    identifier: &str,
    result: Result<RatingPair, FetchError>,
) -> RatingPair {
    match result {
        Ok(pair) => {
            debug!(provider, identifier, ?pair, "Ratings retrieved");
            pair
        }
        Err(e) => {
            if e.is_fault() {
                warn!(provider, identifier, error = %e, "Player lookup failed");
            } else {
                info!(provider, identifier, error = %e, "Player lookup rejected");
            }
            RatingPair::failed(e.to_string())
        }
    }
}
