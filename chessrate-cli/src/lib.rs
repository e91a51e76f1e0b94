//! chessrate library interface
//!
//! Exposes the providers, the pairing pipeline and the renderers so the
//! binary and the integration tests share one implementation.

pub mod input;
pub mod pipeline;
pub mod providers;
pub mod render;
pub mod types;

pub use crate::pipeline::{PairingPipeline, PipelineReport};
pub use crate::types::{
    Identifier, IdentifierPair, RatingPair, RatingProvider, RatingValue, ResultRow,
};

use chessrate_common::config::Settings;

/// Pipeline wired to the real services (or whatever base URLs the settings name)
pub fn build_pipeline(settings: &Settings) -> reqwest::Result<PairingPipeline> {
    let client = providers::build_http_client(settings)?;
    let (lichess, chesscom) = providers::default_providers(client, settings);
    Ok(PairingPipeline::new(lichess, chesscom)
        .with_max_concurrent_pairs(settings.max_concurrent_pairs))
}
