//! Pairing pipeline
//!
//! Turns two comma-separated handle lists into ordered [`ResultRow`]s:
//! normalize → pair by position → resolve both providers per pair → assemble.
//!
//! The pipeline never fails. Provider problems show up as sentinel cells and
//! empty input shows up as an empty row list.

use crate::types::{Identifier, IdentifierPair, RatingProvider, ResultRow};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Split on commas, trim, drop empty tokens. Order is preserved.
pub fn parse_identifiers(raw: &str) -> Vec<Identifier> {
    raw.split(',').filter_map(Identifier::parse).collect()
}

/// Positional pairing of the two lists plus whatever was left over
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairing {
    pub pairs: Vec<IdentifierPair>,
    /// Lichess handles past the end of the Chess.com list
    pub unpaired_lichess: Vec<Identifier>,
    /// Chess.com handles past the end of the Lichess list
    pub unpaired_chesscom: Vec<Identifier>,
}

impl Pairing {
    pub fn is_balanced(&self) -> bool {
        self.unpaired_lichess.is_empty() && self.unpaired_chesscom.is_empty()
    }
}

/// Pair `lichess[i]` with `chesscom[i]` for i < min(len)
pub fn pair_identifiers(lichess: Vec<Identifier>, chesscom: Vec<Identifier>) -> Pairing {
    let n = lichess.len().min(chesscom.len());

    let mut lichess = lichess.into_iter();
    let mut chesscom = chesscom.into_iter();

    let pairs = lichess
        .by_ref()
        .zip(chesscom.by_ref())
        .take(n)
        .map(|(l, c)| IdentifierPair::new(l, c))
        .collect();

    Pairing {
        pairs,
        unpaired_lichess: lichess.collect(),
        unpaired_chesscom: chesscom.collect(),
    }
}

/// Rows plus the handles that had no counterpart
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub rows: Vec<ResultRow>,
    pub unpaired_lichess: Vec<Identifier>,
    pub unpaired_chesscom: Vec<Identifier>,
}

impl PipelineReport {
    pub fn has_unpaired(&self) -> bool {
        !self.unpaired_lichess.is_empty() || !self.unpaired_chesscom.is_empty()
    }
}

pub struct PairingPipeline {
    lichess: Arc<dyn RatingProvider>,
    chesscom: Arc<dyn RatingProvider>,
    max_concurrent_pairs: usize,
}

impl PairingPipeline {
    pub fn new(lichess: Arc<dyn RatingProvider>, chesscom: Arc<dyn RatingProvider>) -> Self {
        Self {
            lichess,
            chesscom,
            max_concurrent_pairs: 1,
        }
    }

    /// Allow up to `limit` pairs in flight at once (minimum 1)
    pub fn with_max_concurrent_pairs(mut self, limit: usize) -> Self {
        self.max_concurrent_pairs = limit.max(1);
        self
    }

    /// Names of the Lichess-side and Chess.com-side providers
    pub fn provider_names(&self) -> (&'static str, &'static str) {
        (self.lichess.name(), self.chesscom.name())
    }

    /// Parse, pair and resolve two raw lists. Surplus handles are dropped.
    pub async fn run(&self, raw_lichess: &str, raw_chesscom: &str) -> Vec<ResultRow> {
        self.run_reported(raw_lichess, raw_chesscom).await.rows
    }

    /// Same as [`run`](Self::run) but also returns the dropped handles
    pub async fn run_reported(&self, raw_lichess: &str, raw_chesscom: &str) -> PipelineReport {
        let pairing = pair_identifiers(
            parse_identifiers(raw_lichess),
            parse_identifiers(raw_chesscom),
        );

        if !pairing.is_balanced() {
            warn!(
                unpaired_lichess = pairing.unpaired_lichess.len(),
                unpaired_chesscom = pairing.unpaired_chesscom.len(),
                "Handle lists differ in length; surplus handles skipped"
            );
        }

        PipelineReport {
            rows: self.resolve(&pairing.pairs).await,
            unpaired_lichess: pairing.unpaired_lichess,
            unpaired_chesscom: pairing.unpaired_chesscom,
        }
    }

    /// Resolve explicit pairs. Row i always belongs to pair i.
    pub async fn resolve(&self, pairs: &[IdentifierPair]) -> Vec<ResultRow> {
        if pairs.is_empty() {
            debug!("No pairs to resolve");
            return Vec::new();
        }

        debug!(
            pairs = pairs.len(),
            max_concurrent_pairs = self.max_concurrent_pairs,
            "Resolving ratings"
        );

        stream::iter(pairs.iter().cloned())
            .map(|pair| self.resolve_pair(pair))
            .buffered(self.max_concurrent_pairs)
            .collect()
            .await
    }

    async fn resolve_pair(&self, pair: IdentifierPair) -> ResultRow {
        let (lichess_ratings, chesscom_ratings) = tokio::join!(
            self.lichess.fetch_ratings(&pair.lichess),
            self.chesscom.fetch_ratings(&pair.chesscom),
        );

        info!(
            lichess = %pair.lichess,
            chesscom = %pair.chesscom,
            lichess_provider = self.lichess.name(),
            chesscom_provider = self.chesscom.name(),
            lichess_failed = lichess_ratings.is_failed(),
            chesscom_failed = chesscom_ratings.is_failed(),
            "Resolved pair"
        );

        ResultRow::new(pair, lichess_ratings, chesscom_ratings)
    }
}

// ============================================================================
// Stub providers for testing
// ============================================================================

#[cfg(test)]
pub mod mock {
    use super::*;
    use crate::types::RatingPair;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers from a fixed table; unknown handles get "player not found"
    pub struct StubProvider {
        pub name: &'static str,
        pub answers: HashMap<String, RatingPair>,
        pub delays: HashMap<String, Duration>,
        pub calls: Mutex<Vec<String>>,
    }

    impl StubProvider {
        pub fn new(name: &'static str) -> Self {
            Self {
                name,
                answers: HashMap::new(),
                delays: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn with(mut self, handle: &str, bullet: Option<u32>, blitz: Option<u32>) -> Self {
            self.answers
                .insert(handle.to_string(), RatingPair::new(bullet, blitz));
            self
        }

        pub fn delayed(mut self, handle: &str, delay: Duration) -> Self {
            self.delays.insert(handle.to_string(), delay);
            self
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RatingProvider for StubProvider {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn fetch_ratings(&self, identifier: &Identifier) -> RatingPair {
            self.calls.lock().unwrap().push(identifier.to_string());

            if let Some(delay) = self.delays.get(identifier.as_str()) {
                tokio::time::sleep(*delay).await;
            }

            self.answers
                .get(identifier.as_str())
                .cloned()
                .unwrap_or_else(|| RatingPair::failed(crate::types::PLAYER_NOT_FOUND))
        }
    }

    /// Holds every call open for `hold` and records the most calls seen at once
    pub struct InFlightProvider {
        hold: Duration,
        current: AtomicUsize,
        peak: AtomicUsize,
    }

    impl InFlightProvider {
        pub fn new(hold: Duration) -> Self {
            Self {
                hold,
                current: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }

        pub fn peak(&self) -> usize {
            self.peak.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RatingProvider for InFlightProvider {
        fn name(&self) -> &'static str {
            "in-flight"
        }

        async fn fetch_ratings(&self, _identifier: &Identifier) -> RatingPair {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.hold).await;
            self.current.fetch_sub(1, Ordering::SeqCst);
            RatingPair::new(Some(1500), Some(1500))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
