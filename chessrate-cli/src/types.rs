//! Core types and the rating provider trait
//!
//! Failures from the rating services are values here, not errors: a
//! [`RatingValue`] carries "not available" or "error" in-band so renderers
//! never need error handling of their own.

use serde::Serialize;
use std::fmt;

/// Cell text shown when a rating field is absent from an otherwise good response
pub const NOT_AVAILABLE: &str = "N/A";

/// Message used when a service answers with any non-200 status
pub const PLAYER_NOT_FOUND: &str = "player not found";

// ============================================================================
// Identifiers
// ============================================================================

/// A player handle on one rating service, trimmed and non-empty
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Trim surrounding whitespace; empty tokens are not identifiers
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased copy, for services whose lookups ignore case
    pub fn case_folded(&self) -> Identifier {
        Identifier(self.0.to_lowercase())
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One Lichess handle matched with one Chess.com handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierPair {
    pub lichess: Identifier,
    pub chesscom: Identifier,
}

impl IdentifierPair {
    pub fn new(lichess: Identifier, chesscom: Identifier) -> Self {
        Self { lichess, chesscom }
    }
}

// ============================================================================
// Ratings
// ============================================================================

/// A single rating cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum RatingValue {
    Rated(u32),
    /// The service answered but has no rating of this kind for the player
    Unavailable,
    /// The lookup failed; carries a human-readable reason
    Error(String),
}

impl RatingValue {
    pub fn rating(&self) -> Option<u32> {
        match self {
            RatingValue::Rated(r) => Some(*r),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RatingValue::Error(_))
    }
}

impl From<Option<u32>> for RatingValue {
    fn from(rating: Option<u32>) -> Self {
        rating.map_or(RatingValue::Unavailable, RatingValue::Rated)
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RatingValue::Rated(r) => write!(f, "{}", r),
            RatingValue::Unavailable => f.write_str(NOT_AVAILABLE),
            RatingValue::Error(msg) => f.write_str(msg),
        }
    }
}

/// Bullet and blitz ratings for one identifier on one service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingPair {
    pub bullet: RatingValue,
    pub blitz: RatingValue,
}

impl RatingPair {
    /// Absent ratings become [`RatingValue::Unavailable`]
    pub fn new(bullet: Option<u32>, blitz: Option<u32>) -> Self {
        Self {
            bullet: bullet.into(),
            blitz: blitz.into(),
        }
    }

    /// Both cells carry the same error message
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            bullet: RatingValue::Error(message.clone()),
            blitz: RatingValue::Error(message),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.bullet.is_error() && self.blitz.is_error()
    }
}

// ============================================================================
// Result rows
// ============================================================================

/// One table row. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    label: String,
    lichess: Identifier,
    chesscom: Identifier,
    lichess_ratings: RatingPair,
    chesscom_ratings: RatingPair,
}

impl ResultRow {
    pub fn new(
        pair: IdentifierPair,
        lichess_ratings: RatingPair,
        chesscom_ratings: RatingPair,
    ) -> Self {
        Self {
            label: format!("{} / {}", pair.lichess, pair.chesscom),
            lichess: pair.lichess,
            chesscom: pair.chesscom,
            lichess_ratings,
            chesscom_ratings,
        }
    }

    /// "lichess handle / chess.com handle"
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn lichess_ratings(&self) -> &RatingPair {
        &self.lichess_ratings
    }

    pub fn chesscom_ratings(&self) -> &RatingPair {
        &self.chesscom_ratings
    }

    /// Lichess bullet, Lichess blitz, Chess.com bullet, Chess.com blitz
    pub fn cells(&self) -> [&RatingValue; 4] {
        [
            &self.lichess_ratings.bullet,
            &self.lichess_ratings.blitz,
            &self.chesscom_ratings.bullet,
            &self.chesscom_ratings.blitz,
        ]
    }
}

// ============================================================================
// Provider trait
// ============================================================================

/// A rating service that can be asked for one player's speed ratings.
///
/// Implementations make exactly one request per call and never fail: any
/// problem is folded into the returned [`RatingPair`].
#[async_trait::async_trait]
pub trait RatingProvider: Send + Sync {
    /// Service name for logs and user-facing notes
    fn name(&self) -> &'static str;

    async fn fetch_ratings(&self, identifier: &Identifier) -> RatingPair;
}
