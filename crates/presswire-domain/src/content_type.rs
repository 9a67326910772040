//! Content type module - the fixed set of categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category assigned to an item by the classifier
///
/// The set is closed: a collaborator reply naming anything else is a
/// validation failure, never coerced to [`ContentType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// Live coverage, post-match reports, match summaries
    MatchReport,

    /// Transfers, signings, contract extensions, loans
    TransferNews,

    /// Injuries, recovery timelines, fitness updates
    InjuryUpdate,

    /// Analysis, editorials, columns, tactical breakdowns
    OpinionPiece,

    /// Anything else
    Other,
}

impl ContentType {
    /// Every content type, in declaration order
    pub const ALL: [ContentType; 5] = [
        ContentType::MatchReport,
        ContentType::TransferNews,
        ContentType::InjuryUpdate,
        ContentType::OpinionPiece,
        ContentType::Other,
    ];

    /// Get the wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::MatchReport => "match_report",
            ContentType::TransferNews => "transfer_news",
            ContentType::InjuryUpdate => "injury_update",
            ContentType::OpinionPiece => "opinion_piece",
            ContentType::Other => "other",
        }
    }

    /// Parse a wire name. Matching is exact.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// One-line definition used in classification instructions
    pub fn definition(&self) -> &'static str {
        match self {
            ContentType::MatchReport => "Live game coverage, post-match reports, match summaries",
            ContentType::TransferNews => "Player transfers, signings, contract extensions, loan deals",
            ContentType::InjuryUpdate => "Player injuries, recovery timelines, fitness updates",
            ContentType::OpinionPiece => "Analysis, editorials, opinion columns, tactical breakdowns",
            ContentType::Other => "Anything that doesn't fit the above categories",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid content type: {}", s))
    }
}
