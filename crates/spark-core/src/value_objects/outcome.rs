//! Result of submitting a reaction

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the match engine did with a reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// Liked, the other side has not reacted yet
    Pending,
    /// Passed first; the reverse pass was inserted on the other user's behalf
    BackFilled,
    /// Both sides liked each other and the match was created by this reaction
    Matched,
    /// Nothing further happens
    NoMatch,
}

impl MatchOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::BackFilled => "back_filled",
            Self::Matched => "matched",
            Self::NoMatch => "no_match",
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
