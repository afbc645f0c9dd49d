//! Reaction entity - a directed like or pass

use chrono::{DateTime, Utc};

use crate::value_objects::{PairKey, Snowflake};

/// Reaction from one user toward another
///
/// Identity is `(from_id, to_id)`; a newer reaction for the same ordered pair
/// replaces the older one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reaction {
    pub from_id: Snowflake,
    pub to_id: Snowflake,
    pub liked: bool,
    pub created_at: DateTime<Utc>,
}

/// What should happen after a reaction has been stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchDecision {
    /// Like with no answer yet
    Pending,
    /// Pass with no answer yet: record the reverse pass
    BackFill,
    /// Mutual like
    Match,
    NoMatch,
}

impl Reaction {
    pub fn new(from_id: Snowflake, to_id: Snowflake, liked: bool) -> Self {
        Self {
            from_id,
            to_id,
            liked,
            created_at: Utc::now(),
        }
    }

    #[inline]
    pub fn is_self_directed(&self) -> bool {
        self.from_id == self.to_id
    }

    pub fn pair(&self) -> PairKey {
        PairKey::new(self.from_id, self.to_id)
    }

    /// Synthetic pass from the target back to the author
    pub fn back_fill(&self) -> Reaction {
        Reaction::new(self.to_id, self.from_id, false)
    }

    /// Decide the follow-up given the target's reaction toward the author, if any
    pub fn decide(&self, counterpart: Option<&Reaction>) -> MatchDecision {
        match counterpart {
            None if self.liked => MatchDecision::Pending,
            None => MatchDecision::BackFill,
            Some(other) if other.liked && self.liked => MatchDecision::Match,
            Some(_) => MatchDecision::NoMatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Snowflake = Snowflake::new(1);
    const B: Snowflake = Snowflake::new(2);

    #[test]
    fn test_decision_table() {
        let like = Reaction::new(A, B, true);
        let pass = Reaction::new(A, B, false);
        let back_like = Reaction::new(B, A, true);
        let back_pass = Reaction::new(B, A, false);

        assert_eq!(like.decide(None), MatchDecision::Pending);
        assert_eq!(pass.decide(None), MatchDecision::BackFill);
        assert_eq!(like.decide(Some(&back_like)), MatchDecision::Match);
        assert_eq!(pass.decide(Some(&back_like)), MatchDecision::NoMatch);
        assert_eq!(like.decide(Some(&back_pass)), MatchDecision::NoMatch);
        assert_eq!(pass.decide(Some(&back_pass)), MatchDecision::NoMatch);
    }

    #[test]
    fn test_back_fill_reverses_direction() {
        let filled = Reaction::new(A, B, false).back_fill();
        assert_eq!(filled.from_id, B);
        assert_eq!(filled.to_id, A);
        assert!(!filled.liked);
    }

    #[test]
    fn test_pair_ignores_direction() {
        assert_eq!(Reaction::new(A, B, true).pair(), Reaction::new(B, A, false).pair());
        assert!(Reaction::new(A, A, true).is_self_directed());
    }
}
