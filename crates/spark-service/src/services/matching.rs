//! Match service
//!
//! Stores reactions and turns mutual likes into matches. Every write for a pair
//! of users runs under that pair's lock, so the decision below always sees the
//! latest reaction in each direction.
//!
//! The match row and its notification are two writes. A failure between them is
//! reported to the caller, and resubmitting the reaction sends the missing
//! notification instead of answering `NoMatch`.

use spark_core::entities::{Match, MatchDecision, Message, Reaction};
use spark_core::{DomainError, MatchOutcome, Snowflake};
use tracing::{debug, info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::user::UserService;

/// Match service
pub struct MatchService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MatchService<'a> {
    /// Create a new MatchService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Record a like or pass and report what it led to
    ///
    /// | reverse reaction | reverse liked | this liked | outcome |
    /// |---|---|---|---|
    /// | absent | - | yes | `Pending` |
    /// | absent | - | no | `BackFilled` (reverse pass inserted) |
    /// | present | yes | yes | `Matched` (once per pair) |
    /// | present | any | any other | `NoMatch` |
    #[instrument(skip(self))]
    pub async fn submit_reaction(
        &self,
        from_id: Snowflake,
        to_id: Snowflake,
        liked: bool,
    ) -> ServiceResult<MatchOutcome> {
        let reaction = Reaction::new(from_id, to_id, liked);
        if reaction.is_self_directed() {
            return Err(DomainError::SelfReaction.into());
        }
        UserService::new(self.ctx).get(from_id).await?;
        UserService::new(self.ctx).get(to_id).await?;

        let _guard = self.ctx.pair_locks().lock(reaction.pair()).await;

        self.ctx.reaction_repo().upsert(&reaction).await?;
        let counterpart = self.ctx.reaction_repo().find(to_id, from_id).await?;

        let outcome = match reaction.decide(counterpart.as_ref()) {
            MatchDecision::Pending => MatchOutcome::Pending,
            MatchDecision::BackFill => {
                if self
                    .ctx
                    .reaction_repo()
                    .insert_if_absent(&reaction.back_fill())
                    .await?
                {
                    MatchOutcome::BackFilled
                } else {
                    // The other side answered between our read and the insert
                    MatchOutcome::Pending
                }
            }
            MatchDecision::Match => self.create_match(from_id, to_id).await?,
            MatchDecision::NoMatch => MatchOutcome::NoMatch,
        };

        info!(from_id = %from_id, to_id = %to_id, liked, outcome = %outcome, "Reaction stored");
        Ok(outcome)
    }

    async fn create_match(&self, from_id: Snowflake, to_id: Snowflake) -> ServiceResult<MatchOutcome> {
        let record = Match::new(self.ctx.generate_id(), from_id, to_id);
        let record = if self.ctx.match_repo().create_if_absent(&record).await? {
            record
        } else {
            // Already matched; only a notification that never got stored is left to do
            let Some(existing) = self.ctx.match_repo().find_by_pair(record.pair).await? else {
                return Ok(MatchOutcome::NoMatch);
            };
            if self
                .ctx
                .message_repo()
                .find_match_notification(existing.id)
                .await?
                .is_some()
            {
                debug!(from_id = %from_id, to_id = %to_id, "Pair already matched");
                return Ok(MatchOutcome::NoMatch);
            }
            warn!(match_id = %existing.id, "Match has no notification, sending it now");
            existing
        };

        let notification =
            Message::match_notification(self.ctx.generate_id(), record.id, from_id, to_id);
        let report = self.ctx.router().deliver(&notification).await?;

        info!(
            match_id = %record.id,
            from_id = %from_id,
            to_id = %to_id,
            pushed = report.pushed,
            "Match created"
        );
        Ok(MatchOutcome::Matched)
    }

    /// Matches of `user_id`, newest first
    #[instrument(skip(self))]
    pub async fn list_matches(&self, user_id: Snowflake) -> ServiceResult<Vec<Match>> {
        UserService::new(self.ctx).get(user_id).await?;
        Ok(self.ctx.match_repo().find_for_user(user_id).await?)
    }

    /// Reactions `user_id` has sent, including back-filled passes
    #[instrument(skip(self))]
    pub async fn outgoing_reactions(&self, user_id: Snowflake) -> ServiceResult<Vec<Reaction>> {
        UserService::new(self.ctx).get(user_id).await?;
        Ok(self.ctx.reaction_repo().find_outgoing(user_id).await?)
    }
}
