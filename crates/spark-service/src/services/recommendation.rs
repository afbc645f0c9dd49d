//! Recommendation service
//!
//! Nearby profiles the requester has not reacted to yet.

use spark_core::entities::User;
use spark_core::traits::CandidateQuery;
use spark_core::Snowflake;
use tracing::{debug, instrument};

use crate::dto::RecommendationQuery;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::user::UserService;

pub const DEFAULT_RECOMMENDATION_LIMIT: i64 = 20;
pub const MAX_RECOMMENDATION_LIMIT: i64 = 100;

/// Recommendation service
pub struct RecommendationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RecommendationService<'a> {
    /// Create a new RecommendationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Candidates for `user_id`, nearest first, with the requester's own profile
    #[instrument(skip(self))]
    pub async fn recommend(
        &self,
        user_id: Snowflake,
        filter: RecommendationQuery,
    ) -> ServiceResult<(User, Vec<User>)> {
        if let (Some(min), Some(max)) = (filter.min_age, filter.max_age) {
            if min > max {
                return Err(ServiceError::validation("min_age must not exceed max_age"));
            }
        }

        let requester = UserService::new(self.ctx).get(user_id).await?;
        let query = CandidateQuery {
            requester: requester.id,
            origin: requester.location,
            sex: filter.sex,
            min_age: filter.min_age,
            max_age: filter.max_age,
            max_distance_km: filter.distance,
            limit: filter
                .limit
                .unwrap_or(DEFAULT_RECOMMENDATION_LIMIT)
                .clamp(1, MAX_RECOMMENDATION_LIMIT),
        };

        let candidates = self.ctx.user_repo().find_candidates(&query).await?;

        debug!(user_id = %user_id, found = candidates.len(), "Candidates selected");
        Ok((requester, candidates))
    }
}
