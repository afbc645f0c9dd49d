//! Data transfer objects for API requests and responses
//!
//! This module provides:
//! - Request DTOs with validation for API inputs
//! - Response DTOs for serializing API outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{
    ReactionRequest, RecommendationQuery, SendMessageRequest, SignInRequest, SignUpRequest,
    UpdateProfileRequest,
};

pub use responses::{
    CandidateResponse, CurrentUserResponse, HealthChecks, HealthResponse, MatchResponse,
    MessageResponse, ReactionOutcomeResponse, ReactionResponse, ReadinessResponse,
    SignInResponse, UserResponse,
};

pub use mappers::STATIC_PREFIX;
