//! # spark-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

pub use services::{
    MatchService, MediaSettings, MessageService, PairLocks, RecommendationService,
    ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, UserService,
};
