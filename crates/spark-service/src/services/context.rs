//! Service context - dependency container for services
//!
//! Holds the repositories, the delivery router and the other shared pieces
//! services borrow for the duration of a request.

use std::path::PathBuf;
use std::sync::Arc;

use spark_common::{PasswordService, StorageConfig};
use spark_core::traits::{
    HealthProbe, MatchRepository, MessageRepository, ReactionRepository, UserRepository,
};
use spark_core::{Snowflake, SnowflakeGenerator};
use spark_delivery::DeliveryRouter;

use super::error::{ServiceError, ServiceResult};
use super::pair_lock::PairLocks;

/// Where avatars are written and how large they may be
#[derive(Debug, Clone)]
pub struct MediaSettings {
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for MediaSettings {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

impl From<&StorageConfig> for MediaSettings {
    fn from(config: &StorageConfig) -> Self {
        Self {
            upload_dir: config.upload_dir.clone(),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

/// Service context containing all dependencies
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    match_repo: Arc<dyn MatchRepository>,
    message_repo: Arc<dyn MessageRepository>,
    health_probe: Arc<dyn HealthProbe>,

    // Delivery
    router: Arc<DeliveryRouter>,
    pair_locks: Arc<PairLocks>,

    // Services
    password_service: PasswordService,
    snowflake_generator: Arc<SnowflakeGenerator>,
    media: MediaSettings,
}

impl ServiceContext {
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    pub fn match_repo(&self) -> &dyn MatchRepository {
        self.match_repo.as_ref()
    }

    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    pub fn health_probe(&self) -> &dyn HealthProbe {
        self.health_probe.as_ref()
    }

    // === Delivery ===

    pub fn router(&self) -> &DeliveryRouter {
        self.router.as_ref()
    }

    pub fn pair_locks(&self) -> &PairLocks {
        self.pair_locks.as_ref()
    }

    // === Services ===

    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    pub fn media(&self) -> &MediaSettings {
        &self.media
    }

    /// Generate a new Snowflake ID
    pub fn generate_id(&self) -> Snowflake {
        self.snowflake_generator.generate()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("online", &self.router.online_count())
            .field("media", &self.media)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    match_repo: Option<Arc<dyn MatchRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    health_probe: Option<Arc<dyn HealthProbe>>,
    router: Option<Arc<DeliveryRouter>>,
    snowflake_generator: Option<Arc<SnowflakeGenerator>>,
    media: Option<MediaSettings>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn match_repo(mut self, repo: Arc<dyn MatchRepository>) -> Self {
        self.match_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn health_probe(mut self, probe: Arc<dyn HealthProbe>) -> Self {
        self.health_probe = Some(probe);
        self
    }

    /// The router must share its message repository with `message_repo`
    pub fn router(mut self, router: Arc<DeliveryRouter>) -> Self {
        self.router = Some(router);
        self
    }

    pub fn snowflake_generator(mut self, generator: Arc<SnowflakeGenerator>) -> Self {
        self.snowflake_generator = Some(generator);
        self
    }

    pub fn media(mut self, media: MediaSettings) -> Self {
        self.media = Some(media);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext {
            user_repo: self.user_repo.ok_or_else(|| missing("user_repo"))?,
            reaction_repo: self.reaction_repo.ok_or_else(|| missing("reaction_repo"))?,
            match_repo: self.match_repo.ok_or_else(|| missing("match_repo"))?,
            message_repo: self.message_repo.ok_or_else(|| missing("message_repo"))?,
            health_probe: self.health_probe.ok_or_else(|| missing("health_probe"))?,
            router: self.router.ok_or_else(|| missing("router"))?,
            pair_locks: Arc::new(PairLocks::new()),
            password_service: PasswordService,
            snowflake_generator: self
                .snowflake_generator
                .ok_or_else(|| missing("snowflake_generator"))?,
            media: self.media.unwrap_or_default(),
        })
    }
}

fn missing(dependency: &str) -> ServiceError {
    ServiceError::validation(format!("{dependency} is required"))
}
