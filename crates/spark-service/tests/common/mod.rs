//! Shared fixtures for service tests: an in-memory store wired into a full context

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use futures_util::StreamExt;
use parking_lot::Mutex;
use spark_core::entities::{Match, Message, Reaction, Sex, User};
use spark_core::traits::{
    MatchRepository, MessageCursor, MessageRepository, ReactionRepository, RepoResult,
    UserRepository,
};
use spark_core::{DomainError, GeoPoint, PairKey, Snowflake, SnowflakeGenerator};
use spark_db::MemoryStore;
use spark_delivery::{ConnectionRegistry, DeliveryRouter, MessageStream, RouterSettings};
use spark_service::{MediaSettings, ServiceContext};

/// Write steps that `FaultyStore` can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    Upsert,
    BackFill,
    CreateMatch,
    CreateMessage,
}

/// Memory store whose armed writes fail once with a storage error
pub struct FaultyStore {
    inner: Arc<MemoryStore>,
    armed: Mutex<HashSet<Fault>>,
}

impl FaultyStore {
    pub fn new(inner: Arc<MemoryStore>) -> Self {
        Self {
            inner,
            armed: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail_once(&self, fault: Fault) {
        self.armed.lock().insert(fault);
    }

    fn trip(&self, fault: Fault) -> RepoResult<()> {
        if self.armed.lock().remove(&fault) {
            Err(DomainError::StorageError(format!("injected {fault:?} failure")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ReactionRepository for FaultyStore {
    async fn upsert(&self, reaction: &Reaction) -> RepoResult<()> {
        self.trip(Fault::Upsert)?;
        self.inner.upsert(reaction).await
    }

    async fn insert_if_absent(&self, reaction: &Reaction) -> RepoResult<bool> {
        self.trip(Fault::BackFill)?;
        self.inner.insert_if_absent(reaction).await
    }

    async fn find(&self, from_id: Snowflake, to_id: Snowflake) -> RepoResult<Option<Reaction>> {
        self.inner.find(from_id, to_id).await
    }

    async fn find_outgoing(&self, user_id: Snowflake) -> RepoResult<Vec<Reaction>> {
        self.inner.find_outgoing(user_id).await
    }
}

#[async_trait]
impl MatchRepository for FaultyStore {
    async fn create_if_absent(&self, record: &Match) -> RepoResult<bool> {
        self.trip(Fault::CreateMatch)?;
        self.inner.create_if_absent(record).await
    }

    async fn find_by_pair(&self, pair: PairKey) -> RepoResult<Option<Match>> {
        self.inner.find_by_pair(pair).await
    }

    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Match>> {
        self.inner.find_for_user(user_id).await
    }
}

#[async_trait]
impl MessageRepository for FaultyStore {
    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.trip(Fault::CreateMessage)?;
        MessageRepository::create(&*self.inner, message).await
    }

    async fn find_after(
        &self,
        user_id: Snowflake,
        cursor: MessageCursor,
        limit: i64,
    ) -> RepoResult<Vec<Message>> {
        self.inner.find_after(user_id, cursor, limit).await
    }

    async fn find_match_notification(&self, match_id: Snowflake) -> RepoResult<Option<Message>> {
        self.inner.find_match_notification(match_id).await
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub faults: Arc<FaultyStore>,
    pub ctx: ServiceContext,
    ids: Arc<SnowflakeGenerator>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(RouterSettings::default(), MediaSettings::default())
    }

    pub fn with_settings(settings: RouterSettings, media: MediaSettings) -> Self {
        let store = Arc::new(MemoryStore::new());
        let faults = Arc::new(FaultyStore::new(store.clone()));
        let ids = Arc::new(SnowflakeGenerator::new(1));
        let router = DeliveryRouter::new(ConnectionRegistry::new(), faults.clone(), settings);

        let ctx = ServiceContext::builder()
            .user_repo(store.clone())
            .reaction_repo(faults.clone())
            .match_repo(faults.clone())
            .message_repo(faults.clone())
            .health_probe(store.clone())
            .router(Arc::new(router))
            .snowflake_generator(Arc::clone(&ids))
            .media(media)
            .build()
            .expect("complete context");

        Self {
            store,
            faults,
            ctx,
            ids,
        }
    }

    /// Insert a user directly, skipping password hashing
    pub async fn user(&self, name: &str, sex: Sex, location: GeoPoint) -> User {
        let id = self.ids.generate();
        let user = User::new(
            id,
            format!("{name}.{id}@example.com"),
            name.to_string(),
            NaiveDate::from_ymd_opt(1995, 6, 15).unwrap(),
            sex,
            location,
        );
        UserRepository::create(&*self.store, &user, "not-a-real-hash").await.unwrap();
        user
    }

    pub async fn pair(&self) -> (Snowflake, Snowflake) {
        let a = self.user("ann", Sex::Female, GeoPoint::new(55.75, 37.61)).await;
        let b = self.user("bob", Sex::Male, GeoPoint::new(55.76, 37.62)).await;
        (a.id, b.id)
    }
}

pub async fn next(stream: &mut MessageStream) -> Message {
    tokio::time::timeout(Duration::from_secs(1), stream.next())
        .await
        .expect("stream stalled")
        .expect("stream ended")
}

pub async fn assert_quiet(stream: &mut MessageStream) {
    assert!(
        tokio::time::timeout(Duration::from_millis(50), stream.next())
            .await
            .is_err(),
        "unexpected message on stream"
    );
}
