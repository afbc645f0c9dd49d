//! In-process store implementing every repository trait
//!
//! Mirrors the Postgres constraints that the services rely on: unique email,
//! one reaction per ordered pair, one match per unordered pair, and
//! `(sent_at, id)` ordering for message timelines.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::instrument;

use spark_core::entities::{Match, Message, Reaction, User};
use spark_core::error::DomainError;
use spark_core::traits::{
    CandidateQuery, HealthProbe, MatchRepository, MessageCursor, MessageRepository,
    ReactionRepository, RepoResult, UserRepository,
};
use spark_core::value_objects::{PairKey, Snowflake};

#[derive(Default)]
struct Tables {
    users: HashMap<Snowflake, (User, String)>,
    emails: HashMap<String, Snowflake>,
    reactions: BTreeMap<(Snowflake, Snowflake), Reaction>,
    matches: HashMap<PairKey, Match>,
    messages: BTreeMap<MessageCursor, Message>,
    message_ids: HashSet<Snowflake>,
    notifications: HashMap<Snowflake, MessageCursor>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with a storage error until reset
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> RepoResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(DomainError::StorageError("memory store unavailable".to_string()))
        } else {
            Ok(())
        }
    }

    pub fn message_count(&self) -> usize {
        self.tables.read().messages.len()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Snowflake) -> RepoResult<Option<User>> {
        self.check()?;
        Ok(self.tables.read().users.get(&id).map(|(user, _)| user.clone()))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.check()?;
        let tables = self.tables.read();
        Ok(tables
            .emails
            .get(email)
            .and_then(|id| tables.users.get(id))
            .map(|(user, _)| user.clone()))
    }

    #[instrument(skip(self, user, password_hash), fields(user_id = %user.id))]
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<()> {
        self.check()?;
        let mut tables = self.tables.write();
        if tables.emails.contains_key(&user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        if tables.users.contains_key(&user.id) {
            return Err(DomainError::Conflict(format!("user {} already exists", user.id)));
        }
        tables.emails.insert(user.email.clone(), user.id);
        tables
            .users
            .insert(user.id, (user.clone(), password_hash.to_string()));
        Ok(())
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        self.check()?;
        let mut tables = self.tables.write();
        match tables.users.get_mut(&user.id) {
            Some((stored, _)) => {
                // Email is immutable after signup
                let email = std::mem::take(&mut stored.email);
                *stored = User {
                    email,
                    ..user.clone()
                };
                Ok(())
            }
            None => Err(DomainError::UserNotFound(user.id)),
        }
    }

    async fn get_password_hash(&self, id: Snowflake) -> RepoResult<Option<String>> {
        self.check()?;
        Ok(self.tables.read().users.get(&id).map(|(_, hash)| hash.clone()))
    }

    async fn find_candidates(&self, query: &CandidateQuery) -> RepoResult<Vec<User>> {
        self.check()?;
        let today = Utc::now().date_naive();
        let tables = self.tables.read();

        let mut candidates: Vec<(f64, &User)> = tables
            .users
            .values()
            .map(|(user, _)| user)
            .filter(|user| !tables.reactions.contains_key(&(query.requester, user.id)))
            .filter(|user| query.accepts(user, today))
            .map(|user| (query.origin.distance_km(&user.location), user))
            .collect();

        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.id.cmp(&b.1.id)));

        let limit = usize::try_from(query.limit.max(0)).unwrap_or(usize::MAX);
        Ok(candidates
            .into_iter()
            .take(limit)
            .map(|(_, user)| user.clone())
            .collect())
    }
}

#[async_trait]
impl ReactionRepository for MemoryStore {
    async fn upsert(&self, reaction: &Reaction) -> RepoResult<()> {
        self.check()?;
        self.tables
            .write()
            .reactions
            .insert((reaction.from_id, reaction.to_id), reaction.clone());
        Ok(())
    }

    async fn insert_if_absent(&self, reaction: &Reaction) -> RepoResult<bool> {
        self.check()?;
        let mut tables = self.tables.write();
        let key = (reaction.from_id, reaction.to_id);
        if tables.reactions.contains_key(&key) {
            return Ok(false);
        }
        tables.reactions.insert(key, reaction.clone());
        Ok(true)
    }

    async fn find(&self, from_id: Snowflake, to_id: Snowflake) -> RepoResult<Option<Reaction>> {
        self.check()?;
        Ok(self.tables.read().reactions.get(&(from_id, to_id)).cloned())
    }

    async fn find_outgoing(&self, user_id: Snowflake) -> RepoResult<Vec<Reaction>> {
        self.check()?;
        let tables = self.tables.read();
        let range = (
            Bound::Included((user_id, Snowflake::new(i64::MIN))),
            Bound::Included((user_id, Snowflake::MAX)),
        );
        Ok(tables.reactions.range(range).map(|(_, r)| r.clone()).collect())
    }
}

#[async_trait]
impl MatchRepository for MemoryStore {
    async fn create_if_absent(&self, record: &Match) -> RepoResult<bool> {
        self.check()?;
        let mut tables = self.tables.write();
        if tables.matches.contains_key(&record.pair) {
            return Ok(false);
        }
        tables.matches.insert(record.pair, record.clone());
        Ok(true)
    }

    async fn find_by_pair(&self, pair: PairKey) -> RepoResult<Option<Match>> {
        self.check()?;
        Ok(self.tables.read().matches.get(&pair).cloned())
    }

    async fn find_for_user(&self, user_id: Snowflake) -> RepoResult<Vec<Match>> {
        self.check()?;
        let mut matches: Vec<Match> = self
            .tables
            .read()
            .matches
            .values()
            .filter(|m| m.involves(user_id))
            .cloned()
            .collect();
        matches.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(matches)
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.check()?;
        let mut tables = self.tables.write();
        if !tables.message_ids.insert(message.id) {
            return Err(DomainError::Conflict(format!("message {} already exists", message.id)));
        }
        let key = MessageCursor::of(message);
        if message.is_match_notification() {
            tables.notifications.entry(message.match_id).or_insert(key);
        }
        tables.messages.insert(key, message.clone());
        Ok(())
    }

    async fn find_after(
        &self,
        user_id: Snowflake,
        cursor: MessageCursor,
        limit: i64,
    ) -> RepoResult<Vec<Message>> {
        self.check()?;
        let limit = usize::try_from(limit.max(1)).unwrap_or(usize::MAX);
        Ok(self
            .tables
            .read()
            .messages
            .range((Bound::Excluded(cursor), Bound::Unbounded))
            .map(|(_, m)| m)
            .filter(|m| m.involves(user_id))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_match_notification(&self, match_id: Snowflake) -> RepoResult<Option<Message>> {
        self.check()?;
        let tables = self.tables.read();
        Ok(tables
            .notifications
            .get(&match_id)
            .and_then(|key| tables.messages.get(key))
            .cloned())
    }
}

#[async_trait]
impl HealthProbe for MemoryStore {
    async fn ping(&self) -> RepoResult<()> {
        self.check()
    }
}
