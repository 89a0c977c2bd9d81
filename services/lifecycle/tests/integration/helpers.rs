use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use tollgate_domain::directory::{DirectoryFilter, DirectoryUser, UserStatus};
use tollgate_domain::pagination::{Page, PaginationCursor};
use tollgate_lifecycle::domain::repository::{BotVerifier, DirectoryPort, UnverifiedUserStore};
use tollgate_lifecycle::domain::types::UnverifiedUserRecord;
use tollgate_lifecycle::error::LifecycleError;

pub const USERNAME: &str = "0fcbc418-e084-478c-9af0-fa616f1761f0";

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
}

// ── InMemoryDirectory ────────────────────────────────────────────────────────

/// Directory that honors filters and page limits. Cursors are result offsets.
pub struct InMemoryDirectory {
    pub users: Arc<Mutex<Vec<DirectoryUser>>>,
    pub searches: Arc<Mutex<Vec<(String, u32, Option<String>)>>>,
    pub fail_search: bool,
    pub fail_delete: bool,
}

impl InMemoryDirectory {
    pub fn new(users: Vec<DirectoryUser>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            searches: Arc::new(Mutex::new(vec![])),
            fail_search: false,
            fail_delete: false,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn usernames(&self) -> Vec<String> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .filter_map(|u| u.username.clone())
            .collect()
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }
}

fn matches(user: &DirectoryUser, filter: &DirectoryFilter) -> bool {
    match filter {
        DirectoryFilter::AttributeEquals { attribute, value } => {
            user.attributes.get(attribute.name()) == Some(value.as_str())
        }
        DirectoryFilter::StatusEquals(status) => user.status == *status,
    }
}

impl DirectoryPort for InMemoryDirectory {
    async fn search(
        &self,
        filter: &DirectoryFilter,
        limit: u32,
        cursor: Option<&PaginationCursor>,
    ) -> Result<Page<DirectoryUser>, LifecycleError> {
        self.searches.lock().unwrap().push((
            filter.to_string(),
            limit,
            cursor.map(|c| c.as_str().to_owned()),
        ));
        if self.fail_search {
            return Err(anyhow::anyhow!("directory throttled").into());
        }
        let offset: usize = cursor.map_or(0, |c| c.as_str().parse().unwrap());
        let matching: Vec<DirectoryUser> = self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| matches(u, filter))
            .cloned()
            .collect();
        let end = (offset + limit as usize).min(matching.len());
        let next = (end < matching.len()).then(|| PaginationCursor::new(end.to_string()));
        Ok(Page {
            items: matching[offset..end].to_vec(),
            next,
        })
    }

    async fn delete(&self, identifier: &str) -> Result<(), LifecycleError> {
        if self.fail_delete {
            return Err(anyhow::anyhow!("directory unavailable").into());
        }
        self.users
            .lock()
            .unwrap()
            .retain(|u| !identified_by(u, identifier));
        Ok(())
    }

    async fn delete_unconfirmed(&self, identifier: &str) -> Result<bool, LifecycleError> {
        if self.fail_delete {
            return Err(anyhow::anyhow!("directory unavailable").into());
        }
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| !(identified_by(u, identifier) && u.status == UserStatus::Unconfirmed));
        Ok(users.len() < before)
    }
}

fn identified_by(user: &DirectoryUser, identifier: &str) -> bool {
    user.username.as_deref() == Some(identifier) || user.attributes.subject() == Some(identifier)
}

// ── InMemoryStore ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryStore {
    pub records: Arc<Mutex<BTreeMap<String, UnverifiedUserRecord>>>,
}

impl InMemoryStore {
    pub fn with(records: Vec<UnverifiedUserRecord>) -> Self {
        let map = records.into_iter().map(|r| (r.user_id.clone(), r)).collect();
        Self {
            records: Arc::new(Mutex::new(map)),
        }
    }

    pub fn get(&self, user_id: &str) -> Option<UnverifiedUserRecord> {
        self.records.lock().unwrap().get(user_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl UnverifiedUserStore for InMemoryStore {
    async fn put_if_absent(&self, record: &UnverifiedUserRecord) -> Result<(), LifecycleError> {
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&record.user_id) {
            return Err(LifecycleError::AlreadyRegistered);
        }
        records.insert(record.user_id.clone(), record.clone());
        Ok(())
    }

    async fn mark_verified(&self, user_id: &str, verified_at: i64) -> Result<(), LifecycleError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .entry(user_id.to_owned())
            .or_insert_with(|| UnverifiedUserRecord {
                user_id: user_id.to_owned(),
                created_at: None,
                expires_at: None,
                verified_at: None,
            });
        record.verified_at = Some(verified_at);
        record.expires_at = None;
        Ok(())
    }

    async fn list_expired(&self, now: i64, limit: u64) -> Result<Vec<String>, LifecycleError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.expires_at.is_some_and(|at| at <= now))
            .take(limit as usize)
            .map(|r| r.user_id.clone())
            .collect())
    }

    async fn remove_expired(&self, user_ids: &[String], now: i64) -> Result<u64, LifecycleError> {
        let mut records = self.records.lock().unwrap();
        let mut removed = 0;
        for id in user_ids {
            if records
                .get(id)
                .is_some_and(|r| r.expires_at.is_some_and(|at| at <= now))
            {
                records.remove(id);
                removed += 1;
            }
        }
        Ok(removed)
    }
}

// ── StaticBot ────────────────────────────────────────────────────────────────

pub struct StaticBot {
    pub answer: Result<bool, ()>,
    pub calls: Arc<AtomicUsize>,
    pub seen: Arc<Mutex<Vec<(String, String)>>>,
}

impl StaticBot {
    pub fn accepting() -> Self {
        Self::answering(Ok(true))
    }

    pub fn declining() -> Self {
        Self::answering(Ok(false))
    }

    pub fn failing() -> Self {
        Self::answering(Err(()))
    }

    fn answering(answer: Result<bool, ()>) -> Self {
        Self {
            answer,
            calls: Arc::new(AtomicUsize::new(0)),
            seen: Arc::new(Mutex::new(vec![])),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BotVerifier for StaticBot {
    async fn verify(&self, token: &str, secret: &str) -> Result<bool, LifecycleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap()
            .push((token.to_owned(), secret.to_owned()));
        self.answer
            .map_err(|()| anyhow::anyhow!("siteverify unreachable").into())
    }
}
