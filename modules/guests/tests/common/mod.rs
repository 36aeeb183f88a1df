#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::anyhow;
use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use guests::config::GuestsConfig;
use guests::contract::model::Guest;
use guests::domain::allocator::IdentifierSource;
use guests::domain::repo::{GuestRecord, GuestsRepository, StoreError};
use guests::GuestsModule;

/// Vec-backed repository with knobs for the failure modes the service must
/// handle.
#[derive(Default)]
pub struct InMemoryGuestsRepository {
    guests: Mutex<Vec<Guest>>,
    /// Identifiers `identifier_exists` pretends not to see, so the insert is
    /// the first place a duplicate shows up.
    hidden: Mutex<HashSet<String>>,
    offline: AtomicBool,
    pub exists_calls: AtomicUsize,
    pub insert_calls: AtomicUsize,
}

impl InMemoryGuestsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, identifier: &str) -> Guest {
        let now = Utc::now();
        let mut guests = self.guests.lock();
        let guest = Guest {
            id: guests.len() as i64 + 1,
            name: "Seeded".into(),
            place: "Somewhere".into(),
            identifier: identifier.into(),
            checked_in: false,
            created_at: now,
            updated_at: now,
        };
        guests.push(guest.clone());
        guest
    }

    pub fn hide_from_lookup(&self, identifier: &str) {
        self.hidden.lock().insert(identifier.into());
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.guests.lock().len()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(anyhow!("connection refused")));
        }
        Ok(())
    }
}

#[async_trait]
impl GuestsRepository for InMemoryGuestsRepository {
    async fn identifier_exists(&self, identifier: &str) -> Result<bool, StoreError> {
        self.check_online()?;
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        if self.hidden.lock().contains(identifier) {
            return Ok(false);
        }
        Ok(self
            .guests
            .lock()
            .iter()
            .any(|g| g.identifier == identifier))
    }

    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<Guest>, StoreError> {
        self.check_online()?;
        Ok(self
            .guests
            .lock()
            .iter()
            .find(|g| g.identifier == identifier)
            .cloned())
    }

    async fn insert(&self, record: GuestRecord) -> Result<Guest, StoreError> {
        self.check_online()?;
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        let mut guests = self.guests.lock();
        if guests.iter().any(|g| g.identifier == record.identifier) {
            return Err(StoreError::DuplicateIdentifier(record.identifier));
        }
        let guest = Guest {
            id: guests.len() as i64 + 1,
            name: record.name,
            place: record.place,
            identifier: record.identifier,
            checked_in: record.checked_in,
            created_at: record.created_at,
            updated_at: record.updated_at,
        };
        guests.push(guest.clone());
        Ok(guest)
    }

    async fn list_by_creation(&self) -> Result<Vec<Guest>, StoreError> {
        self.check_online()?;
        let mut guests = self.guests.lock().clone();
        guests.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(guests)
    }

    async fn mark_checked_in(
        &self,
        identifier: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Guest>, StoreError> {
        self.check_online()?;
        let mut guests = self.guests.lock();
        let Some(guest) = guests.iter_mut().find(|g| g.identifier == identifier) else {
            return Ok(None);
        };
        if !guest.checked_in {
            guest.checked_in = true;
            guest.updated_at = at;
        }
        Ok(Some(guest.clone()))
    }
}

/// Hands out a fixed sequence of candidates, then repeats the last one.
pub struct ScriptedSource {
    queue: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl ScriptedSource {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queue: VecDeque<String> = candidates.into_iter().map(Into::into).collect();
        let last = queue.back().cloned().unwrap_or_else(|| "00000000".into());
        Self {
            queue: Mutex::new(queue),
            last: Mutex::new(last),
        }
    }
}

impl IdentifierSource for ScriptedSource {
    fn candidate(&self) -> String {
        match self.queue.lock().pop_front() {
            Some(next) => {
                *self.last.lock() = next.clone();
                next
            }
            None => self.last.lock().clone(),
        }
    }
}

/// Fresh in-memory SQLite database with the guests schema applied.
pub async fn sqlite_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect sqlite");
    GuestsModule::migrate(&db).await.expect("run migrations");
    db
}

/// File-backed SQLite with a small pool, for tests that need real
/// concurrent connections.
pub async fn sqlite_file_db(path: &Path) -> DatabaseConnection {
    let mut opts = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    opts.max_connections(4).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect sqlite file");
    GuestsModule::migrate(&db).await.expect("run migrations");
    db
}

/// Guests routes mounted behind the ingress middleware on a fresh database.
pub async fn sqlite_app() -> (Router, GuestsModule) {
    let db = sqlite_db().await;
    let module = GuestsModule::new(db, &GuestsConfig::default());
    let ingress = api_ingress::ApiIngress::default().with_openapi(GuestsModule::openapi());
    let router = ingress.build_router(module.router());
    (router, module)
}
