use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::entities::{Guest, NewGuest, NewUser, Page, Session, User};
use crate::domain::errors::StoreError;
use crate::domain::ports::{Clock, GuestStore, SessionStore, StoreResult, UserStore};
use crate::interface_adapters::memory::MemoryStore;

pub(crate) type SessionTable = Arc<Mutex<HashMap<String, Session>>>;

pub(crate) const NOW: u64 = 1_700_000_000;

// Shared fixed time source for deterministic use-case tests.
pub(crate) struct FixedClock(pub(crate) u64);

impl Clock for FixedClock {
    fn now_epoch_seconds(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub insert: bool,
    pub get: bool,
    pub remove: bool,
}

// Session store that records writes and can be told to fail.
#[derive(Clone)]
pub(crate) struct RecordingSessionStore {
    sessions: SessionTable,
    failures: FailureFlags,
}

impl RecordingSessionStore {
    pub(crate) fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            failures: FailureFlags::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn insert_test_session(&self, token: impl Into<String>, session: Session) {
        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(token.into(), session);
    }

    pub(crate) fn get_test_session(&self, token: &str) -> Option<Session> {
        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.get(token).cloned()
    }
}

#[async_trait]
impl SessionStore for RecordingSessionStore {
    async fn insert(&self, token: String, session: Session) -> StoreResult<()> {
        if self.failures.insert {
            return Err(StoreError::Backend("insert failed".to_string()));
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        guard.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> StoreResult<Option<Session>> {
        if self.failures.get {
            return Err(StoreError::Backend("get failed".to_string()));
        }

        let guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> StoreResult<bool> {
        if self.failures.remove {
            return Err(StoreError::Backend("remove failed".to_string()));
        }

        let mut guard = self.sessions.lock().expect("sessions mutex poisoned");
        Ok(guard.remove(token).is_some())
    }
}

// Guest store that rejects the first `conflicts` inserts as hash-link collisions.
pub(crate) struct CollidingGuestStore {
    pub(crate) inner: MemoryStore,
    conflicts: AtomicUsize,
    pub(crate) attempts: AtomicUsize,
}

impl CollidingGuestStore {
    pub(crate) fn new(inner: MemoryStore, conflicts: usize) -> Self {
        Self {
            inner,
            conflicts: AtomicUsize::new(conflicts),
            attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl GuestStore for CollidingGuestStore {
    async fn insert_guest(&self, guest: NewGuest) -> StoreResult<Guest> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.conflicts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.conflicts.store(remaining - 1, Ordering::SeqCst);
            return Err(StoreError::Conflict);
        }
        self.inner.insert_guest(guest).await
    }

    async fn find_guest(&self, guest_id: i64) -> StoreResult<Option<Guest>> {
        self.inner.find_guest(guest_id).await
    }

    async fn find_guest_by_hash(&self, hash_link: &str) -> StoreResult<Option<Guest>> {
        self.inner.find_guest_by_hash(hash_link).await
    }

    async fn list_guests(&self, user_id: i64, page: Page) -> StoreResult<Vec<Guest>> {
        self.inner.list_guests(user_id, page).await
    }

    async fn update_guest(&self, guest: &Guest) -> StoreResult<Guest> {
        self.inner.update_guest(guest).await
    }

    async fn delete_guest(&self, guest_id: i64, user_id: i64) -> StoreResult<bool> {
        self.inner.delete_guest(guest_id, user_id).await
    }
}

// Guest store whose every call fails, for storage-error paths.
pub(crate) struct BrokenGuestStore;

#[async_trait]
impl GuestStore for BrokenGuestStore {
    async fn insert_guest(&self, _guest: NewGuest) -> StoreResult<Guest> {
        Err(StoreError::Backend("connection reset".to_string()))
    }

    async fn find_guest(&self, _guest_id: i64) -> StoreResult<Option<Guest>> {
        Err(StoreError::Backend("connection reset".to_string()))
    }

    async fn find_guest_by_hash(&self, _hash_link: &str) -> StoreResult<Option<Guest>> {
        Err(StoreError::Backend("connection reset".to_string()))
    }

    async fn list_guests(&self, _user_id: i64, _page: Page) -> StoreResult<Vec<Guest>> {
        Err(StoreError::Backend("connection reset".to_string()))
    }

    async fn update_guest(&self, _guest: &Guest) -> StoreResult<Guest> {
        Err(StoreError::Backend("connection reset".to_string()))
    }

    async fn delete_guest(&self, _guest_id: i64, _user_id: i64) -> StoreResult<bool> {
        Err(StoreError::Backend("connection reset".to_string()))
    }
}

pub(crate) async fn seed_owner(store: &MemoryStore, email: &str, full_name: &str) -> User {
    store
        .insert_user(NewUser {
            email: email.to_string(),
            full_name: full_name.to_string(),
            password_hash: "unused".to_string(),
        })
        .await
        .expect("seeding owner should succeed")
}

pub(crate) async fn seed_guest(store: &MemoryStore, user_id: i64, name: &str) -> Guest {
    store
        .insert_guest(NewGuest {
            user_id,
            name: name.to_string(),
            phone: None,
            confirmed: false,
            hash_link: crate::domain::hash_link::mint_hash_link(name),
        })
        .await
        .expect("seeding guest should succeed")
}
