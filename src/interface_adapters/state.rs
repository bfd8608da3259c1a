use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

use crate::domain::entities::Session;
use crate::domain::ports::{
    ChallengeStore, Clock, GiftShopStore, GuestStore, InvitationStore, MenuStore, PhotoStore,
    ScheduleStore, SessionStore, SiteConfigStore, StoreResult, TimelineStore, UserStore,
};
use crate::interface_adapters::memory::MemoryStore;

// Request-independent knobs the handlers read.
#[derive(Clone, Debug)]
pub struct ServiceSettings {
    // Hides internal error details from responses.
    pub production: bool,
    pub guest_link_base_url: String,
    pub pix_merchant_city: String,
    pub session_ttl_seconds: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            production: false,
            guest_link_base_url: "https://weddingplanner.com.br".to_string(),
            pix_merchant_city: "ANANINDEUA".to_string(),
            session_ttl_seconds: 8 * 24 * 60 * 60,
        }
    }
}

// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub guests: Arc<dyn GuestStore>,
    pub invitations: Arc<dyn InvitationStore>,
    pub gift_shops: Arc<dyn GiftShopStore>,
    pub photos: Arc<dyn PhotoStore>,
    pub challenges: Arc<dyn ChallengeStore>,
    pub timelines: Arc<dyn TimelineStore>,
    pub menus: Arc<dyn MenuStore>,
    pub schedules: Arc<dyn ScheduleStore>,
    pub site_configs: Arc<dyn SiteConfigStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub clock: Arc<dyn Clock>,
    pub settings: Arc<ServiceSettings>,
}

impl AppState {
    // Wires one store object behind every persistence port.
    pub fn with_store<S>(store: S, settings: ServiceSettings) -> Self
    where
        S: UserStore
            + GuestStore
            + InvitationStore
            + GiftShopStore
            + PhotoStore
            + ChallengeStore
            + TimelineStore
            + MenuStore
            + ScheduleStore
            + SiteConfigStore
            + Clone
            + 'static,
    {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self {
            users: Arc::new(store.clone()),
            guests: Arc::new(store.clone()),
            invitations: Arc::new(store.clone()),
            gift_shops: Arc::new(store.clone()),
            photos: Arc::new(store.clone()),
            challenges: Arc::new(store.clone()),
            timelines: Arc::new(store.clone()),
            menus: Arc::new(store.clone()),
            schedules: Arc::new(store.clone()),
            site_configs: Arc::new(store),
            sessions: Arc::new(InMemorySessionStore::new(clock.clone())),
            clock,
            settings: Arc::new(settings),
        }
    }

    pub fn in_memory(settings: ServiceSettings) -> Self {
        Self::with_store(MemoryStore::new(), settings)
    }
}

// In-memory session store adapter for owner sessions. Expired entries are
// dropped whenever a new session is stored.
#[derive(Clone)]
pub struct InMemorySessionStore {
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    clock: Arc<dyn Clock>,
}

impl InMemorySessionStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            clock,
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, token: String, session: Session) -> StoreResult<()> {
        let now = self.clock.now_epoch_seconds();
        let mut sessions = self.sessions.lock().await;
        sessions.retain(|_, existing| existing.expires_at > now);
        sessions.insert(token, session);
        Ok(())
    }

    async fn get(&self, token: &str) -> StoreResult<Option<Session>> {
        let sessions = self.sessions.lock().await;
        Ok(sessions.get(token).cloned())
    }

    async fn remove(&self, token: &str) -> StoreResult<bool> {
        let mut sessions = self.sessions.lock().await;
        Ok(sessions.remove(token).is_some())
    }
}

// System clock adapter used by the use cases.
#[derive(Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::{FixedClock, NOW};

    fn session(user_id: i64, expires_at: u64) -> Session {
        Session {
            user_id,
            email: "ana@example.com".to_string(),
            session_id: format!("session-{user_id}"),
            expires_at,
        }
    }

    #[tokio::test]
    async fn when_new_session_is_stored_then_expired_ones_are_pruned() {
        let store = InMemorySessionStore::new(Arc::new(FixedClock(NOW)));
        store
            .insert("abandoned".to_string(), session(1, NOW - 1))
            .await
            .expect("insert");
        store
            .insert("at-deadline".to_string(), session(2, NOW))
            .await
            .expect("insert");
        store
            .insert("live".to_string(), session(3, NOW + 60))
            .await
            .expect("insert");

        store
            .insert("fresh".to_string(), session(4, NOW + 3600))
            .await
            .expect("insert");

        let sessions = store.sessions.lock().await;
        let mut tokens: Vec<&str> = sessions.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        assert_eq!(tokens, vec!["fresh", "live"]);
    }
}
