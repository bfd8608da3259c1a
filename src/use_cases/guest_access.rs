// Hash-link resolution shared by every guest-facing workflow.
//
// Each guest route first resolves the token here (step a), then scopes the
// dependent resource to `guest.user_id` (step b), and finally, for writes,
// checks the touched record is tied to this exact guest (step c).

use tracing::debug;

use crate::domain::entities::Guest;
use crate::domain::errors::AppError;
use crate::domain::hash_link;
use crate::domain::ports::GuestStore;

pub struct GuestAccess<'a> {
    pub guests: &'a dyn GuestStore,
}

impl GuestAccess<'_> {
    /// Looks a guest up by exact hash-link equality. Malformed and unknown
    /// tokens fail with the same `NotFound`; malformed ones never hit storage.
    pub async fn resolve_guest_by_hash(&self, token: &str) -> Result<Guest, AppError> {
        if !hash_link::is_well_formed(token) {
            debug!("rejected malformed hash link");
            return Err(AppError::NotFound("guest"));
        }

        match self.guests.find_guest_by_hash(token).await? {
            Some(guest) => Ok(guest),
            None => {
                debug!("unknown hash link");
                Err(AppError::NotFound("guest"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface_adapters::memory::MemoryStore;
    use crate::use_cases::test_support::{seed_guest, BrokenGuestStore};

    #[tokio::test]
    async fn when_token_matches_then_returns_that_guest() {
        let store = MemoryStore::new();
        let guest = seed_guest(&store, 1, "Ana").await;
        let access = GuestAccess { guests: &store };

        let resolved = access
            .resolve_guest_by_hash(&guest.hash_link)
            .await
            .expect("expected guest to resolve");

        assert_eq!(resolved, guest);
    }

    #[tokio::test]
    async fn when_token_is_unknown_or_malformed_then_both_return_the_same_not_found() {
        let store = MemoryStore::new();
        seed_guest(&store, 1, "Ana").await;
        let access = GuestAccess { guests: &store };

        let unknown = access.resolve_guest_by_hash("ffffffffffffffff").await;
        let malformed = access.resolve_guest_by_hash("../../etc/passwd").await;

        assert_eq!(unknown.clone().err(), Some(AppError::NotFound("guest")));
        assert_eq!(unknown.err(), malformed.err());
    }

    #[tokio::test]
    async fn when_token_is_malformed_then_storage_is_not_consulted() {
        let access = GuestAccess {
            guests: &BrokenGuestStore,
        };

        let uppercase = access.resolve_guest_by_hash("0123456789ABCDEF").await;
        let well_formed = access.resolve_guest_by_hash("0123456789abcdef").await;

        assert_eq!(uppercase.err(), Some(AppError::NotFound("guest")));
        assert!(matches!(well_formed, Err(AppError::Database(_))));
    }
}
