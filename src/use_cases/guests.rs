use tracing::{info, warn};

use crate::domain::entities::{Guest, NewGuest, Page};
use crate::domain::errors::{AppError, StoreError};
use crate::domain::hash_link::mint_hash_link;
use crate::domain::ports::GuestStore;
use crate::use_cases::guest_access::GuestAccess;
use crate::use_cases::validation;

// Fresh tokens tried before giving up on a guest insert.
pub const MINT_ATTEMPTS: usize = 3;

pub struct GuestInput {
    pub name: String,
    pub phone: Option<String>,
    pub confirmed: bool,
}

// Fields an owner may change; the hash link is not among them.
#[derive(Default)]
pub struct GuestUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub confirmed: Option<bool>,
}

// Guest management for owners plus the two guest self-service actions.
pub struct GuestsUseCase<'a> {
    pub guests: &'a dyn GuestStore,
}

impl GuestsUseCase<'_> {
    pub async fn create(&self, user_id: i64, input: GuestInput) -> Result<Guest, AppError> {
        let name = validation::bounded_text("name", &input.name, 1, 100)?;
        let phone = input
            .phone
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .map(validation::phone)
            .transpose()?;

        for attempt in 1..=MINT_ATTEMPTS {
            let new_guest = NewGuest {
                user_id,
                name: name.clone(),
                phone: phone.clone(),
                confirmed: input.confirmed,
                hash_link: mint_hash_link(&name),
            };
            match self.guests.insert_guest(new_guest).await {
                Ok(guest) => {
                    info!(user_id, guest_id = guest.id, "guest created");
                    return Ok(guest);
                }
                Err(StoreError::Conflict) => {
                    warn!(user_id, attempt, "hash link collision, minting again");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(AppError::Internal(format!(
            "hash link collided {MINT_ATTEMPTS} times"
        )))
    }

    pub async fn list(&self, user_id: i64, page: Page) -> Result<Vec<Guest>, AppError> {
        Ok(self.guests.list_guests(user_id, page).await?)
    }

    pub async fn get(&self, user_id: i64, guest_id: i64) -> Result<Guest, AppError> {
        let guest = self
            .guests
            .find_guest(guest_id)
            .await?
            .ok_or(AppError::NotFound("guest"))?;
        if guest.user_id != user_id {
            return Err(AppError::AccessDenied("guest"));
        }
        Ok(guest)
    }

    pub async fn update(
        &self,
        user_id: i64,
        guest_id: i64,
        update: GuestUpdate,
    ) -> Result<Guest, AppError> {
        let mut guest = self.get(user_id, guest_id).await?;
        if let Some(name) = update.name {
            guest.name = validation::bounded_text("name", &name, 1, 100)?;
        }
        if let Some(phone) = update.phone {
            guest.phone = if phone.trim().is_empty() {
                None
            } else {
                Some(validation::phone(&phone)?)
            };
        }
        if let Some(confirmed) = update.confirmed {
            guest.confirmed = confirmed;
        }
        Ok(self.guests.update_guest(&guest).await?)
    }

    pub async fn delete(&self, user_id: i64, guest_id: i64) -> Result<(), AppError> {
        if !self.guests.delete_guest(guest_id, user_id).await? {
            return Err(AppError::NotFound("guest"));
        }
        info!(user_id, guest_id, "guest deleted");
        Ok(())
    }

    pub async fn view_own(&self, hash: &str) -> Result<Guest, AppError> {
        GuestAccess {
            guests: self.guests,
        }
        .resolve_guest_by_hash(hash)
        .await
    }

    // Idempotent: confirming twice leaves the guest confirmed.
    pub async fn confirm(&self, hash: &str) -> Result<Guest, AppError> {
        let mut guest = self.view_own(hash).await?;
        if guest.confirmed {
            return Ok(guest);
        }
        guest.confirmed = true;
        let guest = self.guests.update_guest(&guest).await?;
        info!(guest_id = guest.id, "guest confirmed attendance");
        Ok(guest)
    }
}
