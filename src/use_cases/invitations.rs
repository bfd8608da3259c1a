use crate::domain::entities::{Guest, Invitation, NewInvitation};
use crate::domain::errors::{AppError, StoreError};
use crate::domain::ports::{GuestStore, InvitationStore};
use crate::use_cases::guest_access::GuestAccess;
use crate::use_cases::validation;

pub const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF";

pub struct InvitationInput {
    pub intro_text: String,
    pub video_url: Option<String>,
    pub photo_album_url: Option<String>,
    pub background_image_url: String,
    pub background_color: Option<String>,
}

#[derive(Default)]
pub struct InvitationUpdate {
    pub intro_text: Option<String>,
    pub video_url: Option<String>,
    pub photo_album_url: Option<String>,
    pub background_image_url: Option<String>,
    pub background_color: Option<String>,
}

pub struct InvitationsUseCase<'a> {
    pub invitations: &'a dyn InvitationStore,
    pub guests: &'a dyn GuestStore,
}

impl InvitationsUseCase<'_> {
    pub async fn create(
        &self,
        user_id: i64,
        input: InvitationInput,
    ) -> Result<Invitation, AppError> {
        let invitation = NewInvitation {
            user_id,
            intro_text: intro_text(&input.intro_text)?,
            video_url: optional(input.video_url, validation::video_url)?,
            photo_album_url: optional(input.photo_album_url, |url| {
                validation::http_url("photo_album_url", url)
            })?,
            background_image_url: validation::http_url(
                "background_image_url",
                &input.background_image_url,
            )?,
            background_color: validation::hex_color(
                "background_color",
                input
                    .background_color
                    .as_deref()
                    .unwrap_or(DEFAULT_BACKGROUND_COLOR),
            )?,
        };

        match self.invitations.insert_invitation(invitation).await {
            Ok(invitation) => Ok(invitation),
            Err(StoreError::Conflict) => Err(AppError::AlreadyExists("invitation")),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get(&self, user_id: i64) -> Result<Invitation, AppError> {
        self.invitations
            .find_invitation(user_id)
            .await?
            .ok_or(AppError::NotFound("invitation"))
    }

    // Empty strings clear the optional URLs.
    pub async fn update(
        &self,
        user_id: i64,
        update: InvitationUpdate,
    ) -> Result<Invitation, AppError> {
        let mut invitation = self.get(user_id).await?;
        if let Some(text) = update.intro_text {
            invitation.intro_text = intro_text(&text)?;
        }
        if let Some(url) = update.video_url {
            invitation.video_url = optional(Some(url), validation::video_url)?;
        }
        if let Some(url) = update.photo_album_url {
            invitation.photo_album_url = optional(Some(url), |url| {
                validation::http_url("photo_album_url", url)
            })?;
        }
        if let Some(url) = update.background_image_url {
            invitation.background_image_url =
                validation::http_url("background_image_url", &url)?;
        }
        if let Some(color) = update.background_color {
            invitation.background_color = validation::hex_color("background_color", &color)?;
        }
        Ok(self.invitations.update_invitation(&invitation).await?)
    }

    pub async fn delete(&self, user_id: i64) -> Result<(), AppError> {
        if !self.invitations.delete_invitation(user_id).await? {
            return Err(AppError::NotFound("invitation"));
        }
        Ok(())
    }

    // Guest view: the guest record plus the invitation of the guest's owner.
    pub async fn for_guest(&self, hash: &str) -> Result<(Guest, Invitation), AppError> {
        let guest = GuestAccess {
            guests: self.guests,
        }
        .resolve_guest_by_hash(hash)
        .await?;
        let invitation = self.get(guest.user_id).await?;
        Ok((guest, invitation))
    }
}

fn intro_text(raw: &str) -> Result<String, AppError> {
    validation::bounded_text("intro_text", raw, 1, 5000)
}

fn optional(
    value: Option<String>,
    check: impl Fn(&str) -> Result<String, AppError>,
) -> Result<Option<String>, AppError> {
    match value {
        Some(value) if !value.trim().is_empty() => check(&value).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface_adapters::memory::MemoryStore;
    use crate::use_cases::test_support::seed_guest;

    fn input() -> InvitationInput {
        InvitationInput {
            intro_text: "Com alegria convidamos".to_string(),
            video_url: Some("https://www.youtube.com/watch?v=abc".to_string()),
            photo_album_url: None,
            background_image_url: "https://cdn.example.com/bg.png".to_string(),
            background_color: None,
        }
    }

    #[tokio::test]
    async fn when_color_is_omitted_then_white_is_used() {
        let store = MemoryStore::new();
        let use_case = InvitationsUseCase {
            invitations: &store,
            guests: &store,
        };

        let invitation = use_case.create(1, input()).await.expect("create");

        assert_eq!(invitation.background_color, DEFAULT_BACKGROUND_COLOR);
    }

    #[tokio::test]
    async fn when_owner_creates_a_second_invitation_then_already_exists() {
        let store = MemoryStore::new();
        let use_case = InvitationsUseCase {
            invitations: &store,
            guests: &store,
        };
        use_case.create(1, input()).await.expect("create");

        let result = use_case.create(1, input()).await;

        assert_eq!(result.err(), Some(AppError::AlreadyExists("invitation")));
    }

    #[tokio::test]
    async fn when_video_is_not_youtube_or_vimeo_then_invalid_content() {
        let store = MemoryStore::new();
        let use_case = InvitationsUseCase {
            invitations: &store,
            guests: &store,
        };
        let mut bad = input();
        bad.video_url = Some("https://example.com/v.mp4".to_string());

        let result = use_case.create(1, bad).await;

        assert!(matches!(result, Err(AppError::InvalidContent(_))));
    }

    #[tokio::test]
    async fn when_update_clears_video_then_video_url_is_none() {
        let store = MemoryStore::new();
        let use_case = InvitationsUseCase {
            invitations: &store,
            guests: &store,
        };
        use_case.create(1, input()).await.expect("create");

        let updated = use_case
            .update(
                1,
                InvitationUpdate {
                    video_url: Some(String::new()),
                    background_color: Some("#abc".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.video_url, None);
        assert_eq!(updated.background_color, "#abc");
    }

    #[tokio::test]
    async fn when_guest_opens_invitation_then_owners_invitation_is_returned() {
        let store = MemoryStore::new();
        let guest = seed_guest(&store, 1, "Ana").await;
        let use_case = InvitationsUseCase {
            invitations: &store,
            guests: &store,
        };
        let created = use_case.create(1, input()).await.expect("create");

        let (resolved, invitation) = use_case
            .for_guest(&guest.hash_link)
            .await
            .expect("guest view");

        assert_eq!(resolved.id, guest.id);
        assert_eq!(invitation, created);
    }

    #[tokio::test]
    async fn when_owner_has_no_invitation_then_guest_view_is_not_found() {
        let store = MemoryStore::new();
        let guest = seed_guest(&store, 1, "Ana").await;
        let use_case = InvitationsUseCase {
            invitations: &store,
            guests: &store,
        };

        let result = use_case.for_guest(&guest.hash_link).await;

        assert_eq!(result.err(), Some(AppError::NotFound("invitation")));
    }
}
