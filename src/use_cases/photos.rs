use tracing::info;
use uuid::Uuid;

use crate::domain::entities::{Guest, NewPhoto, NewPhotoAlbum, Page, Photo, PhotoAlbum};
use crate::domain::errors::{AppError, StoreError};
use crate::domain::ports::{Clock, GuestStore, PhotoStore};
use crate::use_cases::guest_access::GuestAccess;
use crate::use_cases::validation;

pub struct PhotosUseCase<'a> {
    pub photos: &'a dyn PhotoStore,
    pub guests: &'a dyn GuestStore,
    pub clock: &'a dyn Clock,
}

impl PhotosUseCase<'_> {
    pub async fn upload(&self, hash: &str, filename: &str) -> Result<Photo, AppError> {
        let guest = self.resolve_guest(hash).await?;
        self.register_for_guest(&guest, filename).await
    }

    /// Records photo metadata in the guest's album, creating the album on the
    /// guest's first upload.
    pub async fn register_for_guest(&self, guest: &Guest, filename: &str) -> Result<Photo, AppError> {
        let filename = photo_filename(filename)?;
        let album = self.album_for(guest).await?;
        let hash_id = Uuid::new_v4().simple().to_string();

        let photo = NewPhoto {
            user_id: guest.user_id,
            guest_id: guest.id,
            album_id: album.id,
            storage_key: storage_key(guest.user_id, &hash_id, &filename),
            filename,
            hash_id,
            uploaded_at: self.clock.now_utc(),
        };
        let photo = self.photos.insert_photo(photo).await?;
        info!(guest_id = guest.id, photo_id = photo.id, "photo registered");
        Ok(photo)
    }

    pub async fn list_for_guest(&self, hash: &str) -> Result<Vec<Photo>, AppError> {
        let guest = self.resolve_guest(hash).await?;
        Ok(self.photos.list_photos_by_guest(guest.id).await?)
    }

    pub async fn list_all(&self, user_id: i64, page: Page) -> Result<Vec<Photo>, AppError> {
        Ok(self.photos.list_photos_by_user(user_id, page).await?)
    }

    pub async fn list_guest_photos(&self, user_id: i64, guest_id: i64) -> Result<Vec<Photo>, AppError> {
        let guest = self
            .guests
            .find_guest(guest_id)
            .await?
            .filter(|guest| guest.user_id == user_id)
            .ok_or(AppError::NotFound("guest"))?;
        Ok(self.photos.list_photos_by_guest(guest.id).await?)
    }

    pub async fn delete(&self, user_id: i64, photo_id: i64) -> Result<(), AppError> {
        if !self.photos.delete_photo(photo_id, user_id).await? {
            return Err(AppError::NotFound("photo"));
        }
        info!(user_id, photo_id, "photo deleted");
        Ok(())
    }

    async fn resolve_guest(&self, hash: &str) -> Result<Guest, AppError> {
        GuestAccess {
            guests: self.guests,
        }
        .resolve_guest_by_hash(hash)
        .await
    }

    async fn album_for(&self, guest: &Guest) -> Result<PhotoAlbum, AppError> {
        if let Some(album) = self.photos.find_album_by_guest(guest.id).await? {
            return Ok(album);
        }
        let album = NewPhotoAlbum {
            user_id: guest.user_id,
            guest_id: guest.id,
            name: format!("Fotos de {}", guest.name),
            description: format!("Album de fotos de {}", guest.name),
        };
        match self.photos.insert_album(album).await {
            Ok(album) => Ok(album),
            // A concurrent upload created it first.
            Err(StoreError::Conflict) => self
                .photos
                .find_album_by_guest(guest.id)
                .await?
                .ok_or_else(|| AppError::Internal("album vanished after conflict".to_string())),
            Err(err) => Err(err.into()),
        }
    }
}

pub fn storage_key(user_id: i64, hash_id: &str, filename: &str) -> String {
    format!("users/{user_id}/photos/{hash_id}-{filename}")
}

fn photo_filename(raw: &str) -> Result<String, AppError> {
    let name = validation::bounded_text("filename", raw, 1, 255)?;
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return Err(AppError::InvalidContent(
            "filename must not contain path separators".to_string(),
        ));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface_adapters::memory::MemoryStore;
    use crate::use_cases::test_support::{seed_guest, FixedClock, NOW};

    fn use_case<'a>(store: &'a MemoryStore, clock: &'a FixedClock) -> PhotosUseCase<'a> {
        PhotosUseCase {
            photos: store,
            guests: store,
            clock,
        }
    }

    #[tokio::test]
    async fn when_guest_uploads_first_photo_then_album_is_created_and_reused() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let guest = seed_guest(&store, 1, "Ana").await;
        let photos = use_case(&store, &clock);

        let first = photos.upload(&guest.hash_link, "bolo.jpg").await.expect("upload");
        let second = photos.upload(&guest.hash_link, "festa.jpg").await.expect("upload");

        assert_eq!(first.album_id, second.album_id);
        assert_ne!(first.hash_id, second.hash_id);
        assert_eq!(
            first.storage_key,
            format!("users/1/photos/{}-bolo.jpg", first.hash_id)
        );
        assert_eq!(first.uploaded_at, clock.now_utc());
    }

    #[tokio::test]
    async fn when_filename_has_a_path_then_invalid_content() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let guest = seed_guest(&store, 1, "Ana").await;

        let result = use_case(&store, &clock)
            .upload(&guest.hash_link, "../secret.jpg")
            .await;

        assert!(matches!(result, Err(AppError::InvalidContent(_))));
    }

    #[tokio::test]
    async fn when_owner_lists_another_owners_guest_photos_then_not_found() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let guest = seed_guest(&store, 1, "Ana").await;
        let photos = use_case(&store, &clock);
        photos.upload(&guest.hash_link, "bolo.jpg").await.expect("upload");

        let own = photos.list_guest_photos(1, guest.id).await.expect("list");
        let foreign = photos.list_guest_photos(2, guest.id).await;

        assert_eq!(own.len(), 1);
        assert_eq!(foreign.err(), Some(AppError::NotFound("guest")));
    }

    #[tokio::test]
    async fn when_owner_deletes_photo_of_another_owner_then_not_found() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let guest = seed_guest(&store, 1, "Ana").await;
        let photos = use_case(&store, &clock);
        let photo = photos.upload(&guest.hash_link, "bolo.jpg").await.expect("upload");

        let foreign = photos.delete(2, photo.id).await;
        let own = photos.delete(1, photo.id).await;

        assert_eq!(foreign.err(), Some(AppError::NotFound("photo")));
        assert!(own.is_ok());
        assert!(photos.list_all(1, Page::default()).await.expect("list").is_empty());
    }
}
