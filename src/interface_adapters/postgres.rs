use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::entities::{
    ChallengeTask, GiftProduct, GiftPurchase, GiftShop, Guest, Invitation, Menu, MenuItem,
    NewChallengeTask, NewGiftProduct, NewGiftPurchase, NewGiftShop, NewGuest, NewInvitation,
    NewMenu, NewMenuItem, NewPhoto, NewPhotoAlbum, NewPhotoChallenge, NewSchedule,
    NewScheduleItem, NewTaskCompletion, NewTimeline, NewTimelineItem, NewUser, Page, Photo,
    PhotoAlbum, PhotoChallenge, Schedule, ScheduleItem, SiteConfiguration, SiteDetails,
    TaskCompletion, Timeline, TimelineItem, User,
};
use crate::domain::errors::StoreError;
use crate::domain::ports::{
    ChallengeStore, GiftShopStore, GuestStore, InvitationStore, MenuStore, PhotoStore,
    ScheduleStore, SiteConfigStore, StoreResult, TimelineStore, UserStore,
};

// PostgreSQL-backed adapter for every persistence port.
#[derive(Clone)]
pub struct PostgresStore {
    pub db: PgPool,
}

impl PostgresStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

// Unique violations become `Conflict` so use cases can retry or report them.
fn store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => StoreError::Conflict,
        _ => StoreError::Backend(err.to_string()),
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, full_name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, email, full_name, password_hash, is_active
            "#,
        )
        .bind(&user.email)
        .bind(&user.full_name)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, full_name, password_hash, is_active FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn find_user(&self, user_id: i64) -> StoreResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, full_name, password_hash, is_active FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }
}

const GUEST_COLUMNS: &str = "id, user_id, name, phone, confirmed, hash_link";

#[async_trait]
impl GuestStore for PostgresStore {
    async fn insert_guest(&self, guest: NewGuest) -> StoreResult<Guest> {
        sqlx::query_as::<_, Guest>(&format!(
            "INSERT INTO guests (user_id, name, phone, confirmed, hash_link)
             VALUES ($1, $2, $3, $4, $5) RETURNING {GUEST_COLUMNS}"
        ))
        .bind(guest.user_id)
        .bind(&guest.name)
        .bind(&guest.phone)
        .bind(guest.confirmed)
        .bind(&guest.hash_link)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn find_guest(&self, guest_id: i64) -> StoreResult<Option<Guest>> {
        sqlx::query_as::<_, Guest>(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests WHERE id = $1"
        ))
        .bind(guest_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn find_guest_by_hash(&self, hash_link: &str) -> StoreResult<Option<Guest>> {
        sqlx::query_as::<_, Guest>(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests WHERE hash_link = $1"
        ))
        .bind(hash_link)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn list_guests(&self, user_id: i64, page: Page) -> StoreResult<Vec<Guest>> {
        sqlx::query_as::<_, Guest>(&format!(
            "SELECT {GUEST_COLUMNS} FROM guests WHERE user_id = $1
             ORDER BY id OFFSET $2 LIMIT $3"
        ))
        .bind(user_id)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.db)
        .await
        .map_err(store_error)
    }

    async fn update_guest(&self, guest: &Guest) -> StoreResult<Guest> {
        sqlx::query_as::<_, Guest>(&format!(
            "UPDATE guests SET name = $2, phone = $3, confirmed = $4
             WHERE id = $1 RETURNING {GUEST_COLUMNS}"
        ))
        .bind(guest.id)
        .bind(&guest.name)
        .bind(&guest.phone)
        .bind(guest.confirmed)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn delete_guest(&self, guest_id: i64, user_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM guests WHERE id = $1 AND user_id = $2")
            .bind(guest_id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }
}

const INVITATION_COLUMNS: &str = "id, user_id, intro_text, video_url, photo_album_url, \
     background_image_url, background_color";

#[async_trait]
impl InvitationStore for PostgresStore {
    async fn find_invitation(&self, user_id: i64) -> StoreResult<Option<Invitation>> {
        sqlx::query_as::<_, Invitation>(&format!(
            "SELECT {INVITATION_COLUMNS} FROM invitations WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn insert_invitation(&self, invitation: NewInvitation) -> StoreResult<Invitation> {
        sqlx::query_as::<_, Invitation>(&format!(
            "INSERT INTO invitations (user_id, intro_text, video_url, photo_album_url,
                 background_image_url, background_color)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {INVITATION_COLUMNS}"
        ))
        .bind(invitation.user_id)
        .bind(&invitation.intro_text)
        .bind(&invitation.video_url)
        .bind(&invitation.photo_album_url)
        .bind(&invitation.background_image_url)
        .bind(&invitation.background_color)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn update_invitation(&self, invitation: &Invitation) -> StoreResult<Invitation> {
        sqlx::query_as::<_, Invitation>(&format!(
            "UPDATE invitations SET intro_text = $2, video_url = $3, photo_album_url = $4,
                 background_image_url = $5, background_color = $6
             WHERE id = $1 RETURNING {INVITATION_COLUMNS}"
        ))
        .bind(invitation.id)
        .bind(&invitation.intro_text)
        .bind(&invitation.video_url)
        .bind(&invitation.photo_album_url)
        .bind(&invitation.background_image_url)
        .bind(&invitation.background_color)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn delete_invitation(&self, user_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM invitations WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }
}

const PRODUCT_COLUMNS: &str = "id, shop_id, name, description, price_cents, image";
const PURCHASE_COLUMNS: &str = "id, product_id, guest_id, created_at, paid, paid_at";

#[async_trait]
impl GiftShopStore for PostgresStore {
    async fn find_shop(&self, user_id: i64) -> StoreResult<Option<GiftShop>> {
        sqlx::query_as::<_, GiftShop>(
            "SELECT id, user_id, name, pix_key FROM gift_shops WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn insert_shop(&self, shop: NewGiftShop) -> StoreResult<GiftShop> {
        sqlx::query_as::<_, GiftShop>(
            "INSERT INTO gift_shops (user_id, name, pix_key) VALUES ($1, $2, $3)
             RETURNING id, user_id, name, pix_key",
        )
        .bind(shop.user_id)
        .bind(&shop.name)
        .bind(&shop.pix_key)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn update_shop(&self, shop: &GiftShop) -> StoreResult<GiftShop> {
        sqlx::query_as::<_, GiftShop>(
            "UPDATE gift_shops SET name = $2, pix_key = $3 WHERE id = $1
             RETURNING id, user_id, name, pix_key",
        )
        .bind(shop.id)
        .bind(&shop.name)
        .bind(&shop.pix_key)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn delete_shop(&self, user_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM gift_shops WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_products(&self, shop_id: i64) -> StoreResult<Vec<GiftProduct>> {
        sqlx::query_as::<_, GiftProduct>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM gift_products WHERE shop_id = $1 ORDER BY id"
        ))
        .bind(shop_id)
        .fetch_all(&self.db)
        .await
        .map_err(store_error)
    }

    async fn find_product(&self, product_id: i64) -> StoreResult<Option<GiftProduct>> {
        sqlx::query_as::<_, GiftProduct>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM gift_products WHERE id = $1"
        ))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn insert_product(&self, product: NewGiftProduct) -> StoreResult<GiftProduct> {
        sqlx::query_as::<_, GiftProduct>(&format!(
            "INSERT INTO gift_products (shop_id, name, description, price_cents, image)
             VALUES ($1, $2, $3, $4, $5) RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(product.shop_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.image)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn update_product(&self, product: &GiftProduct) -> StoreResult<GiftProduct> {
        sqlx::query_as::<_, GiftProduct>(&format!(
            "UPDATE gift_products SET name = $2, description = $3, price_cents = $4, image = $5
             WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(&product.image)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn delete_product(&self, product_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM gift_products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_purchase(
        &self,
        product_id: i64,
        guest_id: i64,
    ) -> StoreResult<Option<GiftPurchase>> {
        sqlx::query_as::<_, GiftPurchase>(&format!(
            "SELECT {PURCHASE_COLUMNS} FROM gift_purchases
             WHERE product_id = $1 AND guest_id = $2"
        ))
        .bind(product_id)
        .bind(guest_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn list_purchases_for_shop(&self, shop_id: i64) -> StoreResult<Vec<GiftPurchase>> {
        sqlx::query_as::<_, GiftPurchase>(
            "SELECT p.id, p.product_id, p.guest_id, p.created_at, p.paid, p.paid_at
             FROM gift_purchases p
             JOIN gift_products g ON g.id = p.product_id
             WHERE g.shop_id = $1
             ORDER BY p.id",
        )
        .bind(shop_id)
        .fetch_all(&self.db)
        .await
        .map_err(store_error)
    }

    async fn insert_purchase(&self, purchase: NewGiftPurchase) -> StoreResult<GiftPurchase> {
        sqlx::query_as::<_, GiftPurchase>(&format!(
            "INSERT INTO gift_purchases (product_id, guest_id, created_at)
             VALUES ($1, $2, $3) RETURNING {PURCHASE_COLUMNS}"
        ))
        .bind(purchase.product_id)
        .bind(purchase.guest_id)
        .bind(purchase.created_at)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn update_purchase(&self, purchase: &GiftPurchase) -> StoreResult<GiftPurchase> {
        sqlx::query_as::<_, GiftPurchase>(&format!(
            "UPDATE gift_purchases SET paid = $2, paid_at = $3
             WHERE id = $1 RETURNING {PURCHASE_COLUMNS}"
        ))
        .bind(purchase.id)
        .bind(purchase.paid)
        .bind(purchase.paid_at)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }
}

const PHOTO_COLUMNS: &str =
    "id, user_id, guest_id, album_id, filename, storage_key, hash_id, uploaded_at";

#[async_trait]
impl PhotoStore for PostgresStore {
    async fn find_album_by_guest(&self, guest_id: i64) -> StoreResult<Option<PhotoAlbum>> {
        sqlx::query_as::<_, PhotoAlbum>(
            "SELECT id, user_id, guest_id, name, description FROM photo_albums
             WHERE guest_id = $1",
        )
        .bind(guest_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn insert_album(&self, album: NewPhotoAlbum) -> StoreResult<PhotoAlbum> {
        sqlx::query_as::<_, PhotoAlbum>(
            "INSERT INTO photo_albums (user_id, guest_id, name, description)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, guest_id, name, description",
        )
        .bind(album.user_id)
        .bind(album.guest_id)
        .bind(&album.name)
        .bind(&album.description)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn insert_photo(&self, photo: NewPhoto) -> StoreResult<Photo> {
        sqlx::query_as::<_, Photo>(&format!(
            "INSERT INTO photos (user_id, guest_id, album_id, filename, storage_key,
                 hash_id, uploaded_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {PHOTO_COLUMNS}"
        ))
        .bind(photo.user_id)
        .bind(photo.guest_id)
        .bind(photo.album_id)
        .bind(&photo.filename)
        .bind(&photo.storage_key)
        .bind(&photo.hash_id)
        .bind(photo.uploaded_at)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn find_photo(&self, photo_id: i64) -> StoreResult<Option<Photo>> {
        sqlx::query_as::<_, Photo>(&format!("SELECT {PHOTO_COLUMNS} FROM photos WHERE id = $1"))
            .bind(photo_id)
            .fetch_optional(&self.db)
            .await
            .map_err(store_error)
    }

    async fn list_photos_by_guest(&self, guest_id: i64) -> StoreResult<Vec<Photo>> {
        sqlx::query_as::<_, Photo>(&format!(
            "SELECT {PHOTO_COLUMNS} FROM photos WHERE guest_id = $1 ORDER BY id"
        ))
        .bind(guest_id)
        .fetch_all(&self.db)
        .await
        .map_err(store_error)
    }

    async fn list_photos_by_user(&self, user_id: i64, page: Page) -> StoreResult<Vec<Photo>> {
        sqlx::query_as::<_, Photo>(&format!(
            "SELECT {PHOTO_COLUMNS} FROM photos WHERE user_id = $1
             ORDER BY id OFFSET $2 LIMIT $3"
        ))
        .bind(user_id)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.db)
        .await
        .map_err(store_error)
    }

    async fn delete_photo(&self, photo_id: i64, user_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1 AND user_id = $2")
            .bind(photo_id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }
}

const TASK_COLUMNS: &str = "id, challenge_id, title, description, created_at";
const COMPLETION_COLUMNS: &str = "id, task_id, guest_id, photo_id, completed_at";

#[async_trait]
impl ChallengeStore for PostgresStore {
    async fn find_challenge(&self, user_id: i64) -> StoreResult<Option<PhotoChallenge>> {
        sqlx::query_as::<_, PhotoChallenge>(
            "SELECT id, user_id, title, created_at FROM photo_challenges WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn insert_challenge(
        &self,
        challenge: NewPhotoChallenge,
    ) -> StoreResult<PhotoChallenge> {
        sqlx::query_as::<_, PhotoChallenge>(
            "INSERT INTO photo_challenges (user_id, title, created_at) VALUES ($1, $2, $3)
             RETURNING id, user_id, title, created_at",
        )
        .bind(challenge.user_id)
        .bind(&challenge.title)
        .bind(challenge.created_at)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn update_challenge(&self, challenge: &PhotoChallenge) -> StoreResult<PhotoChallenge> {
        sqlx::query_as::<_, PhotoChallenge>(
            "UPDATE photo_challenges SET title = $2 WHERE id = $1
             RETURNING id, user_id, title, created_at",
        )
        .bind(challenge.id)
        .bind(&challenge.title)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn delete_challenge(&self, user_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM photo_challenges WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_tasks(&self, challenge_id: i64) -> StoreResult<Vec<ChallengeTask>> {
        sqlx::query_as::<_, ChallengeTask>(&format!(
            "SELECT {TASK_COLUMNS} FROM challenge_tasks WHERE challenge_id = $1
             ORDER BY created_at, id"
        ))
        .bind(challenge_id)
        .fetch_all(&self.db)
        .await
        .map_err(store_error)
    }

    async fn find_task(&self, task_id: i64) -> StoreResult<Option<ChallengeTask>> {
        sqlx::query_as::<_, ChallengeTask>(&format!(
            "SELECT {TASK_COLUMNS} FROM challenge_tasks WHERE id = $1"
        ))
        .bind(task_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn insert_task(&self, task: NewChallengeTask) -> StoreResult<ChallengeTask> {
        sqlx::query_as::<_, ChallengeTask>(&format!(
            "INSERT INTO challenge_tasks (challenge_id, title, description, created_at)
             VALUES ($1, $2, $3, $4) RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.challenge_id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.created_at)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn update_task(&self, task: &ChallengeTask) -> StoreResult<ChallengeTask> {
        sqlx::query_as::<_, ChallengeTask>(&format!(
            "UPDATE challenge_tasks SET title = $2, description = $3
             WHERE id = $1 RETURNING {TASK_COLUMNS}"
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn delete_task(&self, task_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM challenge_tasks WHERE id = $1")
            .bind(task_id)
            .execute(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_completions(&self, challenge_id: i64) -> StoreResult<Vec<TaskCompletion>> {
        sqlx::query_as::<_, TaskCompletion>(
            "SELECT c.id, c.task_id, c.guest_id, c.photo_id, c.completed_at
             FROM task_completions c
             JOIN challenge_tasks t ON t.id = c.task_id
             WHERE t.challenge_id = $1
             ORDER BY c.completed_at, c.id",
        )
        .bind(challenge_id)
        .fetch_all(&self.db)
        .await
        .map_err(store_error)
    }

    async fn find_completion(
        &self,
        task_id: i64,
        guest_id: i64,
    ) -> StoreResult<Option<TaskCompletion>> {
        sqlx::query_as::<_, TaskCompletion>(&format!(
            "SELECT {COMPLETION_COLUMNS} FROM task_completions
             WHERE task_id = $1 AND guest_id = $2"
        ))
        .bind(task_id)
        .bind(guest_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn insert_completion(
        &self,
        completion: NewTaskCompletion,
    ) -> StoreResult<TaskCompletion> {
        sqlx::query_as::<_, TaskCompletion>(&format!(
            "INSERT INTO task_completions (task_id, guest_id, photo_id, completed_at)
             VALUES ($1, $2, $3, $4) RETURNING {COMPLETION_COLUMNS}"
        ))
        .bind(completion.task_id)
        .bind(completion.guest_id)
        .bind(completion.photo_id)
        .bind(completion.completed_at)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }
}

const TIMELINE_ITEM_COLUMNS: &str =
    "id, timeline_id, title, text, video_url, image_url, photo_id, date";

#[async_trait]
impl TimelineStore for PostgresStore {
    async fn find_timeline(&self, user_id: i64) -> StoreResult<Option<Timeline>> {
        sqlx::query_as::<_, Timeline>(
            "SELECT id, user_id, title, created_at FROM timelines WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn insert_timeline(&self, timeline: NewTimeline) -> StoreResult<Timeline> {
        sqlx::query_as::<_, Timeline>(
            "INSERT INTO timelines (user_id, title, created_at) VALUES ($1, $2, $3)
             RETURNING id, user_id, title, created_at",
        )
        .bind(timeline.user_id)
        .bind(&timeline.title)
        .bind(timeline.created_at)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn update_timeline(&self, timeline: &Timeline) -> StoreResult<Timeline> {
        sqlx::query_as::<_, Timeline>(
            "UPDATE timelines SET title = $2 WHERE id = $1
             RETURNING id, user_id, title, created_at",
        )
        .bind(timeline.id)
        .bind(&timeline.title)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn delete_timeline(&self, user_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM timelines WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_timeline_items(&self, timeline_id: i64) -> StoreResult<Vec<TimelineItem>> {
        sqlx::query_as::<_, TimelineItem>(&format!(
            "SELECT {TIMELINE_ITEM_COLUMNS} FROM timeline_items WHERE timeline_id = $1 ORDER BY id"
        ))
        .bind(timeline_id)
        .fetch_all(&self.db)
        .await
        .map_err(store_error)
    }

    async fn find_timeline_item(&self, item_id: i64) -> StoreResult<Option<TimelineItem>> {
        sqlx::query_as::<_, TimelineItem>(&format!(
            "SELECT {TIMELINE_ITEM_COLUMNS} FROM timeline_items WHERE id = $1"
        ))
        .bind(item_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn insert_timeline_item(&self, item: NewTimelineItem) -> StoreResult<TimelineItem> {
        sqlx::query_as::<_, TimelineItem>(&format!(
            "INSERT INTO timeline_items (timeline_id, title, text, video_url, image_url, photo_id, date)
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {TIMELINE_ITEM_COLUMNS}"
        ))
        .bind(item.timeline_id)
        .bind(&item.title)
        .bind(&item.text)
        .bind(&item.video_url)
        .bind(&item.image_url)
        .bind(item.photo_id)
        .bind(item.date)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn update_timeline_item(&self, item: &TimelineItem) -> StoreResult<TimelineItem> {
        sqlx::query_as::<_, TimelineItem>(&format!(
            "UPDATE timeline_items
             SET title = $2, text = $3, video_url = $4, image_url = $5, photo_id = $6, date = $7
             WHERE id = $1 RETURNING {TIMELINE_ITEM_COLUMNS}"
        ))
        .bind(item.id)
        .bind(&item.title)
        .bind(&item.text)
        .bind(&item.video_url)
        .bind(&item.image_url)
        .bind(item.photo_id)
        .bind(item.date)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn delete_timeline_item(&self, item_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM timeline_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }
}

const MENU_ITEM_COLUMNS: &str =
    "id, menu_id, name, description, restrictions, calories, observations";

#[async_trait]
impl MenuStore for PostgresStore {
    async fn insert_menu(&self, menu: NewMenu) -> StoreResult<Menu> {
        sqlx::query_as::<_, Menu>(
            "INSERT INTO menus (user_id, title, created_at) VALUES ($1, $2, $3)
             RETURNING id, user_id, title, created_at",
        )
        .bind(menu.user_id)
        .bind(&menu.title)
        .bind(menu.created_at)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn find_menu(&self, menu_id: i64) -> StoreResult<Option<Menu>> {
        sqlx::query_as::<_, Menu>("SELECT id, user_id, title, created_at FROM menus WHERE id = $1")
            .bind(menu_id)
            .fetch_optional(&self.db)
            .await
            .map_err(store_error)
    }

    async fn list_menus(&self, user_id: i64, page: Page) -> StoreResult<Vec<Menu>> {
        sqlx::query_as::<_, Menu>(
            "SELECT id, user_id, title, created_at FROM menus WHERE user_id = $1
             ORDER BY id OFFSET $2 LIMIT $3",
        )
        .bind(user_id)
        .bind(page.skip)
        .bind(page.limit)
        .fetch_all(&self.db)
        .await
        .map_err(store_error)
    }

    async fn update_menu(&self, menu: &Menu) -> StoreResult<Menu> {
        sqlx::query_as::<_, Menu>(
            "UPDATE menus SET title = $2 WHERE id = $1
             RETURNING id, user_id, title, created_at",
        )
        .bind(menu.id)
        .bind(&menu.title)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn delete_menu(&self, menu_id: i64, user_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM menus WHERE id = $1 AND user_id = $2")
            .bind(menu_id)
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_menu_items(&self, menu_id: i64) -> StoreResult<Vec<MenuItem>> {
        sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_ITEM_COLUMNS} FROM menu_items WHERE menu_id = $1 ORDER BY id"
        ))
        .bind(menu_id)
        .fetch_all(&self.db)
        .await
        .map_err(store_error)
    }

    async fn find_menu_item(&self, item_id: i64) -> StoreResult<Option<MenuItem>> {
        sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_ITEM_COLUMNS} FROM menu_items WHERE id = $1"
        ))
        .bind(item_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn insert_menu_item(&self, item: NewMenuItem) -> StoreResult<MenuItem> {
        sqlx::query_as::<_, MenuItem>(&format!(
            "INSERT INTO menu_items (menu_id, name, description, restrictions, calories, observations)
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {MENU_ITEM_COLUMNS}"
        ))
        .bind(item.menu_id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.restrictions)
        .bind(item.calories)
        .bind(&item.observations)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn update_menu_item(&self, item: &MenuItem) -> StoreResult<MenuItem> {
        sqlx::query_as::<_, MenuItem>(&format!(
            "UPDATE menu_items
             SET name = $2, description = $3, restrictions = $4, calories = $5, observations = $6
             WHERE id = $1 RETURNING {MENU_ITEM_COLUMNS}"
        ))
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.restrictions)
        .bind(item.calories)
        .bind(&item.observations)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn delete_menu_item(&self, item_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }
}

const SCHEDULE_ITEM_COLUMNS: &str = "id, schedule_id, title, description, time";

#[async_trait]
impl ScheduleStore for PostgresStore {
    async fn find_schedule(&self, user_id: i64) -> StoreResult<Option<Schedule>> {
        sqlx::query_as::<_, Schedule>(
            "SELECT id, user_id, title, wedding_date FROM schedules WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn insert_schedule(
        &self,
        schedule: NewSchedule,
        items: Vec<NewScheduleItem>,
    ) -> StoreResult<Schedule> {
        let mut tx = self.db.begin().await.map_err(store_error)?;
        let row = sqlx::query_as::<_, Schedule>(
            "INSERT INTO schedules (user_id, title, wedding_date) VALUES ($1, $2, $3)
             RETURNING id, user_id, title, wedding_date",
        )
        .bind(schedule.user_id)
        .bind(&schedule.title)
        .bind(schedule.wedding_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(store_error)?;
        for item in items {
            sqlx::query(
                "INSERT INTO schedule_items (schedule_id, title, description, time)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(row.id)
            .bind(&item.title)
            .bind(&item.description)
            .bind(item.time)
            .execute(&mut *tx)
            .await
            .map_err(store_error)?;
        }
        tx.commit().await.map_err(store_error)?;
        Ok(row)
    }

    async fn update_schedule(&self, schedule: &Schedule) -> StoreResult<Schedule> {
        sqlx::query_as::<_, Schedule>(
            "UPDATE schedules SET title = $2, wedding_date = $3 WHERE id = $1
             RETURNING id, user_id, title, wedding_date",
        )
        .bind(schedule.id)
        .bind(&schedule.title)
        .bind(schedule.wedding_date)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn delete_schedule(&self, user_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM schedules WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_schedule_items(&self, schedule_id: i64) -> StoreResult<Vec<ScheduleItem>> {
        sqlx::query_as::<_, ScheduleItem>(&format!(
            "SELECT {SCHEDULE_ITEM_COLUMNS} FROM schedule_items WHERE schedule_id = $1
             ORDER BY time, id"
        ))
        .bind(schedule_id)
        .fetch_all(&self.db)
        .await
        .map_err(store_error)
    }

    async fn find_schedule_item(&self, item_id: i64) -> StoreResult<Option<ScheduleItem>> {
        sqlx::query_as::<_, ScheduleItem>(&format!(
            "SELECT {SCHEDULE_ITEM_COLUMNS} FROM schedule_items WHERE id = $1"
        ))
        .bind(item_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn insert_schedule_item(
        &self,
        schedule_id: i64,
        item: NewScheduleItem,
    ) -> StoreResult<ScheduleItem> {
        sqlx::query_as::<_, ScheduleItem>(&format!(
            "INSERT INTO schedule_items (schedule_id, title, description, time)
             VALUES ($1, $2, $3, $4) RETURNING {SCHEDULE_ITEM_COLUMNS}"
        ))
        .bind(schedule_id)
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.time)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn update_schedule_item(&self, item: &ScheduleItem) -> StoreResult<ScheduleItem> {
        sqlx::query_as::<_, ScheduleItem>(&format!(
            "UPDATE schedule_items SET title = $2, description = $3, time = $4
             WHERE id = $1 RETURNING {SCHEDULE_ITEM_COLUMNS}"
        ))
        .bind(item.id)
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.time)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn delete_schedule_item(&self, item_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM schedule_items WHERE id = $1")
            .bind(item_id)
            .execute(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }
}

const SITE_CONFIG_COLUMNS: &str = "id, user_id, primary_color, secondary_color, pix_key, \
     wedding_date, wedding_time, venue, city, state, country, partner_one_name, \
     partner_two_name, template_id";

#[async_trait]
impl SiteConfigStore for PostgresStore {
    async fn find_site_config(&self, user_id: i64) -> StoreResult<Option<SiteConfiguration>> {
        sqlx::query_as::<_, SiteConfiguration>(&format!(
            "SELECT {SITE_CONFIG_COLUMNS} FROM site_configs WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.db)
        .await
        .map_err(store_error)
    }

    async fn insert_site_config(
        &self,
        user_id: i64,
        details: SiteDetails,
    ) -> StoreResult<SiteConfiguration> {
        sqlx::query_as::<_, SiteConfiguration>(&format!(
            "INSERT INTO site_configs (user_id, primary_color, secondary_color, pix_key,
                 wedding_date, wedding_time, venue, city, state, country,
                 partner_one_name, partner_two_name, template_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {SITE_CONFIG_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&details.primary_color)
        .bind(&details.secondary_color)
        .bind(&details.pix_key)
        .bind(&details.wedding_date)
        .bind(&details.wedding_time)
        .bind(&details.venue)
        .bind(&details.city)
        .bind(&details.state)
        .bind(&details.country)
        .bind(&details.partner_one_name)
        .bind(&details.partner_two_name)
        .bind(&details.template_id)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn update_site_config(
        &self,
        config: &SiteConfiguration,
    ) -> StoreResult<SiteConfiguration> {
        let details = &config.details;
        sqlx::query_as::<_, SiteConfiguration>(&format!(
            "UPDATE site_configs SET primary_color = $2, secondary_color = $3, pix_key = $4,
                 wedding_date = $5, wedding_time = $6, venue = $7, city = $8, state = $9,
                 country = $10, partner_one_name = $11, partner_two_name = $12, template_id = $13
             WHERE id = $1 RETURNING {SITE_CONFIG_COLUMNS}"
        ))
        .bind(config.id)
        .bind(&details.primary_color)
        .bind(&details.secondary_color)
        .bind(&details.pix_key)
        .bind(&details.wedding_date)
        .bind(&details.wedding_time)
        .bind(&details.venue)
        .bind(&details.city)
        .bind(&details.state)
        .bind(&details.country)
        .bind(&details.partner_one_name)
        .bind(&details.partner_two_name)
        .bind(&details.template_id)
        .fetch_one(&self.db)
        .await
        .map_err(store_error)
    }

    async fn delete_site_config(&self, user_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM site_configs WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(store_error)?;
        Ok(result.rows_affected() > 0)
    }
}
