use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::entities::{
    ChallengeTask, GiftProduct, GiftPurchase, GiftShop, Guest, Invitation, Menu, MenuItem,
    NewChallengeTask, NewGiftProduct, NewGiftPurchase, NewGiftShop, NewGuest, NewInvitation,
    NewMenu, NewMenuItem, NewPhoto, NewPhotoAlbum, NewPhotoChallenge, NewSchedule,
    NewScheduleItem, NewTaskCompletion, NewTimeline, NewTimelineItem, NewUser, Page, Photo,
    PhotoAlbum, PhotoChallenge, Schedule, ScheduleItem, Session, SiteConfiguration, SiteDetails,
    TaskCompletion, Timeline, TimelineItem, User,
};
use crate::domain::errors::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

// Port for owner session storage used by account use cases.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert(&self, token: String, session: Session) -> StoreResult<()>;
    async fn get(&self, token: &str) -> StoreResult<Option<Session>>;
    async fn remove(&self, token: &str) -> StoreResult<bool>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;

    fn now_utc(&self) -> DateTime<Utc> {
        let seconds = i64::try_from(self.now_epoch_seconds()).unwrap_or(i64::MAX);
        Utc.timestamp_opt(seconds, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    // Conflict when the email is already registered.
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_user(&self, user_id: i64) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait GuestStore: Send + Sync {
    // Conflict when the hash link is already taken.
    async fn insert_guest(&self, guest: NewGuest) -> StoreResult<Guest>;
    async fn find_guest(&self, guest_id: i64) -> StoreResult<Option<Guest>>;
    async fn find_guest_by_hash(&self, hash_link: &str) -> StoreResult<Option<Guest>>;
    async fn list_guests(&self, user_id: i64, page: Page) -> StoreResult<Vec<Guest>>;
    // Persists name, phone and confirmed; the hash link is never written.
    async fn update_guest(&self, guest: &Guest) -> StoreResult<Guest>;
    async fn delete_guest(&self, guest_id: i64, user_id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait InvitationStore: Send + Sync {
    async fn find_invitation(&self, user_id: i64) -> StoreResult<Option<Invitation>>;
    async fn insert_invitation(&self, invitation: NewInvitation) -> StoreResult<Invitation>;
    async fn update_invitation(&self, invitation: &Invitation) -> StoreResult<Invitation>;
    async fn delete_invitation(&self, user_id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait GiftShopStore: Send + Sync {
    async fn find_shop(&self, user_id: i64) -> StoreResult<Option<GiftShop>>;
    async fn insert_shop(&self, shop: NewGiftShop) -> StoreResult<GiftShop>;
    async fn update_shop(&self, shop: &GiftShop) -> StoreResult<GiftShop>;
    // Removes the shop together with its products and their purchases.
    async fn delete_shop(&self, user_id: i64) -> StoreResult<bool>;

    async fn list_products(&self, shop_id: i64) -> StoreResult<Vec<GiftProduct>>;
    async fn find_product(&self, product_id: i64) -> StoreResult<Option<GiftProduct>>;
    async fn insert_product(&self, product: NewGiftProduct) -> StoreResult<GiftProduct>;
    async fn update_product(&self, product: &GiftProduct) -> StoreResult<GiftProduct>;
    async fn delete_product(&self, product_id: i64) -> StoreResult<bool>;

    async fn find_purchase(
        &self,
        product_id: i64,
        guest_id: i64,
    ) -> StoreResult<Option<GiftPurchase>>;
    async fn list_purchases_for_shop(&self, shop_id: i64) -> StoreResult<Vec<GiftPurchase>>;
    // Conflict when the guest already holds a purchase for the product.
    async fn insert_purchase(&self, purchase: NewGiftPurchase) -> StoreResult<GiftPurchase>;
    async fn update_purchase(&self, purchase: &GiftPurchase) -> StoreResult<GiftPurchase>;
}

#[async_trait]
pub trait PhotoStore: Send + Sync {
    async fn find_album_by_guest(&self, guest_id: i64) -> StoreResult<Option<PhotoAlbum>>;
    async fn insert_album(&self, album: NewPhotoAlbum) -> StoreResult<PhotoAlbum>;
    async fn insert_photo(&self, photo: NewPhoto) -> StoreResult<Photo>;
    async fn find_photo(&self, photo_id: i64) -> StoreResult<Option<Photo>>;
    async fn list_photos_by_guest(&self, guest_id: i64) -> StoreResult<Vec<Photo>>;
    async fn list_photos_by_user(&self, user_id: i64, page: Page) -> StoreResult<Vec<Photo>>;
    async fn delete_photo(&self, photo_id: i64, user_id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait ChallengeStore: Send + Sync {
    async fn find_challenge(&self, user_id: i64) -> StoreResult<Option<PhotoChallenge>>;
    async fn insert_challenge(&self, challenge: NewPhotoChallenge)
        -> StoreResult<PhotoChallenge>;
    async fn update_challenge(&self, challenge: &PhotoChallenge) -> StoreResult<PhotoChallenge>;
    // Removes the challenge with its tasks and their completions.
    async fn delete_challenge(&self, user_id: i64) -> StoreResult<bool>;

    // Ordered by creation time, then id.
    async fn list_tasks(&self, challenge_id: i64) -> StoreResult<Vec<ChallengeTask>>;
    async fn find_task(&self, task_id: i64) -> StoreResult<Option<ChallengeTask>>;
    async fn insert_task(&self, task: NewChallengeTask) -> StoreResult<ChallengeTask>;
    async fn update_task(&self, task: &ChallengeTask) -> StoreResult<ChallengeTask>;
    async fn delete_task(&self, task_id: i64) -> StoreResult<bool>;

    async fn list_completions(&self, challenge_id: i64) -> StoreResult<Vec<TaskCompletion>>;
    async fn find_completion(
        &self,
        task_id: i64,
        guest_id: i64,
    ) -> StoreResult<Option<TaskCompletion>>;
    // Conflict when the guest already completed the task.
    async fn insert_completion(
        &self,
        completion: NewTaskCompletion,
    ) -> StoreResult<TaskCompletion>;
}

#[async_trait]
pub trait TimelineStore: Send + Sync {
    async fn find_timeline(&self, user_id: i64) -> StoreResult<Option<Timeline>>;
    // Conflict when the owner already has a timeline.
    async fn insert_timeline(&self, timeline: NewTimeline) -> StoreResult<Timeline>;
    async fn update_timeline(&self, timeline: &Timeline) -> StoreResult<Timeline>;
    // Removes the timeline with its items.
    async fn delete_timeline(&self, user_id: i64) -> StoreResult<bool>;

    // Ordered by id.
    async fn list_timeline_items(&self, timeline_id: i64) -> StoreResult<Vec<TimelineItem>>;
    async fn find_timeline_item(&self, item_id: i64) -> StoreResult<Option<TimelineItem>>;
    async fn insert_timeline_item(&self, item: NewTimelineItem) -> StoreResult<TimelineItem>;
    async fn update_timeline_item(&self, item: &TimelineItem) -> StoreResult<TimelineItem>;
    async fn delete_timeline_item(&self, item_id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait MenuStore: Send + Sync {
    async fn insert_menu(&self, menu: NewMenu) -> StoreResult<Menu>;
    async fn find_menu(&self, menu_id: i64) -> StoreResult<Option<Menu>>;
    async fn list_menus(&self, user_id: i64, page: Page) -> StoreResult<Vec<Menu>>;
    async fn update_menu(&self, menu: &Menu) -> StoreResult<Menu>;
    // Removes the menu with its items when it belongs to `user_id`.
    async fn delete_menu(&self, menu_id: i64, user_id: i64) -> StoreResult<bool>;

    async fn list_menu_items(&self, menu_id: i64) -> StoreResult<Vec<MenuItem>>;
    async fn find_menu_item(&self, item_id: i64) -> StoreResult<Option<MenuItem>>;
    async fn insert_menu_item(&self, item: NewMenuItem) -> StoreResult<MenuItem>;
    async fn update_menu_item(&self, item: &MenuItem) -> StoreResult<MenuItem>;
    async fn delete_menu_item(&self, item_id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    async fn find_schedule(&self, user_id: i64) -> StoreResult<Option<Schedule>>;
    // Writes the schedule and its first items together. Conflict when the
    // owner already has a schedule.
    async fn insert_schedule(
        &self,
        schedule: NewSchedule,
        items: Vec<NewScheduleItem>,
    ) -> StoreResult<Schedule>;
    async fn update_schedule(&self, schedule: &Schedule) -> StoreResult<Schedule>;
    // Removes the schedule with its items.
    async fn delete_schedule(&self, user_id: i64) -> StoreResult<bool>;

    // Ordered by time, then id.
    async fn list_schedule_items(&self, schedule_id: i64) -> StoreResult<Vec<ScheduleItem>>;
    async fn find_schedule_item(&self, item_id: i64) -> StoreResult<Option<ScheduleItem>>;
    async fn insert_schedule_item(
        &self,
        schedule_id: i64,
        item: NewScheduleItem,
    ) -> StoreResult<ScheduleItem>;
    async fn update_schedule_item(&self, item: &ScheduleItem) -> StoreResult<ScheduleItem>;
    async fn delete_schedule_item(&self, item_id: i64) -> StoreResult<bool>;
}

#[async_trait]
pub trait SiteConfigStore: Send + Sync {
    async fn find_site_config(&self, user_id: i64) -> StoreResult<Option<SiteConfiguration>>;
    // Conflict when the owner already has a configuration.
    async fn insert_site_config(
        &self,
        user_id: i64,
        details: SiteDetails,
    ) -> StoreResult<SiteConfiguration>;
    async fn update_site_config(&self, config: &SiteConfiguration)
        -> StoreResult<SiteConfiguration>;
    async fn delete_site_config(&self, user_id: i64) -> StoreResult<bool>;
}
