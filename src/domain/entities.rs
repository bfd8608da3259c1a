use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

// Persisted rows derive `FromRow`; the Postgres adapter reads them as-is.

// Event owner account.
#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub is_active: bool,
}

#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
}

// Owner session record stored in memory.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub user_id: i64,
    pub email: String,
    pub session_id: String,
    pub expires_at: u64,
}

// Invited guest. `hash_link` is the guest's only credential and never changes.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct Guest {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub confirmed: bool,
    pub hash_link: String,
}

#[derive(Clone, Debug)]
pub struct NewGuest {
    pub user_id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub confirmed: bool,
    pub hash_link: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct Invitation {
    pub id: i64,
    pub user_id: i64,
    pub intro_text: String,
    pub video_url: Option<String>,
    pub photo_album_url: Option<String>,
    pub background_image_url: String,
    pub background_color: String,
}

#[derive(Clone, Debug)]
pub struct NewInvitation {
    pub user_id: i64,
    pub intro_text: String,
    pub video_url: Option<String>,
    pub photo_album_url: Option<String>,
    pub background_image_url: String,
    pub background_color: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct GiftShop {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub pix_key: String,
}

#[derive(Clone, Debug)]
pub struct NewGiftShop {
    pub user_id: i64,
    pub name: String,
    pub pix_key: String,
}

#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct GiftProduct {
    pub id: i64,
    pub shop_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image: String,
}

#[derive(Clone, Debug)]
pub struct NewGiftProduct {
    pub shop_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub image: String,
}

// A guest's intent to give a product; at most one per (product, guest).
#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct GiftPurchase {
    pub id: i64,
    pub product_id: i64,
    pub guest_id: i64,
    pub created_at: DateTime<Utc>,
    pub paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug)]
pub struct NewGiftPurchase {
    pub product_id: i64,
    pub guest_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct PhotoAlbum {
    pub id: i64,
    pub user_id: i64,
    pub guest_id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug)]
pub struct NewPhotoAlbum {
    pub user_id: i64,
    pub guest_id: i64,
    pub name: String,
    pub description: String,
}

// Photo metadata; the bytes live in object storage under `storage_key`.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct Photo {
    pub id: i64,
    pub user_id: i64,
    pub guest_id: i64,
    pub album_id: i64,
    pub filename: String,
    pub storage_key: String,
    pub hash_id: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewPhoto {
    pub user_id: i64,
    pub guest_id: i64,
    pub album_id: i64,
    pub filename: String,
    pub storage_key: String,
    pub hash_id: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct PhotoChallenge {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewPhotoChallenge {
    pub user_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct ChallengeTask {
    pub id: i64,
    pub challenge_id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewChallengeTask {
    pub challenge_id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct TaskCompletion {
    pub id: i64,
    pub task_id: i64,
    pub guest_id: i64,
    pub photo_id: i64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewTaskCompletion {
    pub task_id: i64,
    pub guest_id: i64,
    pub photo_id: i64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct Timeline {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewTimeline {
    pub user_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

// A story entry. At most one of `video_url`, `image_url` and `photo_id` is set.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct TimelineItem {
    pub id: i64,
    pub timeline_id: i64,
    pub title: String,
    pub text: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub photo_id: Option<i64>,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewTimelineItem {
    pub timeline_id: i64,
    pub title: String,
    pub text: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub photo_id: Option<i64>,
    pub date: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct Menu {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct NewMenu {
    pub user_id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct MenuItem {
    pub id: i64,
    pub menu_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub restrictions: Option<String>,
    pub calories: Option<i32>,
    pub observations: Option<String>,
}

#[derive(Clone, Debug)]
pub struct NewMenuItem {
    pub menu_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub restrictions: Option<String>,
    pub calories: Option<i32>,
    pub observations: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct Schedule {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub wedding_date: NaiveDate,
}

#[derive(Clone, Debug)]
pub struct NewSchedule {
    pub user_id: i64,
    pub title: String,
    pub wedding_date: NaiveDate,
}

// Event-day slot; `time` is local to the venue.
#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct ScheduleItem {
    pub id: i64,
    pub schedule_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub time: NaiveDateTime,
}

// Schedule slot before it is attached to a schedule.
#[derive(Clone, Debug)]
pub struct NewScheduleItem {
    pub title: String,
    pub description: Option<String>,
    pub time: NaiveDateTime,
}

/// Public details of the couple's site. Every field is optional; the site
/// renders whatever the owner filled in.
#[derive(Clone, Debug, Default, PartialEq, Serialize, FromRow)]
pub struct SiteDetails {
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub pix_key: Option<String>,
    pub wedding_date: Option<String>,
    pub wedding_time: Option<String>,
    pub venue: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub partner_one_name: Option<String>,
    pub partner_two_name: Option<String>,
    pub template_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, FromRow)]
pub struct SiteConfiguration {
    pub id: i64,
    pub user_id: i64,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub details: SiteDetails,
}

// Offset pagination used by list endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub limit: i64,
}

impl Page {
    pub const MAX_LIMIT: i64 = 100;

    pub fn new(skip: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            skip: skip.unwrap_or(0).max(0),
            limit: limit.unwrap_or(Self::MAX_LIMIT).clamp(0, Self::MAX_LIMIT),
        }
    }

    // Internal listings (summaries) that must see every row.
    pub fn all() -> Self {
        Self {
            skip: 0,
            limit: i64::MAX,
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}
