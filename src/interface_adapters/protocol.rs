use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::entities::{
    GiftProduct, GiftPurchase, Guest, Menu, MenuItem, Schedule, ScheduleItem, SiteDetails,
    Timeline, TimelineItem, User,
};
use crate::domain::hash_link::guest_invite_url;
use crate::domain::money::format_cents;

// Error envelope shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error_code: &'static str,
    pub message: String,
    pub details: Option<Value>,
}

// Query string for paged listings.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

// Request payload for owner registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

// Request payload for owner login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// Response payload for owner login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_at: u64,
    pub user: UserResponse,
}

// Request payload for logout.
#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub token: String,
}

// Response payload for logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub revoked: bool,
}

// Owner profile; the password hash never leaves the server.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateGuestRequest {
    pub name: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub confirmed: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGuestRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub confirmed: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct GuestResponse {
    #[serde(flatten)]
    pub guest: Guest,
    pub invite_url: String,
}

impl GuestResponse {
    pub fn new(guest: Guest, base_url: &str) -> Self {
        let invite_url = guest_invite_url(base_url, &guest.hash_link);
        Self { guest, invite_url }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateInvitationRequest {
    pub intro_text: String,
    pub video_url: Option<String>,
    pub photo_album_url: Option<String>,
    pub background_image_url: String,
    pub background_color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateInvitationRequest {
    pub intro_text: Option<String>,
    pub video_url: Option<String>,
    pub photo_album_url: Option<String>,
    pub background_image_url: Option<String>,
    pub background_color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateGiftShopRequest {
    pub name: String,
    pub pix_key: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateGiftShopRequest {
    pub name: Option<String>,
    pub pix_key: Option<String>,
}

// Prices travel as decimal strings ("150.00").
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub image: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub shop_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: String,
    pub image: String,
}

impl From<GiftProduct> for ProductResponse {
    fn from(product: GiftProduct) -> Self {
        Self {
            id: product.id,
            shop_id: product.shop_id,
            name: product.name,
            description: product.description,
            price: format_cents(product.price_cents),
            image: product.image,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GiftShopResponse {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub pix_key: String,
    pub products: Vec<ProductResponse>,
}

#[derive(Debug, Serialize)]
pub struct GuestProductResponse {
    #[serde(flatten)]
    pub product: ProductResponse,
    pub purchases: Vec<GiftPurchase>,
}

#[derive(Debug, Serialize)]
pub struct GuestGiftShopResponse {
    pub id: i64,
    pub name: String,
    pub products: Vec<GuestProductResponse>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseResponse {
    #[serde(flatten)]
    pub purchase: GiftPurchase,
    pub product: ProductResponse,
    pub pix_code: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub paid: bool,
}

#[derive(Debug, Deserialize)]
pub struct UploadPhotoRequest {
    pub filename: String,
}

#[derive(Debug, Deserialize)]
pub struct ChallengeRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteTaskRequest {
    pub photo_id: i64,
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub guest_id: i64,
    pub guest_name: String,
    pub photo_id: i64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TaskSummaryResponse {
    pub id: i64,
    pub challenge_id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub is_completed: bool,
    pub completed_by: Vec<CompletionResponse>,
}

#[derive(Debug, Serialize)]
pub struct ParticipationResponse {
    pub guest_name: String,
    pub tasks_completed: usize,
}

#[derive(Debug, Serialize)]
pub struct ChallengeSummaryResponse {
    pub id: i64,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub completion_percentage: f64,
    pub tasks: Vec<TaskSummaryResponse>,
    pub guests_participation: Vec<ParticipationResponse>,
}

#[derive(Debug, Serialize)]
pub struct GuestTaskResponse {
    pub id: i64,
    pub challenge_id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub is_completed: bool,
}

#[derive(Debug, Serialize)]
pub struct GuestChallengeResponse {
    pub tasks: Vec<GuestTaskResponse>,
}

#[derive(Debug, Serialize)]
pub struct GuestInvitationResponse {
    pub guest: GuestResponse,
    pub invitation: crate::domain::entities::Invitation,
}

// Response for a task completed together with a fresh upload.
#[derive(Debug, Serialize)]
pub struct UploadCompletionResponse {
    pub photo: crate::domain::entities::Photo,
    pub completion: crate::domain::entities::TaskCompletion,
}

#[derive(Debug, Default, Deserialize)]
pub struct TimelineRequest {
    pub title: Option<String>,
}

// `?order_by_date=true` lists the newest entries first.
#[derive(Debug, Default, Deserialize)]
pub struct TimelineQuery {
    #[serde(default)]
    pub order_by_date: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateTimelineItemRequest {
    pub title: String,
    pub text: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub photo_id: Option<i64>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTimelineItemRequest {
    pub title: Option<String>,
    pub text: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub photo_id: Option<i64>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    #[serde(flatten)]
    pub timeline: Timeline,
    pub items: Vec<TimelineItem>,
}

#[derive(Debug, Deserialize)]
pub struct MenuRequest {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateMenuItemRequest {
    pub name: String,
    pub description: Option<String>,
    pub restrictions: Option<String>,
    pub calories: Option<i32>,
    pub observations: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMenuItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub restrictions: Option<String>,
    pub calories: Option<i32>,
    pub observations: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MenuResponse {
    #[serde(flatten)]
    pub menu: Menu,
    pub items: Vec<MenuItem>,
}

// Times are local to the venue: "2026-11-21T16:00:00".
#[derive(Debug, Deserialize)]
pub struct ScheduleItemRequest {
    pub title: String,
    pub description: Option<String>,
    pub time: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct CreateScheduleRequest {
    pub title: Option<String>,
    pub wedding_date: NaiveDate,
    #[serde(default)]
    pub items: Vec<ScheduleItemRequest>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateScheduleRequest {
    pub title: Option<String>,
    pub wedding_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ScheduleResponse {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub items: Vec<ScheduleItem>,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_guests: usize,
    pub confirmed_count: usize,
    pub pending_count: usize,
    pub confirmation_rate: f64,
    pub confirmed_guests: Vec<GuestResponse>,
    pub pending_guests: Vec<GuestResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfigRequest {
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

impl From<SiteConfigRequest> for SiteDetails {
    fn from(request: SiteConfigRequest) -> Self {
        Self {
            primary_color: request.primary_color,
            secondary_color: request.secondary_color,
            pix_key: request.pix_key,
            wedding_date: request.wedding_date,
            wedding_time: request.wedding_time,
            venue: request.venue,
            city: request.city,
            state: request.state,
            country: request.country,
            partner_one_name: request.partner_one_name,
            partner_two_name: request.partner_two_name,
            template_id: request.template_id,
        }
    }
}
