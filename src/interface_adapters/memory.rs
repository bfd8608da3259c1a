// In-memory storage adapter implementing every persistence port.
//
// Used for local runs without Postgres (`WEDDING_STORAGE=memory`) and by tests.
// All tables sit behind a single mutex, so each port call is atomic.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

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

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    guests: Vec<Guest>,
    invitations: Vec<Invitation>,
    shops: Vec<GiftShop>,
    products: Vec<GiftProduct>,
    purchases: Vec<GiftPurchase>,
    albums: Vec<PhotoAlbum>,
    photos: Vec<Photo>,
    challenges: Vec<PhotoChallenge>,
    tasks: Vec<ChallengeTask>,
    completions: Vec<TaskCompletion>,
    timelines: Vec<Timeline>,
    timeline_items: Vec<TimelineItem>,
    menus: Vec<Menu>,
    menu_items: Vec<MenuItem>,
    schedules: Vec<Schedule>,
    schedule_items: Vec<ScheduleItem>,
    site_configs: Vec<SiteConfiguration>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    // Timeline entries keep their text when the photo they point at goes away.
    fn detach_photos(&mut self, photo_ids: &[i64]) {
        for item in &mut self.timeline_items {
            if item.photo_id.is_some_and(|id| photo_ids.contains(&id)) {
                item.photo_id = None;
            }
        }
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn paginate<T: Clone>(rows: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    let skip = usize::try_from(page.skip).unwrap_or(0);
    let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
    rows.skip(skip).take(limit).collect()
}

// Replaces the row with the same id, or reports a missing row.
fn replace<T: Clone>(rows: &mut [T], id_of: impl Fn(&T) -> i64, row: &T) -> StoreResult<T> {
    let id = id_of(row);
    let slot = rows
        .iter_mut()
        .find(|existing| id_of(existing) == id)
        .ok_or_else(|| StoreError::Backend(format!("row {id} does not exist")))?;
    *slot = row.clone();
    Ok(row.clone())
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.lock().await;
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict);
        }
        let row = User {
            id: tables.next_id(),
            email: user.email,
            full_name: user.full_name,
            password_hash: user.password_hash,
            is_active: true,
        };
        tables.users.push(row.clone());
        Ok(row)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user(&self, user_id: i64) -> StoreResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.iter().find(|u| u.id == user_id).cloned())
    }
}

#[async_trait]
impl GuestStore for MemoryStore {
    async fn insert_guest(&self, guest: NewGuest) -> StoreResult<Guest> {
        let mut tables = self.tables.lock().await;
        if tables.guests.iter().any(|g| g.hash_link == guest.hash_link) {
            return Err(StoreError::Conflict);
        }
        let row = Guest {
            id: tables.next_id(),
            user_id: guest.user_id,
            name: guest.name,
            phone: guest.phone,
            confirmed: guest.confirmed,
            hash_link: guest.hash_link,
        };
        tables.guests.push(row.clone());
        Ok(row)
    }

    async fn find_guest(&self, guest_id: i64) -> StoreResult<Option<Guest>> {
        let tables = self.tables.lock().await;
        Ok(tables.guests.iter().find(|g| g.id == guest_id).cloned())
    }

    async fn find_guest_by_hash(&self, hash_link: &str) -> StoreResult<Option<Guest>> {
        let tables = self.tables.lock().await;
        Ok(tables.guests.iter().find(|g| g.hash_link == hash_link).cloned())
    }

    async fn list_guests(&self, user_id: i64, page: Page) -> StoreResult<Vec<Guest>> {
        let tables = self.tables.lock().await;
        let rows = tables.guests.iter().filter(|g| g.user_id == user_id).cloned();
        Ok(paginate(rows, page))
    }

    async fn update_guest(&self, guest: &Guest) -> StoreResult<Guest> {
        let mut tables = self.tables.lock().await;
        let slot = tables
            .guests
            .iter_mut()
            .find(|g| g.id == guest.id)
            .ok_or_else(|| StoreError::Backend(format!("row {} does not exist", guest.id)))?;
        slot.name = guest.name.clone();
        slot.phone = guest.phone.clone();
        slot.confirmed = guest.confirmed;
        Ok(slot.clone())
    }

    async fn delete_guest(&self, guest_id: i64, user_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.guests.len();
        tables
            .guests
            .retain(|g| !(g.id == guest_id && g.user_id == user_id));
        let removed = tables.guests.len() != before;
        if removed {
            let photo_ids: Vec<i64> = tables
                .photos
                .iter()
                .filter(|p| p.guest_id == guest_id)
                .map(|p| p.id)
                .collect();
            tables.detach_photos(&photo_ids);
            tables.purchases.retain(|p| p.guest_id != guest_id);
            tables.completions.retain(|c| c.guest_id != guest_id);
            tables.photos.retain(|p| p.guest_id != guest_id);
            tables.albums.retain(|a| a.guest_id != guest_id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl InvitationStore for MemoryStore {
    async fn find_invitation(&self, user_id: i64) -> StoreResult<Option<Invitation>> {
        let tables = self.tables.lock().await;
        Ok(tables.invitations.iter().find(|i| i.user_id == user_id).cloned())
    }

    async fn insert_invitation(&self, invitation: NewInvitation) -> StoreResult<Invitation> {
        let mut tables = self.tables.lock().await;
        if tables.invitations.iter().any(|i| i.user_id == invitation.user_id) {
            return Err(StoreError::Conflict);
        }
        let row = Invitation {
            id: tables.next_id(),
            user_id: invitation.user_id,
            intro_text: invitation.intro_text,
            video_url: invitation.video_url,
            photo_album_url: invitation.photo_album_url,
            background_image_url: invitation.background_image_url,
            background_color: invitation.background_color,
        };
        tables.invitations.push(row.clone());
        Ok(row)
    }

    async fn update_invitation(&self, invitation: &Invitation) -> StoreResult<Invitation> {
        let mut tables = self.tables.lock().await;
        replace(&mut tables.invitations, |i| i.id, invitation)
    }

    async fn delete_invitation(&self, user_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.invitations.len();
        tables.invitations.retain(|i| i.user_id != user_id);
        Ok(tables.invitations.len() != before)
    }
}

#[async_trait]
impl GiftShopStore for MemoryStore {
    async fn find_shop(&self, user_id: i64) -> StoreResult<Option<GiftShop>> {
        let tables = self.tables.lock().await;
        Ok(tables.shops.iter().find(|s| s.user_id == user_id).cloned())
    }

    async fn insert_shop(&self, shop: NewGiftShop) -> StoreResult<GiftShop> {
        let mut tables = self.tables.lock().await;
        if tables.shops.iter().any(|s| s.user_id == shop.user_id) {
            return Err(StoreError::Conflict);
        }
        let row = GiftShop {
            id: tables.next_id(),
            user_id: shop.user_id,
            name: shop.name,
            pix_key: shop.pix_key,
        };
        tables.shops.push(row.clone());
        Ok(row)
    }

    async fn update_shop(&self, shop: &GiftShop) -> StoreResult<GiftShop> {
        let mut tables = self.tables.lock().await;
        replace(&mut tables.shops, |s| s.id, shop)
    }

    async fn delete_shop(&self, user_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let Some(shop_id) = tables.shops.iter().find(|s| s.user_id == user_id).map(|s| s.id)
        else {
            return Ok(false);
        };
        let product_ids: Vec<i64> = tables
            .products
            .iter()
            .filter(|p| p.shop_id == shop_id)
            .map(|p| p.id)
            .collect();
        tables
            .purchases
            .retain(|p| !product_ids.contains(&p.product_id));
        tables.products.retain(|p| p.shop_id != shop_id);
        tables.shops.retain(|s| s.id != shop_id);
        Ok(true)
    }

    async fn list_products(&self, shop_id: i64) -> StoreResult<Vec<GiftProduct>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .products
            .iter()
            .filter(|p| p.shop_id == shop_id)
            .cloned()
            .collect())
    }

    async fn find_product(&self, product_id: i64) -> StoreResult<Option<GiftProduct>> {
        let tables = self.tables.lock().await;
        Ok(tables.products.iter().find(|p| p.id == product_id).cloned())
    }

    async fn insert_product(&self, product: NewGiftProduct) -> StoreResult<GiftProduct> {
        let mut tables = self.tables.lock().await;
        let row = GiftProduct {
            id: tables.next_id(),
            shop_id: product.shop_id,
            name: product.name,
            description: product.description,
            price_cents: product.price_cents,
            image: product.image,
        };
        tables.products.push(row.clone());
        Ok(row)
    }

    async fn update_product(&self, product: &GiftProduct) -> StoreResult<GiftProduct> {
        let mut tables = self.tables.lock().await;
        replace(&mut tables.products, |p| p.id, product)
    }

    async fn delete_product(&self, product_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.products.len();
        tables.products.retain(|p| p.id != product_id);
        tables.purchases.retain(|p| p.product_id != product_id);
        Ok(tables.products.len() != before)
    }

    async fn find_purchase(
        &self,
        product_id: i64,
        guest_id: i64,
    ) -> StoreResult<Option<GiftPurchase>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .purchases
            .iter()
            .find(|p| p.product_id == product_id && p.guest_id == guest_id)
            .cloned())
    }

    async fn list_purchases_for_shop(&self, shop_id: i64) -> StoreResult<Vec<GiftPurchase>> {
        let tables = self.tables.lock().await;
        let product_ids: Vec<i64> = tables
            .products
            .iter()
            .filter(|p| p.shop_id == shop_id)
            .map(|p| p.id)
            .collect();
        Ok(tables
            .purchases
            .iter()
            .filter(|p| product_ids.contains(&p.product_id))
            .cloned()
            .collect())
    }

    async fn insert_purchase(&self, purchase: NewGiftPurchase) -> StoreResult<GiftPurchase> {
        let mut tables = self.tables.lock().await;
        let duplicate = tables
            .purchases
            .iter()
            .any(|p| p.product_id == purchase.product_id && p.guest_id == purchase.guest_id);
        if duplicate {
            return Err(StoreError::Conflict);
        }
        let row = GiftPurchase {
            id: tables.next_id(),
            product_id: purchase.product_id,
            guest_id: purchase.guest_id,
            created_at: purchase.created_at,
            paid: false,
            paid_at: None,
        };
        tables.purchases.push(row.clone());
        Ok(row)
    }

    async fn update_purchase(&self, purchase: &GiftPurchase) -> StoreResult<GiftPurchase> {
        let mut tables = self.tables.lock().await;
        replace(&mut tables.purchases, |p| p.id, purchase)
    }
}

#[async_trait]
impl PhotoStore for MemoryStore {
    async fn find_album_by_guest(&self, guest_id: i64) -> StoreResult<Option<PhotoAlbum>> {
        let tables = self.tables.lock().await;
        Ok(tables.albums.iter().find(|a| a.guest_id == guest_id).cloned())
    }

    async fn insert_album(&self, album: NewPhotoAlbum) -> StoreResult<PhotoAlbum> {
        let mut tables = self.tables.lock().await;
        if tables.albums.iter().any(|a| a.guest_id == album.guest_id) {
            return Err(StoreError::Conflict);
        }
        let row = PhotoAlbum {
            id: tables.next_id(),
            user_id: album.user_id,
            guest_id: album.guest_id,
            name: album.name,
            description: album.description,
        };
        tables.albums.push(row.clone());
        Ok(row)
    }

    async fn insert_photo(&self, photo: NewPhoto) -> StoreResult<Photo> {
        let mut tables = self.tables.lock().await;
        if tables.photos.iter().any(|p| p.hash_id == photo.hash_id) {
            return Err(StoreError::Conflict);
        }
        let row = Photo {
            id: tables.next_id(),
            user_id: photo.user_id,
            guest_id: photo.guest_id,
            album_id: photo.album_id,
            filename: photo.filename,
            storage_key: photo.storage_key,
            hash_id: photo.hash_id,
            uploaded_at: photo.uploaded_at,
        };
        tables.photos.push(row.clone());
        Ok(row)
    }

    async fn find_photo(&self, photo_id: i64) -> StoreResult<Option<Photo>> {
        let tables = self.tables.lock().await;
        Ok(tables.photos.iter().find(|p| p.id == photo_id).cloned())
    }

    async fn list_photos_by_guest(&self, guest_id: i64) -> StoreResult<Vec<Photo>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .photos
            .iter()
            .filter(|p| p.guest_id == guest_id)
            .cloned()
            .collect())
    }

    async fn list_photos_by_user(&self, user_id: i64, page: Page) -> StoreResult<Vec<Photo>> {
        let tables = self.tables.lock().await;
        let rows = tables.photos.iter().filter(|p| p.user_id == user_id).cloned();
        Ok(paginate(rows, page))
    }

    async fn delete_photo(&self, photo_id: i64, user_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.photos.len();
        tables
            .photos
            .retain(|p| !(p.id == photo_id && p.user_id == user_id));
        let removed = tables.photos.len() != before;
        if removed {
            tables.completions.retain(|c| c.photo_id != photo_id);
            tables.detach_photos(&[photo_id]);
        }
        Ok(removed)
    }
}

#[async_trait]
impl ChallengeStore for MemoryStore {
    async fn find_challenge(&self, user_id: i64) -> StoreResult<Option<PhotoChallenge>> {
        let tables = self.tables.lock().await;
        Ok(tables.challenges.iter().find(|c| c.user_id == user_id).cloned())
    }

    async fn insert_challenge(
        &self,
        challenge: NewPhotoChallenge,
    ) -> StoreResult<PhotoChallenge> {
        let mut tables = self.tables.lock().await;
        if tables.challenges.iter().any(|c| c.user_id == challenge.user_id) {
            return Err(StoreError::Conflict);
        }
        let row = PhotoChallenge {
            id: tables.next_id(),
            user_id: challenge.user_id,
            title: challenge.title,
            created_at: challenge.created_at,
        };
        tables.challenges.push(row.clone());
        Ok(row)
    }

    async fn update_challenge(&self, challenge: &PhotoChallenge) -> StoreResult<PhotoChallenge> {
        let mut tables = self.tables.lock().await;
        replace(&mut tables.challenges, |c| c.id, challenge)
    }

    async fn delete_challenge(&self, user_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let Some(challenge_id) = tables
            .challenges
            .iter()
            .find(|c| c.user_id == user_id)
            .map(|c| c.id)
        else {
            return Ok(false);
        };
        let task_ids: Vec<i64> = tables
            .tasks
            .iter()
            .filter(|t| t.challenge_id == challenge_id)
            .map(|t| t.id)
            .collect();
        tables.completions.retain(|c| !task_ids.contains(&c.task_id));
        tables.tasks.retain(|t| t.challenge_id != challenge_id);
        tables.challenges.retain(|c| c.id != challenge_id);
        Ok(true)
    }

    async fn list_tasks(&self, challenge_id: i64) -> StoreResult<Vec<ChallengeTask>> {
        let tables = self.tables.lock().await;
        let mut tasks: Vec<ChallengeTask> = tables
            .tasks
            .iter()
            .filter(|t| t.challenge_id == challenge_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|t| (t.created_at, t.id));
        Ok(tasks)
    }

    async fn find_task(&self, task_id: i64) -> StoreResult<Option<ChallengeTask>> {
        let tables = self.tables.lock().await;
        Ok(tables.tasks.iter().find(|t| t.id == task_id).cloned())
    }

    async fn insert_task(&self, task: NewChallengeTask) -> StoreResult<ChallengeTask> {
        let mut tables = self.tables.lock().await;
        let row = ChallengeTask {
            id: tables.next_id(),
            challenge_id: task.challenge_id,
            title: task.title,
            description: task.description,
            created_at: task.created_at,
        };
        tables.tasks.push(row.clone());
        Ok(row)
    }

    async fn update_task(&self, task: &ChallengeTask) -> StoreResult<ChallengeTask> {
        let mut tables = self.tables.lock().await;
        replace(&mut tables.tasks, |t| t.id, task)
    }

    async fn delete_task(&self, task_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.tasks.len();
        tables.tasks.retain(|t| t.id != task_id);
        tables.completions.retain(|c| c.task_id != task_id);
        Ok(tables.tasks.len() != before)
    }

    async fn list_completions(&self, challenge_id: i64) -> StoreResult<Vec<TaskCompletion>> {
        let tables = self.tables.lock().await;
        let task_ids: Vec<i64> = tables
            .tasks
            .iter()
            .filter(|t| t.challenge_id == challenge_id)
            .map(|t| t.id)
            .collect();
        Ok(tables
            .completions
            .iter()
            .filter(|c| task_ids.contains(&c.task_id))
            .cloned()
            .collect())
    }

    async fn find_completion(
        &self,
        task_id: i64,
        guest_id: i64,
    ) -> StoreResult<Option<TaskCompletion>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .completions
            .iter()
            .find(|c| c.task_id == task_id && c.guest_id == guest_id)
            .cloned())
    }

    async fn insert_completion(
        &self,
        completion: NewTaskCompletion,
    ) -> StoreResult<TaskCompletion> {
        let mut tables = self.tables.lock().await;
        let duplicate = tables
            .completions
            .iter()
            .any(|c| c.task_id == completion.task_id && c.guest_id == completion.guest_id);
        if duplicate {
            return Err(StoreError::Conflict);
        }
        let row = TaskCompletion {
            id: tables.next_id(),
            task_id: completion.task_id,
            guest_id: completion.guest_id,
            photo_id: completion.photo_id,
            completed_at: completion.completed_at,
        };
        tables.completions.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl TimelineStore for MemoryStore {
    async fn find_timeline(&self, user_id: i64) -> StoreResult<Option<Timeline>> {
        let tables = self.tables.lock().await;
        Ok(tables.timelines.iter().find(|t| t.user_id == user_id).cloned())
    }

    async fn insert_timeline(&self, timeline: NewTimeline) -> StoreResult<Timeline> {
        let mut tables = self.tables.lock().await;
        if tables.timelines.iter().any(|t| t.user_id == timeline.user_id) {
            return Err(StoreError::Conflict);
        }
        let row = Timeline {
            id: tables.next_id(),
            user_id: timeline.user_id,
            title: timeline.title,
            created_at: timeline.created_at,
        };
        tables.timelines.push(row.clone());
        Ok(row)
    }

    async fn update_timeline(&self, timeline: &Timeline) -> StoreResult<Timeline> {
        let mut tables = self.tables.lock().await;
        replace(&mut tables.timelines, |t| t.id, timeline)
    }

    async fn delete_timeline(&self, user_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let Some(timeline_id) = tables
            .timelines
            .iter()
            .find(|t| t.user_id == user_id)
            .map(|t| t.id)
        else {
            return Ok(false);
        };
        tables.timeline_items.retain(|i| i.timeline_id != timeline_id);
        tables.timelines.retain(|t| t.id != timeline_id);
        Ok(true)
    }

    async fn list_timeline_items(&self, timeline_id: i64) -> StoreResult<Vec<TimelineItem>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .timeline_items
            .iter()
            .filter(|i| i.timeline_id == timeline_id)
            .cloned()
            .collect())
    }

    async fn find_timeline_item(&self, item_id: i64) -> StoreResult<Option<TimelineItem>> {
        let tables = self.tables.lock().await;
        Ok(tables.timeline_items.iter().find(|i| i.id == item_id).cloned())
    }

    async fn insert_timeline_item(&self, item: NewTimelineItem) -> StoreResult<TimelineItem> {
        let mut tables = self.tables.lock().await;
        let row = TimelineItem {
            id: tables.next_id(),
            timeline_id: item.timeline_id,
            title: item.title,
            text: item.text,
            video_url: item.video_url,
            image_url: item.image_url,
            photo_id: item.photo_id,
            date: item.date,
        };
        tables.timeline_items.push(row.clone());
        Ok(row)
    }

    async fn update_timeline_item(&self, item: &TimelineItem) -> StoreResult<TimelineItem> {
        let mut tables = self.tables.lock().await;
        replace(&mut tables.timeline_items, |i| i.id, item)
    }

    async fn delete_timeline_item(&self, item_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.timeline_items.len();
        tables.timeline_items.retain(|i| i.id != item_id);
        Ok(tables.timeline_items.len() != before)
    }
}

#[async_trait]
impl MenuStore for MemoryStore {
    async fn insert_menu(&self, menu: NewMenu) -> StoreResult<Menu> {
        let mut tables = self.tables.lock().await;
        let row = Menu {
            id: tables.next_id(),
            user_id: menu.user_id,
            title: menu.title,
            created_at: menu.created_at,
        };
        tables.menus.push(row.clone());
        Ok(row)
    }

    async fn find_menu(&self, menu_id: i64) -> StoreResult<Option<Menu>> {
        let tables = self.tables.lock().await;
        Ok(tables.menus.iter().find(|m| m.id == menu_id).cloned())
    }

    async fn list_menus(&self, user_id: i64, page: Page) -> StoreResult<Vec<Menu>> {
        let tables = self.tables.lock().await;
        let rows = tables.menus.iter().filter(|m| m.user_id == user_id).cloned();
        Ok(paginate(rows, page))
    }

    async fn update_menu(&self, menu: &Menu) -> StoreResult<Menu> {
        let mut tables = self.tables.lock().await;
        replace(&mut tables.menus, |m| m.id, menu)
    }

    async fn delete_menu(&self, menu_id: i64, user_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.menus.len();
        tables
            .menus
            .retain(|m| !(m.id == menu_id && m.user_id == user_id));
        let removed = tables.menus.len() != before;
        if removed {
            tables.menu_items.retain(|i| i.menu_id != menu_id);
        }
        Ok(removed)
    }

    async fn list_menu_items(&self, menu_id: i64) -> StoreResult<Vec<MenuItem>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .menu_items
            .iter()
            .filter(|i| i.menu_id == menu_id)
            .cloned()
            .collect())
    }

    async fn find_menu_item(&self, item_id: i64) -> StoreResult<Option<MenuItem>> {
        let tables = self.tables.lock().await;
        Ok(tables.menu_items.iter().find(|i| i.id == item_id).cloned())
    }

    async fn insert_menu_item(&self, item: NewMenuItem) -> StoreResult<MenuItem> {
        let mut tables = self.tables.lock().await;
        let row = MenuItem {
            id: tables.next_id(),
            menu_id: item.menu_id,
            name: item.name,
            description: item.description,
            restrictions: item.restrictions,
            calories: item.calories,
            observations: item.observations,
        };
        tables.menu_items.push(row.clone());
        Ok(row)
    }

    async fn update_menu_item(&self, item: &MenuItem) -> StoreResult<MenuItem> {
        let mut tables = self.tables.lock().await;
        replace(&mut tables.menu_items, |i| i.id, item)
    }

    async fn delete_menu_item(&self, item_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.menu_items.len();
        tables.menu_items.retain(|i| i.id != item_id);
        Ok(tables.menu_items.len() != before)
    }
}

fn schedule_item(id: i64, schedule_id: i64, item: NewScheduleItem) -> ScheduleItem {
    ScheduleItem {
        id,
        schedule_id,
        title: item.title,
        description: item.description,
        time: item.time,
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn find_schedule(&self, user_id: i64) -> StoreResult<Option<Schedule>> {
        let tables = self.tables.lock().await;
        Ok(tables.schedules.iter().find(|s| s.user_id == user_id).cloned())
    }

    async fn insert_schedule(
        &self,
        schedule: NewSchedule,
        items: Vec<NewScheduleItem>,
    ) -> StoreResult<Schedule> {
        let mut tables = self.tables.lock().await;
        if tables.schedules.iter().any(|s| s.user_id == schedule.user_id) {
            return Err(StoreError::Conflict);
        }
        let row = Schedule {
            id: tables.next_id(),
            user_id: schedule.user_id,
            title: schedule.title,
            wedding_date: schedule.wedding_date,
        };
        for item in items {
            let id = tables.next_id();
            tables.schedule_items.push(schedule_item(id, row.id, item));
        }
        tables.schedules.push(row.clone());
        Ok(row)
    }

    async fn update_schedule(&self, schedule: &Schedule) -> StoreResult<Schedule> {
        let mut tables = self.tables.lock().await;
        replace(&mut tables.schedules, |s| s.id, schedule)
    }

    async fn delete_schedule(&self, user_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let Some(schedule_id) = tables
            .schedules
            .iter()
            .find(|s| s.user_id == user_id)
            .map(|s| s.id)
        else {
            return Ok(false);
        };
        tables.schedule_items.retain(|i| i.schedule_id != schedule_id);
        tables.schedules.retain(|s| s.id != schedule_id);
        Ok(true)
    }

    async fn list_schedule_items(&self, schedule_id: i64) -> StoreResult<Vec<ScheduleItem>> {
        let tables = self.tables.lock().await;
        let mut items: Vec<ScheduleItem> = tables
            .schedule_items
            .iter()
            .filter(|i| i.schedule_id == schedule_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| (i.time, i.id));
        Ok(items)
    }

    async fn find_schedule_item(&self, item_id: i64) -> StoreResult<Option<ScheduleItem>> {
        let tables = self.tables.lock().await;
        Ok(tables.schedule_items.iter().find(|i| i.id == item_id).cloned())
    }

    async fn insert_schedule_item(
        &self,
        schedule_id: i64,
        item: NewScheduleItem,
    ) -> StoreResult<ScheduleItem> {
        let mut tables = self.tables.lock().await;
        let row = schedule_item(tables.next_id(), schedule_id, item);
        tables.schedule_items.push(row.clone());
        Ok(row)
    }

    async fn update_schedule_item(&self, item: &ScheduleItem) -> StoreResult<ScheduleItem> {
        let mut tables = self.tables.lock().await;
        replace(&mut tables.schedule_items, |i| i.id, item)
    }

    async fn delete_schedule_item(&self, item_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.schedule_items.len();
        tables.schedule_items.retain(|i| i.id != item_id);
        Ok(tables.schedule_items.len() != before)
    }
}

#[async_trait]
impl SiteConfigStore for MemoryStore {
    async fn find_site_config(&self, user_id: i64) -> StoreResult<Option<SiteConfiguration>> {
        let tables = self.tables.lock().await;
        Ok(tables.site_configs.iter().find(|c| c.user_id == user_id).cloned())
    }

    async fn insert_site_config(
        &self,
        user_id: i64,
        details: SiteDetails,
    ) -> StoreResult<SiteConfiguration> {
        let mut tables = self.tables.lock().await;
        if tables.site_configs.iter().any(|c| c.user_id == user_id) {
            return Err(StoreError::Conflict);
        }
        let row = SiteConfiguration {
            id: tables.next_id(),
            user_id,
            details,
        };
        tables.site_configs.push(row.clone());
        Ok(row)
    }

    async fn update_site_config(
        &self,
        config: &SiteConfiguration,
    ) -> StoreResult<SiteConfiguration> {
        let mut tables = self.tables.lock().await;
        replace(&mut tables.site_configs, |c| c.id, config)
    }

    async fn delete_site_config(&self, user_id: i64) -> StoreResult<bool> {
        let mut tables = self.tables.lock().await;
        let before = tables.site_configs.len();
        tables.site_configs.retain(|c| c.user_id != user_id);
        Ok(tables.site_configs.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn new_guest(user_id: i64, hash_link: &str) -> NewGuest {
        NewGuest {
            user_id,
            name: "Ana".to_string(),
            phone: None,
            confirmed: false,
            hash_link: hash_link.to_string(),
        }
    }

    #[tokio::test]
    async fn when_hash_link_is_reused_then_insert_reports_conflict() {
        let store = MemoryStore::new();
        store
            .insert_guest(new_guest(1, "0123456789abcdef"))
            .await
            .expect("first insert should succeed");

        let result = store.insert_guest(new_guest(2, "0123456789abcdef")).await;

        assert_eq!(result, Err(StoreError::Conflict));
    }

    #[tokio::test]
    async fn when_guest_is_updated_then_hash_link_is_left_untouched() {
        let store = MemoryStore::new();
        let mut guest = store
            .insert_guest(new_guest(1, "0123456789abcdef"))
            .await
            .expect("insert should succeed");
        guest.name = "Ana Clara".to_string();
        guest.hash_link = "ffffffffffffffff".to_string();

        let updated = store.update_guest(&guest).await.expect("update should succeed");

        assert_eq!(updated.name, "Ana Clara");
        assert_eq!(updated.hash_link, "0123456789abcdef");
    }

    #[tokio::test]
    async fn when_guests_are_paged_then_skip_and_limit_apply_per_owner() {
        let store = MemoryStore::new();
        for n in 0..5 {
            store
                .insert_guest(new_guest(1, &format!("{n:016x}")))
                .await
                .expect("insert should succeed");
        }
        store
            .insert_guest(new_guest(2, "aaaaaaaaaaaaaaaa"))
            .await
            .expect("insert should succeed");

        let page = store
            .list_guests(1, Page::new(Some(1), Some(2)))
            .await
            .expect("list should succeed");

        assert_eq!(page.len(), 2);
        assert!(page.iter().all(|g| g.user_id == 1));
        assert_eq!(page[0].hash_link, format!("{:016x}", 1));
    }

    #[tokio::test]
    async fn when_shop_is_deleted_then_products_and_purchases_go_with_it() {
        let store = MemoryStore::new();
        let shop = store
            .insert_shop(NewGiftShop {
                user_id: 1,
                name: "Lista".to_string(),
                pix_key: "maria@example.com".to_string(),
            })
            .await
            .expect("shop insert should succeed");
        let product = store
            .insert_product(NewGiftProduct {
                shop_id: shop.id,
                name: "Panela".to_string(),
                description: None,
                price_cents: 15_000,
                image: "https://cdn.example.com/p.png".to_string(),
            })
            .await
            .expect("product insert should succeed");
        store
            .insert_purchase(NewGiftPurchase {
                product_id: product.id,
                guest_id: 7,
                created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            })
            .await
            .expect("purchase insert should succeed");

        assert!(store.delete_shop(1).await.expect("delete should succeed"));

        assert_eq!(store.find_product(product.id).await.unwrap(), None);
        assert_eq!(store.find_purchase(product.id, 7).await.unwrap(), None);
        assert!(!store.delete_shop(1).await.unwrap());
    }

    #[tokio::test]
    async fn when_photo_is_deleted_then_timeline_item_keeps_text_without_photo() {
        let store = MemoryStore::new();
        let at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let photo = store
            .insert_photo(NewPhoto {
                user_id: 1,
                guest_id: 7,
                album_id: 3,
                filename: "festa.jpg".to_string(),
                storage_key: "photos/festa.jpg".to_string(),
                hash_id: "h1".to_string(),
                uploaded_at: at,
            })
            .await
            .expect("photo insert should succeed");
        let timeline = store
            .insert_timeline(NewTimeline {
                user_id: 1,
                title: "Nós".to_string(),
                created_at: at,
            })
            .await
            .expect("timeline insert should succeed");
        let item = store
            .insert_timeline_item(NewTimelineItem {
                timeline_id: timeline.id,
                title: "Festa".to_string(),
                text: Some("Que noite".to_string()),
                video_url: None,
                image_url: None,
                photo_id: Some(photo.id),
                date: at,
            })
            .await
            .expect("item insert should succeed");

        assert!(store.delete_photo(photo.id, 1).await.unwrap());

        let item = store.find_timeline_item(item.id).await.unwrap().expect("item kept");
        assert_eq!(item.photo_id, None);
        assert_eq!(item.text.as_deref(), Some("Que noite"));
    }

    #[tokio::test]
    async fn when_schedule_is_inserted_then_items_are_listed_by_time() {
        let store = MemoryStore::new();
        let date = chrono::NaiveDate::from_ymd_opt(2026, 11, 21).unwrap();
        let at = |h: u32| NewScheduleItem {
            title: format!("{h}h"),
            description: None,
            time: date.and_hms_opt(h, 0, 0).unwrap(),
        };
        let schedule = store
            .insert_schedule(
                NewSchedule {
                    user_id: 1,
                    title: "Cronograma".to_string(),
                    wedding_date: date,
                },
                vec![at(20), at(16), at(18)],
            )
            .await
            .expect("schedule insert should succeed");

        let titles: Vec<String> = store
            .list_schedule_items(schedule.id)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.title)
            .collect();

        assert_eq!(titles, vec!["16h", "18h", "20h"]);
        let again = store
            .insert_schedule(
                NewSchedule {
                    user_id: 1,
                    title: "Outro".to_string(),
                    wedding_date: date,
                },
                Vec::new(),
            )
            .await;
        assert_eq!(again, Err(StoreError::Conflict));
    }
}
