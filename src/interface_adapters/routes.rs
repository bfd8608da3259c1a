use crate::interface_adapters::handlers::{
    accounts, dashboard, gift_shop, guests, health, invitations, menus, photo_challenge, photos,
    schedule, site_config, timeline,
};
use crate::interface_adapters::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(account_routes())
        .merge(owner_routes())
        .merge(planning_routes())
        .merge(guest_routes())
        .merge(site_routes())
        .with_state(state)
}

fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(accounts::register))
        .route("/auth/login", post(accounts::login))
        .route("/auth/logout", post(accounts::logout))
        .route("/auth/me", get(accounts::me))
}

// Bearer-authenticated routes scoped to the calling owner.
fn owner_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/me/guests",
            post(guests::create_guest).get(guests::list_guests),
        )
        .route(
            "/me/guests/{guest_id}",
            get(guests::get_guest)
                .put(guests::update_guest)
                .delete(guests::delete_guest),
        )
        .route("/me/guests/{guest_id}/photos", get(photos::list_guest_photos))
        .route(
            "/me/invitation",
            post(invitations::create_invitation)
                .get(invitations::get_invitation)
                .put(invitations::update_invitation)
                .delete(invitations::delete_invitation),
        )
        .route(
            "/me/gift-shop",
            post(gift_shop::create_gift_shop)
                .get(gift_shop::get_gift_shop)
                .put(gift_shop::update_gift_shop)
                .delete(gift_shop::delete_gift_shop),
        )
        .route(
            "/me/gift-shop/products",
            post(gift_shop::create_product).get(gift_shop::list_products),
        )
        .route(
            "/me/gift-shop/products/{product_id}",
            put(gift_shop::update_product).delete(gift_shop::delete_product),
        )
        .route("/me/photos", get(photos::list_photos))
        .route(
            "/me/photos/{photo_id}",
            axum::routing::delete(photos::delete_photo),
        )
        .route(
            "/me/photo-challenge",
            post(photo_challenge::create_challenge)
                .get(photo_challenge::get_challenge)
                .put(photo_challenge::update_challenge)
                .delete(photo_challenge::delete_challenge),
        )
        .route("/me/photo-challenge/tasks", post(photo_challenge::create_task))
        .route(
            "/me/photo-challenge/tasks/{task_id}",
            put(photo_challenge::update_task).delete(photo_challenge::delete_task),
        )
}

// Owner-only planning pages: story timeline, menus, event schedule,
// RSVP dashboard and the public site settings.
fn planning_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/me/timeline",
            post(timeline::create_timeline)
                .get(timeline::get_timeline)
                .put(timeline::update_timeline)
                .delete(timeline::delete_timeline),
        )
        .route("/me/timeline/items", post(timeline::create_timeline_item))
        .route(
            "/me/timeline/items/{item_id}",
            put(timeline::update_timeline_item).delete(timeline::delete_timeline_item),
        )
        .route("/me/menus", post(menus::create_menu).get(menus::list_menus))
        .route(
            "/me/menus/{menu_id}",
            get(menus::get_menu)
                .put(menus::update_menu)
                .delete(menus::delete_menu),
        )
        .route("/me/menus/{menu_id}/items", post(menus::create_menu_item))
        .route(
            "/me/menus/{menu_id}/items/{item_id}",
            put(menus::update_menu_item).delete(menus::delete_menu_item),
        )
        .route(
            "/me/schedule",
            post(schedule::create_schedule)
                .get(schedule::get_schedule)
                .put(schedule::update_schedule)
                .delete(schedule::delete_schedule),
        )
        .route("/me/schedule/items", post(schedule::create_schedule_item))
        .route(
            "/me/schedule/items/{item_id}",
            put(schedule::update_schedule_item).delete(schedule::delete_schedule_item),
        )
        .route("/me/dashboard", get(dashboard::dashboard))
        .route(
            "/me/site-config",
            post(site_config::create_site_config)
                .get(site_config::get_site_config)
                .put(site_config::upsert_site_config)
                .delete(site_config::delete_site_config),
        )
}

fn site_routes() -> Router<AppState> {
    Router::new().route("/sites/{user_id}/config", get(site_config::public_site_config))
}

// Routes authorized by the guest's hash link alone.
fn guest_routes() -> Router<AppState> {
    Router::new()
        .route("/guests/{guest_hash}", get(guests::view_guest))
        .route("/guests/{guest_hash}/confirm", post(guests::confirm_guest))
        .route(
            "/guests/{guest_hash}/invitation",
            get(invitations::guest_invitation),
        )
        .route(
            "/guests/{guest_hash}/gift-shop",
            get(gift_shop::guest_gift_shop),
        )
        .route(
            "/guests/{guest_hash}/gifts/{product_id}/purchase",
            post(gift_shop::buy_gift),
        )
        .route(
            "/guests/{guest_hash}/gifts/{product_id}/payment",
            put(gift_shop::set_gift_payment),
        )
        .route(
            "/guests/{guest_hash}/photos",
            post(photos::upload_photo).get(photos::guest_photos),
        )
        .route(
            "/guests/{guest_hash}/photo-challenge",
            get(photo_challenge::guest_challenge),
        )
        .route(
            "/guests/{guest_hash}/photo-challenge/tasks/{task_id}/complete",
            post(photo_challenge::complete_task),
        )
        .route(
            "/guests/{guest_hash}/photo-challenge/tasks/{task_id}/upload",
            post(photo_challenge::complete_task_with_upload),
        )
}
