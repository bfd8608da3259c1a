use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::domain::entities::{MenuItem, Page};
use crate::interface_adapters::handlers::{authenticate, owner_error, HandlerError, HandlerResult};
use crate::interface_adapters::protocol::{
    CreateMenuItemRequest, MenuRequest, MenuResponse, PageQuery, UpdateMenuItemRequest,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::menus::{MenuItemInput, MenuItemUpdate, MenuUseCase, MenuView};

fn use_case(state: &AppState) -> MenuUseCase<'_> {
    MenuUseCase {
        menus: state.menus.as_ref(),
        clock: state.clock.as_ref(),
    }
}

fn menu_response(view: MenuView) -> MenuResponse {
    MenuResponse {
        menu: view.menu,
        items: view.items,
    }
}

#[tracing::instrument(name = "create_menu", skip_all)]
pub async fn create_menu(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<MenuRequest>,
) -> HandlerResult<MenuResponse> {
    let session = authenticate(&state, &headers).await?;
    let view = use_case(&state)
        .create(session.user_id, &payload.title)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(menu_response(view)))
}

#[tracing::instrument(name = "list_menus", skip_all)]
pub async fn list_menus(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> HandlerResult<Vec<MenuResponse>> {
    let session = authenticate(&state, &headers).await?;
    let views = use_case(&state)
        .list(session.user_id, Page::new(query.skip, query.limit))
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(views.into_iter().map(menu_response).collect()))
}

#[tracing::instrument(name = "get_menu", skip_all, fields(menu_id = menu_id))]
pub async fn get_menu(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(menu_id): Path<i64>,
) -> HandlerResult<MenuResponse> {
    let session = authenticate(&state, &headers).await?;
    let view = use_case(&state)
        .get(session.user_id, menu_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(menu_response(view)))
}

#[tracing::instrument(name = "update_menu", skip_all, fields(menu_id = menu_id))]
pub async fn update_menu(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(menu_id): Path<i64>,
    Json(payload): Json<MenuRequest>,
) -> HandlerResult<MenuResponse> {
    let session = authenticate(&state, &headers).await?;
    let view = use_case(&state)
        .update(session.user_id, menu_id, &payload.title)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(menu_response(view)))
}

#[tracing::instrument(name = "delete_menu", skip_all, fields(menu_id = menu_id))]
pub async fn delete_menu(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(menu_id): Path<i64>,
) -> Result<StatusCode, HandlerError> {
    let session = authenticate(&state, &headers).await?;
    use_case(&state)
        .delete(session.user_id, menu_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "create_menu_item", skip_all, fields(menu_id = menu_id))]
pub async fn create_menu_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(menu_id): Path<i64>,
    Json(payload): Json<CreateMenuItemRequest>,
) -> HandlerResult<MenuItem> {
    let session = authenticate(&state, &headers).await?;
    let item = use_case(&state)
        .create_item(
            session.user_id,
            menu_id,
            MenuItemInput {
                name: payload.name,
                description: payload.description,
                restrictions: payload.restrictions,
                calories: payload.calories,
                observations: payload.observations,
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(item))
}

#[tracing::instrument(name = "update_menu_item", skip_all, fields(menu_id = menu_id, item_id = item_id))]
pub async fn update_menu_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((menu_id, item_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateMenuItemRequest>,
) -> HandlerResult<MenuItem> {
    let session = authenticate(&state, &headers).await?;
    let item = use_case(&state)
        .update_item(
            session.user_id,
            menu_id,
            item_id,
            MenuItemUpdate {
                name: payload.name,
                description: payload.description,
                restrictions: payload.restrictions,
                calories: payload.calories,
                observations: payload.observations,
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(item))
}

#[tracing::instrument(name = "delete_menu_item", skip_all, fields(menu_id = menu_id, item_id = item_id))]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((menu_id, item_id)): Path<(i64, i64)>,
) -> Result<StatusCode, HandlerError> {
    let session = authenticate(&state, &headers).await?;
    use_case(&state)
        .delete_item(session.user_id, menu_id, item_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(StatusCode::NO_CONTENT)
}
