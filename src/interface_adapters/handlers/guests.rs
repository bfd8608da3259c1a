use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::domain::entities::Page;
use crate::interface_adapters::handlers::{
    authenticate, guest_error, owner_error, HandlerError, HandlerResult,
};
use crate::interface_adapters::protocol::{
    CreateGuestRequest, GuestResponse, PageQuery, UpdateGuestRequest,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::guests::{GuestInput, GuestUpdate, GuestsUseCase};

fn use_case(state: &AppState) -> GuestsUseCase<'_> {
    GuestsUseCase {
        guests: state.guests.as_ref(),
    }
}

#[tracing::instrument(name = "create_guest", skip_all)]
pub async fn create_guest(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateGuestRequest>,
) -> HandlerResult<GuestResponse> {
    let session = authenticate(&state, &headers).await?;
    let guest = use_case(&state)
        .create(
            session.user_id,
            GuestInput {
                name: payload.name,
                phone: payload.phone,
                confirmed: payload.confirmed,
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(GuestResponse::new(guest, &state.settings.guest_link_base_url)))
}

#[tracing::instrument(name = "list_guests", skip_all)]
pub async fn list_guests(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> HandlerResult<Vec<GuestResponse>> {
    let session = authenticate(&state, &headers).await?;
    let guests = use_case(&state)
        .list(session.user_id, Page::new(query.skip, query.limit))
        .await
        .map_err(owner_error(&state))?;

    let base_url = &state.settings.guest_link_base_url;
    Ok(Json(
        guests
            .into_iter()
            .map(|guest| GuestResponse::new(guest, base_url))
            .collect(),
    ))
}

#[tracing::instrument(name = "get_guest", skip_all, fields(guest_id = guest_id))]
pub async fn get_guest(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(guest_id): Path<i64>,
) -> HandlerResult<GuestResponse> {
    let session = authenticate(&state, &headers).await?;
    let guest = use_case(&state)
        .get(session.user_id, guest_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(GuestResponse::new(guest, &state.settings.guest_link_base_url)))
}

#[tracing::instrument(name = "update_guest", skip_all, fields(guest_id = guest_id))]
pub async fn update_guest(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(guest_id): Path<i64>,
    Json(payload): Json<UpdateGuestRequest>,
) -> HandlerResult<GuestResponse> {
    let session = authenticate(&state, &headers).await?;
    let guest = use_case(&state)
        .update(
            session.user_id,
            guest_id,
            GuestUpdate {
                name: payload.name,
                phone: payload.phone,
                confirmed: payload.confirmed,
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(GuestResponse::new(guest, &state.settings.guest_link_base_url)))
}

#[tracing::instrument(name = "delete_guest", skip_all, fields(guest_id = guest_id))]
pub async fn delete_guest(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(guest_id): Path<i64>,
) -> Result<StatusCode, HandlerError> {
    let session = authenticate(&state, &headers).await?;
    use_case(&state)
        .delete(session.user_id, guest_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(StatusCode::NO_CONTENT)
}

// Guest-facing: the guest's own record.
#[tracing::instrument(name = "view_guest", skip_all)]
pub async fn view_guest(
    State(state): State<AppState>,
    Path(guest_hash): Path<String>,
) -> HandlerResult<GuestResponse> {
    let guest = use_case(&state)
        .view_own(&guest_hash)
        .await
        .map_err(guest_error(&state))?;

    Ok(Json(GuestResponse::new(guest, &state.settings.guest_link_base_url)))
}

#[tracing::instrument(name = "confirm_guest", skip_all)]
pub async fn confirm_guest(
    State(state): State<AppState>,
    Path(guest_hash): Path<String>,
) -> HandlerResult<GuestResponse> {
    let guest = use_case(&state)
        .confirm(&guest_hash)
        .await
        .map_err(guest_error(&state))?;

    Ok(Json(GuestResponse::new(guest, &state.settings.guest_link_base_url)))
}
