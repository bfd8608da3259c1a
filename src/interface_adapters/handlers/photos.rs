use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::domain::entities::{Page, Photo};
use crate::interface_adapters::handlers::{
    authenticate, guest_error, owner_error, HandlerError, HandlerResult,
};
use crate::interface_adapters::protocol::{PageQuery, UploadPhotoRequest};
use crate::interface_adapters::state::AppState;
use crate::use_cases::photos::PhotosUseCase;

fn use_case(state: &AppState) -> PhotosUseCase<'_> {
    PhotosUseCase {
        photos: state.photos.as_ref(),
        guests: state.guests.as_ref(),
        clock: state.clock.as_ref(),
    }
}

#[tracing::instrument(name = "list_photos", skip_all)]
pub async fn list_photos(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<PageQuery>,
) -> HandlerResult<Vec<Photo>> {
    let session = authenticate(&state, &headers).await?;
    let photos = use_case(&state)
        .list_all(session.user_id, Page::new(query.skip, query.limit))
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(photos))
}

#[tracing::instrument(name = "list_guest_photos", skip_all, fields(guest_id = guest_id))]
pub async fn list_guest_photos(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(guest_id): Path<i64>,
) -> HandlerResult<Vec<Photo>> {
    let session = authenticate(&state, &headers).await?;
    let photos = use_case(&state)
        .list_guest_photos(session.user_id, guest_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(photos))
}

#[tracing::instrument(name = "delete_photo", skip_all, fields(photo_id = photo_id))]
pub async fn delete_photo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(photo_id): Path<i64>,
) -> Result<StatusCode, HandlerError> {
    let session = authenticate(&state, &headers).await?;
    use_case(&state)
        .delete(session.user_id, photo_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "upload_photo", skip_all)]
pub async fn upload_photo(
    State(state): State<AppState>,
    Path(guest_hash): Path<String>,
    Json(payload): Json<UploadPhotoRequest>,
) -> HandlerResult<Photo> {
    let photo = use_case(&state)
        .upload(&guest_hash, &payload.filename)
        .await
        .map_err(guest_error(&state))?;

    tracing::info!(photo_id = photo.id, guest_id = photo.guest_id, "photo registered");
    Ok(Json(photo))
}

#[tracing::instrument(name = "guest_photos", skip_all)]
pub async fn guest_photos(
    State(state): State<AppState>,
    Path(guest_hash): Path<String>,
) -> HandlerResult<Vec<Photo>> {
    let photos = use_case(&state)
        .list_for_guest(&guest_hash)
        .await
        .map_err(guest_error(&state))?;

    Ok(Json(photos))
}
