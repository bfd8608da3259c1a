use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::domain::entities::TimelineItem;
use crate::interface_adapters::handlers::{authenticate, owner_error, HandlerError, HandlerResult};
use crate::interface_adapters::protocol::{
    CreateTimelineItemRequest, TimelineQuery, TimelineRequest, TimelineResponse,
    UpdateTimelineItemRequest,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::timeline::{
    ItemOrder, TimelineItemInput, TimelineItemUpdate, TimelineUseCase, TimelineView,
};

fn use_case(state: &AppState) -> TimelineUseCase<'_> {
    TimelineUseCase {
        timelines: state.timelines.as_ref(),
        photos: state.photos.as_ref(),
        clock: state.clock.as_ref(),
    }
}

fn timeline_response(view: TimelineView) -> TimelineResponse {
    TimelineResponse {
        timeline: view.timeline,
        items: view.items,
    }
}

// The body is optional; an empty POST creates the timeline with its default title.
#[tracing::instrument(name = "create_timeline", skip_all)]
pub async fn create_timeline(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Option<Json<TimelineRequest>>,
) -> HandlerResult<TimelineResponse> {
    let session = authenticate(&state, &headers).await?;
    let title = payload.and_then(|Json(payload)| payload.title);
    let view = use_case(&state)
        .create(session.user_id, title)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(timeline_response(view)))
}

#[tracing::instrument(name = "get_timeline", skip_all, fields(order_by_date = query.order_by_date))]
pub async fn get_timeline(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TimelineQuery>,
) -> HandlerResult<TimelineResponse> {
    let session = authenticate(&state, &headers).await?;
    let order = if query.order_by_date {
        ItemOrder::NewestFirst
    } else {
        ItemOrder::Created
    };
    let view = use_case(&state)
        .get(session.user_id, order)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(timeline_response(view)))
}

#[tracing::instrument(name = "update_timeline", skip_all)]
pub async fn update_timeline(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<TimelineRequest>,
) -> HandlerResult<TimelineResponse> {
    let session = authenticate(&state, &headers).await?;
    let view = use_case(&state)
        .update(session.user_id, payload.title)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(timeline_response(view)))
}

#[tracing::instrument(name = "delete_timeline", skip_all)]
pub async fn delete_timeline(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, HandlerError> {
    let session = authenticate(&state, &headers).await?;
    use_case(&state)
        .delete(session.user_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "create_timeline_item", skip_all)]
pub async fn create_timeline_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateTimelineItemRequest>,
) -> HandlerResult<TimelineItem> {
    let session = authenticate(&state, &headers).await?;
    let item = use_case(&state)
        .create_item(
            session.user_id,
            TimelineItemInput {
                title: payload.title,
                text: payload.text,
                video_url: payload.video_url,
                image_url: payload.image_url,
                photo_id: payload.photo_id,
                date: payload.date,
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(item))
}

#[tracing::instrument(name = "update_timeline_item", skip_all, fields(item_id = item_id))]
pub async fn update_timeline_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<i64>,
    Json(payload): Json<UpdateTimelineItemRequest>,
) -> HandlerResult<TimelineItem> {
    let session = authenticate(&state, &headers).await?;
    let item = use_case(&state)
        .update_item(
            session.user_id,
            item_id,
            TimelineItemUpdate {
                title: payload.title,
                text: payload.text,
                video_url: payload.video_url,
                image_url: payload.image_url,
                photo_id: payload.photo_id,
                date: payload.date,
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(item))
}

#[tracing::instrument(name = "delete_timeline_item", skip_all, fields(item_id = item_id))]
pub async fn delete_timeline_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<i64>,
) -> Result<StatusCode, HandlerError> {
    let session = authenticate(&state, &headers).await?;
    use_case(&state)
        .delete_item(session.user_id, item_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(StatusCode::NO_CONTENT)
}
