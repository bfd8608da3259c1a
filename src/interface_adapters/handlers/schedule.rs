use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::domain::entities::ScheduleItem;
use crate::interface_adapters::handlers::{authenticate, owner_error, HandlerError, HandlerResult};
use crate::interface_adapters::protocol::{
    CreateScheduleRequest, ScheduleItemRequest, ScheduleResponse, UpdateScheduleRequest,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::schedule::{
    ScheduleInput, ScheduleItemInput, ScheduleUpdate, ScheduleUseCase, ScheduleView,
};

fn use_case(state: &AppState) -> ScheduleUseCase<'_> {
    ScheduleUseCase {
        schedules: state.schedules.as_ref(),
    }
}

fn schedule_response(view: ScheduleView) -> ScheduleResponse {
    ScheduleResponse {
        schedule: view.schedule,
        items: view.items,
    }
}

fn item_input(request: ScheduleItemRequest) -> ScheduleItemInput {
    ScheduleItemInput {
        title: request.title,
        description: request.description,
        time: request.time,
    }
}

#[tracing::instrument(name = "create_schedule", skip_all, fields(items = payload.items.len()))]
pub async fn create_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateScheduleRequest>,
) -> HandlerResult<ScheduleResponse> {
    let session = authenticate(&state, &headers).await?;
    let view = use_case(&state)
        .create(
            session.user_id,
            ScheduleInput {
                title: payload.title,
                wedding_date: payload.wedding_date,
                items: payload.items.into_iter().map(item_input).collect(),
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(schedule_response(view)))
}

#[tracing::instrument(name = "get_schedule", skip_all)]
pub async fn get_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<ScheduleResponse> {
    let session = authenticate(&state, &headers).await?;
    let view = use_case(&state)
        .get(session.user_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(schedule_response(view)))
}

#[tracing::instrument(name = "update_schedule", skip_all)]
pub async fn update_schedule(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateScheduleRequest>,
) -> HandlerResult<ScheduleResponse> {
    let session = authenticate(&state, &headers).await?;
    let view = use_case(&state)
        .update(
            session.user_id,
            ScheduleUpdate {
                title: payload.title,
                wedding_date: payload.wedding_date,
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(schedule_response(view)))
}

#[tracing::instrument(name = "delete_schedule", skip_all)]
pub async fn delete_schedule(
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

#[tracing::instrument(name = "create_schedule_item", skip_all)]
pub async fn create_schedule_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ScheduleItemRequest>,
) -> HandlerResult<ScheduleItem> {
    let session = authenticate(&state, &headers).await?;
    let item = use_case(&state)
        .create_item(session.user_id, item_input(payload))
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(item))
}

#[tracing::instrument(name = "update_schedule_item", skip_all, fields(item_id = item_id))]
pub async fn update_schedule_item(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(item_id): Path<i64>,
    Json(payload): Json<ScheduleItemRequest>,
) -> HandlerResult<ScheduleItem> {
    let session = authenticate(&state, &headers).await?;
    let item = use_case(&state)
        .update_item(session.user_id, item_id, item_input(payload))
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(item))
}

#[tracing::instrument(name = "delete_schedule_item", skip_all, fields(item_id = item_id))]
pub async fn delete_schedule_item(
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
