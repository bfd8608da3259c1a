use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::domain::entities::{ChallengeTask, PhotoChallenge, TaskCompletion};
use crate::interface_adapters::handlers::{
    authenticate, guest_error, owner_error, HandlerError, HandlerResult,
};
use crate::interface_adapters::protocol::{
    ChallengeRequest, ChallengeSummaryResponse, CompleteTaskRequest, CompletionResponse,
    CreateTaskRequest, GuestChallengeResponse, GuestTaskResponse, ParticipationResponse,
    TaskSummaryResponse, UpdateTaskRequest, UploadCompletionResponse, UploadPhotoRequest,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::photo_challenge::{
    ChallengeSummary, PhotoChallengeUseCase, TaskInput, TaskUpdate,
};

fn use_case(state: &AppState) -> PhotoChallengeUseCase<'_> {
    PhotoChallengeUseCase {
        challenges: state.challenges.as_ref(),
        guests: state.guests.as_ref(),
        photos: state.photos.as_ref(),
        clock: state.clock.as_ref(),
    }
}

fn summary_response(summary: ChallengeSummary) -> ChallengeSummaryResponse {
    ChallengeSummaryResponse {
        id: summary.challenge.id,
        title: summary.challenge.title,
        created_at: summary.challenge.created_at,
        total_tasks: summary.total_tasks,
        completed_tasks: summary.completed_tasks,
        pending_tasks: summary.pending_tasks,
        completion_percentage: summary.completion_percentage,
        tasks: summary
            .tasks
            .into_iter()
            .map(|entry| TaskSummaryResponse {
                id: entry.task.id,
                challenge_id: entry.task.challenge_id,
                title: entry.task.title,
                description: entry.task.description,
                created_at: entry.task.created_at,
                is_completed: !entry.completed_by.is_empty(),
                completed_by: entry
                    .completed_by
                    .into_iter()
                    .map(|c| CompletionResponse {
                        guest_id: c.guest_id,
                        guest_name: c.guest_name,
                        photo_id: c.photo_id,
                        completed_at: c.completed_at,
                    })
                    .collect(),
            })
            .collect(),
        guests_participation: summary
            .participation
            .into_iter()
            .map(|p| ParticipationResponse {
                guest_name: p.guest_name,
                tasks_completed: p.tasks_completed,
            })
            .collect(),
    }
}

#[tracing::instrument(name = "create_challenge", skip_all)]
pub async fn create_challenge(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ChallengeRequest>,
) -> HandlerResult<PhotoChallenge> {
    let session = authenticate(&state, &headers).await?;
    let challenge = use_case(&state)
        .create(session.user_id, &payload.title)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(challenge))
}

#[tracing::instrument(name = "get_challenge", skip_all)]
pub async fn get_challenge(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<ChallengeSummaryResponse> {
    let session = authenticate(&state, &headers).await?;
    let summary = use_case(&state)
        .summary(session.user_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(summary_response(summary)))
}

#[tracing::instrument(name = "update_challenge", skip_all)]
pub async fn update_challenge(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ChallengeRequest>,
) -> HandlerResult<PhotoChallenge> {
    let session = authenticate(&state, &headers).await?;
    let challenge = use_case(&state)
        .update(session.user_id, &payload.title)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(challenge))
}

#[tracing::instrument(name = "delete_challenge", skip_all)]
pub async fn delete_challenge(
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

#[tracing::instrument(name = "create_task", skip_all)]
pub async fn create_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateTaskRequest>,
) -> HandlerResult<ChallengeTask> {
    let session = authenticate(&state, &headers).await?;
    let task = use_case(&state)
        .create_task(
            session.user_id,
            TaskInput {
                title: payload.title,
                description: payload.description,
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(task))
}

#[tracing::instrument(name = "update_task", skip_all, fields(task_id = task_id))]
pub async fn update_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(task_id): Path<i64>,
    Json(payload): Json<UpdateTaskRequest>,
) -> HandlerResult<ChallengeTask> {
    let session = authenticate(&state, &headers).await?;
    let task = use_case(&state)
        .update_task(
            session.user_id,
            task_id,
            TaskUpdate {
                title: payload.title,
                description: payload.description,
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(task))
}

#[tracing::instrument(name = "delete_task", skip_all, fields(task_id = task_id))]
pub async fn delete_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(task_id): Path<i64>,
) -> Result<StatusCode, HandlerError> {
    let session = authenticate(&state, &headers).await?;
    use_case(&state)
        .delete_task(session.user_id, task_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(StatusCode::NO_CONTENT)
}

#[tracing::instrument(name = "guest_challenge", skip_all)]
pub async fn guest_challenge(
    State(state): State<AppState>,
    Path(guest_hash): Path<String>,
) -> HandlerResult<GuestChallengeResponse> {
    let tasks = use_case(&state)
        .tasks_for_guest(&guest_hash)
        .await
        .map_err(guest_error(&state))?;

    Ok(Json(GuestChallengeResponse {
        tasks: tasks
            .into_iter()
            .map(|view| GuestTaskResponse {
                id: view.task.id,
                challenge_id: view.task.challenge_id,
                title: view.task.title,
                description: view.task.description,
                created_at: view.task.created_at,
                is_completed: view.is_completed,
            })
            .collect(),
    }))
}

#[tracing::instrument(name = "complete_task", skip_all, fields(task_id = task_id))]
pub async fn complete_task(
    State(state): State<AppState>,
    Path((guest_hash, task_id)): Path<(String, i64)>,
    Json(payload): Json<CompleteTaskRequest>,
) -> HandlerResult<TaskCompletion> {
    let completion = use_case(&state)
        .complete_task(&guest_hash, task_id, payload.photo_id)
        .await
        .map_err(guest_error(&state))?;

    Ok(Json(completion))
}

#[tracing::instrument(name = "complete_task_with_upload", skip_all, fields(task_id = task_id))]
pub async fn complete_task_with_upload(
    State(state): State<AppState>,
    Path((guest_hash, task_id)): Path<(String, i64)>,
    Json(payload): Json<UploadPhotoRequest>,
) -> HandlerResult<UploadCompletionResponse> {
    let (photo, completion) = use_case(&state)
        .complete_with_upload(&guest_hash, task_id, &payload.filename)
        .await
        .map_err(guest_error(&state))?;

    Ok(Json(UploadCompletionResponse { photo, completion }))
}
