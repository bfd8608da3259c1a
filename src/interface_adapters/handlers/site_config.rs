use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::domain::entities::SiteConfiguration;
use crate::interface_adapters::handlers::{
    authenticate, guest_error, owner_error, HandlerError, HandlerResult,
};
use crate::interface_adapters::protocol::SiteConfigRequest;
use crate::interface_adapters::state::AppState;
use crate::use_cases::site_config::SiteConfigUseCase;

fn use_case(state: &AppState) -> SiteConfigUseCase<'_> {
    SiteConfigUseCase {
        configs: state.site_configs.as_ref(),
    }
}

#[tracing::instrument(name = "create_site_config", skip_all)]
pub async fn create_site_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SiteConfigRequest>,
) -> HandlerResult<SiteConfiguration> {
    let session = authenticate(&state, &headers).await?;
    let config = use_case(&state)
        .create(session.user_id, payload.into())
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(config))
}

#[tracing::instrument(name = "get_site_config", skip_all)]
pub async fn get_site_config(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<SiteConfiguration> {
    let session = authenticate(&state, &headers).await?;
    let config = use_case(&state)
        .get(session.user_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(config))
}

#[tracing::instrument(name = "upsert_site_config", skip_all)]
pub async fn upsert_site_config(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<SiteConfigRequest>,
) -> HandlerResult<SiteConfiguration> {
    let session = authenticate(&state, &headers).await?;
    let config = use_case(&state)
        .upsert(session.user_id, payload.into())
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(config))
}

#[tracing::instrument(name = "delete_site_config", skip_all)]
pub async fn delete_site_config(
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

// Public read for the rendered wedding site; no session needed. Errors use
// the guest mapping so the response does not reveal which owners exist.
#[tracing::instrument(name = "public_site_config", skip_all, fields(user_id = user_id))]
pub async fn public_site_config(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> HandlerResult<SiteConfiguration> {
    let config = use_case(&state)
        .get(user_id)
        .await
        .map_err(guest_error(&state))?;

    Ok(Json(config))
}
