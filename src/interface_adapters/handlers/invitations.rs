use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};

use crate::domain::entities::Invitation;
use crate::interface_adapters::handlers::{
    authenticate, guest_error, owner_error, HandlerError, HandlerResult,
};
use crate::interface_adapters::protocol::{
    CreateInvitationRequest, GuestInvitationResponse, GuestResponse, UpdateInvitationRequest,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::invitations::{InvitationInput, InvitationUpdate, InvitationsUseCase};

fn use_case(state: &AppState) -> InvitationsUseCase<'_> {
    InvitationsUseCase {
        invitations: state.invitations.as_ref(),
        guests: state.guests.as_ref(),
    }
}

#[tracing::instrument(name = "create_invitation", skip_all)]
pub async fn create_invitation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateInvitationRequest>,
) -> HandlerResult<Invitation> {
    let session = authenticate(&state, &headers).await?;
    let invitation = use_case(&state)
        .create(
            session.user_id,
            InvitationInput {
                intro_text: payload.intro_text,
                video_url: payload.video_url,
                photo_album_url: payload.photo_album_url,
                background_image_url: payload.background_image_url,
                background_color: payload.background_color,
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(invitation))
}

#[tracing::instrument(name = "get_invitation", skip_all)]
pub async fn get_invitation(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<Invitation> {
    let session = authenticate(&state, &headers).await?;
    let invitation = use_case(&state)
        .get(session.user_id)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(invitation))
}

#[tracing::instrument(name = "update_invitation", skip_all)]
pub async fn update_invitation(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateInvitationRequest>,
) -> HandlerResult<Invitation> {
    let session = authenticate(&state, &headers).await?;
    let invitation = use_case(&state)
        .update(
            session.user_id,
            InvitationUpdate {
                intro_text: payload.intro_text,
                video_url: payload.video_url,
                photo_album_url: payload.photo_album_url,
                background_image_url: payload.background_image_url,
                background_color: payload.background_color,
            },
        )
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(invitation))
}

#[tracing::instrument(name = "delete_invitation", skip_all)]
pub async fn delete_invitation(
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

// Guest-facing: the invitation page behind an invite link.
#[tracing::instrument(name = "guest_invitation", skip_all)]
pub async fn guest_invitation(
    State(state): State<AppState>,
    Path(guest_hash): Path<String>,
) -> HandlerResult<GuestInvitationResponse> {
    let (guest, invitation) = use_case(&state)
        .for_guest(&guest_hash)
        .await
        .map_err(guest_error(&state))?;

    Ok(Json(GuestInvitationResponse {
        guest: GuestResponse::new(guest, &state.settings.guest_link_base_url),
        invitation,
    }))
}
