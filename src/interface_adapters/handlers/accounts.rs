use axum::{extract::State, http::HeaderMap, Json};

use crate::interface_adapters::handlers::{
    authenticate, owner_error, HandlerResult,
};
use crate::interface_adapters::protocol::{
    LoginRequest, LoginResponse, LogoutRequest, LogoutResponse, RegisterRequest, UserResponse,
};
use crate::interface_adapters::state::AppState;
use crate::use_cases::accounts::{
    CurrentUserUseCase, LoginUseCase, LogoutUseCase, RegisterInput, RegisterUseCase,
};

// Handler for owner registration.
#[tracing::instrument(name = "register", skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> HandlerResult<UserResponse> {
    let use_case = RegisterUseCase {
        users: state.users.as_ref(),
    };

    let user = use_case
        .execute(RegisterInput {
            email: payload.email,
            full_name: payload.full_name,
            password: payload.password,
        })
        .await
        .map_err(owner_error(&state))?;

    tracing::info!(user_id = user.id, "owner registered");
    Ok(Json(user.into()))
}

// Handler for issuing an owner session token.
#[tracing::instrument(name = "login", skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> HandlerResult<LoginResponse> {
    let use_case = LoginUseCase {
        users: state.users.as_ref(),
        sessions: state.sessions.as_ref(),
        clock: state.clock.as_ref(),
        ttl_seconds: state.settings.session_ttl_seconds,
    };

    let result = use_case
        .execute(&payload.email, &payload.password)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(LoginResponse {
        token: result.token,
        token_type: "bearer",
        expires_at: result.expires_at,
        user: result.user.into(),
    }))
}

// Handler for revoking a session token.
#[tracing::instrument(name = "logout", skip_all)]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> HandlerResult<LogoutResponse> {
    let use_case = LogoutUseCase {
        sessions: state.sessions.as_ref(),
    };

    let result = use_case
        .execute(&payload.token)
        .await
        .map_err(owner_error(&state))?;

    Ok(Json(LogoutResponse {
        revoked: result.revoked,
    }))
}

// Handler returning the authenticated owner's profile.
#[tracing::instrument(name = "me", skip_all)]
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult<UserResponse> {
    let session = authenticate(&state, &headers).await?;
    let user = CurrentUserUseCase {
        users: state.users.as_ref(),
    }
    .execute(&session)
    .await
    .map_err(owner_error(&state))?;

    Ok(Json(user.into()))
}
