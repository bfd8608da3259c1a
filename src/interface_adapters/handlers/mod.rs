// HTTP handlers grouped by product area, plus the shared error mapping and
// bearer authentication they all use.

pub mod accounts;
pub mod dashboard;
pub mod gift_shop;
pub mod guests;
pub mod invitations;
pub mod menus;
pub mod photo_challenge;
pub mod photos;
pub mod schedule;
pub mod site_config;
pub mod timeline;

use axum::{
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    Json,
};
use serde_json::json;
use tracing::{debug, error};

use crate::domain::entities::Session;
use crate::domain::errors::AppError;
use crate::interface_adapters::protocol::{ErrorResponse, HealthResponse};
use crate::interface_adapters::state::{AppState, ServiceSettings};
use crate::use_cases::accounts::VerifyTokenUseCase;

pub type HandlerError = (StatusCode, Json<ErrorResponse>);
pub type HandlerResult<T> = Result<Json<T>, HandlerError>;

// Which audience an endpoint serves; guest routes hide what exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorContext {
    Owner,
    Guest,
}

// Handler for liveness checks.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// Helper to build a JSON error response.
fn error_response(
    status: StatusCode,
    error_code: &'static str,
    message: impl Into<String>,
    details: Option<serde_json::Value>,
) -> HandlerError {
    (
        status,
        Json(ErrorResponse {
            error_code,
            message: message.into(),
            details,
        }),
    )
}

// Maps domain errors to HTTP responses by audience.
pub fn map_app_error(err: AppError, context: ErrorContext, settings: &ServiceSettings) -> HandlerError {
    let details = |detail: String| (!settings.production).then(|| json!(detail));

    match (context, err) {
        (ErrorContext::Guest, AppError::NotFound(resource) | AppError::AccessDenied(resource)) => {
            debug!(resource, "guest request rejected");
            error_response(StatusCode::NOT_FOUND, "NOT_FOUND", "resource not found", None)
        }
        (_, AppError::NotFound(resource)) => error_response(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{resource} not found"),
            None,
        ),
        (_, AppError::AccessDenied(resource)) => error_response(
            StatusCode::FORBIDDEN,
            "ACCESS_DENIED",
            format!("access denied to {resource}"),
            None,
        ),
        (_, AppError::AlreadyExists(resource)) => error_response(
            StatusCode::CONFLICT,
            "ALREADY_EXISTS",
            format!("{resource} already exists"),
            None,
        ),
        (_, AppError::InvalidContent(message)) => {
            error_response(StatusCode::BAD_REQUEST, "INVALID_CONTENT", message, None)
        }
        (_, err @ (AppError::Unauthorized | AppError::SessionExpired | AppError::InvalidCredentials)) => {
            error_response(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", err.to_string(), None)
        }
        (_, AppError::Database(detail)) => {
            error!(error = %detail, "database error");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "database error",
                details(detail),
            )
        }
        (_, AppError::Internal(detail)) => {
            error!(error = %detail, "internal error");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error",
                details(detail),
            )
        }
    }
}

pub fn owner_error(state: &AppState) -> impl Fn(AppError) -> HandlerError + '_ {
    move |err| map_app_error(err, ErrorContext::Owner, &state.settings)
}

pub fn guest_error(state: &AppState) -> impl Fn(AppError) -> HandlerError + '_ {
    move |err| map_app_error(err, ErrorContext::Guest, &state.settings)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

// Resolves the owner session behind the `Authorization: Bearer` header.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Session, HandlerError> {
    let token = bearer_token(headers).ok_or_else(|| {
        map_app_error(AppError::Unauthorized, ErrorContext::Owner, &state.settings)
    })?;

    VerifyTokenUseCase {
        sessions: state.sessions.as_ref(),
        clock: state.clock.as_ref(),
    }
    .execute(token)
    .await
    .map_err(owner_error(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn settings(production: bool) -> ServiceSettings {
        ServiceSettings {
            production,
            ..ServiceSettings::default()
        }
    }

    #[test]
    fn when_guest_context_then_not_found_and_access_denied_are_identical() {
        let (status_a, Json(a)) =
            map_app_error(AppError::NotFound("guest"), ErrorContext::Guest, &settings(false));
        let (status_b, Json(b)) =
            map_app_error(AppError::AccessDenied("photo"), ErrorContext::Guest, &settings(false));

        assert_eq!(status_a, StatusCode::NOT_FOUND);
        assert_eq!(status_a, status_b);
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            json!({"error_code": "NOT_FOUND", "message": "resource not found", "details": null})
        );
    }

    #[test]
    fn when_owner_context_then_access_denied_is_403() {
        let (status, Json(body)) =
            map_app_error(AppError::AccessDenied("guest"), ErrorContext::Owner, &settings(false));

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.error_code, "ACCESS_DENIED");
    }

    #[test]
    fn when_production_then_database_details_are_hidden() {
        let err = || AppError::Database("relation guests does not exist".to_string());

        let (_, Json(dev)) = map_app_error(err(), ErrorContext::Owner, &settings(false));
        let (status, Json(prod)) = map_app_error(err(), ErrorContext::Owner, &settings(true));

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(prod.error_code, "DATABASE_ERROR");
        assert_eq!(prod.details, None);
        assert_eq!(dev.details, Some(json!("relation guests does not exist")));
    }

    #[test]
    fn bearer_token_requires_scheme_and_value() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc-123"));
        assert_eq!(bearer_token(&headers), Some("abc-123"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc-123"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }
}
