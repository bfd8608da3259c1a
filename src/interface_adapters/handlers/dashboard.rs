use axum::{extract::State, http::HeaderMap, Json};

use crate::domain::entities::Guest;
use crate::interface_adapters::handlers::{authenticate, owner_error, HandlerResult};
use crate::interface_adapters::protocol::{DashboardResponse, GuestResponse};
use crate::interface_adapters::state::AppState;
use crate::use_cases::dashboard::DashboardUseCase;

#[tracing::instrument(name = "dashboard", skip_all)]
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<DashboardResponse> {
    let session = authenticate(&state, &headers).await?;
    let dashboard = DashboardUseCase {
        guests: state.guests.as_ref(),
    }
    .summary(session.user_id)
    .await
    .map_err(owner_error(&state))?;

    let base_url = &state.settings.guest_link_base_url;
    let responses = |guests: Vec<Guest>| -> Vec<GuestResponse> {
        guests
            .into_iter()
            .map(|guest| GuestResponse::new(guest, base_url))
            .collect()
    };
    Ok(Json(DashboardResponse {
        total_guests: dashboard.total_guests,
        confirmed_count: dashboard.confirmed_count,
        pending_count: dashboard.pending_count,
        confirmation_rate: dashboard.confirmation_rate,
        confirmed_guests: responses(dashboard.confirmed),
        pending_guests: responses(dashboard.pending),
    }))
}
