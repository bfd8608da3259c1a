use crate::domain::entities::{Guest, Page};
use crate::domain::errors::AppError;
use crate::domain::ports::GuestStore;

pub struct Dashboard {
    pub total_guests: usize,
    pub confirmed_count: usize,
    pub pending_count: usize,
    /// Percentage of confirmed guests, two decimals.
    pub confirmation_rate: f64,
    pub confirmed: Vec<Guest>,
    pub pending: Vec<Guest>,
}

// RSVP counters for the owner's landing page.
pub struct DashboardUseCase<'a> {
    pub guests: &'a dyn GuestStore,
}

impl DashboardUseCase<'_> {
    pub async fn summary(&self, user_id: i64) -> Result<Dashboard, AppError> {
        let guests = self.guests.list_guests(user_id, Page::all()).await?;
        let total_guests = guests.len();
        let (mut confirmed, mut pending): (Vec<Guest>, Vec<Guest>) =
            guests.into_iter().partition(|guest| guest.confirmed);
        confirmed.sort_by(|a, b| a.name.cmp(&b.name));
        pending.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Dashboard {
            total_guests,
            confirmed_count: confirmed.len(),
            pending_count: pending.len(),
            confirmation_rate: confirmation_rate(confirmed.len(), total_guests),
            confirmed,
            pending,
        })
    }
}

fn confirmation_rate(confirmed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = confirmed as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}
