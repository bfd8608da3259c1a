use chrono::{NaiveDate, NaiveDateTime};
use tracing::info;

use crate::domain::entities::{NewSchedule, NewScheduleItem, Schedule, ScheduleItem};
use crate::domain::errors::{AppError, StoreError};
use crate::domain::ports::ScheduleStore;
use crate::use_cases::validation;

pub const DEFAULT_SCHEDULE_TITLE: &str = "Cronograma do Evento";

const MAX_DESCRIPTION_LEN: usize = 1000;

pub struct ScheduleInput {
    pub title: Option<String>,
    pub wedding_date: NaiveDate,
    pub items: Vec<ScheduleItemInput>,
}

#[derive(Default)]
pub struct ScheduleUpdate {
    pub title: Option<String>,
    pub wedding_date: Option<NaiveDate>,
}

// Items are always written whole; an update replaces every field.
pub struct ScheduleItemInput {
    pub title: String,
    pub description: Option<String>,
    pub time: NaiveDateTime,
}

pub struct ScheduleView {
    pub schedule: Schedule,
    pub items: Vec<ScheduleItem>,
}

// Event-day schedule, one per owner.
pub struct ScheduleUseCase<'a> {
    pub schedules: &'a dyn ScheduleStore,
}

impl ScheduleUseCase<'_> {
    pub async fn create(&self, user_id: i64, input: ScheduleInput) -> Result<ScheduleView, AppError> {
        let title = match input.title {
            Some(title) => validation::bounded_text("title", &title, 1, 100)?,
            None => DEFAULT_SCHEDULE_TITLE.to_string(),
        };
        let items = input
            .items
            .into_iter()
            .map(schedule_item)
            .collect::<Result<Vec<_>, _>>()?;
        let schedule = NewSchedule {
            user_id,
            title,
            wedding_date: input.wedding_date,
        };

        match self.schedules.insert_schedule(schedule, items).await {
            Ok(schedule) => {
                info!(user_id, schedule_id = schedule.id, "schedule created");
                let items = self.schedules.list_schedule_items(schedule.id).await?;
                Ok(ScheduleView { schedule, items })
            }
            Err(StoreError::Conflict) => Err(AppError::AlreadyExists("schedule")),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get(&self, user_id: i64) -> Result<ScheduleView, AppError> {
        let schedule = self.owned_schedule(user_id).await?;
        let items = self.schedules.list_schedule_items(schedule.id).await?;
        Ok(ScheduleView { schedule, items })
    }

    pub async fn update(&self, user_id: i64, update: ScheduleUpdate) -> Result<ScheduleView, AppError> {
        let mut schedule = self.owned_schedule(user_id).await?;
        if let Some(title) = update.title {
            schedule.title = validation::bounded_text("title", &title, 1, 100)?;
        }
        if let Some(date) = update.wedding_date {
            schedule.wedding_date = date;
        }
        let schedule = self.schedules.update_schedule(&schedule).await?;
        let items = self.schedules.list_schedule_items(schedule.id).await?;
        Ok(ScheduleView { schedule, items })
    }

    pub async fn delete(&self, user_id: i64) -> Result<(), AppError> {
        if !self.schedules.delete_schedule(user_id).await? {
            return Err(AppError::NotFound("schedule"));
        }
        Ok(())
    }

    pub async fn create_item(
        &self,
        user_id: i64,
        input: ScheduleItemInput,
    ) -> Result<ScheduleItem, AppError> {
        let schedule = self.owned_schedule(user_id).await?;
        let item = schedule_item(input)?;
        Ok(self.schedules.insert_schedule_item(schedule.id, item).await?)
    }

    pub async fn update_item(
        &self,
        user_id: i64,
        item_id: i64,
        input: ScheduleItemInput,
    ) -> Result<ScheduleItem, AppError> {
        let schedule = self.owned_schedule(user_id).await?;
        let mut item = self.item_in(&schedule, item_id).await?;
        let replacement = schedule_item(input)?;
        item.title = replacement.title;
        item.description = replacement.description;
        item.time = replacement.time;
        Ok(self.schedules.update_schedule_item(&item).await?)
    }

    pub async fn delete_item(&self, user_id: i64, item_id: i64) -> Result<(), AppError> {
        let schedule = self.owned_schedule(user_id).await?;
        let item = self.item_in(&schedule, item_id).await?;
        self.schedules.delete_schedule_item(item.id).await?;
        Ok(())
    }

    async fn owned_schedule(&self, user_id: i64) -> Result<Schedule, AppError> {
        self.schedules
            .find_schedule(user_id)
            .await?
            .ok_or(AppError::NotFound("schedule"))
    }

    async fn item_in(&self, schedule: &Schedule, item_id: i64) -> Result<ScheduleItem, AppError> {
        self.schedules
            .find_schedule_item(item_id)
            .await?
            .filter(|item| item.schedule_id == schedule.id)
            .ok_or(AppError::NotFound("schedule item"))
    }
}

fn schedule_item(input: ScheduleItemInput) -> Result<NewScheduleItem, AppError> {
    Ok(NewScheduleItem {
        title: validation::bounded_text("title", &input.title, 1, 100)?,
        description: validation::optional_text("description", input.description, MAX_DESCRIPTION_LEN)?,
        time: input.time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface_adapters::memory::MemoryStore;

    fn wedding_day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, 21).unwrap()
    }

    fn slot(title: &str, hour: u32) -> ScheduleItemInput {
        ScheduleItemInput {
            title: title.to_string(),
            description: None,
            time: wedding_day().and_hms_opt(hour, 0, 0).unwrap(),
        }
    }

    fn input(items: Vec<ScheduleItemInput>) -> ScheduleInput {
        ScheduleInput {
            title: None,
            wedding_date: wedding_day(),
            items,
        }
    }

    #[tokio::test]
    async fn when_schedule_is_created_with_items_then_they_come_back_in_time_order() {
        let store = MemoryStore::new();
        let schedule = ScheduleUseCase { schedules: &store };

        let view = schedule
            .create(1, input(vec![slot("Festa", 20), slot("Cerimônia", 16)]))
            .await
            .expect("create");

        assert_eq!(view.schedule.title, DEFAULT_SCHEDULE_TITLE);
        let titles: Vec<&str> = view.items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["Cerimônia", "Festa"]);
    }

    #[tokio::test]
    async fn when_owner_already_has_schedule_then_already_exists() {
        let store = MemoryStore::new();
        let schedule = ScheduleUseCase { schedules: &store };
        schedule.create(1, input(Vec::new())).await.expect("create");

        let result = schedule.create(1, input(Vec::new())).await;

        assert_eq!(result.err(), Some(AppError::AlreadyExists("schedule")));
    }

    #[tokio::test]
    async fn when_item_has_blank_title_then_nothing_is_written() {
        let store = MemoryStore::new();
        let schedule = ScheduleUseCase { schedules: &store };

        let result = schedule
            .create(1, input(vec![slot("Cerimônia", 16), slot("  ", 18)]))
            .await;

        assert!(matches!(result, Err(AppError::InvalidContent(_))));
        assert_eq!(schedule.get(1).await.err(), Some(AppError::NotFound("schedule")));
    }

    #[tokio::test]
    async fn when_item_is_replaced_then_every_field_changes() {
        let store = MemoryStore::new();
        let schedule = ScheduleUseCase { schedules: &store };
        let view = schedule
            .create(1, input(vec![ScheduleItemInput {
                description: Some("Na capela".to_string()),
                ..slot("Cerimônia", 16)
            }]))
            .await
            .expect("create");

        let replaced = schedule
            .update_item(1, view.items[0].id, slot("Cerimônia civil", 15))
            .await
            .expect("update");

        assert_eq!(replaced.title, "Cerimônia civil");
        assert_eq!(replaced.description, None);
        assert_eq!(replaced.time, wedding_day().and_hms_opt(15, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn when_item_belongs_to_another_schedule_then_not_found() {
        let store = MemoryStore::new();
        let schedule = ScheduleUseCase { schedules: &store };
        schedule.create(1, input(Vec::new())).await.expect("create");
        let theirs = schedule
            .create(2, input(vec![slot("Festa", 20)]))
            .await
            .expect("create");

        let result = schedule.delete_item(1, theirs.items[0].id).await;

        assert_eq!(result.err(), Some(AppError::NotFound("schedule item")));
    }

    #[tokio::test]
    async fn when_update_changes_title_and_date_then_items_are_kept() {
        let store = MemoryStore::new();
        let schedule = ScheduleUseCase { schedules: &store };
        schedule.create(1, input(vec![slot("Festa", 20)])).await.expect("create");
        let new_date = NaiveDate::from_ymd_opt(2026, 12, 5).unwrap();

        let view = schedule
            .update(
                1,
                ScheduleUpdate {
                    title: Some("Nosso dia".to_string()),
                    wedding_date: Some(new_date),
                },
            )
            .await
            .expect("update");

        assert_eq!(view.schedule.title, "Nosso dia");
        assert_eq!(view.schedule.wedding_date, new_date);
        assert_eq!(view.items.len(), 1);
    }
}
