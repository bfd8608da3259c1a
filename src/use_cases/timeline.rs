// The couple's story timeline: one per owner, with dated entries that carry
// text and at most one piece of media.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::entities::{NewTimeline, NewTimelineItem, Timeline, TimelineItem};
use crate::domain::errors::{AppError, StoreError};
use crate::domain::ports::{Clock, PhotoStore, TimelineStore};
use crate::use_cases::validation;

pub const DEFAULT_TIMELINE_TITLE: &str = "Nossa história até aqui";

const MAX_TITLE_LEN: usize = 200;
const MAX_TEXT_LEN: usize = 5000;

pub struct TimelineItemInput {
    pub title: String,
    pub text: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub photo_id: Option<i64>,
    pub date: DateTime<Utc>,
}

/// Partial update. Setting one media field replaces whatever media the item
/// had; an empty string clears `text`.
#[derive(Default)]
pub struct TimelineItemUpdate {
    pub title: Option<String>,
    pub text: Option<String>,
    pub video_url: Option<String>,
    pub image_url: Option<String>,
    pub photo_id: Option<i64>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ItemOrder {
    #[default]
    Created,
    NewestFirst,
}

pub struct TimelineView {
    pub timeline: Timeline,
    pub items: Vec<TimelineItem>,
}

#[derive(Debug, PartialEq)]
enum Media {
    Video(String),
    Image(String),
    Photo(i64),
}

pub struct TimelineUseCase<'a> {
    pub timelines: &'a dyn TimelineStore,
    pub photos: &'a dyn PhotoStore,
    pub clock: &'a dyn Clock,
}

impl TimelineUseCase<'_> {
    pub async fn create(&self, user_id: i64, title: Option<String>) -> Result<TimelineView, AppError> {
        let title = match title {
            Some(title) => validation::bounded_text("title", &title, 1, MAX_TITLE_LEN)?,
            None => DEFAULT_TIMELINE_TITLE.to_string(),
        };
        let timeline = NewTimeline {
            user_id,
            title,
            created_at: self.clock.now_utc(),
        };
        match self.timelines.insert_timeline(timeline).await {
            Ok(timeline) => Ok(TimelineView {
                timeline,
                items: Vec::new(),
            }),
            Err(StoreError::Conflict) => Err(AppError::AlreadyExists("timeline")),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get(&self, user_id: i64, order: ItemOrder) -> Result<TimelineView, AppError> {
        let timeline = self.owned_timeline(user_id).await?;
        let mut items = self.timelines.list_timeline_items(timeline.id).await?;
        if order == ItemOrder::NewestFirst {
            items.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        }
        Ok(TimelineView { timeline, items })
    }

    pub async fn update(&self, user_id: i64, title: Option<String>) -> Result<TimelineView, AppError> {
        let mut timeline = self.owned_timeline(user_id).await?;
        if let Some(title) = title {
            timeline.title = validation::bounded_text("title", &title, 1, MAX_TITLE_LEN)?;
            timeline = self.timelines.update_timeline(&timeline).await?;
        }
        let items = self.timelines.list_timeline_items(timeline.id).await?;
        Ok(TimelineView { timeline, items })
    }

    pub async fn delete(&self, user_id: i64) -> Result<(), AppError> {
        if !self.timelines.delete_timeline(user_id).await? {
            return Err(AppError::NotFound("timeline"));
        }
        info!(user_id, "timeline deleted");
        Ok(())
    }

    pub async fn create_item(
        &self,
        user_id: i64,
        input: TimelineItemInput,
    ) -> Result<TimelineItem, AppError> {
        let timeline = self.owned_timeline(user_id).await?;
        let media = media(input.video_url, input.image_url, input.photo_id)?;
        if let Some(Media::Photo(photo_id)) = media {
            self.check_photo(user_id, photo_id).await?;
        }
        let text = validation::optional_text("text", input.text, MAX_TEXT_LEN)?;
        require_content(text.as_deref(), media.is_some())?;

        let mut item = NewTimelineItem {
            timeline_id: timeline.id,
            title: validation::bounded_text("title", &input.title, 1, MAX_TITLE_LEN)?,
            text,
            video_url: None,
            image_url: None,
            photo_id: None,
            date: input.date,
        };
        match media {
            Some(Media::Video(url)) => item.video_url = Some(url),
            Some(Media::Image(url)) => item.image_url = Some(url),
            Some(Media::Photo(photo_id)) => item.photo_id = Some(photo_id),
            None => {}
        }
        Ok(self.timelines.insert_timeline_item(item).await?)
    }

    pub async fn update_item(
        &self,
        user_id: i64,
        item_id: i64,
        update: TimelineItemUpdate,
    ) -> Result<TimelineItem, AppError> {
        let mut item = self.owned_item(user_id, item_id).await?;
        if let Some(title) = update.title {
            item.title = validation::bounded_text("title", &title, 1, MAX_TITLE_LEN)?;
        }
        if let Some(text) = update.text {
            item.text = validation::optional_text("text", Some(text), MAX_TEXT_LEN)?;
        }
        if let Some(date) = update.date {
            item.date = date;
        }
        if let Some(media) = media(update.video_url, update.image_url, update.photo_id)? {
            if let Media::Photo(photo_id) = media {
                self.check_photo(user_id, photo_id).await?;
            }
            item.video_url = None;
            item.image_url = None;
            item.photo_id = None;
            match media {
                Media::Video(url) => item.video_url = Some(url),
                Media::Image(url) => item.image_url = Some(url),
                Media::Photo(photo_id) => item.photo_id = Some(photo_id),
            }
        }
        let has_media = item.video_url.is_some() || item.image_url.is_some() || item.photo_id.is_some();
        require_content(item.text.as_deref(), has_media)?;

        Ok(self.timelines.update_timeline_item(&item).await?)
    }

    pub async fn delete_item(&self, user_id: i64, item_id: i64) -> Result<(), AppError> {
        let item = self.owned_item(user_id, item_id).await?;
        self.timelines.delete_timeline_item(item.id).await?;
        Ok(())
    }

    async fn owned_timeline(&self, user_id: i64) -> Result<Timeline, AppError> {
        self.timelines
            .find_timeline(user_id)
            .await?
            .ok_or(AppError::NotFound("timeline"))
    }

    // Items of another owner's timeline exist but are not ours to touch.
    async fn owned_item(&self, user_id: i64, item_id: i64) -> Result<TimelineItem, AppError> {
        let timeline = self.owned_timeline(user_id).await?;
        let item = self
            .timelines
            .find_timeline_item(item_id)
            .await?
            .ok_or(AppError::NotFound("timeline item"))?;
        if item.timeline_id != timeline.id {
            return Err(AppError::AccessDenied("timeline item"));
        }
        Ok(item)
    }

    async fn check_photo(&self, user_id: i64, photo_id: i64) -> Result<(), AppError> {
        let photo = self
            .photos
            .find_photo(photo_id)
            .await?
            .ok_or(AppError::NotFound("photo"))?;
        if photo.user_id != user_id {
            return Err(AppError::AccessDenied("photo"));
        }
        Ok(())
    }
}

// Blank URLs count as unset.
fn media(
    video_url: Option<String>,
    image_url: Option<String>,
    photo_id: Option<i64>,
) -> Result<Option<Media>, AppError> {
    let video_url = video_url.filter(|url| !url.trim().is_empty());
    let image_url = image_url.filter(|url| !url.trim().is_empty());
    let set = [video_url.is_some(), image_url.is_some(), photo_id.is_some()]
        .into_iter()
        .filter(|set| *set)
        .count();
    if set > 1 {
        return Err(AppError::InvalidContent(
            "a timeline item takes only one of video_url, image_url or photo_id".to_string(),
        ));
    }

    if let Some(url) = video_url {
        return validation::video_url(&url).map(|url| Some(Media::Video(url)));
    }
    if let Some(url) = image_url {
        return validation::http_url("image_url", &url).map(|url| Some(Media::Image(url)));
    }
    Ok(photo_id.map(Media::Photo))
}

fn require_content(text: Option<&str>, has_media: bool) -> Result<(), AppError> {
    if text.is_none() && !has_media {
        return Err(AppError::InvalidContent(
            "a timeline item needs text or media".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface_adapters::memory::MemoryStore;
    use crate::use_cases::photos::PhotosUseCase;
    use crate::use_cases::test_support::{seed_guest, FixedClock, NOW};
    use chrono::TimeZone;

    fn use_case<'a>(store: &'a MemoryStore, clock: &'a FixedClock) -> TimelineUseCase<'a> {
        TimelineUseCase {
            timelines: store,
            photos: store,
            clock,
        }
    }

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 3, d, 12, 0, 0).unwrap()
    }

    fn text_item(title: &str, date: DateTime<Utc>) -> TimelineItemInput {
        TimelineItemInput {
            title: title.to_string(),
            text: Some("Foi assim".to_string()),
            video_url: None,
            image_url: None,
            photo_id: None,
            date,
        }
    }

    #[tokio::test]
    async fn when_title_is_omitted_then_default_title_is_used() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);

        let view = use_case(&store, &clock).create(1, None).await.expect("create");

        assert_eq!(view.timeline.title, DEFAULT_TIMELINE_TITLE);
        assert!(view.items.is_empty());
    }

    #[tokio::test]
    async fn when_owner_creates_second_timeline_then_already_exists() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let timeline = use_case(&store, &clock);
        timeline.create(1, None).await.expect("create");

        let result = timeline.create(1, Some("Outra".to_string())).await;

        assert_eq!(result.err(), Some(AppError::AlreadyExists("timeline")));
    }

    #[tokio::test]
    async fn when_item_sets_video_and_image_then_invalid_content() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let timeline = use_case(&store, &clock);
        timeline.create(1, None).await.expect("create");
        let mut input = text_item("Pedido", day(1));
        input.video_url = Some("https://youtu.be/abc".to_string());
        input.image_url = Some("https://cdn.example.com/a.png".to_string());

        let result = timeline.create_item(1, input).await;

        assert!(matches!(result, Err(AppError::InvalidContent(message)) if message.contains("only one")));
    }

    #[tokio::test]
    async fn when_item_has_no_text_and_no_media_then_invalid_content() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let timeline = use_case(&store, &clock);
        timeline.create(1, None).await.expect("create");
        let mut input = text_item("Vazio", day(1));
        input.text = Some("   ".to_string());

        let result = timeline.create_item(1, input).await;

        assert_eq!(
            result.err(),
            Some(AppError::InvalidContent("a timeline item needs text or media".to_string()))
        );
    }

    #[tokio::test]
    async fn when_item_uses_another_owners_photo_then_access_denied() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let guest = seed_guest(&store, 2, "Bia").await;
        let photo = PhotosUseCase {
            photos: &store,
            guests: &store,
            clock: &clock,
        }
        .upload(&guest.hash_link, "bia.jpg")
        .await
        .expect("upload");
        let timeline = use_case(&store, &clock);
        timeline.create(1, None).await.expect("create");
        let mut input = text_item("Festa", day(2));
        input.photo_id = Some(photo.id);

        let result = timeline.create_item(1, input).await;

        assert_eq!(result.err(), Some(AppError::AccessDenied("photo")));
    }

    #[tokio::test]
    async fn when_update_sets_image_then_previous_video_is_cleared() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let timeline = use_case(&store, &clock);
        timeline.create(1, None).await.expect("create");
        let mut input = text_item("Pedido", day(1));
        input.video_url = Some("https://vimeo.com/123".to_string());
        let item = timeline.create_item(1, input).await.expect("item");

        let updated = timeline
            .update_item(
                1,
                item.id,
                TimelineItemUpdate {
                    image_url: Some("https://cdn.example.com/pedido.png".to_string()),
                    ..Default::default()
                },
            )
            .await
            .expect("update");

        assert_eq!(updated.video_url, None);
        assert_eq!(updated.image_url.as_deref(), Some("https://cdn.example.com/pedido.png"));
    }

    #[tokio::test]
    async fn when_update_clears_text_of_media_less_item_then_invalid_content() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let timeline = use_case(&store, &clock);
        timeline.create(1, None).await.expect("create");
        let item = timeline.create_item(1, text_item("Primeiro encontro", day(1))).await.expect("item");

        let result = timeline
            .update_item(
                1,
                item.id,
                TimelineItemUpdate {
                    text: Some(String::new()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidContent(_))));
    }

    #[tokio::test]
    async fn when_item_belongs_to_another_timeline_then_access_denied() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let timeline = use_case(&store, &clock);
        timeline.create(1, None).await.expect("create");
        timeline.create(2, None).await.expect("create");
        let foreign = timeline.create_item(2, text_item("Deles", day(1))).await.expect("item");

        let update = timeline
            .update_item(1, foreign.id, TimelineItemUpdate::default())
            .await;
        let delete = timeline.delete_item(1, foreign.id).await;
        let missing = timeline.delete_item(1, 9_999).await;

        assert_eq!(update.err(), Some(AppError::AccessDenied("timeline item")));
        assert_eq!(delete.err(), Some(AppError::AccessDenied("timeline item")));
        assert_eq!(missing.err(), Some(AppError::NotFound("timeline item")));
    }

    #[tokio::test]
    async fn when_ordered_by_date_then_newest_item_comes_first() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let timeline = use_case(&store, &clock);
        timeline.create(1, None).await.expect("create");
        for (title, date) in [("Conhecemos", day(1)), ("Noivado", day(20)), ("Viagem", day(10))] {
            timeline.create_item(1, text_item(title, date)).await.expect("item");
        }

        let created = timeline.get(1, ItemOrder::Created).await.expect("get");
        let newest = timeline.get(1, ItemOrder::NewestFirst).await.expect("get");

        let titles = |view: &TimelineView| -> Vec<String> {
            view.items.iter().map(|i| i.title.clone()).collect()
        };
        assert_eq!(titles(&created), vec!["Conhecemos", "Noivado", "Viagem"]);
        assert_eq!(titles(&newest), vec!["Noivado", "Viagem", "Conhecemos"]);
    }
}
