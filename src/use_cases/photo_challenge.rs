use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::domain::entities::{
    ChallengeTask, Guest, NewChallengeTask, NewPhotoChallenge, NewTaskCompletion, Photo,
    PhotoChallenge, TaskCompletion,
};
use crate::domain::errors::{AppError, StoreError};
use crate::domain::ports::{ChallengeStore, Clock, GuestStore, PhotoStore};
use crate::use_cases::guest_access::GuestAccess;
use crate::use_cases::photos::PhotosUseCase;
use crate::use_cases::validation;

pub struct TaskInput {
    pub title: String,
    pub description: String,
}

#[derive(Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

pub struct CompletionView {
    pub guest_id: i64,
    pub guest_name: String,
    pub photo_id: i64,
    pub completed_at: DateTime<Utc>,
}

pub struct TaskSummary {
    pub task: ChallengeTask,
    pub completed_by: Vec<CompletionView>,
}

pub struct GuestParticipation {
    pub guest_name: String,
    pub tasks_completed: usize,
}

pub struct ChallengeSummary {
    pub challenge: PhotoChallenge,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub pending_tasks: usize,
    pub completion_percentage: f64,
    pub tasks: Vec<TaskSummary>,
    pub participation: Vec<GuestParticipation>,
}

pub struct GuestTaskView {
    pub task: ChallengeTask,
    pub is_completed: bool,
}

pub struct PhotoChallengeUseCase<'a> {
    pub challenges: &'a dyn ChallengeStore,
    pub guests: &'a dyn GuestStore,
    pub photos: &'a dyn PhotoStore,
    pub clock: &'a dyn Clock,
}

impl PhotoChallengeUseCase<'_> {
    pub async fn create(&self, user_id: i64, title: &str) -> Result<PhotoChallenge, AppError> {
        let challenge = NewPhotoChallenge {
            user_id,
            title: validation::bounded_text("title", title, 1, 100)?,
            created_at: self.clock.now_utc(),
        };
        match self.challenges.insert_challenge(challenge).await {
            Ok(challenge) => Ok(challenge),
            Err(StoreError::Conflict) => Err(AppError::AlreadyExists("photo challenge")),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn update(&self, user_id: i64, title: &str) -> Result<PhotoChallenge, AppError> {
        let mut challenge = self.owned_challenge(user_id).await?;
        challenge.title = validation::bounded_text("title", title, 1, 100)?;
        Ok(self.challenges.update_challenge(&challenge).await?)
    }

    pub async fn delete(&self, user_id: i64) -> Result<(), AppError> {
        if !self.challenges.delete_challenge(user_id).await? {
            return Err(AppError::NotFound("photo challenge"));
        }
        Ok(())
    }

    pub async fn summary(&self, user_id: i64) -> Result<ChallengeSummary, AppError> {
        let challenge = self.owned_challenge(user_id).await?;
        let tasks = self.challenges.list_tasks(challenge.id).await?;
        let completions = self.challenges.list_completions(challenge.id).await?;

        let mut names: HashMap<i64, String> = HashMap::new();
        for completion in &completions {
            if names.contains_key(&completion.guest_id) {
                continue;
            }
            let name = self
                .guests
                .find_guest(completion.guest_id)
                .await?
                .map(|guest| guest.name)
                .unwrap_or_default();
            names.insert(completion.guest_id, name);
        }

        let mut by_task: HashMap<i64, Vec<CompletionView>> = HashMap::new();
        let mut participation: BTreeMap<String, usize> = BTreeMap::new();
        for completion in completions {
            let guest_name = names.get(&completion.guest_id).cloned().unwrap_or_default();
            *participation.entry(guest_name.clone()).or_default() += 1;
            by_task
                .entry(completion.task_id)
                .or_default()
                .push(CompletionView {
                    guest_id: completion.guest_id,
                    guest_name,
                    photo_id: completion.photo_id,
                    completed_at: completion.completed_at,
                });
        }

        let tasks: Vec<TaskSummary> = tasks
            .into_iter()
            .map(|task| TaskSummary {
                completed_by: by_task.remove(&task.id).unwrap_or_default(),
                task,
            })
            .collect();
        let total_tasks = tasks.len();
        let completed_tasks = tasks.iter().filter(|t| !t.completed_by.is_empty()).count();

        Ok(ChallengeSummary {
            challenge,
            total_tasks,
            completed_tasks,
            pending_tasks: total_tasks - completed_tasks,
            completion_percentage: completion_percentage(completed_tasks, total_tasks),
            tasks,
            participation: participation
                .into_iter()
                .map(|(guest_name, tasks_completed)| GuestParticipation {
                    guest_name,
                    tasks_completed,
                })
                .collect(),
        })
    }

    pub async fn create_task(&self, user_id: i64, input: TaskInput) -> Result<ChallengeTask, AppError> {
        let challenge = self.owned_challenge(user_id).await?;
        let task = NewChallengeTask {
            challenge_id: challenge.id,
            title: validation::bounded_text("title", &input.title, 1, 100)?,
            description: validation::bounded_text("description", &input.description, 1, 1000)?,
            created_at: self.clock.now_utc(),
        };
        Ok(self.challenges.insert_task(task).await?)
    }

    pub async fn update_task(
        &self,
        user_id: i64,
        task_id: i64,
        update: TaskUpdate,
    ) -> Result<ChallengeTask, AppError> {
        let challenge = self.owned_challenge(user_id).await?;
        let mut task = self.task_in(&challenge, task_id).await?;
        if let Some(title) = update.title {
            task.title = validation::bounded_text("title", &title, 1, 100)?;
        }
        if let Some(description) = update.description {
            task.description = validation::bounded_text("description", &description, 1, 1000)?;
        }
        Ok(self.challenges.update_task(&task).await?)
    }

    pub async fn delete_task(&self, user_id: i64, task_id: i64) -> Result<(), AppError> {
        let challenge = self.owned_challenge(user_id).await?;
        let task = self.task_in(&challenge, task_id).await?;
        self.challenges.delete_task(task.id).await?;
        Ok(())
    }

    pub async fn tasks_for_guest(&self, hash: &str) -> Result<Vec<GuestTaskView>, AppError> {
        let guest = self.resolve_guest(hash).await?;
        let challenge = self.owned_challenge(guest.user_id).await?;
        let tasks = self.challenges.list_tasks(challenge.id).await?;
        let completions = self.challenges.list_completions(challenge.id).await?;

        Ok(tasks
            .into_iter()
            .map(|task| GuestTaskView {
                is_completed: completions
                    .iter()
                    .any(|c| c.task_id == task.id && c.guest_id == guest.id),
                task,
            })
            .collect())
    }

    /// Completes `task_id` for the guest with a photo already in the guest's
    /// album.
    pub async fn complete_task(
        &self,
        hash: &str,
        task_id: i64,
        photo_id: i64,
    ) -> Result<TaskCompletion, AppError> {
        let (guest, task) = self.guest_task(hash, task_id).await?;
        let photo = self
            .photos
            .find_photo(photo_id)
            .await?
            .ok_or(AppError::NotFound("photo"))?;
        if photo.guest_id != guest.id {
            return Err(AppError::AccessDenied("photo"));
        }
        self.record_completion(&guest, &task, &photo).await
    }

    // Registers a new photo for the guest, then completes the task with it.
    pub async fn complete_with_upload(
        &self,
        hash: &str,
        task_id: i64,
        filename: &str,
    ) -> Result<(Photo, TaskCompletion), AppError> {
        let (guest, task) = self.guest_task(hash, task_id).await?;
        if self.challenges.find_completion(task.id, guest.id).await?.is_some() {
            return Err(AppError::AlreadyExists("task completion"));
        }
        let photo = PhotosUseCase {
            photos: self.photos,
            guests: self.guests,
            clock: self.clock,
        }
        .register_for_guest(&guest, filename)
        .await?;
        let completion = self.record_completion(&guest, &task, &photo).await?;
        Ok((photo, completion))
    }

    async fn record_completion(
        &self,
        guest: &Guest,
        task: &ChallengeTask,
        photo: &Photo,
    ) -> Result<TaskCompletion, AppError> {
        let completion = NewTaskCompletion {
            task_id: task.id,
            guest_id: guest.id,
            photo_id: photo.id,
            completed_at: self.clock.now_utc(),
        };
        match self.challenges.insert_completion(completion).await {
            Ok(completion) => {
                info!(guest_id = guest.id, task_id = task.id, "challenge task completed");
                Ok(completion)
            }
            Err(StoreError::Conflict) => Err(AppError::AlreadyExists("task completion")),
            Err(err) => Err(err.into()),
        }
    }

    async fn resolve_guest(&self, hash: &str) -> Result<Guest, AppError> {
        GuestAccess {
            guests: self.guests,
        }
        .resolve_guest_by_hash(hash)
        .await
    }

    async fn guest_task(&self, hash: &str, task_id: i64) -> Result<(Guest, ChallengeTask), AppError> {
        let guest = self.resolve_guest(hash).await?;
        let challenge = self.owned_challenge(guest.user_id).await?;
        let task = self.task_in(&challenge, task_id).await?;
        Ok((guest, task))
    }

    async fn owned_challenge(&self, user_id: i64) -> Result<PhotoChallenge, AppError> {
        self.challenges
            .find_challenge(user_id)
            .await?
            .ok_or(AppError::NotFound("photo challenge"))
    }

    async fn task_in(&self, challenge: &PhotoChallenge, task_id: i64) -> Result<ChallengeTask, AppError> {
        self.challenges
            .find_task(task_id)
            .await?
            .filter(|task| task.challenge_id == challenge.id)
            .ok_or(AppError::NotFound("task"))
    }
}

fn completion_percentage(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface_adapters::memory::MemoryStore;
    use crate::use_cases::test_support::{seed_guest, FixedClock, NOW};

    fn use_case<'a>(store: &'a MemoryStore, clock: &'a FixedClock) -> PhotoChallengeUseCase<'a> {
        PhotoChallengeUseCase {
            challenges: store,
            guests: store,
            photos: store,
            clock,
        }
    }

    fn photos<'a>(store: &'a MemoryStore, clock: &'a FixedClock) -> PhotosUseCase<'a> {
        PhotosUseCase {
            photos: store,
            guests: store,
            clock,
        }
    }

    fn task(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: "Tire uma foto".to_string(),
        }
    }

    #[tokio::test]
    async fn when_guest_completes_with_own_photo_then_task_shows_completed() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let guest = seed_guest(&store, 1, "Ana").await;
        let challenge = use_case(&store, &clock);
        challenge.create(1, "Desafio").await.expect("challenge");
        let selfie = challenge.create_task(1, task("Selfie")).await.expect("task");
        challenge.create_task(1, task("Bolo")).await.expect("task");
        let photo = photos(&store, &clock)
            .upload(&guest.hash_link, "selfie.jpg")
            .await
            .expect("upload");

        challenge
            .complete_task(&guest.hash_link, selfie.id, photo.id)
            .await
            .expect("complete");
        let views = challenge.tasks_for_guest(&guest.hash_link).await.expect("tasks");

        let flags: Vec<(&str, bool)> = views
            .iter()
            .map(|v| (v.task.title.as_str(), v.is_completed))
            .collect();
        assert_eq!(flags, vec![("Selfie", true), ("Bolo", false)]);
    }

    #[tokio::test]
    async fn when_guest_uses_another_guests_photo_then_access_denied() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let ana = seed_guest(&store, 1, "Ana").await;
        let bia = seed_guest(&store, 1, "Bia").await;
        let challenge = use_case(&store, &clock);
        challenge.create(1, "Desafio").await.expect("challenge");
        let selfie = challenge.create_task(1, task("Selfie")).await.expect("task");
        let bias_photo = photos(&store, &clock)
            .upload(&bia.hash_link, "bia.jpg")
            .await
            .expect("upload");

        let result = challenge
            .complete_task(&ana.hash_link, selfie.id, bias_photo.id)
            .await;

        assert_eq!(result.err(), Some(AppError::AccessDenied("photo")));
    }

    #[tokio::test]
    async fn when_task_belongs_to_another_owner_then_not_found() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let guest = seed_guest(&store, 1, "Ana").await;
        let challenge = use_case(&store, &clock);
        challenge.create(1, "Desafio").await.expect("challenge");
        challenge.create(2, "Outro").await.expect("challenge");
        let foreign = challenge.create_task(2, task("Selfie")).await.expect("task");

        let result = challenge
            .complete_with_upload(&guest.hash_link, foreign.id, "x.jpg")
            .await;

        assert_eq!(result.err().map(|e| e.to_string()), Some("task not found".to_string()));
        assert!(store.list_photos_by_guest(guest.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn when_task_is_completed_twice_then_already_exists() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let guest = seed_guest(&store, 1, "Ana").await;
        let challenge = use_case(&store, &clock);
        challenge.create(1, "Desafio").await.expect("challenge");
        let selfie = challenge.create_task(1, task("Selfie")).await.expect("task");

        let (photo, _) = challenge
            .complete_with_upload(&guest.hash_link, selfie.id, "a.jpg")
            .await
            .expect("first completion");
        let again = challenge
            .complete_task(&guest.hash_link, selfie.id, photo.id)
            .await;

        assert_eq!(again.err(), Some(AppError::AlreadyExists("task completion")));
    }

    #[tokio::test]
    async fn when_summarizing_then_counts_and_participation_are_ordered_by_name() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let zeca = seed_guest(&store, 1, "Zeca").await;
        let ana = seed_guest(&store, 1, "Ana").await;
        let challenge = use_case(&store, &clock);
        challenge.create(1, "Desafio").await.expect("challenge");
        let selfie = challenge.create_task(1, task("Selfie")).await.expect("task");
        let bolo = challenge.create_task(1, task("Bolo")).await.expect("task");
        challenge.create_task(1, task("Danca")).await.expect("task");
        challenge.create_task(1, task("Brinde")).await.expect("task");
        for (guest, task_id) in [(&zeca, selfie.id), (&ana, selfie.id), (&ana, bolo.id)] {
            challenge
                .complete_with_upload(&guest.hash_link, task_id, "f.jpg")
                .await
                .expect("completion");
        }

        let summary = challenge.summary(1).await.expect("summary");

        assert_eq!(summary.total_tasks, 4);
        assert_eq!(summary.completed_tasks, 2);
        assert_eq!(summary.pending_tasks, 2);
        assert_eq!(summary.completion_percentage, 50.0);
        assert_eq!(summary.tasks[0].completed_by.len(), 2);
        let participation: Vec<(&str, usize)> = summary
            .participation
            .iter()
            .map(|p| (p.guest_name.as_str(), p.tasks_completed))
            .collect();
        assert_eq!(participation, vec![("Ana", 2), ("Zeca", 1)]);
    }

    #[tokio::test]
    async fn when_challenge_has_no_tasks_then_percentage_is_zero() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let challenge = use_case(&store, &clock);
        challenge.create(1, "Desafio").await.expect("challenge");

        let summary = challenge.summary(1).await.expect("summary");

        assert_eq!(summary.total_tasks, 0);
        assert_eq!(summary.completion_percentage, 0.0);
    }

    #[tokio::test]
    async fn when_owner_edits_task_of_another_challenge_then_not_found() {
        let store = MemoryStore::new();
        let clock = FixedClock(NOW);
        let challenge = use_case(&store, &clock);
        challenge.create(1, "Desafio").await.expect("challenge");
        challenge.create(2, "Outro").await.expect("challenge");
        let foreign = challenge.create_task(2, task("Selfie")).await.expect("task");

        let update = challenge
            .update_task(
                1,
                foreign.id,
                TaskUpdate {
                    title: Some("Hijack".to_string()),
                    ..Default::default()
                },
            )
            .await;
        let delete = challenge.delete_task(1, foreign.id).await;

        assert_eq!(update.err(), Some(AppError::NotFound("task")));
        assert_eq!(delete.err(), Some(AppError::NotFound("task")));
    }
}
