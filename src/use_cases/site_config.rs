use tracing::info;

use crate::domain::entities::{SiteConfiguration, SiteDetails};
use crate::domain::errors::{AppError, StoreError};
use crate::domain::ports::SiteConfigStore;
use crate::use_cases::gift_shop::MAX_PIX_KEY_LEN;
use crate::use_cases::validation;

const MAX_FIELD_LEN: usize = 255;

/// Site configuration: colors, venue and couple details rendered on the
/// public wedding page.
///
/// Every write takes a `SiteDetails` where `None` leaves a field as it is and
/// a blank string clears it.
pub struct SiteConfigUseCase<'a> {
    pub configs: &'a dyn SiteConfigStore,
}

impl SiteConfigUseCase<'_> {
    pub async fn create(&self, user_id: i64, input: SiteDetails) -> Result<SiteConfiguration, AppError> {
        let mut details = SiteDetails::default();
        apply(&mut details, input)?;
        match self.configs.insert_site_config(user_id, details).await {
            Ok(config) => Ok(config),
            Err(StoreError::Conflict) => Err(AppError::AlreadyExists("site configuration")),
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get(&self, user_id: i64) -> Result<SiteConfiguration, AppError> {
        self.configs
            .find_site_config(user_id)
            .await?
            .ok_or(AppError::NotFound("site configuration"))
    }

    /// Creates the configuration on first write, otherwise merges `input`
    /// into the stored one.
    pub async fn upsert(&self, user_id: i64, input: SiteDetails) -> Result<SiteConfiguration, AppError> {
        match self.configs.find_site_config(user_id).await? {
            Some(mut config) => {
                apply(&mut config.details, input)?;
                Ok(self.configs.update_site_config(&config).await?)
            }
            None => {
                let config = self.create(user_id, input).await?;
                info!(user_id, "site configuration created on update");
                Ok(config)
            }
        }
    }

    pub async fn delete(&self, user_id: i64) -> Result<(), AppError> {
        if !self.configs.delete_site_config(user_id).await? {
            return Err(AppError::NotFound("site configuration"));
        }
        Ok(())
    }
}

fn apply(target: &mut SiteDetails, input: SiteDetails) -> Result<(), AppError> {
    set(&mut target.primary_color, input.primary_color, |v| {
        validation::hex_color("primary_color", v)
    })?;
    set(&mut target.secondary_color, input.secondary_color, |v| {
        validation::hex_color("secondary_color", v)
    })?;
    set(&mut target.pix_key, input.pix_key, pix_key)?;
    set(&mut target.wedding_date, input.wedding_date, text("wedding_date"))?;
    set(&mut target.wedding_time, input.wedding_time, text("wedding_time"))?;
    set(&mut target.venue, input.venue, text("venue"))?;
    set(&mut target.city, input.city, text("city"))?;
    set(&mut target.state, input.state, text("state"))?;
    set(&mut target.country, input.country, text("country"))?;
    set(&mut target.partner_one_name, input.partner_one_name, text("partner_one_name"))?;
    set(&mut target.partner_two_name, input.partner_two_name, text("partner_two_name"))?;
    set(&mut target.template_id, input.template_id, text("template_id"))?;
    Ok(())
}

fn text(field: &'static str) -> impl Fn(&str) -> Result<String, AppError> {
    move |value| validation::bounded_text(field, value, 1, MAX_FIELD_LEN)
}

fn set(
    slot: &mut Option<String>,
    value: Option<String>,
    check: impl Fn(&str) -> Result<String, AppError>,
) -> Result<(), AppError> {
    match value {
        None => {}
        Some(value) if value.trim().is_empty() => *slot = None,
        Some(value) => *slot = Some(check(&value)?),
    }
    Ok(())
}

// Same bound as the gift shop key, so the site key can feed a PIX payload.
fn pix_key(value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.len() > MAX_PIX_KEY_LEN {
        return Err(AppError::InvalidContent(format!(
            "pix_key must be at most {MAX_PIX_KEY_LEN} bytes"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface_adapters::memory::MemoryStore;

    fn colors(primary: &str) -> SiteDetails {
        SiteDetails {
            primary_color: Some(primary.to_string()),
            venue: Some("Sítio Boa Vista".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn when_owner_creates_config_twice_then_already_exists() {
        let store = MemoryStore::new();
        let configs = SiteConfigUseCase { configs: &store };
        configs.create(1, colors("#AABBCC")).await.expect("create");

        let result = configs.create(1, colors("#000")).await;

        assert_eq!(result.err(), Some(AppError::AlreadyExists("site configuration")));
    }

    #[tokio::test]
    async fn when_upsert_runs_without_config_then_it_creates_one() {
        let store = MemoryStore::new();
        let configs = SiteConfigUseCase { configs: &store };

        let config = configs.upsert(1, colors("#fff")).await.expect("upsert");

        assert_eq!(config.details.primary_color.as_deref(), Some("#fff"));
        assert_eq!(configs.get(1).await.expect("get"), config);
    }

    #[tokio::test]
    async fn when_upsert_sets_some_fields_then_others_are_kept_or_cleared() {
        let store = MemoryStore::new();
        let configs = SiteConfigUseCase { configs: &store };
        configs.create(1, colors("#AABBCC")).await.expect("create");

        let config = configs
            .upsert(
                1,
                SiteDetails {
                    city: Some("Belém".to_string()),
                    venue: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .expect("upsert");

        assert_eq!(config.details.primary_color.as_deref(), Some("#AABBCC"));
        assert_eq!(config.details.city.as_deref(), Some("Belém"));
        assert_eq!(config.details.venue, None);
    }

    #[tokio::test]
    async fn when_color_is_not_hex_then_invalid_content_names_the_field() {
        let store = MemoryStore::new();
        let configs = SiteConfigUseCase { configs: &store };

        let result = configs
            .create(
                1,
                SiteDetails {
                    secondary_color: Some("blue".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert_eq!(
            result.err(),
            Some(AppError::InvalidContent(
                "secondary_color must be #RGB or #RRGGBB".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn when_pix_key_exceeds_gift_shop_bound_then_invalid_content() {
        let store = MemoryStore::new();
        let configs = SiteConfigUseCase { configs: &store };

        let result = configs
            .create(
                1,
                SiteDetails {
                    pix_key: Some("k".repeat(MAX_PIX_KEY_LEN + 1)),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::InvalidContent(_))));
    }

    #[tokio::test]
    async fn when_config_is_deleted_then_second_delete_is_not_found() {
        let store = MemoryStore::new();
        let configs = SiteConfigUseCase { configs: &store };
        configs.create(1, SiteDetails::default()).await.expect("create");

        configs.delete(1).await.expect("delete");

        assert_eq!(
            configs.delete(1).await.err(),
            Some(AppError::NotFound("site configuration"))
        );
    }
}
