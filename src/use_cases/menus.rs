use tracing::info;

use crate::domain::entities::{Menu, MenuItem, NewMenu, NewMenuItem, Page};
use crate::domain::errors::AppError;
use crate::domain::ports::{Clock, MenuStore};
use crate::use_cases::validation;

const MAX_NOTE_LEN: usize = 500;

pub struct MenuItemInput {
    pub name: String,
    pub description: Option<String>,
    pub restrictions: Option<String>,
    pub calories: Option<i32>,
    pub observations: Option<String>,
}

// Fields left `None` keep their value; empty strings clear optional notes.
#[derive(Default)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub restrictions: Option<String>,
    pub calories: Option<i32>,
    pub observations: Option<String>,
}

pub struct MenuView {
    pub menu: Menu,
    pub items: Vec<MenuItem>,
}

// Meal menus. An owner may keep several (buffet, kids, late-night snack).
pub struct MenuUseCase<'a> {
    pub menus: &'a dyn MenuStore,
    pub clock: &'a dyn Clock,
}

impl MenuUseCase<'_> {
    pub async fn create(&self, user_id: i64, title: &str) -> Result<MenuView, AppError> {
        let menu = NewMenu {
            user_id,
            title: validation::bounded_text("title", title, 1, 100)?,
            created_at: self.clock.now_utc(),
        };
        let menu = self.menus.insert_menu(menu).await?;
        info!(user_id, menu_id = menu.id, "menu created");
        Ok(MenuView {
            menu,
            items: Vec::new(),
        })
    }

    pub async fn list(&self, user_id: i64, page: Page) -> Result<Vec<MenuView>, AppError> {
        let menus = self.menus.list_menus(user_id, page).await?;
        let mut views = Vec::with_capacity(menus.len());
        for menu in menus {
            let items = self.menus.list_menu_items(menu.id).await?;
            views.push(MenuView { menu, items });
        }
        Ok(views)
    }

    pub async fn get(&self, user_id: i64, menu_id: i64) -> Result<MenuView, AppError> {
        let menu = self.owned_menu(user_id, menu_id).await?;
        let items = self.menus.list_menu_items(menu.id).await?;
        Ok(MenuView { menu, items })
    }

    pub async fn update(&self, user_id: i64, menu_id: i64, title: &str) -> Result<MenuView, AppError> {
        let mut menu = self.owned_menu(user_id, menu_id).await?;
        menu.title = validation::bounded_text("title", title, 1, 100)?;
        let menu = self.menus.update_menu(&menu).await?;
        let items = self.menus.list_menu_items(menu.id).await?;
        Ok(MenuView { menu, items })
    }

    // Deletes by (id, owner), so another owner's menu reads as missing.
    pub async fn delete(&self, user_id: i64, menu_id: i64) -> Result<(), AppError> {
        if !self.menus.delete_menu(menu_id, user_id).await? {
            return Err(AppError::NotFound("menu"));
        }
        info!(user_id, menu_id, "menu deleted");
        Ok(())
    }

    pub async fn create_item(
        &self,
        user_id: i64,
        menu_id: i64,
        input: MenuItemInput,
    ) -> Result<MenuItem, AppError> {
        let menu = self.owned_menu(user_id, menu_id).await?;
        let item = NewMenuItem {
            menu_id: menu.id,
            name: validation::bounded_text("name", &input.name, 1, 100)?,
            description: validation::optional_text("description", input.description, MAX_NOTE_LEN)?,
            restrictions: validation::optional_text("restrictions", input.restrictions, MAX_NOTE_LEN)?,
            calories: calories(input.calories)?,
            observations: validation::optional_text("observations", input.observations, MAX_NOTE_LEN)?,
        };
        Ok(self.menus.insert_menu_item(item).await?)
    }

    pub async fn update_item(
        &self,
        user_id: i64,
        menu_id: i64,
        item_id: i64,
        update: MenuItemUpdate,
    ) -> Result<MenuItem, AppError> {
        let menu = self.owned_menu(user_id, menu_id).await?;
        let mut item = self.item_in(&menu, item_id).await?;
        if let Some(name) = update.name {
            item.name = validation::bounded_text("name", &name, 1, 100)?;
        }
        if update.description.is_some() {
            item.description = validation::optional_text("description", update.description, MAX_NOTE_LEN)?;
        }
        if update.restrictions.is_some() {
            item.restrictions =
                validation::optional_text("restrictions", update.restrictions, MAX_NOTE_LEN)?;
        }
        if update.calories.is_some() {
            item.calories = calories(update.calories)?;
        }
        if update.observations.is_some() {
            item.observations =
                validation::optional_text("observations", update.observations, MAX_NOTE_LEN)?;
        }
        Ok(self.menus.update_menu_item(&item).await?)
    }

    pub async fn delete_item(&self, user_id: i64, menu_id: i64, item_id: i64) -> Result<(), AppError> {
        let menu = self.owned_menu(user_id, menu_id).await?;
        let item = self.item_in(&menu, item_id).await?;
        self.menus.delete_menu_item(item.id).await?;
        Ok(())
    }

    async fn owned_menu(&self, user_id: i64, menu_id: i64) -> Result<Menu, AppError> {
        let menu = self
            .menus
            .find_menu(menu_id)
            .await?
            .ok_or(AppError::NotFound("menu"))?;
        if menu.user_id != user_id {
            return Err(AppError::AccessDenied("menu"));
        }
        Ok(menu)
    }

    async fn item_in(&self, menu: &Menu, item_id: i64) -> Result<MenuItem, AppError> {
        self.menus
            .find_menu_item(item_id)
            .await?
            .filter(|item| item.menu_id == menu.id)
            .ok_or(AppError::NotFound("menu item"))
    }
}

fn calories(value: Option<i32>) -> Result<Option<i32>, AppError> {
    match value {
        Some(kcal) if kcal < 0 => Err(AppError::InvalidContent(
            "calories must not be negative".to_string(),
        )),
        other => Ok(other),
    }
}
