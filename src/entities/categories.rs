use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Category)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Base display name; Romanian is the canonical variant.
    pub name: String,
    pub name_ro: Option<String>,
    pub name_ru: Option<String>,
    pub name_en: Option<String>,
    /// Icon identifier from the closed icon registry.
    pub icon: Option<String>,
    /// Menu-section tag; exactly one per category.
    pub menu: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::menu_images::Entity")]
    MenuImages,
}

impl Related<super::menu_images::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuImages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Display name for a locale, falling back to the base name.
    pub fn localized_name(&self, locale: crate::i18n::Locale) -> &str {
        use crate::i18n::Locale;
        let localized = match locale {
            Locale::Ro => self.name_ro.as_deref(),
            Locale::Ru => self.name_ru.as_deref(),
            Locale::En => self.name_en.as_deref(),
        };
        localized.unwrap_or(&self.name)
    }

    /// Name the storage folder slug is derived from: Romanian, else base.
    pub fn folder_name(&self) -> &str {
        self.name_ro.as_deref().unwrap_or(&self.name)
    }
}
