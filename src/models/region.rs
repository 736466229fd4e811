// src/models/region.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        form::lenient,
        validation::{optional_text, take_text, FieldChecks},
    },
    db::crud_repo::{Changeset, Resource},
    services::crud_service::Writable,
};

// --- Região (Norte, Centro, Sul) ---
// Agrupa destinos. `key` é o código curto estável usado nas URLs públicas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: Uuid,
    #[schema(example = "north")]
    pub key: String,
    #[schema(example = "Miền Bắc")]
    pub name_vi: String,
    #[schema(example = "North")]
    pub name_en: String,
    pub description_vi: Option<String>,
    pub description_en: Option<String>,
    pub image: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Region {
    const TABLE: &'static str = "regions";
    const LABEL: &'static str = "Region";
    const SEARCH_COLUMNS: &'static [&'static str] = &["key", "name_vi", "name_en"];
    const DEFAULT_ORDER: &'static str = r#""order" ASC, name_en ASC"#;
    const UNIQUE_CONSTRAINTS: &'static [(&'static str, &'static str)] = &[("regions_key_key", "key")];

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegionPayload {
    pub key: Option<String>,
    pub name_vi: Option<String>,
    pub name_en: Option<String>,
    pub description_vi: Option<String>,
    pub description_en: Option<String>,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub order: Option<i32>,
}

impl Writable for Region {
    type Payload = RegionPayload;

    fn create_changeset(p: RegionPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        checks
            .required_text("key", &p.key)
            .required_text("nameVi", &p.name_vi)
            .required_text("nameEn", &p.name_en);
        let key = p.key.as_deref().and_then(|k| checks.slug("key", k));
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.set("key", key.unwrap_or_default())
            .set("name_vi", take_text(p.name_vi))
            .set("name_en", take_text(p.name_en))
            .set("description_vi", optional_text(p.description_vi))
            .set("description_en", optional_text(p.description_en))
            .set("image", optional_text(p.image))
            .set("order", p.order.unwrap_or(0));
        Ok(cs)
    }

    fn update_changeset(p: RegionPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        if p.name_vi.is_some() {
            checks.required_text("nameVi", &p.name_vi);
        }
        if p.name_en.is_some() {
            checks.required_text("nameEn", &p.name_en);
        }
        let key = p.key.as_deref().and_then(|k| checks.slug("key", k));
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.patch("key", key)
            .patch("name_vi", p.name_vi.map(|v| v.trim().to_string()))
            .patch("name_en", p.name_en.map(|v| v.trim().to_string()))
            .patch_text("description_vi", p.description_vi)
            .patch_text("description_en", p.description_en)
            .patch_text("image", p.image)
            .patch("order", p.order);
        Ok(cs)
    }
}
