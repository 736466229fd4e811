// src/models/province_category.rs

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

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceCategory {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for ProvinceCategory {
    const TABLE: &'static str = "province_categories";
    const LABEL: &'static str = "Province category";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "slug"];
    const DEFAULT_ORDER: &'static str = r#""order" ASC, name ASC"#;
    const UNIQUE_CONSTRAINTS: &'static [(&'static str, &'static str)] =
        &[("province_categories_slug_key", "slug")];

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProvinceCategoryPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub order: Option<i32>,
}

impl Writable for ProvinceCategory {
    type Payload = ProvinceCategoryPayload;

    fn create_changeset(p: ProvinceCategoryPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        checks.required_text("name", &p.name);
        let slug = p.name.as_deref().and_then(|n| checks.slug("name", n));
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.set("name", take_text(p.name))
            .set("slug", slug.unwrap_or_default())
            .set("description", optional_text(p.description))
            .set("order", p.order.unwrap_or(0));
        Ok(cs)
    }

    fn update_changeset(p: ProvinceCategoryPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        let slug = p.name.as_deref().and_then(|n| checks.slug("name", n));
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.patch("name", p.name.map(|v| v.trim().to_string()))
            .patch("slug", slug)
            .patch_text("description", p.description)
            .patch("order", p.order);
        Ok(cs)
    }
}
