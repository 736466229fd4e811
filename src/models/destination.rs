// src/models/destination.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        form::{lenient, lenient_bool},
        validation::{optional_text, take_text, FieldChecks},
    },
    db::crud_repo::{Changeset, Filter, FilterKind, Resource},
    services::crud_service::Writable,
};

// --- Destino (Sapa, Hạ Long, Hội An...) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    pub id: Uuid,
    #[schema(example = "sapa")]
    pub slug: String,
    pub name_vi: String,
    pub name_en: String,
    pub description_vi: Option<String>,
    pub description_en: Option<String>,
    pub image: String,
    pub alt: Option<String>,
    pub is_featured: bool,
    pub order: i32,
    // Texto legado. Quando `region_id` existe, ele é a fonte da verdade.
    pub region: Option<String>,
    pub region_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Destination {
    const TABLE: &'static str = "destinations";
    const LABEL: &'static str = "Destination";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name_vi", "name_en", "slug"];
    const FILTERS: &'static [Filter] = &[
        Filter::new("regionId", "region_id", FilterKind::Id),
        Filter::new("featured", "is_featured", FilterKind::Flag),
    ];
    const UNIQUE_CONSTRAINTS: &'static [(&'static str, &'static str)] =
        &[("destinations_slug_key", "slug")];

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DestinationPayload {
    pub name_vi: Option<String>,
    pub name_en: Option<String>,
    pub description_vi: Option<String>,
    pub description_en: Option<String>,
    pub image: Option<String>,
    pub alt: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_featured: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub order: Option<i32>,
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub region_id: Option<Uuid>,
}

// A associação com a região (region/region_id) é resolvida pelo
// DestinationService, que precisa consultar o banco.
impl Writable for Destination {
    type Payload = DestinationPayload;

    fn create_changeset(p: DestinationPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        checks
            .required_text("nameVi", &p.name_vi)
            .required_text("nameEn", &p.name_en)
            .required_text("image", &p.image);
        let slug = p.name_en.as_deref().and_then(|n| checks.slug("nameEn", n));
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.set("slug", slug.unwrap_or_default())
            .set("name_vi", take_text(p.name_vi))
            .set("name_en", take_text(p.name_en))
            .set("description_vi", optional_text(p.description_vi))
            .set("description_en", optional_text(p.description_en))
            .set("image", take_text(p.image))
            .set("alt", optional_text(p.alt))
            .set("is_featured", p.is_featured.unwrap_or(false))
            .set("order", p.order.unwrap_or(0));
        Ok(cs)
    }

    fn update_changeset(p: DestinationPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        if p.name_vi.is_some() {
            checks.required_text("nameVi", &p.name_vi);
        }
        if p.image.is_some() {
            checks.required_text("image", &p.image);
        }
        // Renomear em inglês gera um novo slug.
        let slug = p.name_en.as_deref().and_then(|n| checks.slug("nameEn", n));
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.patch("slug", slug)
            .patch("name_vi", p.name_vi.map(|v| v.trim().to_string()))
            .patch("name_en", p.name_en.map(|v| v.trim().to_string()))
            .patch_text("description_vi", p.description_vi)
            .patch_text("description_en", p.description_en)
            .patch("image", p.image.map(|v| v.trim().to_string()))
            .patch_text("alt", p.alt)
            .patch("is_featured", p.is_featured)
            .patch("order", p.order);
        Ok(cs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_comes_from_english_name() {
        let cs = Destination::create_changeset(DestinationPayload {
            name_en: Some("Sapa".into()),
            name_vi: Some("Sa Pa".into()),
            image: Some("http://x/img.jpg".into()),
            alt: Some("Sapa".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cs.text("slug"), Some("sapa"));
        assert!(!cs.contains("region_id"));
    }

    #[test]
    fn rename_rederives_slug() {
        let cs = Destination::update_changeset(DestinationPayload {
            name_en: Some("Ha Long Bay".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cs.text("slug"), Some("ha-long-bay"));
        assert_eq!(cs.text("name_en"), Some("Ha Long Bay"));
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let AppError::ValidationError(errors) =
            Destination::create_changeset(DestinationPayload::default()).unwrap_err()
        else {
            panic!("expected validation error");
        };
        let fields = errors.field_errors();
        for field in ["nameVi", "nameEn", "image"] {
            assert!(fields.contains_key(field), "missing {field}");
        }
    }
}
