// src/models/tour.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        form::{clearable, embedded_json, lenient, lenient_bool},
        validation::{optional_text, take_text, FieldChecks},
    },
    db::crud_repo::{Changeset, Filter, FilterKind, Resource},
    services::crud_service::Writable,
};

// --- ENUMS ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "tour_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TourStatus {
    #[default]
    Active,
    Inactive,
}

impl TourStatus {
    pub const PG_TYPE: &'static str = "tour_status";
    pub const VALUES: &'static [&'static str] = &["active", "inactive"];

    pub fn as_str(self) -> &'static str {
        match self {
            TourStatus::Active => "active",
            TourStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for TourStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(TourStatus::Active),
            "inactive" => Ok(TourStatus::Inactive),
            other => Err(format!("unknown tour status `{other}`")),
        }
    }
}

impl fmt::Display for TourStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- TOUR ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: Uuid,
    #[schema(example = "ha-long-bay-cruise")]
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    #[schema(value_type = f64, example = 120.0)]
    pub price: Decimal,
    pub location: String,
    pub image: String,
    pub destination_id: Option<Uuid>,
    pub status: TourStatus,
    pub featured: bool,
    pub duration: Option<String>,
    pub group_size: Option<String>,
    pub itinerary: Option<String>,
    pub highlights: Option<String>,
    pub inclusions: Option<String>,
    pub exclusions: Option<String>,
    pub policies: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Tour {
    const TABLE: &'static str = "tours";
    const LABEL: &'static str = "Tour";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "location", "slug"];
    const FILTERS: &'static [Filter] = &[
        Filter::new("status", "status", FilterKind::Enum(TourStatus::PG_TYPE, TourStatus::VALUES)),
        Filter::new("destinationId", "destination_id", FilterKind::Id),
        Filter::new("featured", "featured", FilterKind::Flag),
    ];
    const DEFAULT_ORDER: &'static str = "featured DESC, created_at DESC";
    const UNIQUE_CONSTRAINTS: &'static [(&'static str, &'static str)] = &[("tours_slug_key", "slug")];

    fn id(&self) -> Uuid {
        self.id
    }
}

// --- GALERIA ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourImage {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub url: String,
    pub alt: Option<String>,
    pub caption: Option<String>,
    pub order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryImageInput {
    pub url: String,
    pub alt: Option<String>,
    pub caption: Option<String>,
}

/// Tour com a galeria já ordenada, para a página de detalhe.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourDetail {
    #[serde(flatten)]
    pub tour: Tour,
    pub gallery: Vec<TourImage>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderGalleryPayload {
    #[serde(deserialize_with = "embedded_json_required")]
    pub ids: Vec<Uuid>,
}

fn embedded_json_required<'de, D>(deserializer: D) -> Result<Vec<Uuid>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(embedded_json(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceGalleryPayload {
    #[serde(default, deserialize_with = "embedded_json")]
    pub gallery: Option<Vec<GalleryImageInput>>,
}

// --- PAYLOAD ---

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourPayload {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    pub location: Option<String>,
    pub image: Option<String>,
    /// `null` ou "" desvinculam o tour do destino.
    #[serde(default, deserialize_with = "clearable")]
    #[schema(value_type = Option<Uuid>)]
    pub destination_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<TourStatus>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub featured: Option<bool>,
    pub duration: Option<String>,
    pub group_size: Option<String>,
    pub itinerary: Option<String>,
    pub highlights: Option<String>,
    pub inclusions: Option<String>,
    pub exclusions: Option<String>,
    pub policies: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    /// Quando presente, substitui a galeria inteira (na ordem enviada).
    #[serde(default, deserialize_with = "embedded_json")]
    pub gallery: Option<Vec<GalleryImageInput>>,
}

fn check_price(checks: &mut FieldChecks, price: Option<Decimal>) {
    if price.is_some_and(|p| p.is_sign_negative()) {
        checks.invalid("price", "range", "price cannot be negative".into());
    }
}

pub fn check_gallery(checks: &mut FieldChecks, gallery: Option<&[GalleryImageInput]>) {
    if gallery.is_some_and(|g| g.iter().any(|img| img.url.trim().is_empty())) {
        checks.invalid("gallery", "required", "every gallery image needs a url".into());
    }
}

impl Writable for Tour {
    type Payload = TourPayload;

    fn create_changeset(p: TourPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        checks
            .required_text("title", &p.title)
            .required("price", &p.price)
            .required_text("location", &p.location)
            .required_text("image", &p.image);
        check_price(&mut checks, p.price);
        check_gallery(&mut checks, p.gallery.as_deref());
        let slug = p.title.as_deref().and_then(|t| checks.slug("title", t));
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.set("slug", slug.unwrap_or_default())
            .set("title", take_text(p.title))
            .set("description", optional_text(p.description))
            .set("price", p.price.unwrap_or_default())
            .set("location", take_text(p.location))
            .set("image", take_text(p.image))
            .set("destination_id", p.destination_id.flatten())
            .set_enum("status", TourStatus::PG_TYPE, p.status.unwrap_or_default().as_str())
            .set("featured", p.featured.unwrap_or(false))
            .set("duration", optional_text(p.duration))
            .set("group_size", optional_text(p.group_size))
            .set("itinerary", optional_text(p.itinerary))
            .set("highlights", optional_text(p.highlights))
            .set("inclusions", optional_text(p.inclusions))
            .set("exclusions", optional_text(p.exclusions))
            .set("policies", optional_text(p.policies))
            .set("meta_title", optional_text(p.meta_title))
            .set("meta_description", optional_text(p.meta_description))
            .set("meta_keywords", optional_text(p.meta_keywords));
        Ok(cs)
    }

    fn update_changeset(p: TourPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        if p.location.is_some() {
            checks.required_text("location", &p.location);
        }
        if p.image.is_some() {
            checks.required_text("image", &p.image);
        }
        check_price(&mut checks, p.price);
        check_gallery(&mut checks, p.gallery.as_deref());
        let slug = p.title.as_deref().and_then(|t| checks.slug("title", t));
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.patch("slug", slug)
            .patch("title", p.title.map(|v| v.trim().to_string()))
            .patch_text("description", p.description)
            .patch("price", p.price)
            .patch("location", p.location.map(|v| v.trim().to_string()))
            .patch("image", p.image.map(|v| v.trim().to_string()))
            .patch("destination_id", p.destination_id)
            .patch("featured", p.featured)
            .patch_text("duration", p.duration)
            .patch_text("group_size", p.group_size)
            .patch_text("itinerary", p.itinerary)
            .patch_text("highlights", p.highlights)
            .patch_text("inclusions", p.inclusions)
            .patch_text("exclusions", p.exclusions)
            .patch_text("policies", p.policies)
            .patch_text("meta_title", p.meta_title)
            .patch_text("meta_description", p.meta_description)
            .patch_text("meta_keywords", p.meta_keywords);
        if let Some(status) = p.status {
            cs.set_enum("status", TourStatus::PG_TYPE, status.as_str());
        }
        Ok(cs)
    }
}
