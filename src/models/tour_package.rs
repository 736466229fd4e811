// src/models/tour_package.rs

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
        form::{lenient, lenient_bool},
        validation::{optional_text, take_text, FieldChecks},
    },
    db::crud_repo::{Changeset, Filter, FilterKind, Resource},
    services::crud_service::Writable,
};

// Pacote de roteiro avulso; não se liga a Tour nem a Destination.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourPackage {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub short_desc: Option<String>,
    #[schema(value_type = f64)]
    pub price_from: Decimal,
    pub duration_days: i32,
    pub image: Option<String>,
    pub featured: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for TourPackage {
    const TABLE: &'static str = "tour_packages";
    const LABEL: &'static str = "Tour package";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "short_desc"];
    const FILTERS: &'static [Filter] = &[Filter::new("featured", "featured", FilterKind::Flag)];
    const UNIQUE_CONSTRAINTS: &'static [(&'static str, &'static str)] =
        &[("tour_packages_slug_key", "slug")];

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourPackagePayload {
    pub title: Option<String>,
    pub short_desc: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    #[schema(value_type = Option<f64>)]
    pub price_from: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    pub duration_days: Option<i32>,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub order: Option<i32>,
}

fn check_duration(checks: &mut FieldChecks, days: Option<i32>) {
    if days.is_some_and(|d| d < 1) {
        checks.invalid("durationDays", "range", "durationDays must be at least 1".into());
    }
}

impl Writable for TourPackage {
    type Payload = TourPackagePayload;

    fn create_changeset(p: TourPackagePayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        checks
            .required_text("title", &p.title)
            .required("priceFrom", &p.price_from)
            .required("durationDays", &p.duration_days);
        check_duration(&mut checks, p.duration_days);
        let slug = p.title.as_deref().and_then(|t| checks.slug("title", t));
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.set("slug", slug.unwrap_or_default())
            .set("title", take_text(p.title))
            .set("short_desc", optional_text(p.short_desc))
            .set("price_from", p.price_from.unwrap_or_default())
            .set("duration_days", p.duration_days.unwrap_or(1))
            .set("image", optional_text(p.image))
            .set("featured", p.featured.unwrap_or(false))
            .set("order", p.order.unwrap_or(0));
        Ok(cs)
    }

    fn update_changeset(p: TourPackagePayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        check_duration(&mut checks, p.duration_days);
        let slug = p.title.as_deref().and_then(|t| checks.slug("title", t));
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.patch("slug", slug)
            .patch("title", p.title.map(|v| v.trim().to_string()))
            .patch_text("short_desc", p.short_desc)
            .patch("price_from", p.price_from)
            .patch("duration_days", p.duration_days)
            .patch_text("image", p.image)
            .patch("featured", p.featured)
            .patch("order", p.order);
        Ok(cs)
    }
}
