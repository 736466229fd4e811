// src/models/testimonial.rs

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

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Testimonial {
    pub id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub avatar: Option<String>,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i32,
    pub comment: String,
    pub is_active: bool,
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Testimonial {
    const TABLE: &'static str = "testimonials";
    const LABEL: &'static str = "Testimonial";
    const SEARCH_COLUMNS: &'static [&'static str] = &["name", "location", "comment"];
    const FILTERS: &'static [Filter] = &[Filter::new("active", "is_active", FilterKind::Flag)];

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialPayload {
    pub name: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub rating: Option<i32>,
    pub comment: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub order: Option<i32>,
}

/// Nota fora de 1..=5 é ajustada, nunca rejeitada.
pub fn clamp_rating(rating: i32) -> i32 {
    rating.clamp(MIN_RATING, MAX_RATING)
}

impl Writable for Testimonial {
    type Payload = TestimonialPayload;

    fn create_changeset(p: TestimonialPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        checks
            .required_text("name", &p.name)
            .required_text("comment", &p.comment);
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.set("name", take_text(p.name))
            .set("location", optional_text(p.location))
            .set("avatar", optional_text(p.avatar))
            .set("rating", clamp_rating(p.rating.unwrap_or(MAX_RATING)))
            .set("comment", take_text(p.comment))
            .set("is_active", p.is_active.unwrap_or(true))
            .set("order", p.order.unwrap_or(0));
        Ok(cs)
    }

    fn update_changeset(p: TestimonialPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        if p.name.is_some() {
            checks.required_text("name", &p.name);
        }
        if p.comment.is_some() {
            checks.required_text("comment", &p.comment);
        }
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.patch("name", p.name.map(|v| v.trim().to_string()))
            .patch_text("location", p.location)
            .patch_text("avatar", p.avatar)
            .patch("rating", p.rating.map(clamp_rating))
            .patch("comment", p.comment.map(|v| v.trim().to_string()))
            .patch("is_active", p.is_active)
            .patch("order", p.order);
        Ok(cs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::crud_repo::FieldValue;

    #[test]
    fn rating_is_clamped() {
        assert_eq!(clamp_rating(0), 1);
        assert_eq!(clamp_rating(9), 5);
        assert_eq!(clamp_rating(4), 4);
    }

    #[test]
    fn out_of_range_rating_is_stored_clamped() {
        let cs = Testimonial::create_changeset(TestimonialPayload {
            name: Some("Anna".into()),
            comment: Some("Great trip".into()),
            rating: Some(7),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cs.get("rating"), Some(&FieldValue::Int(Some(5))));
    }

    #[test]
    fn missing_rating_defaults_to_five() {
        let cs = Testimonial::create_changeset(TestimonialPayload {
            name: Some("Anna".into()),
            comment: Some("Great trip".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cs.get("rating"), Some(&FieldValue::Int(Some(5))));
    }
}
