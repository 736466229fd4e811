// src/models/banner.rs

use std::str::FromStr;

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
        validation::{optional_text, FieldChecks},
    },
    db::crud_repo::{Changeset, Filter, FilterKind, Resource},
    services::crud_service::Writable,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "banner_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BannerType {
    #[default]
    Image,
    Video,
    Youtube,
}

impl BannerType {
    pub const PG_TYPE: &'static str = "banner_type";
    pub const VALUES: &'static [&'static str] = &["image", "video", "youtube"];

    pub fn as_str(self) -> &'static str {
        match self {
            BannerType::Image => "image",
            BannerType::Video => "video",
            BannerType::Youtube => "youtube",
        }
    }

    /// Campo de mídia obrigatório para este tipo (nome da API).
    pub fn media_field(self) -> &'static str {
        match self {
            BannerType::Image => "imageUrl",
            BannerType::Video => "videoUrl",
            BannerType::Youtube => "youtubeId",
        }
    }
}

impl FromStr for BannerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(BannerType::Image),
            "video" => Ok(BannerType::Video),
            "youtube" => Ok(BannerType::Youtube),
            other => Err(format!("unknown banner type `{other}`")),
        }
    }
}

// Slide do carrossel da home
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    pub id: Uuid,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub banner_type: BannerType,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub youtube_id: Option<String>,
    pub link_url: Option<String>,
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Banner {
    const TABLE: &'static str = "banners";
    const LABEL: &'static str = "Banner";
    const SEARCH_COLUMNS: &'static [&'static str] = &["title", "subtitle"];
    const FILTERS: &'static [Filter] = &[
        Filter::new("type", "type", FilterKind::Enum(BannerType::PG_TYPE, BannerType::VALUES)),
        Filter::new("active", "is_active", FilterKind::Flag),
    ];

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BannerPayload {
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub banner_type: Option<BannerType>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub youtube_id: Option<String>,
    pub link_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub order: Option<i32>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_active: Option<bool>,
}

impl BannerPayload {
    fn media(&self, kind: BannerType) -> &Option<String> {
        match kind {
            BannerType::Image => &self.image_url,
            BannerType::Video => &self.video_url,
            BannerType::Youtube => &self.youtube_id,
        }
    }
}

impl Writable for Banner {
    type Payload = BannerPayload;

    fn create_changeset(p: BannerPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        checks.required("type", &p.banner_type);
        if let Some(kind) = p.banner_type {
            checks.required_text(kind.media_field(), p.media(kind));
        }
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.set_enum("type", BannerType::PG_TYPE, p.banner_type.unwrap_or_default().as_str())
            .set("title", optional_text(p.title))
            .set("subtitle", optional_text(p.subtitle))
            .set("image_url", optional_text(p.image_url))
            .set("video_url", optional_text(p.video_url))
            .set("youtube_id", optional_text(p.youtube_id))
            .set("link_url", optional_text(p.link_url))
            .set("order", p.order.unwrap_or(0))
            .set("is_active", p.is_active.unwrap_or(true));
        Ok(cs)
    }

    fn update_changeset(p: BannerPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        // Trocar o tipo exige mandar a mídia correspondente junto.
        if let Some(kind) = p.banner_type {
            checks.required_text(kind.media_field(), p.media(kind));
        }
        checks.finish()?;

        let mut cs = Changeset::new();
        if let Some(kind) = p.banner_type {
            cs.set_enum("type", BannerType::PG_TYPE, kind.as_str());
        }
        cs.patch_text("title", p.title)
            .patch_text("subtitle", p.subtitle)
            .patch_text("image_url", p.image_url)
            .patch_text("video_url", p.video_url)
            .patch_text("youtube_id", p.youtube_id)
            .patch_text("link_url", p.link_url)
            .patch("order", p.order)
            .patch("is_active", p.is_active);
        Ok(cs)
    }
}
