// src/models/contact.rs

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
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
    db::crud_repo::{Changeset, Filter, FilterKind, Resource},
    services::crud_service::Writable,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "contact_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    New,
    Contacted,
    Fake,
    Booked,
    Archived,
}

impl ContactStatus {
    pub const PG_TYPE: &'static str = "contact_status";
    pub const VALUES: &'static [&'static str] = &["new", "contacted", "fake", "booked", "archived"];

    pub fn as_str(self) -> &'static str {
        match self {
            ContactStatus::New => "new",
            ContactStatus::Contacted => "contacted",
            ContactStatus::Fake => "fake",
            ContactStatus::Booked => "booked",
            ContactStatus::Archived => "archived",
        }
    }
}

impl FromStr for ContactStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(ContactStatus::New),
            "contacted" => Ok(ContactStatus::Contacted),
            "fake" => Ok(ContactStatus::Fake),
            "booked" => Ok(ContactStatus::Booked),
            "archived" => Ok(ContactStatus::Archived),
            other => Err(format!("unknown contact status `{other}`")),
        }
    }
}

// Pedido de contato vindo do formulário público
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub whatsapp: Option<String>,
    pub quantity: Option<i32>,
    #[schema(value_type = Option<String>, format = Date)]
    pub date: Option<NaiveDate>,
    pub message: Option<String>,
    pub status: ContactStatus,
    pub responsible_person: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Contact {
    const TABLE: &'static str = "contacts";
    const LABEL: &'static str = "Contact";
    const SEARCH_COLUMNS: &'static [&'static str] = &["full_name", "email", "whatsapp", "message"];
    const FILTERS: &'static [Filter] = &[
        Filter::new("status", "status", FilterKind::Enum(ContactStatus::PG_TYPE, ContactStatus::VALUES)),
        Filter::new("responsiblePerson", "responsible_person", FilterKind::Text),
    ];
    const DEFAULT_ORDER: &'static str = "created_at DESC";

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactPayload {
    pub full_name: Option<String>,
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub whatsapp: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "lenient")]
    #[schema(value_type = Option<String>, format = Date, example = "2025-12-25")]
    pub date: Option<NaiveDate>,
    pub message: Option<String>,
    // Só o painel mexe nestes dois
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<ContactStatus>,
    pub responsible_person: Option<String>,
}

impl Writable for Contact {
    type Payload = ContactPayload;

    fn create_changeset(p: ContactPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        checks
            .required_text("fullName", &p.full_name)
            .required_text("email", &p.email);
        if p.quantity.is_some_and(|q| q < 1) {
            checks.invalid("quantity", "range", "quantity must be at least 1".into());
        }
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.set("full_name", take_text(p.full_name))
            .set("email", take_text(p.email))
            .set("whatsapp", optional_text(p.whatsapp))
            .set("quantity", p.quantity)
            .set("date", p.date)
            .set("message", optional_text(p.message))
            .set_enum("status", ContactStatus::PG_TYPE, p.status.unwrap_or_default().as_str())
            .set("responsible_person", optional_text(p.responsible_person));
        Ok(cs)
    }

    fn update_changeset(p: ContactPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        if p.full_name.is_some() {
            checks.required_text("fullName", &p.full_name);
        }
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.patch("full_name", p.full_name.map(|v| v.trim().to_string()))
            .patch("email", p.email.map(|v| v.trim().to_string()))
            .patch_text("whatsapp", p.whatsapp)
            .patch("quantity", p.quantity)
            .patch("date", p.date)
            .patch_text("message", p.message)
            .patch_text("responsible_person", p.responsible_person);
        if let Some(status) = p.status {
            cs.set_enum("status", ContactStatus::PG_TYPE, status.as_str());
        }
        Ok(cs)
    }
}

impl ContactPayload {
    /// O formulário público não decide status nem responsável.
    pub fn into_public_submission(self) -> Self {
        Self {
            status: None,
            responsible_person: None,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::crud_repo::FieldValue;

    #[test]
    fn submission_without_message_stores_null() {
        let payload: ContactPayload = serde_urlencoded::from_str(
            "fullName=Jane+Doe&email=jane%40example.com&quantity=2&date=2025-12-25",
        )
        .unwrap();
        let cs = Contact::create_changeset(payload).unwrap();

        assert_eq!(cs.get("message"), Some(&FieldValue::Text(None)));
        assert_eq!(cs.get("quantity"), Some(&FieldValue::Int(Some(2))));
        assert_eq!(
            cs.get("date"),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2025, 12, 25)))
        );
        assert_eq!(cs.get("status"), Some(&FieldValue::Enum("contact_status", "new".into())));
    }

    #[test]
    fn public_submission_cannot_pick_status() {
        let payload = ContactPayload {
            full_name: Some("Jane".into()),
            email: Some("jane@example.com".into()),
            status: Some(ContactStatus::Booked),
            responsible_person: Some("Minh".into()),
            ..Default::default()
        }
        .into_public_submission();
        let cs = Contact::create_changeset(payload).unwrap();
        assert_eq!(cs.get("status"), Some(&FieldValue::Enum("contact_status", "new".into())));
        assert_eq!(cs.get("responsible_person"), Some(&FieldValue::Text(None)));
    }
}
