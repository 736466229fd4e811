// src/models/customer.rs

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
        form::lenient,
        validation::{optional_text, take_text, FieldChecks},
    },
    db::crud_repo::{Changeset, Filter, FilterKind, Resource},
    models::auth::AccountStatus,
    services::crud_service::Writable,
};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    // Contadores mantidos pelo BookingService
    pub total_bookings: i32,
    #[schema(value_type = f64)]
    pub total_spent: Decimal,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Customer {
    const TABLE: &'static str = "customers";
    const LABEL: &'static str = "Customer";
    const SEARCH_COLUMNS: &'static [&'static str] = &["full_name", "email", "phone"];
    const FILTERS: &'static [Filter] =
        &[Filter::new("status", "status", FilterKind::Enum(AccountStatus::PG_TYPE, AccountStatus::VALUES))];
    const DEFAULT_ORDER: &'static str = "created_at DESC";
    const UNIQUE_CONSTRAINTS: &'static [(&'static str, &'static str)] =
        &[("customers_email_key", "email")];

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    pub full_name: Option<String>,
    #[validate(email(message = "invalid email"))]
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<AccountStatus>,
}

impl Writable for Customer {
    type Payload = CustomerPayload;

    fn create_changeset(p: CustomerPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        checks
            .required_text("fullName", &p.full_name)
            .required_text("email", &p.email);
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.set("full_name", take_text(p.full_name))
            .set("email", take_text(p.email).to_lowercase())
            .set("phone", optional_text(p.phone))
            .set("country", optional_text(p.country))
            .set("address", optional_text(p.address))
            .set("notes", optional_text(p.notes))
            .set_enum("status", AccountStatus::PG_TYPE, p.status.unwrap_or_default().as_str());
        Ok(cs)
    }

    fn update_changeset(p: CustomerPayload) -> Result<Changeset, AppError> {
        let mut checks = FieldChecks::of(&p);
        if p.full_name.is_some() {
            checks.required_text("fullName", &p.full_name);
        }
        if p.email.is_some() {
            checks.required_text("email", &p.email);
        }
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.patch("full_name", p.full_name.map(|v| v.trim().to_string()))
            .patch("email", p.email.map(|v| v.trim().to_lowercase()))
            .patch_text("phone", p.phone)
            .patch_text("country", p.country)
            .patch_text("address", p.address)
            .patch_text("notes", p.notes);
        if let Some(status) = p.status {
            cs.set_enum("status", AccountStatus::PG_TYPE, status.as_str());
        }
        Ok(cs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_stored_lowercase() {
        let cs = Customer::create_changeset(CustomerPayload {
            full_name: Some("Nguyen Van A".into()),
            email: Some("Van.A@Example.com".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cs.text("email"), Some("van.a@example.com"));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let result = Customer::create_changeset(CustomerPayload {
            full_name: Some("Nguyen Van A".into()),
            email: Some("not-an-email".into()),
            ..Default::default()
        });
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
