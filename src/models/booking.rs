// src/models/booking.rs

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::form::{clearable, lenient},
    db::crud_repo::{Filter, FilterKind, Resource},
};

// --- ESTADO DA RESERVA ---
// pending → confirmed → completed, com cancelled alcançável de qualquer
// ponto. O painel pode mover uma reserva para qualquer estado.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const PG_TYPE: &'static str = "booking_status";
    pub const VALUES: &'static [&'static str] = &["pending", "confirmed", "completed", "cancelled"];
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Estados para os quais esta reserva pode ir.
    pub fn allowed_next(self) -> &'static [BookingStatus] {
        use BookingStatus::*;
        match self {
            Pending => &[Pending, Confirmed, Completed, Cancelled],
            Confirmed => &[Pending, Confirmed, Completed, Cancelled],
            Completed => &[Pending, Confirmed, Completed, Cancelled],
            Cancelled => &[Pending, Confirmed, Completed, Cancelled],
        }
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        self.allowed_next().contains(&next)
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" | "canceled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown booking status `{other}`")),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- RESERVA ---
// Nome/e-mail do cliente e nome do tour são cópias do momento da reserva.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    #[schema(example = "BK-20251225-1A2B3C4D")]
    pub booking_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: Option<String>,
    pub tour_id: Uuid,
    pub tour_name: String,
    pub tour_date: NaiveDate,
    pub number_of_people: i32,
    #[schema(value_type = f64)]
    pub total_amount: Decimal,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource for Booking {
    const TABLE: &'static str = "bookings";
    const LABEL: &'static str = "Booking";
    const SEARCH_COLUMNS: &'static [&'static str] =
        &["booking_id", "customer_name", "customer_email", "tour_name"];
    const FILTERS: &'static [Filter] = &[
        Filter::new("status", "status", FilterKind::Enum(BookingStatus::PG_TYPE, BookingStatus::VALUES)),
        Filter::new("tourId", "tour_id", FilterKind::Id),
        Filter::new("email", "customer_email", FilterKind::Contains),
    ];
    const DEFAULT_ORDER: &'static str = "created_at DESC";
    const UNIQUE_CONSTRAINTS: &'static [(&'static str, &'static str)] =
        &[("bookings_booking_id_key", "bookingId")];

    fn id(&self) -> Uuid {
        self.id
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingPayload {
    pub customer_name: Option<String>,
    #[validate(email(message = "invalid email"))]
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub tour_id: Option<Uuid>,
    #[serde(default, deserialize_with = "lenient")]
    #[schema(value_type = Option<String>, format = Date, example = "2025-12-25")]
    pub tour_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient")]
    pub number_of_people: Option<i32>,
    /// Sobrescreve o cálculo `preço × pessoas`.
    #[serde(default, deserialize_with = "lenient")]
    #[schema(value_type = Option<f64>)]
    pub total_amount: Option<Decimal>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<BookingStatus>,
    pub notes: Option<String>,
    /// `null` ou "" desvinculam a reserva da conta.
    #[serde(default, deserialize_with = "clearable")]
    #[schema(value_type = Option<Uuid>)]
    pub user_id: Option<Option<Uuid>>,
}

/// Total da reserva: o valor informado, ou preço do tour × pessoas.
pub fn booking_total(price: Decimal, people: i32, explicit: Option<Decimal>) -> Decimal {
    explicit.unwrap_or_else(|| price * Decimal::from(people))
}

/// Código legível: `BK-AAAAMMDD-XXXXXXXX`.
pub fn generate_booking_code(today: NaiveDate) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..8].to_ascii_uppercase();
    format!("BK-{}-{}", today.format("%Y%m%d"), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_defaults_to_price_times_people() {
        assert_eq!(booking_total(Decimal::new(12050, 2), 3, None), Decimal::new(36150, 2));
    }

    #[test]
    fn explicit_total_wins() {
        assert_eq!(
            booking_total(Decimal::from(120), 3, Some(Decimal::from(300))),
            Decimal::from(300)
        );
    }

    #[test]
    fn booking_code_shape() {
        let code = generate_booking_code(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap());
        assert!(code.starts_with("BK-20251225-"));
        assert_eq!(code.len(), "BK-20251225-".len() + 8);
        assert!(code[12..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn every_status_can_reach_every_status() {
        for from in BookingStatus::ALL {
            for to in BookingStatus::ALL {
                assert!(from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn cancelled_is_reachable_from_pending_and_confirmed() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Cancelled));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::Cancelled));
    }

    #[test]
    fn unknown_status_strings_are_rejected() {
        assert!("shipped".parse::<BookingStatus>().is_err());
        assert_eq!("Canceled".parse::<BookingStatus>().unwrap(), BookingStatus::Cancelled);
    }
}
