// src/services/booking_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        validation::{optional_text, take_text, FieldChecks},
    },
    db::{
        crud_repo::{Changeset, CrudRepository},
        BookingRepository,
    },
    models::{
        booking::{booking_total, generate_booking_code, Booking, BookingPayload, BookingStatus},
        tour::Tour,
    },
};

#[derive(Clone)]
pub struct BookingService {
    pool: PgPool,
    crud: CrudRepository<Booking>,
    tours: CrudRepository<Tour>,
    repo: BookingRepository,
}

impl BookingService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            crud: CrudRepository::new(pool.clone()),
            tours: CrudRepository::new(pool.clone()),
            repo: BookingRepository::new(pool.clone()),
            pool,
        }
    }

    /// Cria a reserva copiando nome e preço do tour e somando no cliente.
    pub async fn create(&self, payload: BookingPayload) -> Result<Booking, AppError> {
        validate_create(&payload)?;

        let tour_id = payload.tour_id.ok_or(AppError::NotFound("Tour"))?;
        let tour = self.tours.get(tour_id).await?;
        let code = generate_booking_code(Utc::now().date_naive());
        let changeset = create_changeset(payload, &tour, code);

        let mut tx = self.pool.begin().await?;
        let booking = self.crud.insert(&mut *tx, changeset).await?;
        let touched = self
            .repo
            .adjust_customer_counters(&mut *tx, &booking.customer_email, 1, booking.total_amount)
            .await?;
        tx.commit().await?;

        tracing::info!(
            "🧾 Reserva {} criada para o tour '{}' (cliente atualizado: {})",
            booking.booking_id,
            booking.tour_name,
            touched > 0
        );
        Ok(booking)
    }

    /// Update parcial. Trocar tour ou número de pessoas recalcula o total,
    /// a não ser que `totalAmount` venha explícito. Os contadores do cliente
    /// acompanham a mudança de total ou de e-mail na mesma transação.
    pub async fn update(&self, id: Uuid, payload: BookingPayload) -> Result<Booking, AppError> {
        let current = self.crud.get(id).await?;
        validate_update(&payload, current.status)?;

        let tour = match payload.tour_id {
            Some(tour_id) if tour_id != current.tour_id => Some(self.tours.get(tour_id).await?),
            _ => None,
        };

        let needs_price = payload.total_amount.is_none()
            && (tour.is_some()
                || payload
                    .number_of_people
                    .is_some_and(|n| n != current.number_of_people));
        let price = match (&tour, needs_price) {
            (_, false) => None,
            (Some(tour), true) => Some(tour.price),
            (None, true) => Some(self.tours.get(current.tour_id).await?.price),
        };

        let changeset = update_changeset(payload, &current, tour.as_ref(), price);

        let mut tx = self.pool.begin().await?;
        let booking = self.crud.update(&mut *tx, id, changeset).await?;
        self.move_counters(&mut tx, &current, &booking).await?;
        tx.commit().await?;
        Ok(booking)
    }

    /// Remove a reserva e desconta do cliente.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let current = self.crud.get(id).await?;

        let mut tx = self.pool.begin().await?;
        self.crud.delete(&mut *tx, id).await?;
        self.repo
            .adjust_customer_counters(&mut *tx, &current.customer_email, -1, -current.total_amount)
            .await?;
        tx.commit().await?;

        tracing::info!("🗑️ Reserva {} removida", current.booking_id);
        Ok(())
    }

    async fn move_counters(&self, conn: &mut PgConnection, before: &Booking, after: &Booking) -> Result<(), AppError> {
        if same_email(&before.customer_email, &after.customer_email) {
            let delta = after.total_amount - before.total_amount;
            if !delta.is_zero() {
                self.repo
                    .adjust_customer_counters(&mut *conn, &after.customer_email, 0, delta)
                    .await?;
            }
            return Ok(());
        }
        self.repo
            .adjust_customer_counters(&mut *conn, &before.customer_email, -1, -before.total_amount)
            .await?;
        self.repo
            .adjust_customer_counters(&mut *conn, &after.customer_email, 1, after.total_amount)
            .await?;
        Ok(())
    }
}

fn same_email(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

fn validate_create(p: &BookingPayload) -> Result<(), AppError> {
    let mut checks = FieldChecks::of(p);
    checks
        .required_text("customerName", &p.customer_name)
        .required_text("customerEmail", &p.customer_email)
        .required("tourId", &p.tour_id)
        .required("tourDate", &p.tour_date)
        .required("numberOfPeople", &p.number_of_people);
    check_amounts(&mut checks, p);
    checks.finish()
}

fn validate_update(p: &BookingPayload, current: BookingStatus) -> Result<(), AppError> {
    let mut checks = FieldChecks::of(p);
    if p.customer_name.is_some() {
        checks.required_text("customerName", &p.customer_name);
    }
    if p.customer_email.is_some() {
        checks.required_text("customerEmail", &p.customer_email);
    }
    check_amounts(&mut checks, p);
    if let Some(next) = p.status {
        if !current.can_transition_to(next) {
            checks.invalid(
                "status",
                "transition",
                format!("cannot move a {current} booking to {next}"),
            );
        }
    }
    checks.finish()
}

fn check_amounts(checks: &mut FieldChecks, p: &BookingPayload) {
    if p.number_of_people.is_some_and(|n| n < 1) {
        checks.invalid("numberOfPeople", "range", "numberOfPeople must be at least 1".into());
    }
    if p.total_amount.is_some_and(|t| t.is_sign_negative()) {
        checks.invalid("totalAmount", "range", "totalAmount cannot be negative".into());
    }
}

fn create_changeset(p: BookingPayload, tour: &Tour, code: String) -> Changeset {
    let people = p.number_of_people.unwrap_or(1);
    let mut cs = Changeset::new();
    cs.set("booking_id", code)
        .set("customer_name", take_text(p.customer_name))
        .set("customer_email", take_text(p.customer_email))
        .set("customer_phone", optional_text(p.customer_phone))
        .set("tour_id", tour.id)
        .set("tour_name", tour.title.clone())
        .set("tour_date", p.tour_date)
        .set("number_of_people", people)
        .set("total_amount", booking_total(tour.price, people, p.total_amount))
        .set_enum("status", BookingStatus::PG_TYPE, p.status.unwrap_or_default().as_str())
        .set("notes", optional_text(p.notes))
        .set("user_id", p.user_id.flatten());
    cs
}

fn update_changeset(
    p: BookingPayload,
    current: &Booking,
    new_tour: Option<&Tour>,
    price: Option<Decimal>,
) -> Changeset {
    let people = p.number_of_people.unwrap_or(current.number_of_people);
    let mut cs = Changeset::new();
    cs.patch("customer_name", p.customer_name.map(|v| v.trim().to_string()))
        .patch("customer_email", p.customer_email.map(|v| v.trim().to_string()))
        .patch_text("customer_phone", p.customer_phone)
        .patch("tour_date", p.tour_date)
        .patch("number_of_people", p.number_of_people)
        .patch_text("notes", p.notes)
        .patch("user_id", p.user_id);
    if let Some(tour) = new_tour {
        cs.set("tour_id", tour.id).set("tour_name", tour.title.clone());
    }
    match (p.total_amount, price) {
        (Some(explicit), _) => {
            cs.set("total_amount", explicit);
        }
        (None, Some(price)) => {
            cs.set("total_amount", booking_total(price, people, None));
        }
        (None, None) => {}
    }
    if let Some(status) = p.status {
        cs.set_enum("status", BookingStatus::PG_TYPE, status.as_str());
    }
    cs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::crud_repo::FieldValue, models::tour::TourStatus};
    use chrono::NaiveDate;

    fn tour(price: i64) -> Tour {
        Tour {
            id: Uuid::new_v4(),
            slug: "ha-long-bay-cruise".into(),
            title: "Ha Long Bay Cruise".into(),
            description: None,
            price: Decimal::from(price),
            location: "Quang Ninh".into(),
            image: "http://x".into(),
            destination_id: None,
            status: TourStatus::Active,
            featured: false,
            duration: None,
            group_size: None,
            itinerary: None,
            highlights: None,
            inclusions: None,
            exclusions: None,
            policies: None,
            meta_title: None,
            meta_description: None,
            meta_keywords: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn booking_for(tour: &Tour, people: i32) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            booking_id: "BK-20251225-ABCDEF01".into(),
            customer_name: "Jane".into(),
            customer_email: "jane@example.com".into(),
            customer_phone: None,
            tour_id: tour.id,
            tour_name: tour.title.clone(),
            tour_date: NaiveDate::from_ymd_opt(2025, 12, 25).unwrap(),
            number_of_people: people,
            total_amount: tour.price * Decimal::from(people),
            status: BookingStatus::Pending,
            notes: None,
            user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn payload(tour: &Tour, people: i32) -> BookingPayload {
        BookingPayload {
            customer_name: Some("Jane".into()),
            customer_email: Some("jane@example.com".into()),
            tour_id: Some(tour.id),
            tour_date: NaiveDate::from_ymd_opt(2025, 12, 25),
            number_of_people: Some(people),
            ..Default::default()
        }
    }

    #[test]
    fn create_snapshots_tour_and_computes_total() {
        let tour = tour(120);
        let cs = create_changeset(payload(&tour, 3), &tour, "BK-1".into());
        assert_eq!(cs.text("tour_name"), Some("Ha Long Bay Cruise"));
        assert_eq!(cs.get("total_amount"), Some(&FieldValue::Money(Some(Decimal::from(360)))));
        assert_eq!(
            cs.get("status"),
            Some(&FieldValue::Enum("booking_status", "pending".into()))
        );
    }

    #[test]
    fn create_lists_every_missing_field() {
        let Err(AppError::ValidationError(errors)) = validate_create(&BookingPayload::default()) else {
            panic!("expected validation error");
        };
        let fields = errors.field_errors();
        for field in ["customerName", "customerEmail", "tourId", "tourDate", "numberOfPeople"] {
            assert!(fields.contains_key(field), "missing {field}");
        }
    }

    #[test]
    fn zero_people_is_rejected() {
        let tour = tour(120);
        assert!(validate_create(&payload(&tour, 0)).is_err());
    }

    #[test]
    fn changing_people_recomputes_total() {
        let tour = tour(100);
        let current = booking_for(&tour, 2);
        let cs = update_changeset(
            BookingPayload {
                number_of_people: Some(4),
                ..Default::default()
            },
            &current,
            None,
            Some(tour.price),
        );
        assert_eq!(cs.get("total_amount"), Some(&FieldValue::Money(Some(Decimal::from(400)))));
    }

    #[test]
    fn explicit_total_survives_update() {
        let tour = tour(100);
        let current = booking_for(&tour, 2);
        let cs = update_changeset(
            BookingPayload {
                number_of_people: Some(4),
                total_amount: Some(Decimal::from(350)),
                ..Default::default()
            },
            &current,
            None,
            None,
        );
        assert_eq!(cs.get("total_amount"), Some(&FieldValue::Money(Some(Decimal::from(350)))));
    }

    #[test]
    fn status_only_update_leaves_total_alone() {
        let tour = tour(100);
        let current = booking_for(&tour, 2);
        let payload = BookingPayload {
            status: Some(BookingStatus::Cancelled),
            ..Default::default()
        };
        assert!(validate_update(&payload, current.status).is_ok());
        let cs = update_changeset(payload, &current, None, None);
        assert!(!cs.contains("total_amount"));
        assert_eq!(
            cs.get("status"),
            Some(&FieldValue::Enum("booking_status", "cancelled".into()))
        );
    }

    #[test]
    fn switching_tour_copies_its_title() {
        let old = tour(100);
        let mut new = tour(80);
        new.title = "Sapa Trek".into();
        let current = booking_for(&old, 2);
        let cs = update_changeset(
            BookingPayload {
                tour_id: Some(new.id),
                ..Default::default()
            },
            &current,
            Some(&new),
            Some(new.price),
        );
        assert_eq!(cs.text("tour_name"), Some("Sapa Trek"));
        assert_eq!(cs.get("total_amount"), Some(&FieldValue::Money(Some(Decimal::from(160)))));
    }

    #[test]
    fn blank_user_id_unlinks_the_account() {
        let tour = tour(100);
        let current = booking_for(&tour, 2);
        let payload: BookingPayload = serde_urlencoded::from_str("userId=").unwrap();
        let cs = update_changeset(payload, &current, None, None);
        assert_eq!(cs.get("user_id"), Some(&FieldValue::Id(None)));

        let cs = update_changeset(BookingPayload::default(), &current, None, None);
        assert!(!cs.contains("user_id"));
    }

    #[test]
    fn email_comparison_ignores_case_and_spaces() {
        assert!(same_email("Jane@Example.com", " jane@example.com"));
        assert!(!same_email("jane@example.com", "john@example.com"));
    }
}
