// tests/bookings.rs

mod fixtures;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use travel_backend::{
    common::error::AppError,
    models::{
        booking::{BookingPayload, BookingStatus},
        customer::CustomerPayload,
        Customer, Tour,
    },
    services::{BookingService, CrudService},
};
use uuid::Uuid;

fn payload(tour_id: Uuid, people: i32) -> BookingPayload {
    BookingPayload {
        customer_name: Some("Jane Doe".into()),
        customer_email: Some("Jane@Example.com".into()),
        tour_id: Some(tour_id),
        tour_date: NaiveDate::from_ymd_opt(2025, 12, 25),
        number_of_people: Some(people),
        ..Default::default()
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn booking_snapshots_the_tour_and_bumps_the_customer(pool: PgPool) {
    let tour = fixtures::create_tour(&pool, "Ha Long Bay Cruise", &[]).await.tour;
    let customer = CrudService::<Customer>::new(pool.clone())
        .create(CustomerPayload {
            full_name: Some("Jane Doe".into()),
            email: Some("jane@example.com".into()),
            ..Default::default()
        })
        .await
        .unwrap();

    let booking = BookingService::new(pool.clone()).create(payload(tour.id, 3)).await.unwrap();

    assert!(booking.booking_id.starts_with("BK-"));
    assert_eq!(booking.tour_name, "Ha Long Bay Cruise");
    assert_eq!(booking.total_amount, Decimal::from(360));
    assert_eq!(booking.status, BookingStatus::Pending);

    let customer = CrudService::<Customer>::new(pool).get(customer.id).await.unwrap();
    assert_eq!(customer.total_bookings, 1);
    assert_eq!(customer.total_spent, Decimal::from(360));
}

#[sqlx::test(migrations = "./migrations")]
async fn renaming_the_tour_keeps_the_booking_snapshot(pool: PgPool) {
    let tour = fixtures::create_tour(&pool, "Old Name", &[]).await.tour;
    let booking = BookingService::new(pool.clone()).create(payload(tour.id, 1)).await.unwrap();

    sqlx::query("UPDATE tours SET title = 'New Name' WHERE id = $1")
        .bind(tour.id)
        .execute(&pool)
        .await
        .unwrap();

    let stored = CrudService::<travel_backend::models::Booking>::new(pool)
        .get(booking.id)
        .await
        .unwrap();
    assert_eq!(stored.tour_name, "Old Name");
}

#[sqlx::test(migrations = "./migrations")]
async fn unknown_tour_is_not_found(pool: PgPool) {
    let err = BookingService::new(pool).create(payload(Uuid::new_v4(), 2)).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound("Tour")));
}

#[sqlx::test(migrations = "./migrations")]
async fn changing_people_recomputes_the_total(pool: PgPool) {
    let tour = fixtures::create_tour(&pool, "Sapa Trek", &[]).await.tour;
    let service = BookingService::new(pool);
    let booking = service.create(payload(tour.id, 2)).await.unwrap();
    assert_eq!(booking.total_amount, Decimal::from(240));

    let updated = service
        .update(
            booking.id,
            BookingPayload {
                number_of_people: Some(4),
                status: Some(BookingStatus::Confirmed),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.number_of_people, 4);
    assert_eq!(updated.total_amount, Decimal::from(480));
    assert_eq!(updated.status, BookingStatus::Confirmed);
}

#[sqlx::test(migrations = "./migrations")]
async fn tour_with_bookings_cannot_be_deleted(pool: PgPool) {
    let tour = fixtures::create_tour(&pool, "Mekong Delta", &[]).await.tour;
    BookingService::new(pool.clone()).create(payload(tour.id, 1)).await.unwrap();

    let err = CrudService::<Tour>::new(pool).delete(tour.id).await.unwrap_err();
    assert!(matches!(err, AppError::ReferencedRecord(_)));
}

async fn customer(pool: &PgPool, email: &str) -> Customer {
    CrudService::<Customer>::new(pool.clone())
        .create(CustomerPayload {
            full_name: Some("Jane Doe".into()),
            email: Some(email.into()),
            ..Default::default()
        })
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn customer_counters_follow_updates_and_deletes(pool: PgPool) {
    let tour = fixtures::create_tour(&pool, "Hue Citadel", &[]).await.tour;
    let jane = customer(&pool, "jane@example.com").await;
    let john = customer(&pool, "john@example.com").await;
    let customers = CrudService::<Customer>::new(pool.clone());
    let service = BookingService::new(pool);

    let booking = service.create(payload(tour.id, 2)).await.unwrap();
    let stored = customers.get(jane.id).await.unwrap();
    assert_eq!((stored.total_bookings, stored.total_spent), (1, Decimal::from(240)));

    // Mais pessoas: só o valor muda.
    service
        .update(booking.id, BookingPayload { number_of_people: Some(3), ..Default::default() })
        .await
        .unwrap();
    let stored = customers.get(jane.id).await.unwrap();
    assert_eq!((stored.total_bookings, stored.total_spent), (1, Decimal::from(360)));

    // Troca de e-mail: a reserva passa de um cliente para o outro.
    service
        .update(
            booking.id,
            BookingPayload { customer_email: Some("John@Example.com".into()), ..Default::default() },
        )
        .await
        .unwrap();
    let stored = customers.get(jane.id).await.unwrap();
    assert_eq!((stored.total_bookings, stored.total_spent), (0, Decimal::ZERO));
    let stored = customers.get(john.id).await.unwrap();
    assert_eq!((stored.total_bookings, stored.total_spent), (1, Decimal::from(360)));

    service.delete(booking.id).await.unwrap();
    let stored = customers.get(john.id).await.unwrap();
    assert_eq!((stored.total_bookings, stored.total_spent), (0, Decimal::ZERO));

    let err = service.delete(booking.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound("Booking")));
}
