// tests/regions.rs

mod fixtures;

use sqlx::PgPool;
use travel_backend::{
    common::error::AppError,
    db::RegionRepository,
    models::region::RegionPayload,
    services::{CrudService, RegionService},
};

#[sqlx::test(migrations = "./migrations")]
async fn seeding_twice_keeps_one_row_per_key(pool: PgPool) {
    let first = fixtures::seed_regions(&pool).await;
    let second = fixtures::seed_regions(&pool).await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM regions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 3);
    // Mesmo id: o upsert atualiza em vez de recriar
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.id, b.id);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn upsert_refreshes_names(pool: PgPool) {
    fixtures::seed_regions(&pool).await;
    let repo = RegionRepository::new(pool.clone());
    let mut seed = fixtures::region_seeds().remove(0);
    seed.name_en = "Northern Vietnam".into();

    let updated = repo.upsert_by_key(&pool, &seed).await.unwrap();
    assert_eq!(updated.key, "north");
    assert_eq!(updated.name_en, "Northern Vietnam");
}

#[sqlx::test(migrations = "./migrations")]
async fn region_with_destinations_cannot_be_deleted(pool: PgPool) {
    let (regions, _) = fixtures::seed_baseline(&pool).await;
    let north = regions.iter().find(|r| r.key == "north").unwrap();

    let err = RegionService::new(pool.clone()).delete(north.id).await.unwrap_err();
    match err {
        AppError::Dependency { entity, count, .. } => {
            assert_eq!(entity, "Region");
            assert_eq!(count, 2);
        }
        other => panic!("expected dependency error, got {other:?}"),
    }

    // Nada foi removido
    let still_there = RegionRepository::new(pool.clone()).find_by_key("north").await.unwrap();
    assert!(still_there.is_some());
}

#[sqlx::test(migrations = "./migrations")]
async fn empty_region_is_deleted(pool: PgPool) {
    fixtures::seed_regions(&pool).await;
    let service = RegionService::new(pool.clone());
    let central = service.get_by_key("central").await.unwrap();

    service.delete(central.id).await.unwrap();
    assert!(matches!(service.get_by_key("central").await, Err(AppError::NotFound("Region"))));
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_unknown_region_is_not_found(pool: PgPool) {
    let err = RegionService::new(pool).delete(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound("Region")));
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_key_is_a_conflict(pool: PgPool) {
    fixtures::seed_regions(&pool).await;
    let err = CrudService::<travel_backend::models::Region>::new(pool)
        .create(RegionPayload {
            key: Some("NORTH".into()),
            name_vi: Some("Bắc".into()),
            name_en: Some("North again".into()),
            ..Default::default()
        })
        .await
        .unwrap_err();

    match err {
        AppError::Conflict { fields } => assert_eq!(fields, vec!["key".to_string()]),
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn created_region_reads_back_by_key(pool: PgPool) {
    let created = CrudService::<travel_backend::models::Region>::new(pool.clone())
        .create(RegionPayload {
            key: Some("north".into()),
            name_vi: Some("Miền Bắc".into()),
            name_en: Some("North".into()),
            order: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();

    let found = RegionService::new(pool).get_by_key("north").await.unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.name_vi, "Miền Bắc");
    assert_eq!(found.name_en, "North");
    assert_eq!(found.order, 1);
}
