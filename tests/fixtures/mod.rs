// tests/fixtures/mod.rs
// Carga base usada pelos testes de integração: as três regiões e alguns destinos.
#![allow(dead_code)]

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use travel_backend::{
    db::{
        destination_repo::DestinationSeed, region_repo::RegionSeed, DestinationRepository,
        RegionRepository,
    },
    models::{
        destination::Destination,
        region::Region,
        tour::{GalleryImageInput, TourDetail, TourPayload, TourStatus},
    },
    services::TourService,
};

pub fn region_seeds() -> Vec<RegionSeed> {
    [("north", "Miền Bắc", "North"), ("central", "Miền Trung", "Central"), ("south", "Miền Nam", "South")]
        .into_iter()
        .enumerate()
        .map(|(i, (key, vi, en))| RegionSeed {
            key: key.into(),
            name_vi: vi.into(),
            name_en: en.into(),
            description_vi: None,
            description_en: None,
            image: None,
            order: i as i32 + 1,
        })
        .collect()
}

pub fn destination_seeds() -> Vec<DestinationSeed> {
    [
        ("sapa", "Sa Pa", "Sapa", "north"),
        ("ha-long", "Hạ Long", "Ha Long", "north"),
        ("hoi-an", "Hội An", "Hoi An", "central"),
        ("mekong-delta", "Đồng bằng sông Cửu Long", "Mekong Delta", "south"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (slug, vi, en, region))| DestinationSeed {
        slug: slug.into(),
        name_vi: vi.into(),
        name_en: en.into(),
        description_vi: None,
        description_en: None,
        image: format!("https://img.example.com/{slug}.jpg"),
        alt: None,
        is_featured: i == 0,
        order: i as i32,
        region_key: Some(region.into()),
    })
    .collect()
}

pub async fn seed_regions(pool: &PgPool) -> Vec<Region> {
    let repo = RegionRepository::new(pool.clone());
    let mut regions = Vec::new();
    for seed in region_seeds() {
        regions.push(repo.upsert_by_key(pool, &seed).await.unwrap());
    }
    regions
}

pub async fn seed_destinations(pool: &PgPool) -> Vec<Destination> {
    let repo = DestinationRepository::new(pool.clone());
    let mut destinations = Vec::new();
    for seed in destination_seeds() {
        destinations.push(repo.upsert_by_slug(pool, &seed).await.unwrap());
    }
    destinations
}

/// Regiões + destinos, na ordem em que as FKs pedem.
pub async fn seed_baseline(pool: &PgPool) -> (Vec<Region>, Vec<Destination>) {
    let regions = seed_regions(pool).await;
    let destinations = seed_destinations(pool).await;
    (regions, destinations)
}

pub fn tour_payload(title: &str, destination_id: Option<Uuid>) -> TourPayload {
    TourPayload {
        title: Some(title.into()),
        price: Some(Decimal::from(120)),
        location: Some("Quang Ninh".into()),
        image: Some("https://img.example.com/cover.jpg".into()),
        destination_id: destination_id.map(Some),
        status: Some(TourStatus::Active),
        ..Default::default()
    }
}

pub fn gallery(urls: &[&str]) -> Vec<GalleryImageInput> {
    urls.iter()
        .map(|url| GalleryImageInput {
            url: url.to_string(),
            alt: None,
            caption: None,
        })
        .collect()
}

pub async fn create_tour(pool: &PgPool, title: &str, images: &[&str]) -> TourDetail {
    let mut payload = tour_payload(title, None);
    payload.gallery = Some(gallery(images));
    TourService::new(pool.clone()).create(payload).await.unwrap()
}
