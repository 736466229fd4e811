// src/services/tour_service.rs

use std::collections::HashSet;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, validation::FieldChecks},
    db::{crud_repo::CrudRepository, TourRepository},
    models::tour::{check_gallery, GalleryImageInput, Tour, TourDetail, TourImage, TourPayload},
    services::crud_service::Writable,
};

#[derive(Clone)]
pub struct TourService {
    pool: PgPool,
    crud: CrudRepository<Tour>,
    repo: TourRepository,
}

impl TourService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            crud: CrudRepository::new(pool.clone()),
            repo: TourRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn get_detail(&self, id: Uuid) -> Result<TourDetail, AppError> {
        let tour = self.crud.get(id).await?;
        let gallery = self.repo.gallery(&self.pool, id).await?;
        Ok(TourDetail { tour, gallery })
    }

    /// Página pública do tour: só ativos, com galeria ordenada.
    pub async fn get_public(&self, slug: &str) -> Result<TourDetail, AppError> {
        let tour = self
            .repo
            .find_active_by_slug(slug)
            .await?
            .ok_or(AppError::NotFound("Tour"))?;
        let gallery = self.repo.gallery(&self.pool, tour.id).await?;
        Ok(TourDetail { tour, gallery })
    }

    pub async fn create(&self, payload: TourPayload) -> Result<TourDetail, AppError> {
        // Galeria não é coluna: o changeset valida, a gravação é separada.
        let gallery = payload.gallery.clone();
        let destination_id = payload.destination_id;
        let changeset = Tour::create_changeset(payload)?;
        if let Some(Some(destination_id)) = destination_id {
            self.ensure_destination(destination_id).await?;
        }

        let mut tx = self.pool.begin().await?;
        let tour = self.crud.insert(&mut *tx, changeset).await?;
        let gallery = match gallery {
            Some(images) => self.repo.replace_gallery(&mut *tx, tour.id, &images).await?,
            None => Vec::new(),
        };
        tx.commit().await?;

        tracing::info!("✅ Tour '{}' criado ({})", tour.slug, tour.id);
        Ok(TourDetail { tour, gallery })
    }

    /// Update parcial. Se `gallery` veio, a galeria inteira é substituída
    /// na mesma transação.
    pub async fn update(&self, id: Uuid, payload: TourPayload) -> Result<TourDetail, AppError> {
        let gallery = payload.gallery.clone();
        let destination_id = payload.destination_id;
        let changeset = Tour::update_changeset(payload)?;
        if let Some(Some(destination_id)) = destination_id {
            self.ensure_destination(destination_id).await?;
        }

        let mut tx = self.pool.begin().await?;
        let tour = self.crud.update(&mut *tx, id, changeset).await?;
        if let Some(images) = gallery {
            self.repo.replace_gallery(&mut *tx, id, &images).await?;
        }
        let gallery = self.repo.gallery(&mut *tx, id).await?;
        tx.commit().await?;

        Ok(TourDetail { tour, gallery })
    }

    pub async fn gallery(&self, tour_id: Uuid) -> Result<Vec<TourImage>, AppError> {
        self.crud.get(tour_id).await?;
        self.repo.gallery(&self.pool, tour_id).await
    }

    pub async fn replace_gallery(
        &self,
        tour_id: Uuid,
        images: Vec<GalleryImageInput>,
    ) -> Result<Vec<TourImage>, AppError> {
        validate_gallery(Some(&images))?;

        let mut tx = self.pool.begin().await?;
        lock_tour(&mut *tx, tour_id).await?;
        let gallery = self.repo.replace_gallery(&mut *tx, tour_id, &images).await?;
        tx.commit().await?;
        Ok(gallery)
    }

    /// Nova ordem da galeria: posição zero-based de cada id na lista.
    /// Tudo ou nada, numa transação.
    pub async fn reorder(&self, tour_id: Uuid, ids: Vec<Uuid>) -> Result<Vec<TourImage>, AppError> {
        let mut tx = self.pool.begin().await?;
        lock_tour(&mut *tx, tour_id).await?;

        let current = self.repo.lock_gallery_ids(&mut *tx, tour_id).await?;
        check_reorder(&current, &ids)?;
        self.repo.apply_gallery_order(&mut *tx, tour_id, &ids).await?;

        let gallery = self.repo.gallery(&mut *tx, tour_id).await?;
        tx.commit().await?;

        tracing::info!("🔀 Galeria do tour {} reordenada ({} imagens)", tour_id, ids.len());
        Ok(gallery)
    }

    async fn ensure_destination(&self, destination_id: Uuid) -> Result<(), AppError> {
        if self.repo.destination_exists(&self.pool, destination_id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("Destination"))
        }
    }
}

async fn lock_tour(conn: &mut sqlx::PgConnection, tour_id: Uuid) -> Result<(), AppError> {
    sqlx::query("SELECT id FROM tours WHERE id = $1 FOR UPDATE")
        .bind(tour_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(AppError::NotFound("Tour"))?;
    Ok(())
}

fn validate_gallery(gallery: Option<&[GalleryImageInput]>) -> Result<(), AppError> {
    let mut checks = FieldChecks::new();
    check_gallery(&mut checks, gallery);
    checks.finish()
}

/// Todos os ids pedidos precisam ser imagens distintas deste tour.
pub fn check_reorder(current: &[Uuid], requested: &[Uuid]) -> Result<(), AppError> {
    let owned: HashSet<&Uuid> = current.iter().collect();
    let distinct: HashSet<&Uuid> = requested.iter().collect();
    let matched = distinct.iter().filter(|id| owned.contains(*id)).count();

    if matched != requested.len() {
        let mut checks = FieldChecks::new();
        checks.invalid(
            "ids",
            "count_mismatch",
            format!(
                "expected {} image(s) of this tour, matched {}",
                requested.len(),
                matched
            ),
        );
        return checks.finish();
    }
    Ok(())
}
