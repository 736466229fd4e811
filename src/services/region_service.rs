// src/services/region_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{crud_repo::CrudRepository, RegionRepository},
    models::region::Region,
};

#[derive(Clone)]
pub struct RegionService {
    pool: PgPool,
    crud: CrudRepository<Region>,
    repo: RegionRepository,
}

impl RegionService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            crud: CrudRepository::new(pool.clone()),
            repo: RegionRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn get_by_key(&self, key: &str) -> Result<Region, AppError> {
        self.repo
            .find_by_key(key.trim())
            .await?
            .ok_or(AppError::NotFound("Region"))
    }

    /// Remove a região só se nenhum destino depender dela.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava a linha para ninguém ligar um destino entre a contagem e o DELETE.
        sqlx::query("SELECT id FROM regions WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::NotFound("Region"))?;

        let count = self.repo.count_destinations(&mut *tx, id).await?;
        if count > 0 {
            return Err(AppError::Dependency {
                entity: "Region",
                dependency: "destination(s)",
                count,
            });
        }

        self.crud.delete(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!("🗑️ Region {} removida", id);
        Ok(())
    }
}
