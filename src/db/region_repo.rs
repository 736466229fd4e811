// src/db/region_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::crud_repo::map_write_error,
    models::region::Region,
};

/// Linha de carga inicial (seed) de uma região.
#[derive(Debug, Clone)]
pub struct RegionSeed {
    pub key: String,
    pub name_vi: String,
    pub name_en: String,
    pub description_vi: Option<String>,
    pub description_en: Option<String>,
    pub image: Option<String>,
    pub order: i32,
}

#[derive(Clone)]
pub struct RegionRepository {
    pool: PgPool,
}

impl RegionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_key(&self, key: &str) -> Result<Option<Region>, AppError> {
        let region = sqlx::query_as::<_, Region>("SELECT * FROM regions WHERE key = $1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(region)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Region>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let region = sqlx::query_as::<_, Region>("SELECT * FROM regions WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(region)
    }

    /// Quantos destinos ainda apontam para a região.
    pub async fn count_destinations<'e, E>(&self, executor: E, region_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM destinations WHERE region_id = $1")
            .bind(region_id)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    /// Cria ou atualiza pela `key`. Rodar duas vezes dá o mesmo resultado.
    pub async fn upsert_by_key<'e, E>(&self, executor: E, seed: &RegionSeed) -> Result<Region, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Region>(
            r#"
            INSERT INTO regions (key, name_vi, name_en, description_vi, description_en, image, "order")
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (key) DO UPDATE SET
                name_vi = EXCLUDED.name_vi,
                name_en = EXCLUDED.name_en,
                description_vi = EXCLUDED.description_vi,
                description_en = EXCLUDED.description_en,
                image = EXCLUDED.image,
                "order" = EXCLUDED."order",
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&seed.key)
        .bind(&seed.name_vi)
        .bind(&seed.name_en)
        .bind(&seed.description_vi)
        .bind(&seed.description_en)
        .bind(&seed.image)
        .bind(seed.order)
        .fetch_one(executor)
        .await
        .map_err(map_write_error::<Region>)
    }
}
