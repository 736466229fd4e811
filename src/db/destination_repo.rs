// src/db/destination_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    db::crud_repo::map_write_error,
    models::destination::Destination,
};

/// Linha de carga inicial de um destino. A região vem pela `key`.
#[derive(Debug, Clone)]
pub struct DestinationSeed {
    pub slug: String,
    pub name_vi: String,
    pub name_en: String,
    pub description_vi: Option<String>,
    pub description_en: Option<String>,
    pub image: String,
    pub alt: Option<String>,
    pub is_featured: bool,
    pub order: i32,
    pub region_key: Option<String>,
}

#[derive(Clone)]
pub struct DestinationRepository {
    pool: PgPool,
}

impl DestinationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Destination>, AppError> {
        let destination =
            sqlx::query_as::<_, Destination>("SELECT * FROM destinations WHERE slug = $1")
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;
        Ok(destination)
    }

    /// Cria ou atualiza pelo `slug`, ligando à região pela `key` quando ela existe.
    pub async fn upsert_by_slug<'e, E>(&self, executor: E, seed: &DestinationSeed) -> Result<Destination, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Destination>(
            r#"
            INSERT INTO destinations (
                slug, name_vi, name_en, description_vi, description_en,
                image, alt, is_featured, "order", region, region_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    (SELECT id FROM regions WHERE key = $10))
            ON CONFLICT (slug) DO UPDATE SET
                name_vi = EXCLUDED.name_vi,
                name_en = EXCLUDED.name_en,
                description_vi = EXCLUDED.description_vi,
                description_en = EXCLUDED.description_en,
                image = EXCLUDED.image,
                alt = EXCLUDED.alt,
                is_featured = EXCLUDED.is_featured,
                "order" = EXCLUDED."order",
                region = EXCLUDED.region,
                region_id = EXCLUDED.region_id,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&seed.slug)
        .bind(&seed.name_vi)
        .bind(&seed.name_en)
        .bind(&seed.description_vi)
        .bind(&seed.description_en)
        .bind(&seed.image)
        .bind(&seed.alt)
        .bind(seed.is_featured)
        .bind(seed.order)
        .bind(&seed.region_key)
        .fetch_one(executor)
        .await
        .map_err(map_write_error::<Destination>)
    }
}
