// src/db/tour_repo.rs

use sqlx::{Executor, PgConnection, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::tour::{GalleryImageInput, Tour, TourImage, TourStatus},
};

#[derive(Clone)]
pub struct TourRepository {
    pool: PgPool,
}

impl TourRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Só tours ativos aparecem na vitrine.
    pub async fn find_active_by_slug(&self, slug: &str) -> Result<Option<Tour>, AppError> {
        let tour = sqlx::query_as::<_, Tour>(
            "SELECT * FROM tours WHERE slug = $1 AND status = $2::tour_status",
        )
        .bind(slug)
        .bind(TourStatus::Active.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(tour)
    }

    pub async fn destination_exists<'e, E>(&self, executor: E, destination_id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM destinations WHERE id = $1)")
                .bind(destination_id)
                .fetch_one(executor)
                .await?;
        Ok(exists)
    }

    pub async fn gallery<'e, E>(&self, executor: E, tour_id: Uuid) -> Result<Vec<TourImage>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let images = sqlx::query_as::<_, TourImage>(
            r#"SELECT * FROM tour_images WHERE tour_id = $1 ORDER BY "order" ASC, created_at ASC"#,
        )
        .bind(tour_id)
        .fetch_all(executor)
        .await?;
        Ok(images)
    }

    /// Apaga a galeria e recria na ordem recebida (posição = índice).
    /// Deve rodar dentro da transação da escrita do tour.
    pub async fn replace_gallery(
        &self,
        conn: &mut PgConnection,
        tour_id: Uuid,
        images: &[GalleryImageInput],
    ) -> Result<Vec<TourImage>, AppError> {
        sqlx::query("DELETE FROM tour_images WHERE tour_id = $1")
            .bind(tour_id)
            .execute(&mut *conn)
            .await?;

        let mut inserted = Vec::with_capacity(images.len());
        for (position, image) in images.iter().enumerate() {
            let row = sqlx::query_as::<_, TourImage>(
                r#"
                INSERT INTO tour_images (tour_id, url, alt, caption, "order")
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
                "#,
            )
            .bind(tour_id)
            .bind(image.url.trim())
            .bind(non_blank(&image.alt))
            .bind(non_blank(&image.caption))
            .bind(position as i32)
            .fetch_one(&mut *conn)
            .await?;
            inserted.push(row);
        }
        Ok(inserted)
    }

    /// Ids da galeria, travados até o fim da transação.
    pub async fn lock_gallery_ids(&self, conn: &mut PgConnection, tour_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM tour_images WHERE tour_id = $1 FOR UPDATE")
                .bind(tour_id)
                .fetch_all(&mut *conn)
                .await?;
        Ok(ids)
    }

    /// Reescreve `order` de uma vez: posição zero-based na lista.
    pub async fn apply_gallery_order(
        &self,
        conn: &mut PgConnection,
        tour_id: Uuid,
        ordered_ids: &[Uuid],
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE tour_images AS ti
            SET "order" = (v.position - 1)::int
            FROM UNNEST($1::uuid[]) WITH ORDINALITY AS v(id, position)
            WHERE ti.id = v.id AND ti.tour_id = $2
            "#,
        )
        .bind(ordered_ids)
        .bind(tour_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
