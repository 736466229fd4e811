// src/db/booking_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::common::error::AppError;

#[derive(Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Ajusta `total_bookings`/`total_spent` do cliente com o mesmo e-mail
    /// (se houver). Os contadores nunca ficam negativos.
    /// Retorna quantas linhas foram tocadas (0 ou 1).
    pub async fn adjust_customer_counters<'e, E>(
        &self,
        executor: E,
        email: &str,
        bookings: i32,
        amount: Decimal,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET total_bookings = GREATEST(total_bookings + $2, 0),
                total_spent = GREATEST(total_spent + $3, 0),
                updated_at = NOW()
            WHERE LOWER(email) = LOWER($1)
            "#,
        )
        .bind(email)
        .bind(bookings)
        .bind(amount)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }
}
