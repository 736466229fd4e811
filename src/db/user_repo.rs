// src/db/user_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::User};

// O repositório de usuários: o que o CRUD genérico não cobre (login)
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo e-mail, sem diferenciar maiúsculas
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let maybe_user =
            sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
                .bind(email.trim())
                .fetch_optional(&self.pool)
                .await?;
        Ok(maybe_user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(maybe_user)
    }
}
