// src/services/user_service.rs

use bcrypt::hash;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        validation::{optional_text, take_text, FieldChecks},
    },
    db::crud_repo::{Changeset, CrudRepository},
    models::auth::{AccountStatus, User, UserPayload, UserRole},
};

/// Contas do painel. Fora do gateway genérico por causa do hash da senha.
#[derive(Clone)]
pub struct UserService {
    crud: CrudRepository<User>,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            crud: CrudRepository::new(pool),
        }
    }

    pub async fn create(&self, payload: UserPayload) -> Result<User, AppError> {
        let mut checks = FieldChecks::of(&payload);
        checks
            .required_text("email", &payload.email)
            .required_text("password", &payload.password);
        checks.finish()?;

        let password_hash = hash_password(payload.password.clone().unwrap_or_default()).await?;

        let mut cs = Changeset::new();
        cs.set("email", take_text(payload.email).to_lowercase())
            .set("name", optional_text(payload.name))
            .set("password_hash", password_hash)
            .set_enum("role", UserRole::PG_TYPE, payload.role.unwrap_or_default().as_str())
            .set_enum("status", AccountStatus::PG_TYPE, payload.status.unwrap_or_default().as_str());

        let user = self.crud.insert(self.crud.pool(), cs).await?;
        tracing::info!("👤 Usuário {} criado", user.email);
        Ok(user)
    }

    /// Senha vazia ou ausente mantém a atual.
    pub async fn update(&self, id: Uuid, payload: UserPayload) -> Result<User, AppError> {
        let password = optional_text(payload.password.clone());
        let payload = UserPayload {
            password: password.clone(),
            ..payload
        };
        let mut checks = FieldChecks::of(&payload);
        if payload.email.is_some() {
            checks.required_text("email", &payload.email);
        }
        checks.finish()?;

        let mut cs = Changeset::new();
        cs.patch("email", payload.email.map(|v| v.trim().to_lowercase()))
            .patch_text("name", payload.name);
        if let Some(password) = password {
            cs.set("password_hash", hash_password(password).await?);
        }
        if let Some(role) = payload.role {
            cs.set_enum("role", UserRole::PG_TYPE, role.as_str());
        }
        if let Some(status) = payload.status {
            cs.set_enum("status", AccountStatus::PG_TYPE, status.as_str());
        }

        self.crud.update(self.crud.pool(), id, cs).await
    }
}

// bcrypt é CPU-bound: roda fora do executor assíncrono
pub async fn hash_password(password: String) -> Result<String, AppError> {
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn hashed_password_verifies() {
        let hashed = hash_password("correct horse".into()).await.unwrap();
        assert_ne!(hashed, "correct horse");
        assert!(bcrypt::verify("correct horse", &hashed).unwrap());
    }
}
