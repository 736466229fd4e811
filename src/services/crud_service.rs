// src/services/crud_service.rs

use serde::de::DeserializeOwned;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{
        error::AppError,
        pagination::{ListQuery, Page},
    },
    db::crud_repo::{Changeset, CrudRepository, Resource},
};

/// Recurso que aceita escrita pelo gateway genérico.
///
/// O mesmo payload serve para create e update: no create os campos
/// obrigatórios são checados, no update só o que veio é alterado.
pub trait Writable: Resource {
    type Payload: DeserializeOwned + Send + 'static;

    fn create_changeset(payload: Self::Payload) -> Result<Changeset, AppError>;
    fn update_changeset(payload: Self::Payload) -> Result<Changeset, AppError>;
}

pub struct CrudService<R> {
    repo: CrudRepository<R>,
}

impl<R> Clone for CrudService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R: Resource> CrudService<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: CrudRepository::new(pool),
        }
    }

    pub fn repo(&self) -> &CrudRepository<R> {
        &self.repo
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<R>, AppError> {
        self.repo.list(query).await
    }

    pub async fn get(&self, id: Uuid) -> Result<R, AppError> {
        self.repo.get(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.repo.delete(self.repo.pool(), id).await?;
        tracing::info!("🗑️ {} {} removido", R::LABEL, id);
        Ok(())
    }
}

impl<R: Writable> CrudService<R> {
    pub async fn create(&self, payload: R::Payload) -> Result<R, AppError> {
        let changeset = R::create_changeset(payload)?;
        self.repo.insert(self.repo.pool(), changeset).await
    }

    pub async fn update(&self, id: Uuid, payload: R::Payload) -> Result<R, AppError> {
        let changeset = R::update_changeset(payload)?;
        self.repo.update(self.repo.pool(), id, changeset).await
    }
}
