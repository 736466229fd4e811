// src/services/destination_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::AppError, slug::derive_slug},
    db::{
        crud_repo::{Changeset, CrudRepository},
        DestinationRepository, RegionRepository,
    },
    models::destination::{Destination, DestinationPayload},
    services::crud_service::Writable,
};

/// O que o payload diz sobre a região do destino.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionRef {
    /// `regionId` informado: precisa existir.
    Id(Uuid),
    /// Só o texto legado `region`.
    Legacy(String),
    /// `region` enviado vazio: desliga o destino da região.
    Clear,
}

impl RegionRef {
    /// `regionId` tem precedência sobre o texto legado.
    pub fn from_payload(region_id: Option<Uuid>, region: Option<&str>) -> Option<Self> {
        if let Some(id) = region_id {
            return Some(RegionRef::Id(id));
        }
        match region.map(str::trim) {
            None => None,
            Some("") => Some(RegionRef::Clear),
            Some(text) => Some(RegionRef::Legacy(text.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct DestinationService {
    crud: CrudRepository<Destination>,
    repo: DestinationRepository,
    regions: RegionRepository,
}

impl DestinationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            crud: CrudRepository::new(pool.clone()),
            repo: DestinationRepository::new(pool.clone()),
            regions: RegionRepository::new(pool),
        }
    }

    pub async fn create(&self, payload: DestinationPayload) -> Result<Destination, AppError> {
        let region = RegionRef::from_payload(payload.region_id, payload.region.as_deref());
        let mut changeset = Destination::create_changeset(payload)?;
        if let Some(region) = region {
            self.link_region(&mut changeset, region).await?;
        }
        self.crud.insert(self.crud.pool(), changeset).await
    }

    pub async fn update(&self, id: Uuid, payload: DestinationPayload) -> Result<Destination, AppError> {
        let region = RegionRef::from_payload(payload.region_id, payload.region.as_deref());
        let mut changeset = Destination::update_changeset(payload)?;
        if let Some(region) = region {
            self.link_region(&mut changeset, region).await?;
        }
        self.crud.update(self.crud.pool(), id, changeset).await
    }

    /// Resolve a região e grava `region_id` e o texto `region` juntos.
    ///
    /// Com `regionId` o texto vira a `key` da região. Texto legado que bate
    /// com uma `key` existente é promovido a `regionId`; o resto fica como veio.
    async fn link_region(&self, changeset: &mut Changeset, region: RegionRef) -> Result<(), AppError> {
        match region {
            RegionRef::Id(id) => {
                let found = self
                    .regions
                    .find_by_id(self.crud.pool(), id)
                    .await?
                    .ok_or(AppError::NotFound("Region"))?;
                changeset.set("region_id", found.id).set("region", found.key);
            }
            RegionRef::Legacy(text) => match self.regions.find_by_key(&derive_slug(&text)).await? {
                Some(found) => {
                    changeset.set("region_id", found.id).set("region", found.key);
                }
                None => {
                    changeset.set("region_id", None::<Uuid>).set("region", text);
                }
            },
            RegionRef::Clear => {
                changeset.set("region_id", None::<Uuid>).set("region", None::<String>);
            }
        }
        Ok(())
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Destination, AppError> {
        self.repo
            .find_by_slug(slug.trim())
            .await?
            .ok_or(AppError::NotFound("Destination"))
    }

    /// Chave da região pública → id, para filtrar a listagem.
    pub async fn region_id_for_key(&self, key: &str) -> Result<Uuid, AppError> {
        self.regions
            .find_by_key(key.trim())
            .await?
            .map(|r| r.id)
            .ok_or(AppError::NotFound("Region"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_id_wins_over_legacy_text() {
        let id = Uuid::new_v4();
        assert_eq!(RegionRef::from_payload(Some(id), Some("south")), Some(RegionRef::Id(id)));
    }

    #[test]
    fn legacy_text_is_kept_verbatim() {
        assert_eq!(
            RegionRef::from_payload(None, Some(" Tây Bắc ")),
            Some(RegionRef::Legacy("Tây Bắc".into()))
        );
    }

    #[test]
    fn blank_legacy_text_clears() {
        assert_eq!(RegionRef::from_payload(None, Some("")), Some(RegionRef::Clear));
        assert_eq!(RegionRef::from_payload(None, None), None);
    }
}
