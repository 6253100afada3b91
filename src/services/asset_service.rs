// src/services/asset_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::{check_version, load_asset, today};
use crate::{
    common::{cache::AssetCache, error::AppError},
    db::{Store, UnitOfWork},
    models::asset::{Asset, AssetChanges, AssetFilter, AssetStatus, NewAsset},
};

/// Dono do campo `status` do bem. Toda mudança passa pela tabela de transições.
#[derive(Clone)]
pub struct AssetService {
    store: Arc<dyn Store>,
    cache: AssetCache,
}

impl AssetService {
    pub fn new(store: Arc<dyn Store>, cache: AssetCache) -> Self {
        Self { store, cache }
    }

    // --- CREATE ASSET ---
    pub async fn create_asset(&self, input: NewAsset) -> Result<Asset, AppError> {
        input.validate_rules(today())?;

        let mut uow = self.store.begin().await?;
        ensure_references(&mut *uow, input.category_id, input.location_id).await?;

        let tag_number = input.tag_number.trim();
        if uow.tag_number_exists(tag_number).await? {
            return Err(AppError::conflict(format!(
                "Já existe um bem com o número de patrimônio '{tag_number}'."
            )));
        }

        let asset = Asset::from_new(input, Utc::now());
        if let Some(serial) = &asset.serial_number {
            if uow.serial_number_exists(serial, None).await? {
                return Err(AppError::conflict(format!(
                    "Já existe um bem com o número de série '{serial}'."
                )));
            }
        }

        let asset = uow.insert_asset(&asset).await?;
        uow.commit().await?;
        self.cache.invalidate_all();

        tracing::info!(asset_id = %asset.id, tag = %asset.tag_number, "Bem cadastrado");
        Ok(asset)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Asset, AppError> {
        if let Some(asset) = self.cache.get(&id) {
            return Ok(asset);
        }
        let seen = self.cache.generation();
        let mut uow = self.store.begin().await?;
        let asset = load_asset(&mut *uow, id).await?;
        self.cache.put_if_current(&asset, seen);
        Ok(asset)
    }

    pub async fn list(&self, filter: &AssetFilter) -> Result<Vec<Asset>, AppError> {
        let mut uow = self.store.begin().await?;
        uow.list_assets(filter).await
    }

    // --- UPDATE (campos descritivos) ---
    pub async fn update(&self, id: Uuid, changes: AssetChanges) -> Result<Asset, AppError> {
        changes.validate_rules()?;

        let mut uow = self.store.begin().await?;
        let mut asset = load_asset(&mut *uow, id).await?;
        check_version("Bem", id, changes.version, asset.version)?;

        if changes.category_id.is_some() || changes.location_id.is_some() {
            ensure_references(
                &mut *uow,
                changes.category_id.unwrap_or(asset.category_id),
                changes.location_id.unwrap_or(asset.location_id),
            )
            .await?;
        }

        changes.apply(&mut asset);
        if let Some(serial) = &asset.serial_number {
            if uow.serial_number_exists(serial, Some(id)).await? {
                return Err(AppError::conflict(format!(
                    "Já existe um bem com o número de série '{serial}'."
                )));
            }
        }

        let asset = uow.update_asset(&asset).await?;
        uow.commit().await?;
        self.cache.invalidate_all();

        tracing::info!(asset_id = %id, version = asset.version, "Bem atualizado");
        Ok(asset)
    }

    /// Pura: consulta a tabela de transições.
    pub fn can_transition(&self, asset: &Asset, target: AssetStatus) -> bool {
        asset.can_transition(target)
    }

    // --- SET STATUS ---
    pub async fn set_status(
        &self,
        id: Uuid,
        target: AssetStatus,
        expected_version: Option<i32>,
    ) -> Result<Asset, AppError> {
        let mut uow = self.store.begin().await?;
        let mut asset = load_asset(&mut *uow, id).await?;
        check_version("Bem", id, expected_version, asset.version)?;

        let from = asset.status;
        asset.transition_to(target)?;

        let asset = uow.update_asset(&asset).await?;
        uow.commit().await?;
        self.cache.invalidate_all();

        tracing::info!(asset_id = %id, ?from, to = ?target, "Status do bem alterado");
        Ok(asset)
    }

    // --- DELETE ---
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let asset = load_asset(&mut *uow, id).await?;

        if !asset.status.can_be_decommissioned() {
            return Err(AppError::conflict(format!(
                "O bem {} está {} e não pode ser excluído.",
                asset.tag_number, asset.status
            )));
        }
        if uow.count_decommissions_for_asset(id).await? > 0 {
            return Err(AppError::conflict(format!(
                "O bem {} possui baixa registrada e não pode ser excluído.",
                asset.tag_number
            )));
        }

        // Manutenções vão junto (cascade)
        uow.delete_asset(&asset).await?;
        uow.commit().await?;
        self.cache.invalidate_all();

        tracing::info!(asset_id = %id, "Bem excluído");
        Ok(())
    }
}

async fn ensure_references(
    uow: &mut dyn UnitOfWork,
    category_id: Uuid,
    location_id: Uuid,
) -> Result<(), AppError> {
    if uow.find_category(category_id).await?.is_none() {
        return Err(AppError::NotFound { entity: "Categoria", id: category_id });
    }
    if uow.find_location(location_id).await?.is_none() {
        return Err(AppError::NotFound { entity: "Localização", id: location_id });
    }
    Ok(())
}
