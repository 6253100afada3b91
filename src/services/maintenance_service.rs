// src/services/maintenance_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::load_asset;
use crate::{
    common::{cache::AssetCache, error::AppError},
    db::{Store, UnitOfWork},
    models::{
        asset::{Asset, AssetStatus},
        maintenance::{
            FinishMaintenance, Maintenance, MaintenanceStatus, MaintenanceType, NewMaintenance,
        },
    },
};

#[derive(Clone)]
pub struct MaintenanceService {
    store: Arc<dyn Store>,
    cache: AssetCache,
}

impl MaintenanceService {
    pub fn new(store: Arc<dyn Store>, cache: AssetCache) -> Self {
        Self { store, cache }
    }

    // --- CREATE (agendamento) ---
    pub async fn create(&self, asset_id: Uuid, input: NewMaintenance) -> Result<Maintenance, AppError> {
        let start_date = input.validate_rules()?;

        let mut uow = self.store.begin().await?;
        let mut asset = load_asset(&mut *uow, asset_id).await?;
        if asset.status.is_terminal() {
            return Err(AppError::conflict(format!(
                "O bem {} foi baixado e não aceita manutenções.",
                asset.tag_number
            )));
        }

        let preventive = input.maintenance_type == MaintenanceType::Preventive;
        let maintenance = uow
            .insert_maintenance(&input.into_maintenance(asset_id, Utc::now())?)
            .await?;

        // Preventiva conta como manutenção realizada no início
        if preventive {
            asset.last_maintenance_date = Some(start_date);
        }
        // Gravado mesmo sem mudança: a versão ordena este agendamento contra
        // uma baixa concorrente do mesmo bem.
        uow.update_asset(&asset).await?;

        uow.commit().await?;
        self.cache.invalidate_all();

        tracing::info!(
            maintenance_id = %maintenance.id,
            asset_id = %asset_id,
            kind = ?maintenance.maintenance_type,
            "Manutenção agendada"
        );
        Ok(maintenance)
    }

    // --- START: SCHEDULED -> ACTIVE, bem vai para IN_MAINTENANCE ---
    pub async fn start(&self, id: Uuid) -> Result<Maintenance, AppError> {
        let mut uow = self.store.begin().await?;
        let mut maintenance = load_maintenance(&mut *uow, id).await?;
        let mut asset = load_asset(&mut *uow, maintenance.asset_id).await?;

        maintenance.start()?;
        asset.transition_to(AssetStatus::InMaintenance)?;

        let maintenance = uow.update_maintenance(&maintenance).await?;
        uow.update_asset(&asset).await?;
        uow.commit().await?;
        self.cache.invalidate_all();

        tracing::info!(maintenance_id = %id, asset_id = %asset.id, "Manutenção iniciada");
        Ok(maintenance)
    }

    // --- FINISH ---
    pub async fn finish(&self, id: Uuid, input: FinishMaintenance) -> Result<Maintenance, AppError> {
        let mut uow = self.store.begin().await?;
        let mut maintenance = load_maintenance(&mut *uow, id).await?;
        let was_started = maintenance.status == MaintenanceStatus::Active;

        maintenance.finish(&input)?;
        let mut asset = load_asset(&mut *uow, maintenance.asset_id).await?;
        asset.last_maintenance_date = Some(input.end_date);
        if let Some(next) = input.next_maintenance_date {
            asset.next_maintenance_date = Some(next);
        }

        let maintenance = uow.update_maintenance(&maintenance).await?;
        if was_started {
            release_asset(&mut *uow, &mut asset, id).await?;
        }
        uow.update_asset(&asset).await?;
        uow.commit().await?;
        self.cache.invalidate_all();

        tracing::info!(maintenance_id = %id, asset_id = %asset.id, "Manutenção finalizada");
        Ok(maintenance)
    }

    // --- CANCEL ---
    pub async fn cancel(&self, id: Uuid, reason: &str) -> Result<Maintenance, AppError> {
        let mut uow = self.store.begin().await?;
        let mut maintenance = load_maintenance(&mut *uow, id).await?;
        let was_started = maintenance.status == MaintenanceStatus::Active;

        maintenance.cancel(reason)?;
        let maintenance = uow.update_maintenance(&maintenance).await?;

        if was_started {
            // Sempre gravado: dois encerramentos simultâneos disputam a versão do bem
            // e o perdedor recebe StaleVersion em vez de deixá-lo preso em IN_MAINTENANCE.
            let mut asset = load_asset(&mut *uow, maintenance.asset_id).await?;
            release_asset(&mut *uow, &mut asset, id).await?;
            uow.update_asset(&asset).await?;
        }
        uow.commit().await?;
        if was_started {
            self.cache.invalidate_all();
        }

        tracing::info!(maintenance_id = %id, reason = reason.trim(), "Manutenção cancelada");
        Ok(maintenance)
    }

    // --- DELETE ---
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let maintenance = load_maintenance(&mut *uow, id).await?;
        maintenance.ensure_deletable()?;

        uow.delete_maintenance(&maintenance).await?;
        uow.commit().await?;
        tracing::info!(maintenance_id = %id, "Manutenção excluída");
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Maintenance, AppError> {
        let mut uow = self.store.begin().await?;
        load_maintenance(&mut *uow, id).await
    }

    pub async fn list_for_asset(&self, asset_id: Uuid) -> Result<Vec<Maintenance>, AppError> {
        let mut uow = self.store.begin().await?;
        load_asset(&mut *uow, asset_id).await?;
        uow.list_maintenances_for_asset(asset_id).await
    }
}

async fn load_maintenance(uow: &mut dyn UnitOfWork, id: Uuid) -> Result<Maintenance, AppError> {
    uow.find_maintenance(id)
        .await?
        .ok_or(AppError::NotFound { entity: "Manutenção", id })
}

// Devolve o bem a ACTIVE quando a manutenção encerrada era a última em execução.
// Só altera `asset`; quem chama grava o bem de qualquer forma.
async fn release_asset(
    uow: &mut dyn UnitOfWork,
    asset: &mut Asset,
    closed: Uuid,
) -> Result<(), AppError> {
    if asset.status != AssetStatus::InMaintenance {
        return Ok(());
    }
    let still_running = uow
        .list_maintenances_for_asset(asset.id)
        .await?
        .iter()
        .any(|m| m.id != closed && m.status == MaintenanceStatus::Active);
    if still_running {
        return Ok(());
    }
    asset.transition_to(AssetStatus::Active)
}
