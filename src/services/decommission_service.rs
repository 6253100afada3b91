// src/services/decommission_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::{load_asset, today};
use crate::{
    common::{cache::AssetCache, error::AppError},
    db::{Store, UnitOfWork},
    models::{
        asset::AssetStatus,
        decommission::{
            ApproveDecommission, Decommission, DecommissionDetail, NewDecommission, RegisterSale,
        },
    },
};

/// Fluxo de baixa patrimonial: abertura -> aprovação -> venda.
///
/// A abertura força o bem para DECOMMISSIONED e a exclusão (só antes da
/// aprovação) devolve o bem para ACTIVE, sempre na mesma transação.
#[derive(Clone)]
pub struct DecommissionService {
    store: Arc<dyn Store>,
    cache: AssetCache,
}

impl DecommissionService {
    pub fn new(store: Arc<dyn Store>, cache: AssetCache) -> Self {
        Self { store, cache }
    }

    // --- CREATE ---
    pub async fn create(&self, input: NewDecommission) -> Result<DecommissionDetail, AppError> {
        input.validate_rules(today())?;

        let mut uow = self.store.begin().await?;
        let mut asset = load_asset(&mut *uow, input.asset_id).await?;

        // Qualquer baixa existente (mesmo de um bem já restaurado) bloqueia nova baixa
        if uow.count_decommissions_for_asset(asset.id).await? > 0 {
            return Err(AppError::conflict(format!(
                "O bem {} já possui baixa registrada.",
                asset.tag_number
            )));
        }
        asset.transition_to(AssetStatus::Decommissioned)?;

        let decommission = uow.insert_decommission(&input.into_decommission(Utc::now())).await?;
        uow.update_asset(&asset).await?;
        uow.commit().await?;
        self.cache.invalidate_all();

        tracing::info!(
            decommission_id = %decommission.id,
            asset_id = %asset.id,
            reason = %decommission.reason,
            "Baixa registrada"
        );
        Ok(DecommissionDetail::new(decommission, Some(asset.acquisition_value)))
    }

    // --- APPROVE ---
    pub async fn approve(&self, id: Uuid, input: ApproveDecommission) -> Result<DecommissionDetail, AppError> {
        let mut uow = self.store.begin().await?;
        let mut decommission = load_decommission(&mut *uow, id).await?;
        decommission.approve(&input)?;

        let decommission = uow.update_decommission(&decommission).await?;
        let detail = detail_of(&mut *uow, decommission).await?;
        uow.commit().await?;

        tracing::info!(decommission_id = %id, approved_by = %input.approved_by, "Baixa aprovada");
        Ok(detail)
    }

    // --- REGISTER SALE ---
    pub async fn register_sale(&self, id: Uuid, input: RegisterSale) -> Result<DecommissionDetail, AppError> {
        let mut uow = self.store.begin().await?;
        let mut decommission = load_decommission(&mut *uow, id).await?;
        decommission.register_sale(&input)?;

        let decommission = uow.update_decommission(&decommission).await?;
        let detail = detail_of(&mut *uow, decommission).await?;
        uow.commit().await?;

        tracing::info!(
            decommission_id = %id,
            sale_value = %input.sale_value,
            gain = %detail.financial_gain,
            "Venda registrada"
        );
        Ok(detail)
    }

    // --- DELETE: só antes da aprovação, restaura o bem ---
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let decommission = load_decommission(&mut *uow, id).await?;
        decommission.ensure_deletable()?;

        let mut asset = load_asset(&mut *uow, decommission.asset_id).await?;
        uow.delete_decommission(&decommission).await?;
        asset.restore_after_decommission_removal();
        uow.update_asset(&asset).await?;
        uow.commit().await?;
        self.cache.invalidate_all();

        tracing::info!(decommission_id = %id, asset_id = %asset.id, "Baixa excluída; bem reativado");
        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<DecommissionDetail, AppError> {
        let mut uow = self.store.begin().await?;
        let decommission = load_decommission(&mut *uow, id).await?;
        detail_of(&mut *uow, decommission).await
    }

    pub async fn list(&self) -> Result<Vec<DecommissionDetail>, AppError> {
        let mut uow = self.store.begin().await?;
        let decommissions = uow.list_decommissions().await?;
        let mut details = Vec::with_capacity(decommissions.len());
        for decommission in decommissions {
            details.push(detail_of(&mut *uow, decommission).await?);
        }
        Ok(details)
    }

    pub async fn list_for_asset(&self, asset_id: Uuid) -> Result<Vec<DecommissionDetail>, AppError> {
        let mut uow = self.store.begin().await?;
        let asset = load_asset(&mut *uow, asset_id).await?;
        let decommissions = uow.list_decommissions_for_asset(asset_id).await?;
        Ok(decommissions
            .into_iter()
            .map(|d| DecommissionDetail::new(d, Some(asset.acquisition_value)))
            .collect())
    }
}

async fn load_decommission(uow: &mut dyn UnitOfWork, id: Uuid) -> Result<Decommission, AppError> {
    uow.find_decommission(id)
        .await?
        .ok_or(AppError::NotFound { entity: "Baixa", id })
}

async fn detail_of(
    uow: &mut dyn UnitOfWork,
    decommission: Decommission,
) -> Result<DecommissionDetail, AppError> {
    let acquisition_value = uow
        .find_asset(decommission.asset_id)
        .await?
        .map(|a| a.acquisition_value);
    Ok(DecommissionDetail::new(decommission, acquisition_value))
}
