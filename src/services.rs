// src/services.rs

pub mod asset_service;
pub use asset_service::AssetService;
pub mod catalog_service;
pub use catalog_service::CatalogService;
pub mod maintenance_service;
pub use maintenance_service::MaintenanceService;
pub mod decommission_service;
pub use decommission_service::DecommissionService;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{common::error::AppError, db::UnitOfWork, models::asset::Asset};

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub(crate) async fn load_asset(uow: &mut dyn UnitOfWork, id: Uuid) -> Result<Asset, AppError> {
    uow.find_asset(id)
        .await?
        .ok_or(AppError::NotFound { entity: "Bem", id })
}

/// Versão informada pelo cliente precisa bater com a gravada.
pub(crate) fn check_version(
    entity: &'static str,
    id: Uuid,
    expected: Option<i32>,
    current: i32,
) -> Result<(), AppError> {
    match expected {
        Some(v) if v != current => Err(AppError::StaleVersion { entity, id }),
        _ => Ok(()),
    }
}
