// src/db.rs

pub mod asset_repo;
pub use asset_repo::AssetRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod maintenance_repo;
pub use maintenance_repo::MaintenanceRepository;
pub mod decommission_repo;
pub use decommission_repo::DecommissionRepository;

pub mod postgres;
pub use postgres::PgStore;
pub mod memory;
pub use memory::MemoryStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        asset::{Asset, AssetFilter},
        catalog::{Category, Location},
        decommission::Decommission,
        maintenance::Maintenance,
    },
};

/// Fonte de unidades de trabalho (uma transação por operação).
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError>;
}

/// Uma transação sobre o armazenamento.
///
/// Toda escrita de `update_*`/`delete_*` compara a `version` do registro recebido
/// com a gravada e falha com `AppError::StaleVersion` se divergirem. `update_*`
/// devolve o registro com a versão incrementada. Descartar a unidade sem
/// `commit` desfaz tudo.
#[async_trait]
pub trait UnitOfWork: Send {
    // --- Bens ---
    async fn find_asset(&mut self, id: Uuid) -> Result<Option<Asset>, AppError>;
    async fn list_assets(&mut self, filter: &AssetFilter) -> Result<Vec<Asset>, AppError>;
    async fn tag_number_exists(&mut self, tag_number: &str) -> Result<bool, AppError>;
    async fn serial_number_exists(
        &mut self,
        serial_number: &str,
        except: Option<Uuid>,
    ) -> Result<bool, AppError>;
    async fn insert_asset(&mut self, asset: &Asset) -> Result<Asset, AppError>;
    async fn update_asset(&mut self, asset: &Asset) -> Result<Asset, AppError>;
    /// Remove o bem e, em cascata, suas manutenções.
    async fn delete_asset(&mut self, asset: &Asset) -> Result<(), AppError>;

    // --- Categorias ---
    async fn find_category(&mut self, id: Uuid) -> Result<Option<Category>, AppError>;
    async fn list_categories(&mut self) -> Result<Vec<Category>, AppError>;
    async fn insert_category(&mut self, category: &Category) -> Result<Category, AppError>;
    async fn delete_category(&mut self, category: &Category) -> Result<(), AppError>;
    async fn count_assets_in_category(&mut self, category_id: Uuid) -> Result<i64, AppError>;

    // --- Localizações ---
    async fn find_location(&mut self, id: Uuid) -> Result<Option<Location>, AppError>;
    async fn list_locations(&mut self) -> Result<Vec<Location>, AppError>;
    async fn insert_location(&mut self, location: &Location) -> Result<Location, AppError>;
    async fn delete_location(&mut self, location: &Location) -> Result<(), AppError>;
    async fn count_assets_in_location(&mut self, location_id: Uuid) -> Result<i64, AppError>;

    // --- Manutenções ---
    async fn find_maintenance(&mut self, id: Uuid) -> Result<Option<Maintenance>, AppError>;
    async fn list_maintenances_for_asset(&mut self, asset_id: Uuid) -> Result<Vec<Maintenance>, AppError>;
    async fn insert_maintenance(&mut self, maintenance: &Maintenance) -> Result<Maintenance, AppError>;
    async fn update_maintenance(&mut self, maintenance: &Maintenance) -> Result<Maintenance, AppError>;
    async fn delete_maintenance(&mut self, maintenance: &Maintenance) -> Result<(), AppError>;

    // --- Baixas ---
    async fn find_decommission(&mut self, id: Uuid) -> Result<Option<Decommission>, AppError>;
    async fn list_decommissions(&mut self) -> Result<Vec<Decommission>, AppError>;
    async fn list_decommissions_for_asset(&mut self, asset_id: Uuid) -> Result<Vec<Decommission>, AppError>;
    async fn count_decommissions_for_asset(&mut self, asset_id: Uuid) -> Result<i64, AppError>;
    async fn insert_decommission(&mut self, decommission: &Decommission) -> Result<Decommission, AppError>;
    async fn update_decommission(&mut self, decommission: &Decommission) -> Result<Decommission, AppError>;
    async fn delete_decommission(&mut self, decommission: &Decommission) -> Result<(), AppError>;

    async fn commit(self: Box<Self>) -> Result<(), AppError>;
}
