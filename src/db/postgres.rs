// src/db/postgres.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::{
    AssetRepository, CatalogRepository, DecommissionRepository, MaintenanceRepository, Store,
    UnitOfWork,
};
use crate::{
    common::error::AppError,
    models::{
        asset::{Asset, AssetFilter},
        catalog::{Category, Location},
        decommission::Decommission,
        maintenance::Maintenance,
    },
};

// Armazenamento Postgres: cada unidade de trabalho é uma transação do pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgUnitOfWork {
            tx,
            assets: AssetRepository,
            catalog: CatalogRepository,
            maintenances: MaintenanceRepository,
            decommissions: DecommissionRepository,
        }))
    }
}

// Se for descartada sem commit, o sqlx faz rollback da transação.
struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
    assets: AssetRepository,
    catalog: CatalogRepository,
    maintenances: MaintenanceRepository,
    decommissions: DecommissionRepository,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn find_asset(&mut self, id: Uuid) -> Result<Option<Asset>, AppError> {
        self.assets.find_by_id(&mut *self.tx, id).await
    }

    async fn list_assets(&mut self, filter: &AssetFilter) -> Result<Vec<Asset>, AppError> {
        self.assets.list(&mut *self.tx, filter).await
    }

    async fn tag_number_exists(&mut self, tag_number: &str) -> Result<bool, AppError> {
        self.assets.tag_number_exists(&mut *self.tx, tag_number).await
    }

    async fn serial_number_exists(
        &mut self,
        serial_number: &str,
        except: Option<Uuid>,
    ) -> Result<bool, AppError> {
        self.assets
            .serial_number_exists(&mut *self.tx, serial_number, except)
            .await
    }

    async fn insert_asset(&mut self, asset: &Asset) -> Result<Asset, AppError> {
        self.assets.insert(&mut *self.tx, asset).await
    }

    async fn update_asset(&mut self, asset: &Asset) -> Result<Asset, AppError> {
        self.assets.update(&mut *self.tx, asset).await
    }

    async fn delete_asset(&mut self, asset: &Asset) -> Result<(), AppError> {
        self.assets.delete(&mut *self.tx, asset).await
    }

    async fn find_category(&mut self, id: Uuid) -> Result<Option<Category>, AppError> {
        self.catalog.find_category(&mut *self.tx, id).await
    }

    async fn list_categories(&mut self) -> Result<Vec<Category>, AppError> {
        self.catalog.list_categories(&mut *self.tx).await
    }

    async fn insert_category(&mut self, category: &Category) -> Result<Category, AppError> {
        self.catalog.insert_category(&mut *self.tx, category).await
    }

    async fn delete_category(&mut self, category: &Category) -> Result<(), AppError> {
        self.catalog.delete_category(&mut *self.tx, category).await
    }

    async fn count_assets_in_category(&mut self, category_id: Uuid) -> Result<i64, AppError> {
        self.assets.count_by_category(&mut *self.tx, category_id).await
    }

    async fn find_location(&mut self, id: Uuid) -> Result<Option<Location>, AppError> {
        self.catalog.find_location(&mut *self.tx, id).await
    }

    async fn list_locations(&mut self) -> Result<Vec<Location>, AppError> {
        self.catalog.list_locations(&mut *self.tx).await
    }

    async fn insert_location(&mut self, location: &Location) -> Result<Location, AppError> {
        self.catalog.insert_location(&mut *self.tx, location).await
    }

    async fn delete_location(&mut self, location: &Location) -> Result<(), AppError> {
        self.catalog.delete_location(&mut *self.tx, location).await
    }

    async fn count_assets_in_location(&mut self, location_id: Uuid) -> Result<i64, AppError> {
        self.assets.count_by_location(&mut *self.tx, location_id).await
    }

    async fn find_maintenance(&mut self, id: Uuid) -> Result<Option<Maintenance>, AppError> {
        self.maintenances.find_by_id(&mut *self.tx, id).await
    }

    async fn list_maintenances_for_asset(&mut self, asset_id: Uuid) -> Result<Vec<Maintenance>, AppError> {
        self.maintenances.list_for_asset(&mut *self.tx, asset_id).await
    }

    async fn insert_maintenance(&mut self, maintenance: &Maintenance) -> Result<Maintenance, AppError> {
        self.maintenances.insert(&mut *self.tx, maintenance).await
    }

    async fn update_maintenance(&mut self, maintenance: &Maintenance) -> Result<Maintenance, AppError> {
        self.maintenances.update(&mut *self.tx, maintenance).await
    }

    async fn delete_maintenance(&mut self, maintenance: &Maintenance) -> Result<(), AppError> {
        self.maintenances.delete(&mut *self.tx, maintenance).await
    }

    async fn find_decommission(&mut self, id: Uuid) -> Result<Option<Decommission>, AppError> {
        self.decommissions.find_by_id(&mut *self.tx, id).await
    }

    async fn list_decommissions(&mut self) -> Result<Vec<Decommission>, AppError> {
        self.decommissions.list(&mut *self.tx).await
    }

    async fn list_decommissions_for_asset(&mut self, asset_id: Uuid) -> Result<Vec<Decommission>, AppError> {
        self.decommissions.list_for_asset(&mut *self.tx, asset_id).await
    }

    async fn count_decommissions_for_asset(&mut self, asset_id: Uuid) -> Result<i64, AppError> {
        self.decommissions.count_for_asset(&mut *self.tx, asset_id).await
    }

    async fn insert_decommission(&mut self, decommission: &Decommission) -> Result<Decommission, AppError> {
        self.decommissions.insert(&mut *self.tx, decommission).await
    }

    async fn update_decommission(&mut self, decommission: &Decommission) -> Result<Decommission, AppError> {
        self.decommissions.update(&mut *self.tx, decommission).await
    }

    async fn delete_decommission(&mut self, decommission: &Decommission) -> Result<(), AppError> {
        self.decommissions.delete(&mut *self.tx, decommission).await
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let PgUnitOfWork { tx, .. } = *self;
        tx.commit().await?;
        Ok(())
    }
}
