// src/db/memory.rs

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Store, UnitOfWork};
use crate::{
    common::error::AppError,
    models::{
        asset::{Asset, AssetFilter},
        catalog::{Category, Location},
        decommission::Decommission,
        maintenance::Maintenance,
    },
};

// ---
// Armazenamento em memória (desenvolvimento local e testes).
// Mesma semântica do Postgres: unicidade, versão otimista e commit atômico.
// ---

#[derive(Debug, Clone, Default)]
struct Tables {
    assets: HashMap<Uuid, Asset>,
    categories: HashMap<Uuid, Category>,
    locations: HashMap<Uuid, Location>,
    maintenances: HashMap<Uuid, Maintenance>,
    decommissions: HashMap<Uuid, Decommission>,
}

trait Row: Clone + Send + Sync + 'static {
    const ENTITY: &'static str;

    fn id(&self) -> Uuid;
    fn version(&self) -> i32;
    fn bump(&mut self);
    fn table(tables: &Tables) -> &HashMap<Uuid, Self>;
    fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, Self>;

    // Equivalente às UNIQUE constraints
    fn check_unique(&self, _tables: &Tables) -> Result<(), AppError> {
        Ok(())
    }

    // Equivalente a ON DELETE CASCADE / FOREIGN KEY
    fn on_delete(_tables: &mut Tables, _id: Uuid) -> Result<(), AppError> {
        Ok(())
    }
}

macro_rules! versioned_row {
    ($ty:ty, $field:ident) => {
        fn id(&self) -> Uuid {
            self.id
        }

        fn version(&self) -> i32 {
            self.version
        }

        fn bump(&mut self) {
            self.version += 1;
            self.updated_at = Utc::now();
        }

        fn table(tables: &Tables) -> &HashMap<Uuid, $ty> {
            &tables.$field
        }

        fn table_mut(tables: &mut Tables) -> &mut HashMap<Uuid, $ty> {
            &mut tables.$field
        }
    };
}

impl Row for Asset {
    const ENTITY: &'static str = "Bem";
    versioned_row!(Asset, assets);

    fn check_unique(&self, tables: &Tables) -> Result<(), AppError> {
        for other in tables.assets.values().filter(|a| a.id != self.id) {
            if other.tag_number == self.tag_number {
                return Err(AppError::conflict(format!(
                    "Já existe um bem com o número de patrimônio '{}'.",
                    self.tag_number
                )));
            }
            if self.serial_number.is_some() && other.serial_number == self.serial_number {
                return Err(AppError::conflict(format!(
                    "Já existe um bem com o número de série '{}'.",
                    self.serial_number.as_deref().unwrap_or_default()
                )));
            }
        }
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: Uuid) -> Result<(), AppError> {
        if tables.decommissions.values().any(|d| d.asset_id == id) {
            return Err(AppError::conflict("O bem possui baixa registrada e não pode ser excluído."));
        }
        tables.maintenances.retain(|_, m| m.asset_id != id);
        Ok(())
    }
}

impl Row for Category {
    const ENTITY: &'static str = "Categoria";
    versioned_row!(Category, categories);

    fn check_unique(&self, tables: &Tables) -> Result<(), AppError> {
        if tables.categories.values().any(|c| c.id != self.id && c.name == self.name) {
            return Err(AppError::conflict(format!(
                "Já existe uma categoria chamada '{}'.",
                self.name
            )));
        }
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: Uuid) -> Result<(), AppError> {
        if tables.assets.values().any(|a| a.category_id == id) {
            return Err(AppError::conflict("A categoria possui bens vinculados."));
        }
        Ok(())
    }
}

impl Row for Location {
    const ENTITY: &'static str = "Localização";
    versioned_row!(Location, locations);

    fn check_unique(&self, tables: &Tables) -> Result<(), AppError> {
        if tables.locations.values().any(|l| l.id != self.id && l.name == self.name) {
            return Err(AppError::conflict(format!(
                "Já existe uma localização chamada '{}'.",
                self.name
            )));
        }
        Ok(())
    }

    fn on_delete(tables: &mut Tables, id: Uuid) -> Result<(), AppError> {
        if tables.assets.values().any(|a| a.location_id == id) {
            return Err(AppError::conflict("A localização possui bens vinculados."));
        }
        Ok(())
    }
}

impl Row for Maintenance {
    const ENTITY: &'static str = "Manutenção";
    versioned_row!(Maintenance, maintenances);
}

impl Row for Decommission {
    const ENTITY: &'static str = "Baixa";
    versioned_row!(Decommission, decommissions);
}

fn insert_row<T: Row>(tables: &mut Tables, row: &T) -> Result<(), AppError> {
    if T::table(tables).contains_key(&row.id()) {
        return Err(AppError::conflict(format!("{} {} já existe.", T::ENTITY, row.id())));
    }
    row.check_unique(tables)?;
    T::table_mut(tables).insert(row.id(), row.clone());
    Ok(())
}

fn ensure_version<T: Row>(tables: &Tables, id: Uuid, expected: i32) -> Result<(), AppError> {
    match T::table(tables).get(&id) {
        Some(current) if current.version() == expected => Ok(()),
        _ => Err(AppError::StaleVersion { entity: T::ENTITY, id }),
    }
}

fn update_row<T: Row>(tables: &mut Tables, expected: i32, row: &T) -> Result<(), AppError> {
    ensure_version::<T>(tables, row.id(), expected)?;
    row.check_unique(tables)?;
    T::table_mut(tables).insert(row.id(), row.clone());
    Ok(())
}

fn delete_row<T: Row>(tables: &mut Tables, id: Uuid, expected: i32) -> Result<(), AppError> {
    ensure_version::<T>(tables, id, expected)?;
    T::on_delete(tables, id)?;
    T::table_mut(tables).remove(&id);
    Ok(())
}

fn sorted_by<T, K: Ord>(mut rows: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    rows.sort_by_key(key);
    rows
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, AppError> {
        let snapshot = self.tables.lock().await.clone();
        Ok(Box::new(MemoryUnitOfWork {
            live: Arc::clone(&self.tables),
            snapshot,
            log: Vec::new(),
        }))
    }
}

type Op = Box<dyn Fn(&mut Tables) -> Result<(), AppError> + Send>;

// Lê e escreve numa cópia; no commit, repete o log sobre o estado atual
// (revalidando versões e unicidade) e só então publica.
struct MemoryUnitOfWork {
    live: Arc<Mutex<Tables>>,
    snapshot: Tables,
    log: Vec<Op>,
}

impl MemoryUnitOfWork {
    fn record<F>(&mut self, op: F) -> Result<(), AppError>
    where
        F: Fn(&mut Tables) -> Result<(), AppError> + Send + 'static,
    {
        op(&mut self.snapshot)?;
        self.log.push(Box::new(op));
        Ok(())
    }

    fn insert<T: Row>(&mut self, row: &T) -> Result<T, AppError> {
        let row = row.clone();
        let stored = row.clone();
        self.record(move |tables| insert_row(tables, &row))?;
        Ok(stored)
    }

    fn update<T: Row>(&mut self, row: &T) -> Result<T, AppError> {
        let expected = row.version();
        let mut next = row.clone();
        next.bump();
        let stored = next.clone();
        self.record(move |tables| update_row(tables, expected, &next))?;
        Ok(stored)
    }

    fn delete<T: Row>(&mut self, row: &T) -> Result<(), AppError> {
        let (id, expected) = (row.id(), row.version());
        self.record(move |tables| delete_row::<T>(tables, id, expected))
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn find_asset(&mut self, id: Uuid) -> Result<Option<Asset>, AppError> {
        Ok(self.snapshot.assets.get(&id).cloned())
    }

    async fn list_assets(&mut self, filter: &AssetFilter) -> Result<Vec<Asset>, AppError> {
        let rows = self
            .snapshot
            .assets
            .values()
            .filter(|a| filter.matches(a))
            .cloned()
            .collect();
        Ok(sorted_by(rows, |a: &Asset| a.tag_number.clone()))
    }

    async fn tag_number_exists(&mut self, tag_number: &str) -> Result<bool, AppError> {
        Ok(self.snapshot.assets.values().any(|a| a.tag_number == tag_number))
    }

    async fn serial_number_exists(
        &mut self,
        serial_number: &str,
        except: Option<Uuid>,
    ) -> Result<bool, AppError> {
        Ok(self.snapshot.assets.values().any(|a| {
            a.serial_number.as_deref() == Some(serial_number) && Some(a.id) != except
        }))
    }

    async fn insert_asset(&mut self, asset: &Asset) -> Result<Asset, AppError> {
        self.insert(asset)
    }

    async fn update_asset(&mut self, asset: &Asset) -> Result<Asset, AppError> {
        self.update(asset)
    }

    async fn delete_asset(&mut self, asset: &Asset) -> Result<(), AppError> {
        self.delete(asset)
    }

    async fn find_category(&mut self, id: Uuid) -> Result<Option<Category>, AppError> {
        Ok(self.snapshot.categories.get(&id).cloned())
    }

    async fn list_categories(&mut self) -> Result<Vec<Category>, AppError> {
        let rows = self.snapshot.categories.values().cloned().collect();
        Ok(sorted_by(rows, |c: &Category| c.name.clone()))
    }

    async fn insert_category(&mut self, category: &Category) -> Result<Category, AppError> {
        self.insert(category)
    }

    async fn delete_category(&mut self, category: &Category) -> Result<(), AppError> {
        self.delete(category)
    }

    async fn count_assets_in_category(&mut self, category_id: Uuid) -> Result<i64, AppError> {
        let count = self
            .snapshot
            .assets
            .values()
            .filter(|a| a.category_id == category_id)
            .count();
        Ok(count as i64)
    }

    async fn find_location(&mut self, id: Uuid) -> Result<Option<Location>, AppError> {
        Ok(self.snapshot.locations.get(&id).cloned())
    }

    async fn list_locations(&mut self) -> Result<Vec<Location>, AppError> {
        let rows = self.snapshot.locations.values().cloned().collect();
        Ok(sorted_by(rows, |l: &Location| l.name.clone()))
    }

    async fn insert_location(&mut self, location: &Location) -> Result<Location, AppError> {
        self.insert(location)
    }

    async fn delete_location(&mut self, location: &Location) -> Result<(), AppError> {
        self.delete(location)
    }

    async fn count_assets_in_location(&mut self, location_id: Uuid) -> Result<i64, AppError> {
        let count = self
            .snapshot
            .assets
            .values()
            .filter(|a| a.location_id == location_id)
            .count();
        Ok(count as i64)
    }

    async fn find_maintenance(&mut self, id: Uuid) -> Result<Option<Maintenance>, AppError> {
        Ok(self.snapshot.maintenances.get(&id).cloned())
    }

    async fn list_maintenances_for_asset(&mut self, asset_id: Uuid) -> Result<Vec<Maintenance>, AppError> {
        let rows = self
            .snapshot
            .maintenances
            .values()
            .filter(|m| m.asset_id == asset_id)
            .cloned()
            .collect();
        // start_date DESC, created_at DESC
        Ok(sorted_by(rows, |m: &Maintenance| {
            std::cmp::Reverse((m.start_date, m.created_at))
        }))
    }

    async fn insert_maintenance(&mut self, maintenance: &Maintenance) -> Result<Maintenance, AppError> {
        if !self.snapshot.assets.contains_key(&maintenance.asset_id) {
            return Err(AppError::NotFound { entity: "Bem", id: maintenance.asset_id });
        }
        self.insert(maintenance)
    }

    async fn update_maintenance(&mut self, maintenance: &Maintenance) -> Result<Maintenance, AppError> {
        self.update(maintenance)
    }

    async fn delete_maintenance(&mut self, maintenance: &Maintenance) -> Result<(), AppError> {
        self.delete(maintenance)
    }

    async fn find_decommission(&mut self, id: Uuid) -> Result<Option<Decommission>, AppError> {
        Ok(self.snapshot.decommissions.get(&id).cloned())
    }

    async fn list_decommissions(&mut self) -> Result<Vec<Decommission>, AppError> {
        let rows = self.snapshot.decommissions.values().cloned().collect();
        Ok(sorted_by(rows, |d: &Decommission| {
            std::cmp::Reverse((d.decommission_date, d.created_at))
        }))
    }

    async fn list_decommissions_for_asset(&mut self, asset_id: Uuid) -> Result<Vec<Decommission>, AppError> {
        let rows = self
            .snapshot
            .decommissions
            .values()
            .filter(|d| d.asset_id == asset_id)
            .cloned()
            .collect();
        Ok(sorted_by(rows, |d: &Decommission| {
            std::cmp::Reverse((d.decommission_date, d.created_at))
        }))
    }

    async fn count_decommissions_for_asset(&mut self, asset_id: Uuid) -> Result<i64, AppError> {
        let count = self
            .snapshot
            .decommissions
            .values()
            .filter(|d| d.asset_id == asset_id)
            .count();
        Ok(count as i64)
    }

    async fn insert_decommission(&mut self, decommission: &Decommission) -> Result<Decommission, AppError> {
        if !self.snapshot.assets.contains_key(&decommission.asset_id) {
            return Err(AppError::NotFound { entity: "Bem", id: decommission.asset_id });
        }
        self.insert(decommission)
    }

    async fn update_decommission(&mut self, decommission: &Decommission) -> Result<Decommission, AppError> {
        self.update(decommission)
    }

    async fn delete_decommission(&mut self, decommission: &Decommission) -> Result<(), AppError> {
        self.delete(decommission)
    }

    async fn commit(self: Box<Self>) -> Result<(), AppError> {
        let MemoryUnitOfWork { live, log, .. } = *self;
        let mut live = live.lock().await;

        // Tudo ou nada: aplica numa cópia e só publica se nenhuma operação falhar
        let mut next = live.clone();
        for op in &log {
            op(&mut next)?;
        }
        *live = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::asset::tests::sample_asset;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn update_bumps_version_and_commit_publishes() {
        let store = MemoryStore::new();
        let asset = sample_asset();

        let mut uow = store.begin().await.unwrap();
        uow.insert_asset(&asset).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        let mut loaded = uow.find_asset(asset.id).await.unwrap().unwrap();
        loaded.name = "Renomeado".into();
        let saved = uow.update_asset(&loaded).await.unwrap();
        assert_eq!(saved.version, 1);
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        let reloaded = uow.find_asset(asset.id).await.unwrap().unwrap();
        assert_eq!(reloaded.name, "Renomeado");
        assert_eq!(reloaded.version, 1);
    }

    #[tokio::test]
    async fn concurrent_writer_loses_with_stale_version() {
        let store = MemoryStore::new();
        let asset = sample_asset();
        let mut uow = store.begin().await.unwrap();
        uow.insert_asset(&asset).await.unwrap();
        uow.commit().await.unwrap();

        let mut first = store.begin().await.unwrap();
        let mut second = store.begin().await.unwrap();

        let mut a = first.find_asset(asset.id).await.unwrap().unwrap();
        let mut b = second.find_asset(asset.id).await.unwrap().unwrap();
        a.name = "Primeiro".into();
        b.name = "Segundo".into();

        first.update_asset(&a).await.unwrap();
        second.update_asset(&b).await.unwrap();

        first.commit().await.unwrap();
        let err = second.commit().await.unwrap_err();
        assert_matches!(err, AppError::StaleVersion { entity: "Bem", .. });
        assert!(err.is_conflict());

        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.find_asset(asset.id).await.unwrap().unwrap().name, "Primeiro");
    }

    #[tokio::test]
    async fn dropped_unit_of_work_applies_nothing() {
        let store = MemoryStore::new();
        let asset = sample_asset();
        {
            let mut uow = store.begin().await.unwrap();
            uow.insert_asset(&asset).await.unwrap();
        }
        let mut uow = store.begin().await.unwrap();
        assert!(uow.find_asset(asset.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_tag_number_is_a_conflict() {
        let store = MemoryStore::new();
        let asset = sample_asset();
        let mut twin = sample_asset();
        twin.tag_number = asset.tag_number.clone();

        let mut uow = store.begin().await.unwrap();
        uow.insert_asset(&asset).await.unwrap();
        let err = uow.insert_asset(&twin).await.unwrap_err();
        assert_matches!(err, AppError::Conflict(_));
    }

    #[tokio::test]
    async fn stale_update_inside_unit_of_work_is_rejected() {
        let store = MemoryStore::new();
        let asset = sample_asset();
        let mut uow = store.begin().await.unwrap();
        uow.insert_asset(&asset).await.unwrap();
        uow.update_asset(&asset).await.unwrap();
        // `asset` ainda carrega a versão 0
        assert_matches!(
            uow.update_asset(&asset).await,
            Err(AppError::StaleVersion { .. })
        );
    }
}
