// src/services/catalog_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::Store,
    models::catalog::{
        Category, CategoryDetail, Location, LocationDetail, NewCategory, NewLocation,
    },
};

// Dados de referência: categorias e localizações dos bens.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn Store>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    // ---
    // Categorias
    // ---

    pub async fn create_category(&self, input: NewCategory) -> Result<Category, AppError> {
        if input.name.trim().is_empty() {
            return Err(AppError::validation("O nome é obrigatório."));
        }
        let mut uow = self.store.begin().await?;
        let category = uow.insert_category(&input.into_category(Utc::now())).await?;
        uow.commit().await?;

        tracing::info!(category_id = %category.id, name = %category.name, "Categoria criada");
        Ok(category)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let mut uow = self.store.begin().await?;
        uow.list_categories().await
    }

    pub async fn get_category(&self, id: Uuid) -> Result<CategoryDetail, AppError> {
        let mut uow = self.store.begin().await?;
        let category = uow
            .find_category(id)
            .await?
            .ok_or(AppError::NotFound { entity: "Categoria", id })?;
        let asset_count = uow.count_assets_in_category(id).await?;
        Ok(CategoryDetail { category, asset_count })
    }

    pub async fn delete_category(&self, id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let category = uow
            .find_category(id)
            .await?
            .ok_or(AppError::NotFound { entity: "Categoria", id })?;

        let attached = uow.count_assets_in_category(id).await?;
        if attached > 0 {
            return Err(AppError::conflict(format!(
                "A categoria '{}' possui {attached} bem(ns) vinculado(s).",
                category.name
            )));
        }

        uow.delete_category(&category).await?;
        uow.commit().await?;
        tracing::info!(category_id = %id, "Categoria excluída");
        Ok(())
    }

    // ---
    // Localizações
    // ---

    pub async fn create_location(&self, input: NewLocation) -> Result<Location, AppError> {
        if input.name.trim().is_empty() {
            return Err(AppError::validation("O nome é obrigatório."));
        }
        let mut uow = self.store.begin().await?;
        let location = uow.insert_location(&input.into_location(Utc::now())).await?;
        uow.commit().await?;

        tracing::info!(location_id = %location.id, name = %location.name, "Localização criada");
        Ok(location)
    }

    pub async fn list_locations(&self) -> Result<Vec<Location>, AppError> {
        let mut uow = self.store.begin().await?;
        uow.list_locations().await
    }

    pub async fn get_location(&self, id: Uuid) -> Result<LocationDetail, AppError> {
        let mut uow = self.store.begin().await?;
        let location = uow
            .find_location(id)
            .await?
            .ok_or(AppError::NotFound { entity: "Localização", id })?;
        let asset_count = uow.count_assets_in_location(id).await?;
        Ok(LocationDetail { location, asset_count })
    }

    pub async fn delete_location(&self, id: Uuid) -> Result<(), AppError> {
        let mut uow = self.store.begin().await?;
        let location = uow
            .find_location(id)
            .await?
            .ok_or(AppError::NotFound { entity: "Localização", id })?;

        let attached = uow.count_assets_in_location(id).await?;
        if attached > 0 {
            return Err(AppError::conflict(format!(
                "A localização '{}' possui {attached} bem(ns) vinculado(s).",
                location.name
            )));
        }

        uow.delete_location(&location).await?;
        uow.commit().await?;
        tracing::info!(location_id = %id, "Localização excluída");
        Ok(())
    }
}
