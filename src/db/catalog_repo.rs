// src/db/catalog_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::catalog::{Category, Location},
};

// Categorias e Localizações: dados de referência dos bens.
#[derive(Clone, Copy, Debug, Default)]
pub struct CatalogRepository;

impl CatalogRepository {
    // ---
    // Categorias
    // ---

    pub async fn find_category<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(category)
    }

    pub async fn list_categories<'e, E>(&self, executor: E) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
            .fetch_all(executor)
            .await?;
        Ok(categories)
    }

    pub async fn insert_category<'e, E>(&self, executor: E, category: &Category) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, name, description, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.version)
        .bind(category.created_at)
        .bind(category.updated_at)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            map_unique_violation(e, || format!("Já existe uma categoria chamada '{}'.", category.name))
        })
    }

    pub async fn delete_category<'e, E>(&self, executor: E, category: &Category) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1 AND version = $2")
            .bind(category.id)
            .bind(category.version)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::StaleVersion { entity: "Categoria", id: category.id });
        }
        Ok(())
    }

    // ---
    // Localizações
    // ---

    pub async fn find_location<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Location>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let location = sqlx::query_as::<_, Location>("SELECT * FROM locations WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(location)
    }

    pub async fn list_locations<'e, E>(&self, executor: E) -> Result<Vec<Location>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let locations = sqlx::query_as::<_, Location>("SELECT * FROM locations ORDER BY name ASC")
            .fetch_all(executor)
            .await?;
        Ok(locations)
    }

    pub async fn insert_location<'e, E>(&self, executor: E, location: &Location) -> Result<Location, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Location>(
            r#"
            INSERT INTO locations (id, name, address, responsible, version, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(location.id)
        .bind(&location.name)
        .bind(&location.address)
        .bind(&location.responsible)
        .bind(location.version)
        .bind(location.created_at)
        .bind(location.updated_at)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            map_unique_violation(e, || format!("Já existe uma localização chamada '{}'.", location.name))
        })
    }

    pub async fn delete_location<'e, E>(&self, executor: E, location: &Location) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1 AND version = $2")
            .bind(location.id)
            .bind(location.version)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::StaleVersion { entity: "Localização", id: location.id });
        }
        Ok(())
    }
}
