// src/db/asset_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::{map_unique_violation, AppError},
    models::asset::{Asset, AssetFilter},
};

// Repositório da tabela 'assets'. Sem estado: recebe o executor (conexão ou transação).
#[derive(Clone, Copy, Debug, Default)]
pub struct AssetRepository;

fn duplicate_message(asset: &Asset, constraint: Option<&str>) -> String {
    match constraint {
        Some(c) if c.contains("serial") => format!(
            "Já existe um bem com o número de série '{}'.",
            asset.serial_number.as_deref().unwrap_or_default()
        ),
        _ => format!("Já existe um bem com o número de patrimônio '{}'.", asset.tag_number),
    }
}

fn constraint_of(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db_err) => db_err.constraint().map(str::to_string),
        _ => None,
    }
}

impl AssetRepository {
    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Asset>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let asset = sqlx::query_as::<_, Asset>("SELECT * FROM assets WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(asset)
    }

    pub async fn list<'e, E>(&self, executor: E, filter: &AssetFilter) -> Result<Vec<Asset>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Filtros opcionais: NULL desliga a condição
        let assets = sqlx::query_as::<_, Asset>(
            r#"
            SELECT * FROM assets
            WHERE ($1::asset_status IS NULL OR status = $1)
              AND ($2::uuid IS NULL OR category_id = $2)
              AND ($3::uuid IS NULL OR location_id = $3)
            ORDER BY tag_number ASC
            "#,
        )
        .bind(filter.status)
        .bind(filter.category_id)
        .bind(filter.location_id)
        .fetch_all(executor)
        .await?;
        Ok(assets)
    }

    pub async fn tag_number_exists<'e, E>(&self, executor: E, tag_number: &str) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM assets WHERE tag_number = $1)",
        )
        .bind(tag_number)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    pub async fn serial_number_exists<'e, E>(
        &self,
        executor: E,
        serial_number: &str,
        except: Option<Uuid>,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM assets
                WHERE serial_number = $1 AND ($2::uuid IS NULL OR id <> $2)
            )
            "#,
        )
        .bind(serial_number)
        .bind(except)
        .fetch_one(executor)
        .await?;
        Ok(exists)
    }

    pub async fn count_by_category<'e, E>(&self, executor: E, category_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM assets WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    pub async fn count_by_location<'e, E>(&self, executor: E, location_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM assets WHERE location_id = $1")
            .bind(location_id)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    pub async fn insert<'e, E>(&self, executor: E, asset: &Asset) -> Result<Asset, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Asset>(
            r#"
            INSERT INTO assets (
                id, tag_number, serial_number, name, description,
                acquisition_date, acquisition_value, current_value,
                status, condition, category_id, location_id,
                last_maintenance_date, next_maintenance_date, active, observations,
                version, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(asset.id)
        .bind(&asset.tag_number)
        .bind(&asset.serial_number)
        .bind(&asset.name)
        .bind(&asset.description)
        .bind(asset.acquisition_date)
        .bind(asset.acquisition_value)
        .bind(asset.current_value)
        .bind(asset.status)
        .bind(asset.condition)
        .bind(asset.category_id)
        .bind(asset.location_id)
        .bind(asset.last_maintenance_date)
        .bind(asset.next_maintenance_date)
        .bind(asset.active)
        .bind(&asset.observations)
        .bind(asset.version)
        .bind(asset.created_at)
        .bind(asset.updated_at)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            let constraint = constraint_of(&e);
            map_unique_violation(e, || duplicate_message(asset, constraint.as_deref()))
        })
    }

    /// UPDATE com verificação otimista: só grava se a versão ainda for a lida.
    pub async fn update<'e, E>(&self, executor: E, asset: &Asset) -> Result<Asset, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Asset>(
            r#"
            UPDATE assets SET
                serial_number = $3,
                name = $4,
                description = $5,
                current_value = $6,
                status = $7,
                condition = $8,
                category_id = $9,
                location_id = $10,
                last_maintenance_date = $11,
                next_maintenance_date = $12,
                active = $13,
                observations = $14,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING *
            "#,
        )
        .bind(asset.id)
        .bind(asset.version)
        .bind(&asset.serial_number)
        .bind(&asset.name)
        .bind(&asset.description)
        .bind(asset.current_value)
        .bind(asset.status)
        .bind(asset.condition)
        .bind(asset.category_id)
        .bind(asset.location_id)
        .bind(asset.last_maintenance_date)
        .bind(asset.next_maintenance_date)
        .bind(asset.active)
        .bind(&asset.observations)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            let constraint = constraint_of(&e);
            map_unique_violation(e, || duplicate_message(asset, constraint.as_deref()))
        })?;

        updated.ok_or(AppError::StaleVersion { entity: "Bem", id: asset.id })
    }

    pub async fn delete<'e, E>(&self, executor: E, asset: &Asset) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Manutenções saem junto (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM assets WHERE id = $1 AND version = $2")
            .bind(asset.id)
            .bind(asset.version)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::StaleVersion { entity: "Bem", id: asset.id });
        }
        Ok(())
    }
}
