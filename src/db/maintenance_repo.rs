// src/db/maintenance_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::maintenance::Maintenance};

#[derive(Clone, Copy, Debug, Default)]
pub struct MaintenanceRepository;

impl MaintenanceRepository {
    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Maintenance>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maintenance = sqlx::query_as::<_, Maintenance>("SELECT * FROM maintenances WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(maintenance)
    }

    pub async fn list_for_asset<'e, E>(&self, executor: E, asset_id: Uuid) -> Result<Vec<Maintenance>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maintenances = sqlx::query_as::<_, Maintenance>(
            "SELECT * FROM maintenances WHERE asset_id = $1 ORDER BY start_date DESC, created_at DESC",
        )
        .bind(asset_id)
        .fetch_all(executor)
        .await?;
        Ok(maintenances)
    }

    pub async fn insert<'e, E>(&self, executor: E, m: &Maintenance) -> Result<Maintenance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let maintenance = sqlx::query_as::<_, Maintenance>(
            r#"
            INSERT INTO maintenances (
                id, asset_id, maintenance_type, description, start_date, end_date,
                cost, status, priority, technician, root_cause, solution_applied,
                recommendations, observations, version, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(m.id)
        .bind(m.asset_id)
        .bind(m.maintenance_type)
        .bind(&m.description)
        .bind(m.start_date)
        .bind(m.end_date)
        .bind(m.cost)
        .bind(m.status)
        .bind(m.priority)
        .bind(&m.technician)
        .bind(&m.root_cause)
        .bind(&m.solution_applied)
        .bind(&m.recommendations)
        .bind(&m.observations)
        .bind(m.version)
        .bind(m.created_at)
        .bind(m.updated_at)
        .fetch_one(executor)
        .await?;
        Ok(maintenance)
    }

    pub async fn update<'e, E>(&self, executor: E, m: &Maintenance) -> Result<Maintenance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let updated = sqlx::query_as::<_, Maintenance>(
            r#"
            UPDATE maintenances SET
                description = $3,
                end_date = $4,
                cost = $5,
                status = $6,
                priority = $7,
                technician = $8,
                root_cause = $9,
                solution_applied = $10,
                recommendations = $11,
                observations = $12,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING *
            "#,
        )
        .bind(m.id)
        .bind(m.version)
        .bind(&m.description)
        .bind(m.end_date)
        .bind(m.cost)
        .bind(m.status)
        .bind(m.priority)
        .bind(&m.technician)
        .bind(&m.root_cause)
        .bind(&m.solution_applied)
        .bind(&m.recommendations)
        .bind(&m.observations)
        .fetch_optional(executor)
        .await?;

        updated.ok_or(AppError::StaleVersion { entity: "Manutenção", id: m.id })
    }

    pub async fn delete<'e, E>(&self, executor: E, m: &Maintenance) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM maintenances WHERE id = $1 AND version = $2")
            .bind(m.id)
            .bind(m.version)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::StaleVersion { entity: "Manutenção", id: m.id });
        }
        Ok(())
    }
}
