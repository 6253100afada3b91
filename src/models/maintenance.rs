// src/models/maintenance.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{error::AppError, money};

pub const DEFAULT_PRIORITY: i16 = 5;
pub const PRIORITY_RANGE: std::ops::RangeInclusive<i16> = 1..=10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "maintenance_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceType {
    Preventive,
    Corrective,
    Specialized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "maintenance_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceStatus {
    Scheduled,
    Active,
    Finished,
    Cancelled,
}

impl MaintenanceStatus {
    pub fn allowed_targets(self) -> &'static [MaintenanceStatus] {
        match self {
            MaintenanceStatus::Scheduled => &[
                MaintenanceStatus::Active,
                MaintenanceStatus::Finished,
                MaintenanceStatus::Cancelled,
            ],
            MaintenanceStatus::Active => &[MaintenanceStatus::Finished, MaintenanceStatus::Cancelled],
            MaintenanceStatus::Finished | MaintenanceStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, target: MaintenanceStatus) -> bool {
        self.allowed_targets().contains(&target)
    }

    /// Em aberto = agendada ou em execução. Só essas podem ser finalizadas ou canceladas.
    pub fn is_open(self) -> bool {
        matches!(self, MaintenanceStatus::Scheduled | MaintenanceStatus::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "SCHEDULED",
            MaintenanceStatus::Active => "ACTIVE",
            MaintenanceStatus::Finished => "FINISHED",
            MaintenanceStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Maintenance {
    pub id: Uuid,
    pub asset_id: Uuid,
    pub maintenance_type: MaintenanceType,
    #[schema(example = "Troca do cooler e limpeza interna")]
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[schema(example = "150.00")]
    pub cost: Option<Decimal>,
    pub status: MaintenanceStatus,
    #[schema(example = 5)]
    pub priority: i16,
    pub technician: Option<String>,
    pub root_cause: Option<String>,
    pub solution_applied: Option<String>,
    pub recommendations: Option<String>,
    pub observations: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Maintenance {
    fn move_to(&mut self, target: MaintenanceStatus) -> Result<(), AppError> {
        if !self.status.can_transition_to(target) {
            return Err(AppError::conflict(format!(
                "Manutenção {} está {} e não pode passar para {}.",
                self.id, self.status, target
            )));
        }
        self.status = target;
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), AppError> {
        self.move_to(MaintenanceStatus::Active)
    }

    pub fn finish(&mut self, input: &FinishMaintenance) -> Result<(), AppError> {
        if !self.status.is_open() {
            return Err(AppError::conflict(format!(
                "Apenas manutenções em aberto podem ser finalizadas (atual: {}).",
                self.status
            )));
        }
        input.validate_rules(self.start_date)?;

        self.move_to(MaintenanceStatus::Finished)?;
        self.end_date = Some(input.end_date);
        self.solution_applied = input.solution_applied.clone();
        self.recommendations = input.recommendations.clone();
        if let Some(root_cause) = &input.root_cause {
            self.root_cause = Some(root_cause.clone());
        }
        if let Some(cost) = input.cost {
            self.cost = Some(money::normalize(cost));
        }
        Ok(())
    }

    pub fn cancel(&mut self, reason: &str) -> Result<(), AppError> {
        if !self.status.is_open() {
            return Err(AppError::conflict(format!(
                "Apenas manutenções em aberto podem ser canceladas (atual: {}).",
                self.status
            )));
        }
        if reason.trim().is_empty() {
            return Err(AppError::validation("O motivo do cancelamento é obrigatório."));
        }
        self.move_to(MaintenanceStatus::Cancelled)?;
        self.append_observation(&format!("Cancelada: {}", reason.trim()));
        Ok(())
    }

    pub fn ensure_deletable(&self) -> Result<(), AppError> {
        if self.status.is_open() {
            return Err(AppError::conflict(
                "Não é possível excluir uma manutenção em aberto; finalize ou cancele antes.",
            ));
        }
        Ok(())
    }

    // Não destrutivo: preserva as observações anteriores
    fn append_observation(&mut self, text: &str) {
        self.observations = Some(match self.observations.take() {
            Some(prev) if !prev.is_empty() => format!("{prev}\n{text}"),
            _ => text.to_string(),
        });
    }
}

// ---
// Entrada: agendamento
// ---
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewMaintenance {
    pub maintenance_type: MaintenanceType,
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,
    #[validate(required(message = "O campo 'startDate' é obrigatório."))]
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub cost: Option<Decimal>,
    #[validate(range(min = 1, max = 10, message = "A prioridade deve estar entre 1 e 10."))]
    pub priority: Option<i16>,
    pub technician: Option<String>,
    pub root_cause: Option<String>,
    pub observations: Option<String>,
}

impl NewMaintenance {
    pub fn validate_rules(&self) -> Result<NaiveDate, AppError> {
        let start_date = self
            .start_date
            .ok_or_else(|| AppError::validation("O campo 'startDate' é obrigatório."))?;
        if self.description.trim().is_empty() {
            return Err(AppError::validation("A descrição é obrigatória."));
        }
        if let Some(end_date) = self.end_date {
            if end_date < start_date {
                return Err(AppError::validation(
                    "A data de término não pode ser anterior à data de início.",
                ));
            }
        }
        if let Some(cost) = self.cost {
            money::ensure_not_negative("cost", cost)?;
        }
        if let Some(priority) = self.priority {
            if !PRIORITY_RANGE.contains(&priority) {
                return Err(AppError::validation("A prioridade deve estar entre 1 e 10."));
            }
        }
        Ok(start_date)
    }

    pub fn into_maintenance(self, asset_id: Uuid, now: DateTime<Utc>) -> Result<Maintenance, AppError> {
        let start_date = self.validate_rules()?;
        Ok(Maintenance {
            id: Uuid::new_v4(),
            asset_id,
            maintenance_type: self.maintenance_type,
            description: self.description,
            start_date,
            end_date: self.end_date,
            cost: money::normalize_opt(self.cost),
            status: MaintenanceStatus::Scheduled,
            priority: self.priority.unwrap_or(DEFAULT_PRIORITY),
            technician: self.technician,
            root_cause: self.root_cause,
            solution_applied: None,
            recommendations: None,
            observations: self.observations,
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

// ---
// Entrada: finalização
// ---
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FinishMaintenance {
    pub end_date: NaiveDate,
    pub solution_applied: Option<String>,
    pub recommendations: Option<String>,
    pub root_cause: Option<String>,
    pub cost: Option<Decimal>,
    /// Próxima manutenção prevista; atualiza o bem quando informada.
    pub next_maintenance_date: Option<NaiveDate>,
}

impl FinishMaintenance {
    pub fn validate_rules(&self, start_date: NaiveDate) -> Result<(), AppError> {
        if self.end_date < start_date {
            return Err(AppError::validation(
                "A data de término não pode ser anterior à data de início.",
            ));
        }
        if let Some(cost) = self.cost {
            money::ensure_not_negative("cost", cost)?;
        }
        if let Some(next) = self.next_maintenance_date {
            if next < self.end_date {
                return Err(AppError::validation(
                    "A próxima manutenção não pode ser anterior ao término desta.",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelMaintenance {
    #[validate(length(min = 1, message = "O motivo do cancelamento é obrigatório."))]
    pub reason: String,
}
