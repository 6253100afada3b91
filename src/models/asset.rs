// src/models/asset.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::common::{error::AppError, money};

// --- Status do Bem ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "asset_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetStatus {
    Active,
    InMaintenance,
    Decommissioned,
    Inactive,
    InTransit,
    Reserved,
    Stolen,
    Lost,
    Damaged,
    Obsolete,
}

const ANY_STATUS: &[AssetStatus] = &[
    AssetStatus::Active,
    AssetStatus::InMaintenance,
    AssetStatus::Decommissioned,
    AssetStatus::Inactive,
    AssetStatus::InTransit,
    AssetStatus::Reserved,
    AssetStatus::Stolen,
    AssetStatus::Lost,
    AssetStatus::Damaged,
    AssetStatus::Obsolete,
];

// Tudo menos IN_TRANSIT: bem parado (manutenção/inativo) não se movimenta.
const ANY_BUT_TRANSIT: &[AssetStatus] = &[
    AssetStatus::Active,
    AssetStatus::InMaintenance,
    AssetStatus::Decommissioned,
    AssetStatus::Inactive,
    AssetStatus::Reserved,
    AssetStatus::Stolen,
    AssetStatus::Lost,
    AssetStatus::Damaged,
    AssetStatus::Obsolete,
];

impl AssetStatus {
    pub const ALL: &'static [AssetStatus] = ANY_STATUS;

    /// Tabela de transições legais. Único ponto de verificação do status.
    /// DECOMMISSIONED não tem saída aqui: só a exclusão da baixa devolve o bem a ACTIVE.
    pub fn allowed_targets(self) -> &'static [AssetStatus] {
        match self {
            AssetStatus::Decommissioned => &[],
            AssetStatus::InMaintenance | AssetStatus::Inactive => ANY_BUT_TRANSIT,
            AssetStatus::Active
            | AssetStatus::InTransit
            | AssetStatus::Reserved
            | AssetStatus::Stolen
            | AssetStatus::Lost
            | AssetStatus::Damaged
            | AssetStatus::Obsolete => ANY_STATUS,
        }
    }

    pub fn can_transition_to(self, target: AssetStatus) -> bool {
        self.allowed_targets().contains(&target)
    }

    pub fn is_terminal(self) -> bool {
        self == AssetStatus::Decommissioned
    }

    /// Define o flag `active` derivado do status.
    pub fn keeps_asset_active(self) -> bool {
        matches!(
            self,
            AssetStatus::Active
                | AssetStatus::InMaintenance
                | AssetStatus::InTransit
                | AssetStatus::Reserved
                | AssetStatus::Damaged
        )
    }

    /// Bem em uso normal (ativo ou em manutenção) pode ser baixado ou excluído.
    pub fn can_be_decommissioned(self) -> bool {
        matches!(self, AssetStatus::Active | AssetStatus::InMaintenance)
    }

    /// Mesmo nome usado no JSON e no enum do banco.
    pub fn as_str(self) -> &'static str {
        match self {
            AssetStatus::Active => "ACTIVE",
            AssetStatus::InMaintenance => "IN_MAINTENANCE",
            AssetStatus::Decommissioned => "DECOMMISSIONED",
            AssetStatus::Inactive => "INACTIVE",
            AssetStatus::InTransit => "IN_TRANSIT",
            AssetStatus::Reserved => "RESERVED",
            AssetStatus::Stolen => "STOLEN",
            AssetStatus::Lost => "LOST",
            AssetStatus::Damaged => "DAMAGED",
            AssetStatus::Obsolete => "OBSOLETE",
        }
    }
}

impl std::fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "asset_condition", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetCondition {
    Excellent,
    #[default]
    Good,
    Fair,
    Poor,
    Unusable,
}

// --- Bem ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: Uuid,
    #[schema(example = "PAT-000123")]
    pub tag_number: String,
    pub serial_number: Option<String>,
    #[schema(example = "Notebook Dell Latitude")]
    pub name: String,
    pub description: Option<String>,
    pub acquisition_date: NaiveDate,
    #[schema(example = "1000.00")]
    pub acquisition_value: Decimal,
    #[schema(example = "850.00")]
    pub current_value: Decimal,
    pub status: AssetStatus,
    pub condition: AssetCondition,
    pub category_id: Uuid,
    pub location_id: Uuid,
    pub last_maintenance_date: Option<NaiveDate>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub active: bool,
    pub observations: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Asset {
    pub fn from_new(input: NewAsset, now: DateTime<Utc>) -> Self {
        let acquisition_value = money::normalize(input.acquisition_value);
        let status = AssetStatus::Active;
        Self {
            id: Uuid::new_v4(),
            tag_number: input.tag_number.trim().to_string(),
            serial_number: input.serial_number.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            name: input.name,
            description: input.description,
            acquisition_date: input.acquisition_date,
            acquisition_value,
            current_value: money::normalize_opt(input.current_value).unwrap_or(acquisition_value),
            status,
            condition: input.condition.unwrap_or_default(),
            category_id: input.category_id,
            location_id: input.location_id,
            last_maintenance_date: None,
            next_maintenance_date: input.next_maintenance_date,
            active: status.keeps_asset_active(),
            observations: input.observations,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn can_transition(&self, target: AssetStatus) -> bool {
        self.status.can_transition_to(target)
    }

    /// Aplica uma transição validada pela tabela; mantém `active` coerente.
    pub fn transition_to(&mut self, target: AssetStatus) -> Result<(), AppError> {
        if !self.can_transition(target) {
            return Err(AppError::conflict(format!(
                "Transição de status inválida para o bem {}: {} -> {}",
                self.tag_number, self.status, target
            )));
        }
        self.status = target;
        self.active = target.keeps_asset_active();
        Ok(())
    }

    /// Única saída de DECOMMISSIONED, usada quando a baixa é excluída.
    pub fn restore_after_decommission_removal(&mut self) {
        self.status = AssetStatus::Active;
        self.active = true;
    }
}

// ---
// Entrada: criação de bem
// ---
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    #[validate(length(min = 1, message = "O número de patrimônio é obrigatório."))]
    #[schema(example = "PAT-000123")]
    pub tag_number: String,
    pub serial_number: Option<String>,
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
    pub acquisition_date: NaiveDate,
    #[schema(example = "1000.00")]
    pub acquisition_value: Decimal,
    pub current_value: Option<Decimal>,
    pub condition: Option<AssetCondition>,
    pub category_id: Uuid,
    pub location_id: Uuid,
    pub next_maintenance_date: Option<NaiveDate>,
    pub observations: Option<String>,
}

impl NewAsset {
    /// Regras que não dependem do banco. Rodam antes de qualquer escrita.
    pub fn validate_rules(&self, today: NaiveDate) -> Result<(), AppError> {
        if self.tag_number.trim().is_empty() {
            return Err(AppError::validation("O número de patrimônio é obrigatório."));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::validation("O nome é obrigatório."));
        }
        if self.acquisition_date > today {
            return Err(AppError::validation("A data de aquisição não pode ser futura."));
        }
        money::ensure_positive("acquisitionValue", self.acquisition_value)?;
        if let Some(current) = self.current_value {
            money::ensure_not_negative("currentValue", current)?;
        }
        Ok(())
    }
}

// ---
// Entrada: alteração de campos descritivos (nunca status nem patrimônio)
// ---
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssetChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub serial_number: Option<String>,
    pub condition: Option<AssetCondition>,
    pub current_value: Option<Decimal>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub next_maintenance_date: Option<NaiveDate>,
    pub observations: Option<String>,
    /// Versão lida pelo cliente; se informada, precisa bater com a atual.
    pub version: Option<i32>,
}

impl AssetChanges {
    pub fn validate_rules(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("O nome é obrigatório."));
            }
        }
        if let Some(current) = self.current_value {
            money::ensure_not_negative("currentValue", current)?;
        }
        Ok(())
    }

    pub fn apply(self, asset: &mut Asset) {
        if let Some(name) = self.name {
            asset.name = name;
        }
        if let Some(description) = self.description {
            asset.description = Some(description);
        }
        if let Some(serial) = self.serial_number {
            let serial = serial.trim().to_string();
            asset.serial_number = if serial.is_empty() { None } else { Some(serial) };
        }
        if let Some(condition) = self.condition {
            asset.condition = condition;
        }
        if let Some(current) = self.current_value {
            asset.current_value = money::normalize(current);
        }
        if let Some(category_id) = self.category_id {
            asset.category_id = category_id;
        }
        if let Some(location_id) = self.location_id {
            asset.location_id = location_id;
        }
        if let Some(next) = self.next_maintenance_date {
            asset.next_maintenance_date = Some(next);
        }
        if let Some(observations) = self.observations {
            asset.observations = Some(observations);
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
    pub status: AssetStatus,
    pub version: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AssetFilter {
    pub status: Option<AssetStatus>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
}

impl AssetFilter {
    pub fn matches(&self, asset: &Asset) -> bool {
        self.status.is_none_or(|s| asset.status == s)
            && self.category_id.is_none_or(|c| asset.category_id == c)
            && self.location_id.is_none_or(|l| asset.location_id == l)
    }
}
