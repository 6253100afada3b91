// src/models/decommission.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::common::{error::AppError, money};

/// Etapa derivada dos campos preenchidos (não é persistida).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecommissionStage {
    Open,
    Approved,
    Sold,
}

// --- Baixa patrimonial ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Decommission {
    pub id: Uuid,
    pub asset_id: Uuid,
    #[schema(example = "obsolescence")]
    pub reason: String,
    pub description: Option<String>,
    pub decommission_date: NaiveDate,
    #[schema(example = "200.00")]
    pub residual_value: Option<Decimal>,
    #[schema(example = "PROC-2025/0042")]
    pub process_number: Option<String>,
    pub responsible: String,
    pub approval_date: Option<NaiveDate>,
    pub approved_by: Option<String>,
    pub sale_date: Option<NaiveDate>,
    pub buyer: Option<String>,
    pub sale_value: Option<Decimal>,
    pub observations: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Decommission {
    // Aprovação só conta com data e aprovador juntos
    pub fn is_approved(&self) -> bool {
        self.approval_date.is_some() && self.approved_by.is_some()
    }

    pub fn is_sold(&self) -> bool {
        self.sale_date.is_some() && self.buyer.is_some() && self.sale_value.is_some()
    }

    pub fn stage(&self) -> DecommissionStage {
        if self.is_sold() {
            DecommissionStage::Sold
        } else if self.is_approved() {
            DecommissionStage::Approved
        } else {
            DecommissionStage::Open
        }
    }

    /// Prejuízo = valor de aquisição − valor residual. Negativo é preservado.
    pub fn financial_loss(&self, acquisition_value: Option<Decimal>) -> Decimal {
        match (acquisition_value, self.residual_value) {
            (Some(acquisition), Some(residual)) => money::normalize(acquisition - residual),
            _ => money::normalize(Decimal::ZERO),
        }
    }

    /// Ganho = valor de venda − valor residual. Negativo é preservado.
    pub fn financial_gain(&self) -> Decimal {
        match (self.sale_value, self.residual_value) {
            (Some(sale), Some(residual)) => money::normalize(sale - residual),
            _ => money::normalize(Decimal::ZERO),
        }
    }

    pub fn approve(&mut self, input: &ApproveDecommission) -> Result<(), AppError> {
        if self.is_approved() {
            return Err(AppError::conflict("Esta baixa já foi aprovada."));
        }
        input.validate_rules(self.decommission_date)?;
        self.approved_by = Some(input.approved_by.trim().to_string());
        self.approval_date = Some(input.approval_date);
        Ok(())
    }

    pub fn register_sale(&mut self, input: &RegisterSale) -> Result<(), AppError> {
        let approval_date = match (self.approval_date, self.is_approved()) {
            (Some(date), true) => date,
            _ => {
                return Err(AppError::conflict(
                    "A venda só pode ser registrada após a aprovação da baixa.",
                ))
            }
        };
        if self.is_sold() {
            return Err(AppError::conflict("A venda desta baixa já foi registrada."));
        }
        input.validate_rules(approval_date)?;
        self.buyer = Some(input.buyer.trim().to_string());
        self.sale_value = Some(money::normalize(input.sale_value));
        self.sale_date = Some(input.sale_date);
        Ok(())
    }

    pub fn ensure_deletable(&self) -> Result<(), AppError> {
        if self.is_approved() {
            return Err(AppError::conflict("Não é possível excluir uma baixa já aprovada."));
        }
        Ok(())
    }
}

/// Baixa + valores derivados, como exposto na API.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecommissionDetail {
    #[serde(flatten)]
    pub decommission: Decommission,
    pub stage: DecommissionStage,
    #[schema(example = "800.00")]
    pub financial_loss: Decimal,
    #[schema(example = "300.00")]
    pub financial_gain: Decimal,
}

impl DecommissionDetail {
    pub fn new(decommission: Decommission, acquisition_value: Option<Decimal>) -> Self {
        Self {
            stage: decommission.stage(),
            financial_loss: decommission.financial_loss(acquisition_value),
            financial_gain: decommission.financial_gain(),
            decommission,
        }
    }
}

// ---
// Entrada: abertura da baixa
// ---
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewDecommission {
    pub asset_id: Uuid,
    #[validate(length(min = 1, message = "O motivo é obrigatório."))]
    #[schema(example = "obsolescence")]
    pub reason: String,
    pub description: Option<String>,
    pub decommission_date: NaiveDate,
    pub residual_value: Option<Decimal>,
    pub process_number: Option<String>,
    #[validate(length(min = 1, message = "O responsável é obrigatório."))]
    pub responsible: String,
    pub observations: Option<String>,
}

impl NewDecommission {
    pub fn validate_rules(&self, today: NaiveDate) -> Result<(), AppError> {
        if self.reason.trim().is_empty() {
            return Err(AppError::validation("O motivo é obrigatório."));
        }
        if self.responsible.trim().is_empty() {
            return Err(AppError::validation("O responsável é obrigatório."));
        }
        if self.decommission_date > today {
            return Err(AppError::validation("A data da baixa não pode ser futura."));
        }
        if let Some(residual) = self.residual_value {
            money::ensure_not_negative("residualValue", residual)?;
        }
        Ok(())
    }

    pub fn into_decommission(self, now: DateTime<Utc>) -> Decommission {
        Decommission {
            id: Uuid::new_v4(),
            asset_id: self.asset_id,
            reason: self.reason.trim().to_string(),
            description: self.description,
            decommission_date: self.decommission_date,
            residual_value: money::normalize_opt(self.residual_value),
            process_number: self.process_number,
            responsible: self.responsible.trim().to_string(),
            approval_date: None,
            approved_by: None,
            sale_date: None,
            buyer: None,
            sale_value: None,
            observations: self.observations,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveDecommission {
    #[validate(length(min = 1, message = "O aprovador é obrigatório."))]
    #[schema(example = "J. Silva")]
    pub approved_by: String,
    pub approval_date: NaiveDate,
}

impl ApproveDecommission {
    pub fn validate_rules(&self, decommission_date: NaiveDate) -> Result<(), AppError> {
        if self.approved_by.trim().is_empty() {
            return Err(AppError::validation("O aprovador é obrigatório."));
        }
        if self.approval_date < decommission_date {
            return Err(AppError::validation(
                "A data de aprovação não pode ser anterior à data da baixa.",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSale {
    #[validate(length(min = 1, message = "O comprador é obrigatório."))]
    pub buyer: String,
    #[schema(example = "500.00")]
    pub sale_value: Decimal,
    pub sale_date: NaiveDate,
}

impl RegisterSale {
    pub fn validate_rules(&self, approval_date: NaiveDate) -> Result<(), AppError> {
        if self.buyer.trim().is_empty() {
            return Err(AppError::validation("O comprador é obrigatório."));
        }
        money::ensure_not_negative("saleValue", self.sale_value)?;
        if self.sale_date < approval_date {
            return Err(AppError::validation(
                "A data da venda não pode ser anterior à aprovação.",
            ));
        }
        Ok(())
    }
}
