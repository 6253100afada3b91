// src/models/catalog.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Categorias ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    #[schema(example = "Informática")]
    pub name: String,
    pub description: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Localizações ---
// Local físico onde o bem está (sala, prédio, almoxarifado)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: Uuid,
    #[schema(example = "Sala 101 - Bloco A")]
    pub name: String,
    pub address: Option<String>,
    pub responsible: Option<String>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
}

impl NewCategory {
    pub fn into_category(self, now: DateTime<Utc>) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            description: self.description,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewLocation {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub address: Option<String>,
    pub responsible: Option<String>,
}

impl NewLocation {
    pub fn into_location(self, now: DateTime<Utc>) -> Location {
        Location {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            address: self.address,
            responsible: self.responsible,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Categoria com a contagem de bens vinculados.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub asset_count: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationDetail {
    #[serde(flatten)]
    pub location: Location,
    pub asset_count: i64,
}
