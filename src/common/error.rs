// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    // Erros de entrada vindos do `validator` (payloads HTTP)
    #[error("Erro de validação")]
    ValidationErrors(#[from] validator::ValidationErrors),

    // Regras de domínio (datas, valores negativos, campos obrigatórios)
    #[error("{0}")]
    Validation(String),

    #[error("{entity} {id} não encontrado(a)")]
    NotFound { entity: &'static str, id: Uuid },

    // Violação de regra de negócio dado o estado atual
    #[error("{0}")]
    Conflict(String),

    // O registro foi alterado por outra requisição (versão otimista divergente)
    #[error("{entity} {id} foi alterado(a) por outra operação; recarregue e tente novamente")]
    StaleVersion { entity: &'static str, id: Uuid },

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        AppError::Conflict(message.into())
    }

    /// Conflitos de regra de negócio e de versão são o mesmo caso para quem chama.
    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict(_) | AppError::StaleVersion { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::ValidationErrors(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationErrors(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            ref e @ AppError::Validation(_) => (StatusCode::BAD_REQUEST, e.to_string()),
            ref e @ AppError::NotFound { .. } => (StatusCode::NOT_FOUND, e.to_string()),
            ref e @ (AppError::Conflict(_) | AppError::StaleVersion { .. }) => {
                (StatusCode::CONFLICT, e.to_string())
            }

            // DatabaseError e InternalServerError viram 500; o detalhe fica só no log.
            ref e => {
                tracing::error!(error = ?e, "Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

/// Converte violações de unicidade do Postgres em `Conflict`.
pub(crate) fn map_unique_violation(e: sqlx::Error, message: impl FnOnce() -> String) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::Conflict(message());
        }
    }
    e.into()
}
