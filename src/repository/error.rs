// ==========================================
// Portal de Bolsas - Erros da camada de repositório
// ==========================================

use thiserror::Error;

/// Erros de acesso a dados
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Registro não encontrado: {entity} com id={id}")]
    NotFound { entity: String, id: String },

    #[error("Falha de conexão com o banco: {0}")]
    DatabaseConnectionError(String),

    #[error("Falha ao obter lock do banco: {0}")]
    LockError(String),

    #[error("Falha de consulta: {0}")]
    DatabaseQueryError(String),

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Valor de campo inválido (campo={field}): {message}")]
    FieldValueError { field: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Alias de Result
pub type RepositoryResult<T> = Result<T, RepositoryError>;
