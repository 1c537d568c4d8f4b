// ==========================================
// Portal de Bolsas - Erros da camada de API
// ==========================================
// Converte erros técnicos (importação/repositório) em mensagens
// legíveis para o operador
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// Erros da API
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== Entrada =====
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("Arquivo não encontrado: {0}")]
    FileNotFound(String),

    #[error("Formato não suportado: {0}. Envie um arquivo .csv, .xlsx ou .xls")]
    UnsupportedFormat(String),

    #[error("Arquivo muito grande: {size} bytes (máximo permitido: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    // ===== Importação =====
    #[error("Falha na importação: {0}")]
    ImportError(String),

    #[error("Falha de configuração: {0}")]
    ConfigError(String),

    // ===== Dados =====
    #[error("Registro não encontrado: {0}")]
    NotFound(String),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(String),

    #[error("Falha de conexão com o banco: {0}")]
    DatabaseConnectionError(String),

    // ===== Genérico =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::FileNotFound(path),
            ImportError::UnsupportedFormat(ext) => ApiError::UnsupportedFormat(ext),
            ImportError::ConfigReadError { .. } => ApiError::ConfigError(err.to_string()),
            ImportError::FileReadError(_)
            | ImportError::EmptyFile(_)
            | ImportError::ExcelParseError(_)
            | ImportError::CsvParseError(_) => ApiError::ImportError(err.to_string()),
            ImportError::Other(e) => ApiError::Other(e),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} (id={})", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("falha ao obter lock: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::UniqueConstraintViolation(msg) => ApiError::DatabaseError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("campo {} inválido: {}", field, message))
            }
            RepositoryError::Other(e) => ApiError::Other(e),
        }
    }
}

/// Alias de Result
pub type ApiResult<T> = Result<T, ApiError>;
